//! Label textual form
//!
//! `[axis1:level1,axis2:level2][set1:{m1,m2},set2:{}]`
//!
//! The first bracket group lists `axis:level` pairs, the second lists
//! `axis:{member,...}` groups. Axes not mentioned are at bottom.

use crate::errors::{Result, SolverError};
use crate::features::lattice::domain::Label;
use crate::features::lattice::infrastructure::lattice::Lattice;
use crate::shared::models::ConstId;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref LABEL_RE: Regex =
        Regex::new(r"^\s*\[([^\[\]]*)\]\s*\[(.*)\]\s*$").expect("label pattern");
    static ref COMPARTMENT_RE: Regex =
        Regex::new(r"([^,:{}\s]+)\s*:\s*\{([^{}]*)\}").expect("compartment pattern");
}

impl Lattice {
    /// Render a label in textual form (every axis listed)
    pub fn render_label(&self, label: &Label) -> String {
        let levels: Vec<String> = self
            .level_axes()
            .iter()
            .zip(&label.levels)
            .map(|(axis, rank)| format!("{}:{}", axis.name, axis.level_name(*rank).unwrap_or("?")))
            .collect();

        let compartments: Vec<String> = self
            .compartment_axes()
            .iter()
            .zip(&label.compartments)
            .map(|(axis, set)| {
                let members: Vec<&str> = set
                    .iter()
                    .filter_map(|idx| axis.member_name(*idx))
                    .collect();
                format!("{}:{{{}}}", axis.name, members.join(","))
            })
            .collect();

        format!("[{}][{}]", levels.join(","), compartments.join(","))
    }

    /// Textual form of an interned constant
    pub fn render_constant(&self, id: ConstId) -> String {
        self.render_label(&self.label(id))
    }

    /// Parse the textual form against this lattice
    pub fn parse_label(&self, text: &str) -> Result<Label> {
        let caps = LABEL_RE
            .captures(text)
            .ok_or_else(|| SolverError::malformed(text, "expected `[levels][compartments]`"))?;

        let mut levels: Vec<(&str, &str)> = Vec::new();
        for pair in caps[1].split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (axis, level) = pair
                .split_once(':')
                .ok_or_else(|| SolverError::malformed(text, format!("level entry '{}' lacks ':'", pair)))?;
            levels.push((axis.trim(), level.trim()));
        }

        let group = &caps[2];
        let mut parsed: Vec<(&str, Vec<&str>)> = Vec::new();
        let mut cursor = 0;
        for m in COMPARTMENT_RE.captures_iter(group) {
            let whole = m.get(0).map(|g| (g.start(), g.end())).unwrap_or((cursor, cursor));
            if !is_separator(&group[cursor..whole.0]) {
                return Err(SolverError::malformed(
                    text,
                    format!("unexpected '{}' in compartments", group[cursor..whole.0].trim()),
                ));
            }
            cursor = whole.1;

            let axis = m.get(1).map_or("", |g| g.as_str());
            let members = m
                .get(2)
                .map_or("", |g| g.as_str())
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .collect();
            parsed.push((axis, members));
        }
        if !is_separator(&group[cursor..]) {
            return Err(SolverError::malformed(
                text,
                format!("unexpected '{}' in compartments", group[cursor..].trim()),
            ));
        }

        let compartments: Vec<(&str, &[&str])> = parsed
            .iter()
            .map(|(axis, members)| (*axis, members.as_slice()))
            .collect();
        self.make_label(&levels, &compartments)
    }
}

fn is_separator(s: &str) -> bool {
    s.chars().all(|c| c == ',' || c.is_whitespace())
}
