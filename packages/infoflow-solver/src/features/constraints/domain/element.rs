/*
 * Constraint Elements
 *
 * Closed sum over the three node kinds of the constraint graph:
 * - Constant: interned lattice point (immutable)
 * - Variable: unknown, valued only by a solver
 * - Join:     interned least upper bound of a flat member set
 *
 * Elements are handles; ordering and equality are handle identity, which
 * after interning coincides with structural equality for constants and
 * joins. Variables are never structurally equal.
 */

use crate::shared::models::{ConstId, JoinId, VarId};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Node of the constraint graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ConsElem {
    Constant(ConstId),
    Variable(VarId),
    Join(JoinId),
}

impl ConsElem {
    #[inline]
    pub fn is_constant(&self) -> bool {
        matches!(self, ConsElem::Constant(_))
    }

    #[inline]
    pub fn is_join(&self) -> bool {
        matches!(self, ConsElem::Join(_))
    }

    #[inline]
    pub fn as_variable(&self) -> Option<VarId> {
        match self {
            ConsElem::Variable(v) => Some(*v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_constant(&self) -> Option<ConstId> {
        match self {
            ConsElem::Constant(c) => Some(*c),
            _ => None,
        }
    }
}

impl From<ConstId> for ConsElem {
    fn from(id: ConstId) -> Self {
        ConsElem::Constant(id)
    }
}

impl From<VarId> for ConsElem {
    fn from(id: VarId) -> Self {
        ConsElem::Variable(id)
    }
}

impl From<JoinId> for ConsElem {
    fn from(id: JoinId) -> Self {
        ConsElem::Join(id)
    }
}

impl fmt::Display for ConsElem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConsElem::Constant(c) => write!(f, "{}", c),
            ConsElem::Variable(v) => write!(f, "{}", v),
            ConsElem::Join(j) => write!(f, "{}", j),
        }
    }
}

// ============================================================================
// Variable diagnostics
// ============================================================================

lazy_static! {
    static ref DUMP_SANITIZE_RE: Regex =
        Regex::new(r#"[ =@\\\[\];\n"{}~]+"#).expect("dump name pattern");
}

/// Diagnostic record of a variable
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VarInfo {
    pub id: VarId,
    pub desc: String,
    pub meta: String,
}

impl VarInfo {
    pub fn new(id: VarId, desc: impl Into<String>, meta: impl Into<String>) -> Self {
        Self {
            id,
            desc: desc.into(),
            meta: meta.into(),
        }
    }

    /// Name used in constraint dumps
    ///
    /// Runs of ` =@\[];\n"{}~` become `_`; the result carries at least two
    /// `|` delimiters so dump columns line up.
    pub fn dump_name(&self) -> String {
        let mut name = DUMP_SANITIZE_RE.replace_all(&self.desc, "_").into_owned();
        name.push_str(&DUMP_SANITIZE_RE.replace_all(&self.meta, "_"));
        let delims = name.matches('|').count();
        for _ in delims..2 {
            name.push('|');
        }
        name
    }
}
