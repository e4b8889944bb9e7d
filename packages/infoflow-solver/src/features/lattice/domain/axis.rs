//! Lattice axes
//!
//! A level axis is a total order given by list position. A compartment axis
//! is a finite universe ordered by set inclusion; members are kept sorted so
//! a member's index is stable across runs.

use serde::{Deserialize, Serialize};

/// Totally-ordered axis (index 0 is bottom)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelAxis {
    pub name: String,
    pub levels: Vec<String>,
}

impl LevelAxis {
    pub fn new(name: impl Into<String>, levels: Vec<String>) -> Self {
        Self {
            name: name.into(),
            levels,
        }
    }

    /// Rank of a level name
    pub fn index_of(&self, level: &str) -> Option<u32> {
        self.levels
            .iter()
            .position(|l| l == level)
            .map(|i| i as u32)
    }

    /// Level name at a rank
    pub fn level_name(&self, index: u32) -> Option<&str> {
        self.levels.get(index as usize).map(String::as_str)
    }

    /// Highest rank
    #[inline]
    pub fn top_index(&self) -> u32 {
        self.levels.len().saturating_sub(1) as u32
    }
}

/// Subset-ordered axis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompartmentAxis {
    pub name: String,
    /// Sorted universe
    pub members: Vec<String>,
}

impl CompartmentAxis {
    pub fn new(name: impl Into<String>, mut members: Vec<String>) -> Self {
        members.sort();
        Self {
            name: name.into(),
            members,
        }
    }

    pub fn index_of(&self, member: &str) -> Option<u32> {
        self.members
            .binary_search_by(|m| m.as_str().cmp(member))
            .ok()
            .map(|i| i as u32)
    }

    pub fn member_name(&self, index: u32) -> Option<&str> {
        self.members.get(index as usize).map(String::as_str)
    }

    #[inline]
    pub fn universe_size(&self) -> usize {
        self.members.len()
    }
}
