//! Inequality constraint `lhs ⊑ rhs` under a predicate

use super::element::ConsElem;
use crate::shared::models::PredicateId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Obligation `lhs ⊑ rhs` whenever `predicate` holds
///
/// Ordered lexicographically by field order, so ordered sets of constraints
/// deduplicate on the full tuple.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Constraint {
    pub lhs: ConsElem,
    /// Never a join
    pub rhs: ConsElem,
    pub predicate: PredicateId,
    pub implicit: bool,
    pub sink: bool,
    pub info: String,
}

impl Constraint {
    pub fn new(
        lhs: ConsElem,
        rhs: ConsElem,
        predicate: PredicateId,
        implicit: bool,
        sink: bool,
        info: impl Into<String>,
    ) -> Self {
        assert!(!rhs.is_join(), "join on the right-hand side of a constraint");
        Self {
            lhs,
            rhs,
            predicate,
            implicit,
            sink,
            info: info.into(),
        }
    }

    /// Same constraint under another predicate
    pub fn with_predicate(&self, predicate: PredicateId) -> Self {
        Self {
            predicate,
            ..self.clone()
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <: {} [{}]", self.lhs, self.rhs, self.predicate)?;
        if self.implicit {
            write!(f, " implicit")?;
        }
        if self.sink {
            write!(f, " sink")?;
        }
        if !self.info.is_empty() {
            write!(f, " ; {}", self.info)?;
        }
        Ok(())
    }
}

/// Flags decided by a kind name: `implicit*` kinds are implicit flows,
/// `*-sink` / `*-sinks` kinds are sink constraints.
pub fn kind_flags(kind: &str) -> (bool, bool) {
    let implicit = kind.starts_with("implicit");
    let sink = kind.ends_with("-sink") || kind.ends_with("-sinks");
    (implicit, sink)
}
