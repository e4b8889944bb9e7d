//! Solve direction and solver lifecycle

use crate::features::lattice::Lattice;
use crate::shared::models::ConstId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Least solutions start every variable at bottom and raise it; greatest
/// solutions start at top and lower it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Polarity {
    Least,
    Greatest,
}

impl Polarity {
    /// Value of an unconstrained variable
    #[inline]
    pub fn default_value(self, lattice: &Lattice) -> ConstId {
        match self {
            Polarity::Least => lattice.bottom(),
            Polarity::Greatest => lattice.top(),
        }
    }

    /// Value of a variable the two-point solver had to move
    #[inline]
    pub fn other_extreme(self, lattice: &Lattice) -> ConstId {
        match self {
            Polarity::Least => lattice.top(),
            Polarity::Greatest => lattice.bottom(),
        }
    }

    /// Accumulate a bound: join when raising, meet when lowering
    #[inline]
    pub fn combine(self, lattice: &Lattice, a: ConstId, b: ConstId) -> ConstId {
        match self {
            Polarity::Least => lattice.join(a, b),
            Polarity::Greatest => lattice.meet(a, b),
        }
    }

    /// Whether `target` already accounts for a bound flowing from `source`
    #[inline]
    pub fn absorbs(self, lattice: &Lattice, source: ConstId, target: ConstId) -> bool {
        match self {
            Polarity::Least => lattice.leq(source, target),
            Polarity::Greatest => lattice.leq(target, source),
        }
    }
}

impl fmt::Display for Polarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Polarity::Least => write!(f, "least"),
            Polarity::Greatest => write!(f, "greatest"),
        }
    }
}

/// unsolved → solving → solved, one-shot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SolveState {
    Unsolved,
    Solving,
    Solved,
}
