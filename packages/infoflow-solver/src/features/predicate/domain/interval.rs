//! One-dimensional integer interval over a named axis
//!
//! `i64::MIN` / `i64::MAX` stand for −∞ / +∞. `[−∞, −∞]` is the empty
//! sentinel.

use serde::{Deserialize, Serialize};
use std::fmt;

pub const NEG_INF: i64 = i64::MIN;
pub const POS_INF: i64 = i64::MAX;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Interval1D {
    pub axis: String,
    pub lower: i64,
    pub upper: i64,
}

impl Interval1D {
    /// `lower > upper` yields the empty sentinel
    pub fn new(axis: impl Into<String>, lower: i64, upper: i64) -> Self {
        let (lower, upper) = if lower <= upper {
            (lower, upper)
        } else {
            (NEG_INF, NEG_INF)
        };
        Self {
            axis: axis.into(),
            lower,
            upper,
        }
    }

    /// Unconstrained axis
    pub fn full(axis: impl Into<String>) -> Self {
        Self::new(axis, NEG_INF, POS_INF)
    }

    #[inline]
    pub fn is_empty_sentinel(&self) -> bool {
        self.lower == NEG_INF && self.upper == NEG_INF
    }

    /// Inverted, `[+∞, +∞]` or `[−∞, −∞]`
    #[inline]
    pub fn is_invalid(&self) -> bool {
        self.lower > self.upper
            || (self.lower == POS_INF && self.upper == POS_INF)
            || self.is_empty_sentinel()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.lower == NEG_INF && self.upper == POS_INF
    }

    #[inline]
    pub fn overlaps(&self, other: &Interval1D) -> bool {
        (self.lower <= other.lower && self.upper >= other.lower)
            || (other.lower <= self.lower && other.upper >= self.lower)
    }

    #[inline]
    pub fn contains(&self, value: i64) -> bool {
        self.lower <= value && value <= self.upper
    }

    pub(crate) fn set_empty(&mut self) {
        self.lower = NEG_INF;
        self.upper = NEG_INF;
    }
}

/// x + 1, saturating at +∞
#[inline]
pub fn add1_extend(x: i64) -> i64 {
    if x == POS_INF {
        POS_INF
    } else {
        x + 1
    }
}

/// x − 1, saturating at −∞
#[inline]
pub fn sub1_extend(x: i64) -> i64 {
    if x == NEG_INF {
        NEG_INF
    } else {
        x - 1
    }
}

fn bound(f: &mut fmt::Formatter<'_>, x: i64) -> fmt::Result {
    match x {
        NEG_INF => write!(f, "-inf"),
        POS_INF => write!(f, "+inf"),
        _ => write!(f, "{}", x),
    }
}

impl fmt::Display for Interval1D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        bound(f, self.lower)?;
        write!(f, " <= {} <= ", self.axis)?;
        bound(f, self.upper)
    }
}
