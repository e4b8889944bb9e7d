/*
 * Path Predicate (conjunction of 1-D intervals)
 *
 * P = ⋀ lo_a ≤ a ≤ hi_a   over named axes a
 *
 * - At most one interval per axis (re-adding an axis intersects)
 * - Intervals sorted by axis name after every mutation
 * - Absent axis ≡ (−∞, +∞)
 * - Any empty interval ⇒ the whole predicate is empty ("never true")
 * - No intervals and not empty ⇒ always true
 *
 * Overlap classification walks both sorted axis lists (merge-join):
 * an axis constrained on one side only makes that side the smaller one,
 * a shared axis must overlap or the pair is disjoint, and directions that
 * disagree across axes downgrade the pair to a partial overlap.
 */

use super::interval::{Interval1D, NEG_INF, POS_INF};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Relation between two overlapping predicates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Overlap {
    Equal,
    /// self ⊇ other
    Contains,
    /// self ⊆ other
    ContainedBy,
    /// Overlapping, neither contains the other
    Partial,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Predicate {
    intervals: Vec<Interval1D>,
    never: bool,
}

impl Predicate {
    /// Always-true predicate
    pub fn new() -> Self {
        Self::default()
    }

    /// Single-axis predicate `lower ≤ axis ≤ upper`
    pub fn interval(axis: impl Into<String>, lower: i64, upper: i64) -> Self {
        let mut pred = Self::new();
        pred.add_inequality(axis, lower, upper);
        pred
    }

    /// Builder form of [`Predicate::add_inequality`]
    pub fn and(mut self, axis: impl Into<String>, lower: i64, upper: i64) -> Self {
        self.add_inequality(axis, lower, upper);
        self
    }

    /// Constrain `axis` to `[lower, upper]`, intersecting with an existing bound
    pub fn add_inequality(&mut self, axis: impl Into<String>, lower: i64, upper: i64) {
        let axis = axis.into();
        if self.never {
            return;
        }

        match self.intervals.iter_mut().find(|iv| iv.axis == axis) {
            Some(existing) => {
                let incoming = Interval1D::new(axis, lower, upper);
                if existing.overlaps(&incoming) {
                    existing.lower = existing.lower.max(incoming.lower);
                    existing.upper = existing.upper.min(incoming.upper);
                } else {
                    existing.set_empty();
                }
            }
            None => self.intervals.push(Interval1D::new(axis, lower, upper)),
        }

        self.validate();
        self.intervals.sort_by(|a, b| a.axis.cmp(&b.axis));
    }

    fn validate(&mut self) {
        if self.intervals.iter().any(Interval1D::is_invalid) {
            self.make_empty();
        }
    }

    /// Collapse to the never-true predicate
    pub fn make_empty(&mut self) {
        self.never = true;
        for iv in &mut self.intervals {
            iv.set_empty();
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.never
    }

    #[inline]
    pub fn is_true(&self) -> bool {
        !self.never && self.intervals.iter().all(Interval1D::is_full)
    }

    pub fn intervals(&self) -> &[Interval1D] {
        &self.intervals
    }

    /// Interval for an axis, if constrained
    pub fn get(&self, axis: &str) -> Option<&Interval1D> {
        self.intervals
            .binary_search_by(|iv| iv.axis.as_str().cmp(axis))
            .ok()
            .map(|i| &self.intervals[i])
    }

    /// Bounds for an axis (full range when unconstrained)
    pub fn bounds(&self, axis: &str) -> (i64, i64) {
        self.get(axis)
            .map_or((NEG_INF, POS_INF), |iv| (iv.lower, iv.upper))
    }

    /// Evaluate at a point
    pub fn holds(&self, value_of: impl Fn(&str) -> i64) -> bool {
        !self.never
            && self
                .intervals
                .iter()
                .all(|iv| iv.contains(value_of(&iv.axis)))
    }

    // ------------------------------------------------------------------------
    // Overlap
    // ------------------------------------------------------------------------

    /// Classify the pair, `None` if they never hold together
    pub fn is_overlapping(&self, other: &Predicate) -> Option<Overlap> {
        if self.is_empty() || other.is_empty() {
            return None;
        }

        let (a, b) = (&self.intervals, &other.intervals);
        let mut flags = Vec::with_capacity(a.len().max(b.len()));
        let (mut i, mut j) = (0, 0);

        while i < a.len() || j < b.len() {
            let order = match (a.get(i), b.get(j)) {
                (Some(x), Some(y)) => x.axis.cmp(&y.axis),
                (Some(_), None) => Ordering::Less,
                (None, _) => Ordering::Greater,
            };

            match order {
                // axis constrained only here
                Ordering::Less => {
                    flags.push(if a[i].is_full() {
                        Overlap::Equal
                    } else {
                        Overlap::ContainedBy
                    });
                    i += 1;
                }
                // axis constrained only in other
                Ordering::Greater => {
                    flags.push(if b[j].is_full() {
                        Overlap::Equal
                    } else {
                        Overlap::Contains
                    });
                    j += 1;
                }
                Ordering::Equal => {
                    let (x, y) = (&a[i], &b[j]);
                    if !x.overlaps(y) {
                        return None;
                    }
                    flags.push(classify(x, y));
                    i += 1;
                    j += 1;
                }
            }
        }

        let mut directed = flags.into_iter().filter(|f| *f != Overlap::Equal);
        let Some(first) = directed.next() else {
            return Some(Overlap::Equal);
        };
        if directed.all(|f| f == first) {
            Some(first)
        } else {
            Some(Overlap::Partial)
        }
    }

    /// Total order for the final partition output: lexicographic on
    /// `(axis, lower)`, shorter first on prefix ties
    pub fn canonical_cmp(&self, other: &Predicate) -> Ordering {
        for (x, y) in self.intervals.iter().zip(&other.intervals) {
            let ord = x.axis.cmp(&y.axis).then(x.lower.cmp(&y.lower));
            if ord != Ordering::Equal {
                return ord;
            }
        }
        self.intervals.len().cmp(&other.intervals.len())
    }
}

fn classify(x: &Interval1D, y: &Interval1D) -> Overlap {
    let (l1, u1, l2, u2) = (x.lower, x.upper, y.lower, y.upper);
    if l1 == l2 && u1 == u2 {
        Overlap::Equal
    } else if l1 <= l2 && u2 <= u1 {
        Overlap::Contains
    } else if l2 <= l1 && u1 <= u2 {
        Overlap::ContainedBy
    } else {
        Overlap::Partial
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.never {
            return write!(f, "(False)");
        }
        if self.intervals.is_empty() {
            return write!(f, "(True)");
        }
        for (i, iv) in self.intervals.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", iv)?;
        }
        Ok(())
    }
}
