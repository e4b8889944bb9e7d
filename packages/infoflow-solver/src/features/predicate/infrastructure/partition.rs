/*
 * Predicate Partitioning (disjoint refinement of two overlapping guards)
 *
 * Given P, Q with relation R = P.is_overlapping(Q):
 *
 *   R = Contains | Equal:  this_only = P − Q,  P emptied,  Q kept (= P ∩ Q)
 *   R = ContainedBy:       other_only = Q − P, Q emptied,  P kept (= P ∩ Q)
 *   R = Partial:           I = P ∩ Q
 *                          this_only = P − I, other_only = Q − I,
 *                          shared = [I], both emptied
 *
 * Subtraction of S ⊆ P, axis by axis over S's axes a_1..a_n:
 *
 *   below_k = S[a_1..a_{k-1}] ∧ P ∧ (P[a_k].lo ≤ a_k ≤ S[a_k].lo − 1)
 *   above_k = S[a_1..a_{k-1}] ∧ P ∧ (S[a_k].hi + 1 ≤ a_k ≤ P[a_k].hi)
 *
 * The 2n candidates are pairwise disjoint and cover P − S; empty ones are
 * dropped. ±1 saturates at ±∞.
 */

use crate::features::predicate::domain::{add1_extend, sub1_extend, Overlap, Predicate};
use serde::{Deserialize, Serialize};

/// Disjoint pieces produced by [`Predicate::partition_pair`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionResult {
    /// self − other
    pub this_only: Vec<Predicate>,
    /// other − self
    pub other_only: Vec<Predicate>,
    /// self ∩ other (only for partial overlaps; otherwise the smaller operand)
    pub shared: Vec<Predicate>,
}

impl PartitionResult {
    pub fn is_empty(&self) -> bool {
        self.this_only.is_empty() && self.other_only.is_empty() && self.shared.is_empty()
    }

    pub fn len(&self) -> usize {
        self.this_only.len() + self.other_only.len() + self.shared.len()
    }
}

impl Predicate {
    /// Split an overlapping pair into disjoint pieces, emptying absorbed operands
    pub fn partition_pair(&mut self, other: &mut Predicate, relation: Overlap) -> PartitionResult {
        let mut result = PartitionResult::default();
        match relation {
            Overlap::Contains | Overlap::Equal => {
                result.this_only = self.subtract(other);
                self.make_empty();
            }
            Overlap::ContainedBy => {
                result.other_only = other.subtract(self);
                other.make_empty();
            }
            Overlap::Partial => {
                let shared = self.intersection(other);
                result.this_only = self.subtract(&shared);
                result.other_only = other.subtract(&shared);
                result.shared.push(shared);
                self.make_empty();
                other.make_empty();
            }
        }
        result
    }

    /// self − sub, for sub ⊆ self
    pub fn subtract(&self, sub: &Predicate) -> Vec<Predicate> {
        let mut pieces = Vec::with_capacity(sub.intervals().len() * 2);

        for (k, cut) in sub.intervals().iter().enumerate() {
            let (lower, upper) = self.bounds(&cut.axis);
            let below = Predicate::interval(cut.axis.clone(), lower, sub1_extend(cut.lower));
            let above = Predicate::interval(cut.axis.clone(), add1_extend(cut.upper), upper);

            for mut piece in [below, above] {
                for iv in self.intervals() {
                    piece.add_inequality(iv.axis.clone(), iv.lower, iv.upper);
                }
                for iv in &sub.intervals()[..k] {
                    piece.add_inequality(iv.axis.clone(), iv.lower, iv.upper);
                }
                if !piece.is_empty() {
                    pieces.push(piece);
                }
            }
        }

        pieces
    }

    /// self ∩ other
    pub fn intersection(&self, other: &Predicate) -> Predicate {
        let mut out = Predicate::new();
        if self.is_empty() || other.is_empty() {
            out.make_empty();
            return out;
        }
        for iv in self.intervals().iter().chain(other.intervals()) {
            out.add_inequality(iv.axis.clone(), iv.lower, iv.upper);
        }
        out
    }
}
