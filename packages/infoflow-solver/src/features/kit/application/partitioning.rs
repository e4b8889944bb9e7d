/*
 * Predicate Set Refinement
 *
 * Turns a set of possibly-overlapping registered predicates into a disjoint
 * set covering the same points, carrying constraints along:
 *
 *   for i < j over a growing worklist:
 *     if P_i, P_j overlap:
 *       split the pair (Predicate::partition_pair)
 *       P_i-only pieces      ← constraints of P_i
 *       P_j-only pieces      ← constraints of P_j
 *       shared piece         ← constraints of both
 *       a kept smaller operand also receives the larger one's constraints
 *       absorbed operands leave the worklist, new pieces join it
 *
 * Every split strictly shrinks the overlapping region, so the loop ends.
 * The result drops empty predicates and is sorted by `canonical_cmp`.
 */

use super::constraint_kit::ConstraintKit;
use crate::features::predicate::Overlap;
use crate::shared::models::PredicateId;
use tracing::debug;

impl ConstraintKit {
    /// Disjoint refinement of `predicates`, with constraints copied onto every piece
    ///
    /// # Panics
    /// If `PredicateId::TRUE` is among the inputs.
    pub fn partition_predicate_set(&mut self, predicates: Vec<PredicateId>) -> Vec<PredicateId> {
        let mut worklist: Vec<Option<PredicateId>> = Vec::with_capacity(predicates.len());
        for id in predicates {
            assert!(id != PredicateId::TRUE, "the true predicate cannot be partitioned");
            if !worklist.contains(&Some(id)) {
                worklist.push(Some(id));
            }
        }

        let mut splits = 0usize;
        let mut i = 0;
        while i < worklist.len() {
            let mut j = i + 1;
            while j < worklist.len() {
                let (Some(pi), Some(pj)) = (worklist[i], worklist[j]) else {
                    j += 1;
                    continue;
                };

                let mut this = self.predicate(pi).clone();
                let mut other = self.predicate(pj).clone();
                let Some(relation) = this.is_overlapping(&other) else {
                    j += 1;
                    continue;
                };

                let pieces = this.partition_pair(&mut other, relation);
                splits += 1;

                let mut fresh = Vec::with_capacity(pieces.len());
                for piece in pieces.this_only {
                    let id = self.register_piece(piece);
                    self.copy_constraints(pi, id);
                    fresh.push(id);
                }
                for piece in pieces.other_only {
                    let id = self.register_piece(piece);
                    self.copy_constraints(pj, id);
                    fresh.push(id);
                }
                for piece in pieces.shared {
                    let id = self.register_piece(piece);
                    self.copy_constraints(pi, id);
                    self.copy_constraints(pj, id);
                    fresh.push(id);
                }

                match relation {
                    Overlap::Contains | Overlap::Equal => {
                        self.copy_constraints(pi, pj);
                        worklist[i] = None;
                    }
                    Overlap::ContainedBy => {
                        self.copy_constraints(pj, pi);
                        worklist[j] = None;
                    }
                    Overlap::Partial => {
                        worklist[i] = None;
                        worklist[j] = None;
                    }
                }

                for id in fresh {
                    if !worklist.contains(&Some(id)) {
                        worklist.push(Some(id));
                    }
                }

                if worklist[i].is_none() {
                    break;
                }
                j += 1;
            }
            i += 1;
        }

        let mut refined: Vec<PredicateId> = worklist
            .into_iter()
            .flatten()
            .filter(|id| !self.predicate(*id).is_empty())
            .collect();
        refined.sort_by(|a, b| self.predicate(*a).canonical_cmp(self.predicate(*b)));

        debug!("Partitioned predicates into {} disjoint pieces after {} splits", refined.len(), splits);
        refined
    }
}
