//! Predicate algebra and partitioning
//!
//! Pieces are checked pointwise: every sample point of the covered region
//! must satisfy exactly one piece.

mod common;

use common::*;
use infoflow_solver::{Overlap, Predicate, PredicateId};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

const SAMPLE: std::ops::RangeInclusive<i64> = -2..=14;

fn holds_at(pred: &Predicate, x: i64, y: i64) -> bool {
    pred.holds(|axis| if axis == "x" { x } else { y })
}

// ============================================================================
// Scenario B
// ============================================================================

#[test]
fn test_scenario_b_partial_overlap() {
    let mut p1 = Predicate::interval("x", 0, 5);
    let mut p2 = Predicate::interval("x", 3, 10);

    let relation = p1.is_overlapping(&p2);
    assert_eq!(relation, Some(Overlap::Partial));

    let pieces = p1.partition_pair(&mut p2, Overlap::Partial);
    assert_eq!(pieces.this_only, vec![Predicate::interval("x", 0, 2)]);
    assert_eq!(pieces.other_only, vec![Predicate::interval("x", 6, 10)]);
    assert_eq!(pieces.shared, vec![Predicate::interval("x", 3, 5)]);
}

#[test]
fn test_overlap_classification() {
    let wide = Predicate::interval("x", 0, 10);
    let narrow = Predicate::interval("x", 2, 4);
    let other_axis = Predicate::interval("y", 0, 1);

    assert_eq!(wide.is_overlapping(&narrow), Some(Overlap::Contains));
    assert_eq!(narrow.is_overlapping(&wide), Some(Overlap::ContainedBy));
    assert_eq!(wide.is_overlapping(&wide.clone()), Some(Overlap::Equal));
    assert_eq!(wide.is_overlapping(&other_axis), Some(Overlap::Partial));
    assert_eq!(narrow.is_overlapping(&Predicate::interval("x", 5, 9)), None);
    assert_eq!(Predicate::new().is_overlapping(&narrow), Some(Overlap::Contains));
}

#[test]
fn test_disjoint_intersection_empties_predicate() {
    let mut pred = Predicate::interval("x", 0, 3);
    pred.add_inequality("x", 5, 8);
    assert!(pred.is_empty());
    assert_eq!(pred.to_string(), "(False)");
    assert_eq!(Predicate::new().to_string(), "(True)");
}

#[test]
fn test_two_axis_refinement_through_kit() {
    let mut kit = two_point_kit();
    let v = kit.new_var("v", "");
    let top = kit.top();
    let a = kit.register_predicate(Predicate::interval("x", 0, 6).and("y", 0, 6));
    let b = kit.register_predicate(Predicate::interval("x", 4, 10).and("y", 4, 10));
    kit.add_constraint("k", top, v, a, "");

    let refined = kit.partition_predicate_set(vec![a, b]);
    assert!(!refined.contains(&PredicateId::TRUE));

    for x in SAMPLE {
        for y in SAMPLE {
            let in_a = holds_at(kit.predicate(a), x, y);
            let in_b = holds_at(kit.predicate(b), x, y);
            let hits: Vec<PredicateId> = refined
                .iter()
                .copied()
                .filter(|id| holds_at(kit.predicate(*id), x, y))
                .collect();
            assert_eq!(hits.len(), usize::from(in_a || in_b), "point ({}, {})", x, y);
            if let Some(piece) = hits.first() {
                // pieces inside `a` carry a's constraint
                assert_eq!(kit.constraints("k", *piece).len(), usize::from(in_a));
            }
        }
    }
}

// ============================================================================
// Properties
// ============================================================================

fn interval() -> impl Strategy<Value = (i64, i64)> {
    (0i64..12, 0i64..6).prop_map(|(lo, len)| (lo, lo + len))
}

fn predicate() -> impl Strategy<Value = Predicate> {
    (interval(), proptest::option::of(interval())).prop_map(|((xl, xh), y)| {
        let pred = Predicate::interval("x", xl, xh);
        match y {
            Some((yl, yh)) => pred.and("y", yl, yh),
            None => pred,
        }
    })
}

proptest! {
    #[test]
    fn prop_partition_covers_and_disjoints(p in predicate(), q in predicate()) {
        let Some(relation) = p.is_overlapping(&q) else {
            return Ok(());
        };
        let (mut this, mut other) = (p.clone(), q.clone());
        let pieces = this.partition_pair(&mut other, relation);

        let mut all: Vec<Predicate> = Vec::new();
        all.extend(pieces.this_only.iter().cloned());
        all.extend(pieces.other_only.iter().cloned());
        all.extend(pieces.shared.iter().cloned());
        // kept operands remain part of the cover
        if !this.is_empty() {
            all.push(this);
        }
        if !other.is_empty() {
            all.push(other);
        }

        for x in SAMPLE {
            for y in SAMPLE {
                let covered = holds_at(&p, x, y) || holds_at(&q, x, y);
                let hits = all.iter().filter(|piece| holds_at(piece, x, y)).count();
                prop_assert_eq!(hits, usize::from(covered), "point ({}, {})", x, y);
            }
        }
    }

    #[test]
    fn prop_add_inequality_idempotent(p in predicate(), (lo, hi) in interval()) {
        let mut once = p.clone();
        once.add_inequality("x", lo, hi);
        let mut twice = once.clone();
        twice.add_inequality("x", lo, hi);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn prop_intersection_is_pointwise_and(p in predicate(), q in predicate()) {
        let both = p.intersection(&q);
        for x in SAMPLE {
            prop_assert_eq!(holds_at(&both, x, 3), holds_at(&p, x, 3) && holds_at(&q, x, 3));
        }
    }
}
