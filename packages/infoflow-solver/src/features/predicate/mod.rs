// Path predicates: conjunctions of integer intervals over named axes
//
// Hexagonal Architecture:
// - domain: Interval1D, Predicate, Overlap classification
// - infrastructure: pairwise partitioning (difference, intersection)
//
// Set-level refinement with constraint propagation lives in the kit.

pub mod domain;
pub mod infrastructure;

pub use domain::{Interval1D, Overlap, Predicate, NEG_INF, POS_INF};
pub use infrastructure::PartitionResult;
