// Constraint registry: storage per (predicate, kind), locking, cached solutions
//
// Hexagonal Architecture:
// - domain: BucketKey, ConstraintBucket, KindTable, KitStats
// - application: ConstraintKit (storage + solving), predicate set refinement,
//   parallel solving (both polarities, many kinds against a baseline)

pub mod application;
pub mod domain;

pub use application::{ConstraintKit, DEFAULT_KIND, DEFAULT_SINKS_KIND};
pub use domain::{BucketKey, KitStats};
