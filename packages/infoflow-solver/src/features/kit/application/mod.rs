pub mod constraint_kit;
pub mod parallel;
pub mod partitioning;

pub use constraint_kit::ConstraintKit;
pub use parallel::{DEFAULT_KIND, DEFAULT_SINKS_KIND};
