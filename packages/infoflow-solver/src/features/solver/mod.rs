// Fixed-point solving over constraint sets
//
// Hexagonal Architecture:
// - domain: Polarity (least | greatest), SolveState
// - ports: Solution trait (subst, is_tainted)
// - infrastructure: FixpointSolver (two-point worklist), PartialSolution
//   (multi-level, chainable)

pub mod domain;
pub mod infrastructure;
pub mod ports;

pub use domain::{Polarity, SolveState};
pub use infrastructure::{FixpointSolver, PartialSolution, SolutionLayer};
pub use ports::Solution;
