pub mod fixpoint_solver;
pub mod partial_solution;

pub use fixpoint_solver::FixpointSolver;
pub use partial_solution::{PartialSolution, SolutionLayer};
