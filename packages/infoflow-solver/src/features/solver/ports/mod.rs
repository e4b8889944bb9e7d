//! Solution port
//!
//! What collaborators query after solving. Both the two-point
//! [`FixpointSolver`](crate::features::solver::FixpointSolver) and the
//! multi-level [`PartialSolution`](crate::features::solver::PartialSolution)
//! implement it.

use crate::features::constraints::{AnalysisContext, ConsElem};
use crate::shared::models::ConstId;

pub trait Solution: Send + Sync {
    /// Lattice value of an element under this solution
    fn subst(&self, elem: ConsElem) -> ConstId;

    fn context(&self) -> &AnalysisContext;

    /// Value is not the untainted extreme (bottom)
    fn is_tainted(&self, elem: ConsElem) -> bool {
        self.subst(elem) != self.context().lattice().bottom()
    }

    /// Value is the fully tainted extreme (top)
    fn is_fully_tainted(&self, elem: ConsElem) -> bool {
        self.subst(elem) == self.context().lattice().top()
    }
}
