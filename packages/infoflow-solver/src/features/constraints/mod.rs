// Constraint graph: elements (constant | variable | join) and `lhs ⊑ rhs`
//
// Hexagonal Architecture:
// - domain: ConsElem, Constraint, VarInfo
// - infrastructure: ElementStore (variables + join interning), AnalysisContext

pub mod domain;
pub mod infrastructure;

pub use domain::{kind_flags, ConsElem, Constraint, VarInfo};
pub use infrastructure::{AnalysisContext, ElementStore};
