pub mod flow_constraints;
pub mod infoflow_solution;

pub use flow_constraints::FlowConstraintGenerator;
pub use infoflow_solution::{FlowBindings, InfoflowSolution};
