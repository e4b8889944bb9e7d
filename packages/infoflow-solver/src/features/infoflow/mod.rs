// Information-flow layer over the constraint registry
//
// Hexagonal Architecture:
// - domain: FlowRecord, built-in flow kinds
// - ports: PointsTo (pointer targets supplied by the collaborator)
// - application: FlowConstraintGenerator (records → constraints),
//   InfoflowSolution (taint queries on values, locations, varargs, pointers)

pub mod application;
pub mod domain;
pub mod ports;

pub use application::{FlowBindings, FlowConstraintGenerator, InfoflowSolution};
pub use domain::{flow_kind, with_flow_kinds, FlowRecord};
pub use ports::PointsTo;
