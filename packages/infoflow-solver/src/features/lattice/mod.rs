// Security lattice: level × compartment product, interned constants
//
// Hexagonal Architecture:
// - domain: Label, axis tables
// - infrastructure: LatticeBuilder → Lattice (lock), constant table, text form

pub mod domain;
pub mod infrastructure;

pub use domain::{CompartmentAxis, Label, LevelAxis};
pub use infrastructure::{Lattice, LatticeBuilder};
