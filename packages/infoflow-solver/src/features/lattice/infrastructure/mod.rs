pub mod label_text;
pub mod lattice;

pub use lattice::{Lattice, LatticeBuilder};
