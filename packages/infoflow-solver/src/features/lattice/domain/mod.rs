//! Lattice domain values

pub mod axis;
pub mod label;

pub use axis::{CompartmentAxis, LevelAxis};
pub use label::Label;
