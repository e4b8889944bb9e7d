pub mod constraint;
pub mod element;

pub use constraint::{kind_flags, Constraint};
pub use element::{ConsElem, VarInfo};
