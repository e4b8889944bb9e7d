pub mod polarity;

pub use polarity::{Polarity, SolveState};
