pub mod interval;
pub mod predicate;

pub use interval::{add1_extend, sub1_extend, Interval1D, NEG_INF, POS_INF};
pub use predicate::{Overlap, Predicate};
