//! Common test utilities for infoflow-solver
//!
//! Shared lattices, kits and constraint-system builders for integration tests.

#![allow(dead_code)]

mod builders;
mod fixtures;

pub use builders::*;
pub use fixtures::*;
