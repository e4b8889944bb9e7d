//! Feature modules - Each feature follows Hexagonal Architecture
//!
//! Each feature contains:
//! - domain/     - Pure values (labels, elements, predicates, flow records)
//! - ports/      - Interface definitions (traits)
//! - application/ - Use cases (registry, partitioning, parallel solving)
//! - infrastructure/ - Interning tables and solver engines
//!
//! Dependency order: lattice → constraints → predicate → solver → kit → infoflow

pub mod lattice;

pub mod constraints;

// Interval algebra over named integer axes
pub mod predicate;

// Two-point worklist solver + multi-level partial solutions
pub mod solver;

// Constraint registry keyed by (predicate, kind)
pub mod kit;

pub mod infoflow;
