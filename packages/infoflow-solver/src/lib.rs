/*
 * Infoflow Solver - Constraint-based Lattice Solver for Taint Analysis
 *
 * Feature-First Hexagonal Architecture:
 * - shared/      : Handle types shared by every feature
 * - features/    : Vertical slices (lattice → constraints → predicate → solver → kit → infoflow)
 * - config/      : Lattice + solver configuration (JSON/YAML)
 * - errors       : Crate error type
 *
 * Pipeline:
 * - Collaborators turn program flows into `lhs ⊑ rhs` constraints under a kind
 *   and a path predicate (ConstraintKit)
 * - Least/greatest fixed points are computed per kind and cached
 * - Solutions answer "is this element tainted" through `subst`
 *
 * References:
 * - Denning (1976): "A Lattice Model of Secure Information Flow"
 * - Rehof & Mogensen (1999): "Tractable Constraints in Finite Semilattices"
 */

#![allow(clippy::too_many_arguments)] // Partition helpers carry both operands
#![allow(clippy::type_complexity)] // Nested map types in the registry
#![allow(clippy::new_without_default)] // Default impl not always meaningful
#![allow(clippy::module_inception)] // Module naming intentional

// ═══════════════════════════════════════════════════════════════════════════
// Module Exports - Feature-First Architecture
// ═══════════════════════════════════════════════════════════════════════════

/// Shared handle types
pub mod shared;

/// Feature modules
pub mod features;

/// Configuration system
pub mod config;

/// Error types
pub mod errors;

// ═══════════════════════════════════════════════════════════════════════════
// Re-exports for Public API
// ═══════════════════════════════════════════════════════════════════════════

pub use errors::{Result, SolverError};
pub use shared::models::{ConstId, JoinId, KindId, PredicateId, VarId};

pub use features::constraints::{AnalysisContext, ConsElem, Constraint, ElementStore, VarInfo};
pub use features::infoflow::{
    FlowBindings, FlowConstraintGenerator, FlowRecord, InfoflowSolution, PointsTo,
};
pub use features::kit::{ConstraintKit, KitStats};
pub use features::lattice::{Label, Lattice, LatticeBuilder};
pub use features::predicate::{Interval1D, Overlap, PartitionResult, Predicate};
pub use features::solver::{FixpointSolver, PartialSolution, Polarity, SolveState, Solution};
