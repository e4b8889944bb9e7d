//! Error types for infoflow-solver
//!
//! Recoverable failures (configuration, label text, locked kinds through the
//! fallible API) are values of [`SolverError`]. Contract violations by a
//! collaborator (join on a right-hand side, double solve, unsupported meet)
//! are panics, not errors.

use thiserror::Error;

use crate::config::ConfigError;

/// Main error type for infoflow-solver operations
#[derive(Debug, Error)]
pub enum SolverError {
    /// Two axes share a name (level and compartment axes share one namespace)
    #[error("Duplicate axis name '{0}'")]
    DuplicateAxis(String),

    /// A level axis lists the same level twice
    #[error("Duplicate level name '{level}' on axis '{axis}'")]
    DuplicateLevel { axis: String, level: String },

    /// A compartment axis lists the same member twice
    #[error("Duplicate member '{member}' in compartment '{axis}'")]
    DuplicateMember { axis: String, member: String },

    /// A level axis needs at least one level
    #[error("Level axis '{0}' has no levels")]
    EmptyLevelAxis(String),

    /// Axis not present in the locked lattice
    #[error("Unknown axis '{0}'")]
    UnknownAxis(String),

    /// Level name not present on the axis
    #[error("Unknown level '{level}' on axis '{axis}'")]
    UnknownLevel { axis: String, level: String },

    /// Compartment member outside the configured universe
    #[error("Unknown member '{member}' in compartment '{axis}'")]
    UnknownMember { axis: String, member: String },

    /// Label text does not match `[axis:level,...][set:{m,...},...]`
    #[error("Malformed label '{text}': {reason}")]
    MalformedLabel { text: String, reason: String },

    /// Kind has already been solved under this predicate
    #[error("Kind '{kind}' is locked under predicate #{predicate}; cannot add constraints")]
    KindLocked { kind: String, predicate: u32 },

    /// Worker pool could not be created
    #[error("Worker pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl SolverError {
    /// Create a malformed label error
    pub fn malformed(text: impl Into<String>, reason: impl Into<String>) -> Self {
        SolverError::MalformedLabel {
            text: text.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for solver operations
pub type Result<T> = std::result::Result<T, SolverError>;
