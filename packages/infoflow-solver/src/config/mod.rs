//! Configuration System
//!
//! The lattice (level and compartment axes) and solver tuning are read once
//! at startup, validated, and handed to [`LatticeBuilder::from_config`] and
//! [`ConstraintKit::with_config`].
//!
//! # Examples
//!
//! ```rust,ignore
//! use infoflow_solver::config::AnalysisConfig;
//!
//! let config = AnalysisConfig::from_path("config.json")?;
//! let lattice = LatticeBuilder::from_config(&config.lattice)?;
//! let kit = ConstraintKit::with_config(lattice, config.solver)?;
//! ```
//!
//! [`LatticeBuilder::from_config`]: crate::features::lattice::LatticeBuilder::from_config
//! [`ConstraintKit::with_config`]: crate::features::kit::ConstraintKit::with_config

pub mod analysis_config;
pub mod error;
pub mod lattice_config;
pub mod solver_config;
pub mod validation;

// Re-exports
pub use analysis_config::AnalysisConfig;
pub use error::{ConfigError, ConfigResult};
pub use lattice_config::{CompartmentAxisConfig, LatticeConfig, LevelAxisConfig};
pub use solver_config::SolverConfig;
pub use validation::{ensure_unique, Validatable, ValidatableCollection};
