//! Solver configuration

use super::error::{ConfigError, ConfigResult};
use super::validation::Validatable;
use serde::{Deserialize, Serialize};

const MAX_MERGE_WORKERS: usize = 256;

/// Tuning for the constraint registry and the parallel layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Worker threads used to merge per-kind solutions with the baseline (1..=256)
    pub merge_workers: usize,

    /// Emit `info!` events with per-call solving time
    pub log_solve_timings: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            merge_workers: 16,
            log_solve_timings: true,
        }
    }
}

impl SolverConfig {
    /// One merge worker per core, capped at the default pool size
    pub fn auto() -> Self {
        Self {
            merge_workers: num_cpus::get().clamp(1, 16),
            ..Self::default()
        }
    }

    /// Set merge worker count
    pub fn merge_workers(mut self, workers: usize) -> Self {
        self.merge_workers = workers;
        self
    }
}

impl Validatable for SolverConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.merge_workers == 0 || self.merge_workers > MAX_MERGE_WORKERS {
            return Err(ConfigError::range_with_hint(
                "merge_workers",
                self.merge_workers,
                1,
                MAX_MERGE_WORKERS,
                "The merge pool needs at least one worker",
            ));
        }
        Ok(())
    }

    fn config_name(&self) -> &'static str {
        "SolverConfig"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = SolverConfig::default();
        assert_eq!(config.merge_workers, 16);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_workers_rejected() {
        let config = SolverConfig::default().merge_workers(0);
        assert!(matches!(config.validate(), Err(ConfigError::Range { .. })));
    }

    #[test]
    fn test_auto_is_valid() {
        let config = SolverConfig::auto();
        assert!(config.merge_workers >= 1 && config.merge_workers <= 16);
        assert!(config.validate().is_ok());
    }
}
