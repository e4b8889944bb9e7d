//! Top-level analysis configuration document

use super::error::{ConfigError, ConfigResult};
use super::lattice_config::LatticeConfig;
use super::solver_config::SolverConfig;
use super::validation::Validatable;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration consumed once at startup
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Lattice axes
    pub lattice: LatticeConfig,

    /// Solver tuning
    #[serde(default)]
    pub solver: SolverConfig,
}

impl AnalysisConfig {
    /// Parse and validate from JSON
    pub fn from_json_str(text: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate from YAML
    pub fn from_yaml_str(text: &str) -> ConfigResult<Self> {
        let config: Self = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a `.json`, `.yaml` or `.yml` file
    pub fn from_path(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&text),
            Some("yaml") | Some("yml") => Self::from_yaml_str(&text),
            other => Err(ConfigError::UnsupportedFormat(
                other.unwrap_or_default().to_string(),
            )),
        }
    }
}

impl Validatable for AnalysisConfig {
    fn validate(&self) -> ConfigResult<()> {
        self.lattice.validate()?;
        self.solver.validate()
    }

    fn config_name(&self) -> &'static str {
        "AnalysisConfig"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solver_section_defaults() {
        let text = r#"{ "lattice": { "levels": [ { "name": "t", "level": ["low", "high"] } ] } }"#;
        let config = AnalysisConfig::from_json_str(text).unwrap();
        assert_eq!(config.solver, SolverConfig::default());
    }

    #[test]
    fn test_invalid_solver_section_rejected() {
        let text = "lattice:\n  levels: []\nsolver:\n  merge_workers: 0\n";
        assert!(AnalysisConfig::from_yaml_str(text).is_err());
    }

    #[test]
    fn test_unknown_extension_rejected() {
        let file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        std::fs::write(file.path(), "lattice = {}").unwrap();
        let result = AnalysisConfig::from_path(file.path());
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(ext)) if ext == "toml"));
    }

    #[test]
    fn test_yaml_file_loaded() {
        let file = tempfile::Builder::new().suffix(".yml").tempfile().unwrap();
        std::fs::write(
            file.path(),
            "lattice:\n  levels:\n    - name: conf\n      level: [low, high]\n  compartments:\n    - name: owners\n      set: [alice, bob]\nsolver:\n  merge_workers: 4\n",
        )
        .unwrap();
        let config = AnalysisConfig::from_path(file.path()).unwrap();
        assert_eq!(config.lattice.compartments[0].set, vec!["alice", "bob"]);
        assert_eq!(config.solver.merge_workers, 4);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = AnalysisConfig::from_path(dir.path().join("absent.json"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
