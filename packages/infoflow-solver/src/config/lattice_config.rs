//! Lattice configuration
//!
//! Mirrors the `"lattice"` object of an analysis configuration document:
//!
//! ```json
//! {
//!   "levels": [ { "name": "conf", "level": ["low", "medium", "high"] } ],
//!   "compartments": [ { "name": "owners", "set": ["alice", "bob"] } ]
//! }
//! ```
//!
//! Level order is rank order (index 0 is bottom). Compartment sets are
//! unordered universes.

use super::error::{ConfigError, ConfigResult};
use super::validation::{ensure_unique, Validatable, ValidatableCollection};
use serde::{Deserialize, Serialize};

/// One totally-ordered level axis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelAxisConfig {
    /// Axis name
    pub name: String,

    /// Level names, lowest first
    pub level: Vec<String>,
}

/// One subset-ordered compartment axis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompartmentAxisConfig {
    /// Axis name
    pub name: String,

    /// Member universe
    pub set: Vec<String>,
}

/// Lattice axes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LatticeConfig {
    pub levels: Vec<LevelAxisConfig>,
    pub compartments: Vec<CompartmentAxisConfig>,
}

impl LatticeConfig {
    /// Two-point lattice with a single level axis `name = [low, high]`
    pub fn two_point(name: impl Into<String>) -> Self {
        Self {
            levels: vec![LevelAxisConfig {
                name: name.into(),
                level: vec!["low".to_string(), "high".to_string()],
            }],
            compartments: Vec::new(),
        }
    }

    /// Add a level axis
    pub fn with_levels<S: Into<String>>(
        mut self,
        name: impl Into<String>,
        levels: impl IntoIterator<Item = S>,
    ) -> Self {
        self.levels.push(LevelAxisConfig {
            name: name.into(),
            level: levels.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// Add a compartment axis
    pub fn with_compartment<S: Into<String>>(
        mut self,
        name: impl Into<String>,
        members: impl IntoIterator<Item = S>,
    ) -> Self {
        self.compartments.push(CompartmentAxisConfig {
            name: name.into(),
            set: members.into_iter().map(Into::into).collect(),
        });
        self
    }

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
}

impl Validatable for LevelAxisConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.level.is_empty() {
            return Err(ConfigError::EmptyLevels(self.name.clone()));
        }
        ensure_unique(
            self.level.iter().map(String::as_str),
            "level",
            &format!("axis '{}'", self.name),
        )
    }

    fn config_name(&self) -> &'static str {
        "LevelAxisConfig"
    }
}

impl Validatable for CompartmentAxisConfig {
    fn validate(&self) -> ConfigResult<()> {
        ensure_unique(
            self.set.iter().map(String::as_str),
            "member",
            &format!("compartment '{}'", self.name),
        )
    }

    fn config_name(&self) -> &'static str {
        "CompartmentAxisConfig"
    }
}

impl Validatable for LatticeConfig {
    fn validate(&self) -> ConfigResult<()> {
        // level and compartment axes share one namespace
        let names = self
            .levels
            .iter()
            .map(|a| a.name.as_str())
            .chain(self.compartments.iter().map(|a| a.name.as_str()));
        ensure_unique(names, "axis", "lattice")?;

        self.levels.validate_all()?;
        self.compartments.validate_all()
    }

    fn config_name(&self) -> &'static str {
        "LatticeConfig"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_json_lattice() {
        let text = r#"{
            "levels": [ { "name": "conf", "level": ["low", "medium", "high"] } ],
            "compartments": [ { "name": "owners", "set": ["alice", "bob"] } ]
        }"#;
        let config = LatticeConfig::from_json_str(text).unwrap();
        assert_eq!(config.levels[0].level.len(), 3);
        assert_eq!(config.compartments[0].set, vec!["alice", "bob"]);
    }

    #[test]
    fn test_parse_yaml_lattice() {
        let text = "levels:\n  - name: integrity\n    level: [trusted, untrusted]\n";
        let config = LatticeConfig::from_yaml_str(text).unwrap();
        assert_eq!(config.levels[0].name, "integrity");
        assert!(config.compartments.is_empty());
    }

    #[test]
    fn test_duplicate_level_rejected() {
        let config = LatticeConfig::default().with_levels("conf", ["low", "low"]);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Duplicate { what: "level", .. })
        ));
    }

    #[test]
    fn test_axis_names_shared_between_kinds() {
        let config = LatticeConfig::default()
            .with_levels("x", ["a"])
            .with_compartment("x", ["m"]);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Duplicate { what: "axis", .. })
        ));
    }

    #[test]
    fn test_empty_level_axis_rejected() {
        let config = LatticeConfig::default().with_levels("conf", Vec::<String>::new());
        assert!(matches!(config.validate(), Err(ConfigError::EmptyLevels(_))));
    }
}
