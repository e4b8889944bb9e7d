//! Configuration error types

use thiserror::Error;

/// Configuration error type
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Range validation error
    #[error("Invalid range for field '{field}': {value} not in {min}..={max}. {hint}")]
    Range {
        field: String,
        value: String,
        min: String,
        max: String,
        hint: String,
    },

    /// Same name declared twice
    #[error("Duplicate {what} '{name}' in {scope}")]
    Duplicate {
        what: &'static str,
        name: String,
        scope: String,
    },

    /// Level axis without levels
    #[error("Level axis '{0}' must declare at least one level")]
    EmptyLevels(String),

    /// Unrecognized file extension
    #[error("Unsupported configuration format '{0}' (expected .json, .yaml or .yml)")]
    UnsupportedFormat(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Custom error
    #[error("{0}")]
    Custom(String),
}

/// Configuration result type
pub type ConfigResult<T> = Result<T, ConfigError>;

impl ConfigError {
    /// Create a range error with a hint
    pub fn range_with_hint(
        field: impl Into<String>,
        value: impl ToString,
        min: impl ToString,
        max: impl ToString,
        hint: impl Into<String>,
    ) -> Self {
        Self::Range {
            field: field.into(),
            value: value.to_string(),
            min: min.to_string(),
            max: max.to_string(),
            hint: hint.into(),
        }
    }

    /// Create a duplicate-name error
    pub fn duplicate(what: &'static str, name: impl Into<String>, scope: impl Into<String>) -> Self {
        Self::Duplicate {
            what,
            name: name.into(),
            scope: scope.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_error_message() {
        let err = ConfigError::range_with_hint("merge_workers", 0, 1, 256, "Use at least one worker");
        let msg = err.to_string();
        assert!(msg.contains("merge_workers"));
        assert!(msg.contains("1..=256"));
    }

    #[test]
    fn test_duplicate_error_message() {
        let err = ConfigError::duplicate("level", "low", "axis 'conf'");
        assert_eq!(err.to_string(), "Duplicate level 'low' in axis 'conf'");
    }
}
