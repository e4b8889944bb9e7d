//! Configuration validation
//!
//! Every config struct implements [`Validatable`]; nested axis lists are
//! checked through [`ValidatableCollection`]. Name clashes are reported with
//! [`ensure_unique`].

use super::error::{ConfigError, ConfigResult};
use rustc_hash::FxHashSet;

/// Configuration that can check itself before it is used
pub trait Validatable {
    fn validate(&self) -> ConfigResult<()>;

    /// Name used in error messages
    fn config_name(&self) -> &'static str {
        "Config"
    }
}

/// Validate every element of a list, stopping at the first failure
pub trait ValidatableCollection {
    fn validate_all(&self) -> ConfigResult<()>;
}

impl<T: Validatable> ValidatableCollection for [T] {
    fn validate_all(&self) -> ConfigResult<()> {
        self.iter().try_for_each(Validatable::validate)
    }
}

/// First repeated name wins the error
///
/// `what` names the thing being declared ("axis", "level", "member"),
/// `scope` where it was declared.
pub fn ensure_unique<'a>(
    names: impl IntoIterator<Item = &'a str>,
    what: &'static str,
    scope: &str,
) -> ConfigResult<()> {
    let mut seen = FxHashSet::default();
    for name in names {
        if !seen.insert(name) {
            return Err(ConfigError::duplicate(what, name, scope));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Workers(usize);

    impl Validatable for Workers {
        fn validate(&self) -> ConfigResult<()> {
            if self.0 == 0 {
                return Err(ConfigError::range_with_hint("workers", 0, 1, 8, ""));
            }
            Ok(())
        }
    }

    #[test]
    fn test_validate_all_stops_at_first_failure() {
        assert!(vec![Workers(1), Workers(2)].validate_all().is_ok());
        assert!(vec![Workers(1), Workers(0)].validate_all().is_err());
    }

    #[test]
    fn test_ensure_unique_reports_repeat() {
        assert!(ensure_unique(["a", "b"], "level", "axis 'x'").is_ok());
        let err = ensure_unique(["a", "b", "a"], "level", "axis 'x'").unwrap_err();
        assert_eq!(err.to_string(), "Duplicate level 'a' in axis 'x'");
    }
}
