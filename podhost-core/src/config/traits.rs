//! The two hooks every podhost configuration section implements.
//!
//! [`ConfigLoader`](super::ConfigLoader) calls them in a fixed order:
//! deserialize, then [`Configurable::apply_env_overrides`], then
//! [`Validatable::validate`]. A `PODHOST_PORT=0` override is therefore
//! caught by validation like a `port: 0` in the file.

use crate::error::ConfigError;

/// Rejects values that deserialize fine but cannot run.
///
/// Sections validate their own keys and delegate to nested sections, so the
/// first error names the full dotted path:
///
/// ```rust
/// use podhost_core::config::Validatable;
/// use podhost_core::error::ConfigError;
///
/// struct ShutdownSection {
///     timeout_secs: u64,
/// }
///
/// impl Validatable for ShutdownSection {
///     fn validate(&self) -> Result<(), ConfigError> {
///         if self.timeout_secs == 0 {
///             return Err(ConfigError::invalid_value(
///                 "shutdown.timeout_secs",
///                 "must be at least one second",
///             ));
///         }
///         Ok(())
///     }
/// }
///
/// assert!(ShutdownSection { timeout_secs: 0 }.validate().is_err());
/// ```
pub trait Validatable {
    /// Returns the first problem found.
    fn validate(&self) -> Result<(), ConfigError>;
}

/// Applies `{prefix}_*` environment variables on top of a loaded file.
///
/// Unset variables leave the value alone. A variable that is set but cannot
/// be parsed is an error, never silently skipped.
pub trait Configurable: Sized {
    /// Reads the override variables for `prefix` (e.g. `PODHOST`).
    fn apply_env_overrides(&mut self, prefix: &str) -> Result<(), ConfigError>;

    /// Lists the variables [`Configurable::apply_env_overrides`] reads.
    fn env_var_names(prefix: &str) -> Vec<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CatalogSection {
        watch: bool,
        debounce_ms: u64,
    }

    impl Validatable for CatalogSection {
        fn validate(&self) -> Result<(), ConfigError> {
            if self.watch && self.debounce_ms == 0 {
                return Err(ConfigError::invalid_value(
                    "catalog.debounce_ms",
                    "must be positive while watching",
                ));
            }
            Ok(())
        }
    }

    impl Configurable for CatalogSection {
        fn apply_env_overrides(&mut self, prefix: &str) -> Result<(), ConfigError> {
            let name = format!("{prefix}_CATALOG_WATCH");
            if let Ok(value) = std::env::var(&name) {
                self.watch = value
                    .parse()
                    .map_err(|_| ConfigError::invalid_env_var(name, "expected true or false"))?;
            }
            Ok(())
        }

        fn env_var_names(prefix: &str) -> Vec<String> {
            vec![format!("{prefix}_CATALOG_WATCH")]
        }
    }

    #[test]
    fn test_validation_depends_on_other_keys() {
        let watching = CatalogSection {
            watch: true,
            debounce_ms: 0,
        };
        let err = watching.validate().unwrap_err();
        assert!(err.to_string().contains("catalog.debounce_ms"));

        let idle = CatalogSection {
            watch: false,
            debounce_ms: 0,
        };
        assert!(idle.validate().is_ok());
    }

    #[test]
    fn test_override_then_validate() {
        let prefix = "PODHOST_TRAITS_TEST";
        // SAFETY: the variable name is unique to this test.
        unsafe { std::env::set_var(format!("{prefix}_CATALOG_WATCH"), "true") };

        let mut section = CatalogSection {
            watch: false,
            debounce_ms: 0,
        };
        section.apply_env_overrides(prefix).unwrap();
        assert!(section.watch);
        assert!(section.validate().is_err());
        assert_eq!(
            CatalogSection::env_var_names(prefix),
            vec!["PODHOST_TRAITS_TEST_CATALOG_WATCH".to_string()]
        );
    }
}
