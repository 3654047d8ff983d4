//! Errors raised while reading the server configuration and the catalog file.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A configuration or catalog file that cannot be used.
///
/// Field names are dotted paths into the file (`api.port`,
/// `routing.tenant_header`), so a message points straight at the offending
/// key.
///
/// ```
/// use podhost_core::error::ConfigError;
///
/// let error = ConfigError::missing_field_in_section("path", "catalog");
/// assert_eq!(error.to_string(), "config: catalog.path is required");
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigError {
    /// A required key is absent or empty.
    #[error("config: {} is required", dotted(section.as_deref(), field))]
    MissingField {
        /// Key name.
        field: String,
        /// Enclosing section, when the key is nested.
        section: Option<String>,
    },

    /// A key is present but its value is unusable.
    #[error("config: {field}: {reason}")]
    InvalidValue {
        /// Dotted key path.
        field: String,
        /// What is wrong with the value.
        reason: String,
    },

    /// The file could not be opened or read.
    #[error("config: cannot read {path}: {reason}")]
    FileReadError {
        /// File path.
        path: String,
        /// I/O failure.
        reason: String,
    },

    /// The file was read but is not valid YAML, TOML or JSON for the
    /// expected shape, or its extension is unknown.
    #[error("config: cannot parse {path}: {reason}")]
    InvalidFormat {
        /// File path, or `<string>` for in-memory input.
        path: String,
        /// Parser message.
        reason: String,
    },

    /// A `PODHOST_*` override holds a value of the wrong type.
    #[error("config: environment variable {name}: {reason}")]
    InvalidEnvVar {
        /// Variable name, prefix included.
        name: String,
        /// What is wrong with the value.
        reason: String,
    },
}

fn dotted(section: Option<&str>, field: &str) -> String {
    match section {
        Some(section) => format!("{section}.{field}"),
        None => field.to_string(),
    }
}

impl ConfigError {
    /// A top-level key is missing.
    #[must_use]
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
            section: None,
        }
    }

    /// A key inside `section` is missing.
    #[must_use]
    pub fn missing_field_in_section(field: impl Into<String>, section: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
            section: Some(section.into()),
        }
    }

    /// `field` holds an unusable value.
    #[must_use]
    pub fn invalid_value(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// The override variable `name` holds an unusable value.
    #[must_use]
    pub fn invalid_env_var(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidEnvVar {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_top_level_key() {
        let error = ConfigError::missing_field("api");
        assert_eq!(error.to_string(), "config: api is required");
    }

    #[test]
    fn test_missing_nested_key_is_dotted() {
        let error = ConfigError::missing_field_in_section("tenant_header", "routing");
        assert_eq!(error.to_string(), "config: routing.tenant_header is required");
    }

    #[test]
    fn test_invalid_value_names_the_key() {
        let error = ConfigError::invalid_value("shutdown.timeout_secs", "must be positive");
        assert_eq!(error.to_string(), "config: shutdown.timeout_secs: must be positive");
    }

    #[test]
    fn test_invalid_env_var() {
        let error = ConfigError::invalid_env_var("PODHOST_PORT", "'http' is not a port");
        assert!(matches!(error, ConfigError::InvalidEnvVar { ref name, .. } if name == "PODHOST_PORT"));
        assert!(error.to_string().starts_with("config: environment variable PODHOST_PORT"));
    }

    #[test]
    fn test_file_errors_name_the_path() {
        let error = ConfigError::FileReadError {
            path: "demos/catalog.yaml".to_string(),
            reason: "No such file or directory".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "config: cannot read demos/catalog.yaml: No such file or directory"
        );
    }
}
