//! Configuration loader supporting YAML, TOML and JSON formats.

use crate::config::{Configurable, Validatable};
use crate::error::ConfigError;
use serde::de::DeserializeOwned;
use std::path::Path;

/// Supported configuration file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfigFormat {
    /// YAML format (.yaml, .yml)
    #[default]
    Yaml,
    /// TOML format (.toml)
    Toml,
    /// JSON format (.json)
    Json,
}

impl ConfigFormat {
    /// Detects the format from a file extension.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| match ext.to_lowercase().as_str() {
                "yaml" | "yml" => Some(Self::Yaml),
                "toml" => Some(Self::Toml),
                "json" => Some(Self::Json),
                _ => None,
            })
    }
}

/// Configuration loader with support for multiple formats and environment overrides.
///
/// # Example
///
/// ```rust,ignore
/// use podhost_core::config::ConfigLoader;
///
/// let config: ServerConfig = ConfigLoader::new()
///     .with_env_prefix("PODHOST")
///     .load_validated("config.yaml")?;
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Environment variable prefix for overrides.
    env_prefix: Option<String>,
    /// Whether to validate after loading.
    validate: bool,
}

impl ConfigLoader {
    /// Creates a new configuration loader.
    #[must_use]
    pub fn new() -> Self {
        Self {
            env_prefix: None,
            validate: true,
        }
    }

    /// Sets the environment variable prefix for overrides.
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = Some(prefix.into());
        self
    }

    /// Sets whether to validate the configuration after loading.
    ///
    /// Default is `true`.
    #[must_use]
    pub fn with_validation(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }

    /// Returns the environment variable prefix, if set.
    #[must_use]
    pub fn env_prefix(&self) -> Option<&str> {
        self.env_prefix.as_deref()
    }

    /// Loads configuration from a file.
    ///
    /// The format is detected from the file extension.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The file format is not recognized
    /// - The content cannot be parsed
    pub fn load_file<T, P>(&self, path: P) -> Result<T, ConfigError>
    where
        T: DeserializeOwned,
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let format = ConfigFormat::from_path(path).ok_or_else(|| ConfigError::InvalidFormat {
            path: path.display().to_string(),
            reason: "Unrecognized file extension. Supported: .yaml, .yml, .toml, .json".to_string(),
        })?;

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileReadError {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        self.load_str(&content, format)
            .map_err(|e| relabel_path(e, &path.display().to_string()))
    }

    /// Loads a configuration file, then applies environment overrides (when a
    /// prefix is set) and validation (when enabled).
    ///
    /// # Errors
    ///
    /// Returns an error if loading, an override, or validation fails.
    pub fn load_validated<T, P>(&self, path: P) -> Result<T, ConfigError>
    where
        T: DeserializeOwned + Configurable + Validatable,
        P: AsRef<Path>,
    {
        let config = self.load_file(path)?;
        self.finish(config)
    }

    /// Applies environment overrides and validation to an already-built
    /// configuration (e.g. `Default::default()` when no file exists).
    ///
    /// # Errors
    ///
    /// Returns an error if an override or validation fails.
    pub fn finish<T>(&self, mut config: T) -> Result<T, ConfigError>
    where
        T: Configurable + Validatable,
    {
        if let Some(prefix) = &self.env_prefix {
            config.apply_env_overrides(prefix)?;
        }
        if self.validate {
            config.validate()?;
        }
        Ok(config)
    }

    /// Loads configuration from a string with the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if the content cannot be parsed.
    pub fn load_str<T>(&self, content: &str, format: ConfigFormat) -> Result<T, ConfigError>
    where
        T: DeserializeOwned,
    {
        let config: T = match format {
            ConfigFormat::Yaml => {
                serde_yaml::from_str(content).map_err(|e| ConfigError::InvalidFormat {
                    path: "<string>".to_string(),
                    reason: format!("YAML parse error: {e}"),
                })?
            }
            ConfigFormat::Toml => {
                toml::from_str(content).map_err(|e| ConfigError::InvalidFormat {
                    path: "<string>".to_string(),
                    reason: format!("TOML parse error: {e}"),
                })?
            }
            ConfigFormat::Json => {
                serde_json::from_str(content).map_err(|e| ConfigError::InvalidFormat {
                    path: "<string>".to_string(),
                    reason: format!("JSON parse error: {e}"),
                })?
            }
        };

        Ok(config)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn relabel_path(error: ConfigError, path: &str) -> ConfigError {
    match error {
        ConfigError::InvalidFormat { reason, .. } => ConfigError::InvalidFormat {
            path: path.to_string(),
            reason,
        },
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[derive(Debug, Deserialize, PartialEq)]
    struct TestConfig {
        host: String,
        port: u16,
        #[serde(default)]
        debug: bool,
    }

    impl Validatable for TestConfig {
        fn validate(&self) -> Result<(), ConfigError> {
            if self.port == 0 {
                return Err(ConfigError::invalid_value("port", "must not be 0"));
            }
            Ok(())
        }
    }

    impl Configurable for TestConfig {
        fn apply_env_overrides(&mut self, prefix: &str) -> Result<(), ConfigError> {
            // Unique per-test variable names keep parallel tests independent.
            let name = format!("{prefix}_PORT");
            if let Ok(value) = std::env::var(&name) {
                self.port = value
                    .parse()
                    .map_err(|_| ConfigError::invalid_env_var(name, format!("'{value}' is not a port")))?;
            }
            Ok(())
        }

        fn env_var_names(prefix: &str) -> Vec<String> {
            vec![format!("{prefix}_PORT")]
        }
    }

    fn temp_file(suffix: &str, content: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_format_detection() {
        assert_eq!(
            ConfigFormat::from_path(Path::new("config.yaml")),
            Some(ConfigFormat::Yaml)
        );
        assert_eq!(
            ConfigFormat::from_path(Path::new("config.YML")),
            Some(ConfigFormat::Yaml)
        );
        assert_eq!(
            ConfigFormat::from_path(Path::new("config.toml")),
            Some(ConfigFormat::Toml)
        );
        assert_eq!(
            ConfigFormat::from_path(Path::new("config.json")),
            Some(ConfigFormat::Json)
        );
        assert_eq!(ConfigFormat::from_path(Path::new("config.ini")), None);
    }

    #[test]
    fn test_load_yaml() {
        let yaml = "host: localhost\nport: 8080\ndebug: true\n";
        let config: TestConfig = ConfigLoader::new()
            .load_str(yaml, ConfigFormat::Yaml)
            .unwrap();
        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 8080);
        assert!(config.debug);
    }

    #[test]
    fn test_load_toml() {
        let toml = "host = \"localhost\"\nport = 8080\n";
        let config: TestConfig = ConfigLoader::new()
            .load_str(toml, ConfigFormat::Toml)
            .unwrap();
        assert_eq!(config.port, 8080);
        assert!(!config.debug);
    }

    #[test]
    fn test_invalid_yaml() {
        let result: Result<TestConfig, _> =
            ConfigLoader::new().load_str("host: [unclosed", ConfigFormat::Yaml);
        assert!(matches!(result, Err(ConfigError::InvalidFormat { .. })));
    }

    #[test]
    fn test_load_file_reports_path() {
        let file = temp_file(".yaml", "host: [unclosed");
        let err = ConfigLoader::new()
            .load_file::<TestConfig, _>(file.path())
            .unwrap_err();
        match err {
            ConfigError::InvalidFormat { path, .. } => {
                assert_eq!(path, file.path().display().to_string());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_file_not_found() {
        let result: Result<TestConfig, _> =
            ConfigLoader::new().load_file("/nonexistent/podhost.yaml");
        assert!(matches!(result, Err(ConfigError::FileReadError { .. })));
    }

    #[test]
    fn test_unrecognized_extension() {
        let file = temp_file(".ini", "host=x");
        let result: Result<TestConfig, _> = ConfigLoader::new().load_file(file.path());
        assert!(matches!(result, Err(ConfigError::InvalidFormat { .. })));
    }

    #[test]
    fn test_load_validated_rejects_invalid() {
        let file = temp_file(".json", r#"{"host":"localhost","port":0}"#);
        let result: Result<TestConfig, _> = ConfigLoader::new().load_validated(file.path());
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));

        let unchecked: TestConfig = ConfigLoader::new()
            .with_validation(false)
            .load_validated(file.path())
            .unwrap();
        assert_eq!(unchecked.port, 0);
    }

    #[test]
    fn test_env_override_applied() {
        let prefix = "PODHOST_LOADER_TEST_OVERRIDE";
        // SAFETY: the variable name is unique to this test.
        unsafe { std::env::set_var(format!("{prefix}_PORT"), "9191") };

        let file = temp_file(".yaml", "host: localhost\nport: 8080\n");
        let config: TestConfig = ConfigLoader::new()
            .with_env_prefix(prefix)
            .load_validated(file.path())
            .unwrap();
        assert_eq!(config.port, 9191);
        assert_eq!(
            TestConfig::env_var_names(prefix),
            vec![format!("{prefix}_PORT")]
        );
    }

    #[test]
    fn test_env_override_invalid() {
        let prefix = "PODHOST_LOADER_TEST_INVALID";
        // SAFETY: the variable name is unique to this test.
        unsafe { std::env::set_var(format!("{prefix}_PORT"), "not-a-port") };

        let loader = ConfigLoader::new().with_env_prefix(prefix);
        assert_eq!(loader.env_prefix(), Some(prefix));
        let result = loader.finish(TestConfig {
            host: "localhost".to_string(),
            port: 8080,
            debug: false,
        });
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar { .. })));
    }
}
