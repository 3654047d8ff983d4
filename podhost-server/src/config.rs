//! Server configuration.
//!
//! Groups the API, logging, metrics, catalog and shutdown settings loaded
//! from a single YAML, TOML or JSON file.

use podhost_api::ApiConfig;
use podhost_core::config::{Configurable, Validatable};
use podhost_core::error::ConfigError;
use podhost_core::types::Hostname;
use podhost_telemetry::logging::LogConfig;
use podhost_telemetry::metrics::MetricsConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable prefix for overrides.
pub const ENV_PREFIX: &str = "PODHOST";

/// Server configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP server and routing settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LogConfig,

    /// Metrics settings.
    #[serde(default)]
    pub metrics: MetricsConfig,

    /// Tenant catalog settings.
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Shutdown settings.
    #[serde(default)]
    pub shutdown: ShutdownConfig,
}

impl Validatable for ServerConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.api.validate()?;
        self.logging.validate()?;
        self.metrics.validate()?;
        self.catalog.validate()?;
        self.shutdown.validate()
    }
}

impl Configurable for ServerConfig {
    fn apply_env_overrides(&mut self, prefix: &str) -> Result<(), ConfigError> {
        if let Ok(host) = std::env::var(format!("{prefix}_HOST")) {
            self.api.host = host;
        }
        let name = format!("{prefix}_PORT");
        if let Ok(port) = std::env::var(&name) {
            self.api.port = port
                .parse()
                .map_err(|_| ConfigError::invalid_env_var(name, format!("'{port}' is not a valid port")))?;
        }
        if let Ok(path) = std::env::var(format!("{prefix}_CATALOG")) {
            self.catalog.path = Some(PathBuf::from(path));
        }
        if let Ok(level) = std::env::var(format!("{prefix}_LOG_LEVEL")) {
            self.logging.level = level;
        }
        Ok(())
    }

    fn env_var_names(prefix: &str) -> Vec<String> {
        vec![
            format!("{prefix}_HOST"),
            format!("{prefix}_PORT"),
            format!("{prefix}_CATALOG"),
            format!("{prefix}_LOG_LEVEL"),
        ]
    }
}

/// Tenant catalog settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Catalog file (YAML, TOML or JSON). Without one the server starts with
    /// an empty directory.
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Reload the catalog when the file changes.
    #[serde(default = "default_watch")]
    pub watch: bool,

    /// Quiet period before a change triggers a reload.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Platform domain; tenants are reachable at `{slug}.{platform_domain}`.
    #[serde(default)]
    pub platform_domain: Option<String>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: None,
            watch: default_watch(),
            debounce_ms: default_debounce_ms(),
            platform_domain: None,
        }
    }
}

impl CatalogConfig {
    /// Returns the debounce window.
    #[must_use]
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Parses the platform domain.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if the domain is not a hostname.
    pub fn platform_hostname(&self) -> Result<Option<Hostname>, ConfigError> {
        self.platform_domain
            .as_deref()
            .map(Hostname::new)
            .transpose()
            .map_err(|e| ConfigError::invalid_value("catalog.platform_domain", e.to_string()))
    }
}

impl Validatable for CatalogConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.watch && self.path.is_some() && self.debounce_ms == 0 {
            return Err(ConfigError::invalid_value(
                "catalog.debounce_ms",
                "debounce must be at least one millisecond",
            ));
        }
        self.platform_hostname().map(|_| ())
    }
}

fn default_watch() -> bool {
    true
}

fn default_debounce_ms() -> u64 {
    500
}

/// Shutdown settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShutdownConfig {
    /// How long in-flight requests may drain after a shutdown signal.
    #[serde(default = "default_shutdown_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ShutdownConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_shutdown_timeout_secs(),
        }
    }
}

impl ShutdownConfig {
    /// Returns the drain timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Validatable for ShutdownConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_secs == 0 {
            return Err(ConfigError::invalid_value(
                "shutdown.timeout_secs",
                "timeout must be at least one second",
            ));
        }
        Ok(())
    }
}

fn default_shutdown_timeout_secs() -> u64 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;
    use podhost_core::config::{ConfigFormat, ConfigLoader};

    #[test]
    fn test_defaults_are_valid() {
        let config = ServerConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.catalog.path.is_none());
        assert_eq!(config.shutdown.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_load_yaml() {
        let yaml = r"
api:
  port: 8080
  routing:
    excluded_prefixes: [/api, /assets]
catalog:
  path: demos/catalog.yaml
  platform_domain: podhost.test
  debounce_ms: 250
metrics:
  enabled: false
";
        let config: ServerConfig = ConfigLoader::new()
            .load_str(yaml, ConfigFormat::Yaml)
            .unwrap();
        assert_eq!(config.api.port, 8080);
        assert_eq!(config.api.host, "0.0.0.0");
        assert_eq!(config.api.routing.excluded_prefixes, vec!["/api", "/assets"]);
        assert_eq!(config.catalog.debounce(), Duration::from_millis(250));
        assert!(config.catalog.watch);
        assert!(!config.metrics.enabled);
        assert_eq!(
            config.catalog.platform_hostname().unwrap().unwrap().as_str(),
            "podhost.test"
        );
    }

    #[test]
    fn test_invalid_platform_domain() {
        let config = CatalogConfig {
            platform_domain: Some("bad domain".to_string()),
            ..CatalogConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_zero_shutdown_timeout_rejected() {
        let mut config = ServerConfig::default();
        config.shutdown.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_env_overrides() {
        let prefix = "PODHOST_SERVER_CONFIG_TEST";
        // SAFETY: the variable names are unique to this test.
        unsafe {
            std::env::set_var(format!("{prefix}_HOST"), "127.0.0.1");
            std::env::set_var(format!("{prefix}_PORT"), "8081");
            std::env::set_var(format!("{prefix}_CATALOG"), "/etc/podhost/catalog.yaml");
            std::env::set_var(format!("{prefix}_LOG_LEVEL"), "debug");
        }

        let mut config = ServerConfig::default();
        config.apply_env_overrides(prefix).unwrap();
        assert_eq!(config.api.bind_address(), "127.0.0.1:8081");
        assert_eq!(
            config.catalog.path.as_deref(),
            Some(std::path::Path::new("/etc/podhost/catalog.yaml"))
        );
        assert_eq!(config.logging.level, "debug");
        assert_eq!(ServerConfig::env_var_names(prefix).len(), 4);
    }

    #[test]
    fn test_invalid_port_override() {
        let prefix = "PODHOST_SERVER_CONFIG_BAD_PORT";
        // SAFETY: the variable name is unique to this test.
        unsafe { std::env::set_var(format!("{prefix}_PORT"), "eighty") };

        let mut config = ServerConfig::default();
        assert!(matches!(
            config.apply_env_overrides(prefix),
            Err(ConfigError::InvalidEnvVar { .. })
        ));
    }

    #[test]
    fn test_demo_config_is_valid() {
        let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../demos/config.yaml");
        let config: ServerConfig = ConfigLoader::new().load_validated(path).unwrap();
        assert_eq!(config.api.port, 3000);
        assert!(config.catalog.watch);
    }
}
