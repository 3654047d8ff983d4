//! API configuration types.
//!
//! This module provides configuration for the API server including:
//! - Server binding address and port
//! - Tenant routing settings
//! - CORS settings
//! - Request timeout

use axum::http::{HeaderValue, Method};
use podhost_core::config::Validatable;
use podhost_core::error::ConfigError;
use podhost_tenancy::config::RoutingConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// API server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Tenant routing configuration
    #[serde(default)]
    pub routing: RoutingConfig,

    /// CORS configuration
    #[serde(default)]
    pub cors: CorsConfig,

    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Enable request logging
    #[serde(default = "default_true")]
    pub enable_request_logging: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            routing: RoutingConfig::default(),
            cors: CorsConfig::default(),
            request_timeout_secs: default_request_timeout(),
            enable_request_logging: true,
        }
    }
}

impl ApiConfig {
    /// Returns the server bind address.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns the request timeout duration.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Validatable for ApiConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::missing_field_in_section("host", "api"));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::invalid_value(
                "api.request_timeout_secs",
                "timeout must be at least one second",
            ));
        }
        self.routing.validate()?;
        self.cors.validate()
    }
}

/// CORS configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Enable CORS
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Allowed origins (empty means all origins)
    #[serde(default)]
    pub allowed_origins: Vec<String>,

    /// Allowed methods
    #[serde(default = "default_methods")]
    pub allowed_methods: Vec<String>,

    /// Allowed request headers
    #[serde(default = "default_headers")]
    pub allowed_headers: Vec<String>,

    /// Allow credentials
    #[serde(default)]
    pub allow_credentials: bool,

    /// Max age for preflight cache in seconds
    #[serde(default = "default_max_age")]
    pub max_age_secs: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            allowed_origins: vec![],
            allowed_methods: default_methods(),
            allowed_headers: default_headers(),
            allow_credentials: false,
            max_age_secs: default_max_age(),
        }
    }
}

impl Validatable for CorsConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if !self.enabled {
            return Ok(());
        }
        if self.allow_credentials && self.allowed_origins.is_empty() {
            return Err(ConfigError::invalid_value(
                "cors.allow_credentials",
                "credentials require an explicit list of allowed origins",
            ));
        }
        for origin in &self.allowed_origins {
            HeaderValue::from_str(origin).map_err(|e| {
                ConfigError::invalid_value("cors.allowed_origins", format!("'{origin}': {e}"))
            })?;
        }
        for method in &self.allowed_methods {
            Method::from_bytes(method.as_bytes()).map_err(|e| {
                ConfigError::invalid_value("cors.allowed_methods", format!("'{method}': {e}"))
            })?;
        }
        for header in &self.allowed_headers {
            axum::http::HeaderName::from_bytes(header.as_bytes()).map_err(|e| {
                ConfigError::invalid_value("cors.allowed_headers", format!("'{header}': {e}"))
            })?;
        }
        Ok(())
    }
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_request_timeout() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

fn default_max_age() -> u64 {
    3600
}

fn default_methods() -> Vec<String> {
    vec!["GET".to_string(), "HEAD".to_string(), "OPTIONS".to_string()]
}

fn default_headers() -> Vec<String> {
    vec!["content-type".to_string(), "x-request-id".to_string()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ApiConfig::default();
        assert_eq!(config.bind_address(), "0.0.0.0:3000");
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.routing.tenant_header, "x-tenant-id");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json() {
        let config: ApiConfig = serde_json::from_str(
            r#"{"port":8080,"routing":{"namespace_segment":"t"},"cors":{"enabled":false}}"#,
        )
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.routing.namespace_segment, "t");
        assert_eq!(config.routing.tenant_header, "x-tenant-id");
        assert!(!config.cors.enabled);
        assert_eq!(config.host, "0.0.0.0");
    }

    #[test]
    fn test_invalid_routing_propagates() {
        let mut config = ApiConfig::default();
        config.routing.tenant_header = "X Tenant".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let config = ApiConfig {
            request_timeout_secs: 0,
            ..ApiConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_cors_credentials_need_origins() {
        let mut cors = CorsConfig {
            allow_credentials: true,
            ..CorsConfig::default()
        };
        assert!(cors.validate().is_err());

        cors.allowed_origins = vec!["https://acme-podcasts.test".to_string()];
        assert!(cors.validate().is_ok());
    }

    #[test]
    fn test_cors_rejects_bad_method() {
        let cors = CorsConfig {
            allowed_methods: vec!["GE T".to_string()],
            ..CorsConfig::default()
        };
        assert!(cors.validate().is_err());
    }
}
