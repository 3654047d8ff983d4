//! Metrics configuration types.

use podhost_core::config::Validatable;
use podhost_core::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// Configuration for the metrics system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Whether metrics are recorded at all
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Whether to expose a Prometheus HTTP endpoint
    #[serde(default = "default_true")]
    pub expose_endpoint: bool,

    /// Address for the Prometheus endpoint (e.g., "0.0.0.0:9090")
    #[serde(default = "default_endpoint_address")]
    pub endpoint_address: String,

    /// Histogram buckets for latency metrics (in seconds)
    #[serde(default = "default_latency_buckets")]
    pub latency_buckets: Vec<f64>,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            expose_endpoint: true,
            endpoint_address: default_endpoint_address(),
            latency_buckets: default_latency_buckets(),
        }
    }
}

impl Validatable for MetricsConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.enabled && self.expose_endpoint {
            self.endpoint_address.parse::<SocketAddr>().map_err(|e| {
                ConfigError::invalid_value("metrics.endpoint_address", e.to_string())
            })?;
        }
        if self.latency_buckets.is_empty() {
            return Err(ConfigError::invalid_value(
                "metrics.latency_buckets",
                "at least one bucket is required",
            ));
        }
        if self.latency_buckets.windows(2).any(|w| w[0] >= w[1]) {
            return Err(ConfigError::invalid_value(
                "metrics.latency_buckets",
                "buckets must be strictly increasing",
            ));
        }
        Ok(())
    }
}

fn default_endpoint_address() -> String {
    "0.0.0.0:9090".to_string()
}

fn default_latency_buckets() -> Vec<f64> {
    vec![
        0.000_05, // 50µs
        0.000_1,  // 100µs
        0.000_5,  // 500µs
        0.001,    // 1ms
        0.005,    // 5ms
        0.01,     // 10ms
        0.05,     // 50ms
        0.1,      // 100ms
        0.5,      // 500ms
        1.0,      // 1s
    ]
}

fn default_true() -> bool {
    true
}
