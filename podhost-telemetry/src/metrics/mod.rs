//! Metrics collection and export for Podhost.
//!
//! Provides Prometheus-compatible metrics for monitoring:
//! - Routing decisions and stripped tenant headers
//! - Tenant directory lookups and reloads
//! - API request counts and latency

mod config;
mod recorder;

pub use config::MetricsConfig;
pub use recorder::PodhostMetrics;

use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::net::SocketAddr;
use std::sync::OnceLock;

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Initialize the metrics system with the given configuration.
///
/// Does nothing when `config.enabled` is `false`. Exposing the HTTP
/// endpoint requires a running tokio runtime.
///
/// # Errors
///
/// Returns an error if metrics initialization fails.
///
/// # Example
///
/// ```no_run
/// use podhost_telemetry::metrics::{init_metrics, MetricsConfig};
///
/// let config = MetricsConfig::default();
/// init_metrics(&config).expect("Failed to initialize metrics");
/// ```
pub fn init_metrics(config: &MetricsConfig) -> Result<(), MetricsError> {
    if !config.enabled {
        return Ok(());
    }
    if METRICS_HANDLE.get().is_some() {
        return Err(MetricsError::AlreadyInitialized);
    }

    let builder = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Suffix("_seconds".to_string()),
            &config.latency_buckets,
        )
        .map_err(|e| MetricsError::InitializationFailed(format!("{e}")))?;

    let handle = if config.expose_endpoint {
        let addr: SocketAddr = config
            .endpoint_address
            .parse()
            .map_err(|e| MetricsError::InvalidAddress(format!("{e}")))?;

        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| MetricsError::InitializationFailed(format!("{e}")))?;
        let (recorder, exporter) = builder
            .with_http_listener(addr)
            .build()
            .map_err(|e| MetricsError::InitializationFailed(format!("{e}")))?;
        let handle = recorder.handle();
        metrics::set_global_recorder(recorder).map_err(|_| MetricsError::AlreadyInitialized)?;

        runtime.spawn(async move {
            if let Err(e) = exporter.await {
                tracing::error!(error = ?e, "Prometheus exporter stopped");
            }
        });
        tracing::info!(%addr, "Prometheus endpoint listening");
        handle
    } else {
        builder
            .install_recorder()
            .map_err(|e| MetricsError::InitializationFailed(format!("{e}")))?
    };

    METRICS_HANDLE
        .set(handle)
        .map_err(|_| MetricsError::AlreadyInitialized)?;

    PodhostMetrics::register();

    Ok(())
}

/// Get the Prometheus metrics output as a string.
///
/// Returns an empty string if metrics have not been initialized.
#[must_use]
pub fn render_metrics() -> String {
    METRICS_HANDLE
        .get()
        .map(PrometheusHandle::render)
        .unwrap_or_default()
}

/// Errors that can occur during metrics initialization.
#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    /// Metrics already initialized
    #[error("Metrics system already initialized")]
    AlreadyInitialized,

    /// Invalid endpoint address
    #[error("Invalid endpoint address: {0}")]
    InvalidAddress(String),

    /// Initialization failed
    #[error("Metrics initialization failed: {0}")]
    InitializationFailed(String),
}
