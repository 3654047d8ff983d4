//! # Podhost Telemetry
//!
//! Logging, tracing, and metrics for the Podhost service.
//!
//! This crate provides:
//! - Structured logging with JSON and pretty formats
//! - Rolling log files through a non-blocking writer
//! - Request and routing spans
//! - Prometheus metrics export

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::module_name_repetitions)]

/// Logging configuration and initialization
pub mod logging;

/// Span definitions for request tracing
pub mod spans;

/// Metrics collection and export
pub mod metrics;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::logging::{LogConfig, LogFormat, LogOutput, LoggingError, init_logging};
    pub use crate::metrics::{MetricsConfig, MetricsError, PodhostMetrics, init_metrics};
    pub use crate::spans::*;
}
