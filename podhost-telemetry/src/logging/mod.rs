//! Structured logging system for Podhost.
//!
//! Provides configurable logging with support for:
//! - JSON and pretty-print formats
//! - Multiple output targets (stdout, file)
//! - Log rotation

mod config;

pub use config::{LogConfig, LogFormat, LogOutput, RotationConfig};

use std::path::Path;
use tracing::Subscriber;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
};

const LOG_FILE_PREFIX: &str = "podhost.log";

/// Initialize the logging system with the given configuration.
///
/// `RUST_LOG`, when set, takes precedence over `config.level`. Returns
/// guards that must be kept alive for the duration of the program so that
/// buffered file output is flushed.
///
/// # Example
///
/// ```no_run
/// use podhost_telemetry::logging::{init_logging, LogConfig};
///
/// let config = LogConfig::default();
/// let _guards = init_logging(&config).expect("Failed to initialize logging");
/// ```
pub fn init_logging(config: &LogConfig) -> Result<Vec<WorkerGuard>, LoggingError> {
    let mut guards = Vec::new();

    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.level)
            .map_err(|e| LoggingError::InvalidConfig(e.to_string()))?,
    };

    let mut layers: Vec<Box<dyn Layer<_> + Send + Sync>> = Vec::new();

    for output in &config.outputs {
        match output {
            LogOutput::Stdout => layers.push(stdout_layer(config)),
            LogOutput::File { path, rotation } => {
                let (layer, guard) = file_layer(config, Path::new(path), *rotation)?;
                layers.push(layer);
                guards.push(guard);
            }
        }
    }

    tracing_subscriber::registry()
        .with(env_filter)
        .with(layers)
        .try_init()
        .map_err(|e| LoggingError::AlreadyInitialized(e.to_string()))?;

    Ok(guards)
}

fn span_events(config: &LogConfig) -> FmtSpan {
    if config.include_span_events {
        FmtSpan::NEW | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    }
}

fn stdout_layer<S>(config: &LogConfig) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    let base = fmt::layer()
        .with_target(true)
        .with_thread_ids(config.include_thread_id)
        .with_file(config.include_file_info)
        .with_line_number(config.include_file_info)
        .with_span_events(span_events(config));

    match config.format {
        LogFormat::Json => base.json().flatten_event(true).boxed(),
        LogFormat::Pretty => base.pretty().boxed(),
    }
}

fn file_layer<S>(
    config: &LogConfig,
    dir: &Path,
    rotation: Option<RotationConfig>,
) -> Result<(Box<dyn Layer<S> + Send + Sync>, WorkerGuard), LoggingError>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    std::fs::create_dir_all(dir)?;

    let appender = match rotation.unwrap_or(RotationConfig::Daily) {
        RotationConfig::Hourly => tracing_appender::rolling::hourly(dir, LOG_FILE_PREFIX),
        RotationConfig::Daily => tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX),
        RotationConfig::Never => tracing_appender::rolling::never(dir, LOG_FILE_PREFIX),
    };
    let (writer, guard) = tracing_appender::non_blocking(appender);

    // Files are always JSON, whatever the console format.
    let layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(config.include_thread_id)
        .with_file(config.include_file_info)
        .with_line_number(config.include_file_info)
        .with_span_events(span_events(config))
        .json()
        .flatten_event(true)
        .boxed();

    Ok((layer, guard))
}

/// Errors that can occur during logging initialization.
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    /// Failed to create log directory
    #[error("Failed to create log directory: {0}")]
    DirectoryCreation(#[from] std::io::Error),

    /// Invalid configuration
    #[error("Invalid logging configuration: {0}")]
    InvalidConfig(String),

    /// A global subscriber is already installed
    #[error("Logging already initialized: {0}")]
    AlreadyInitialized(String),
}
