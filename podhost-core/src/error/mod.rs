//! Error types shared across the Podhost workspace.
//!
//! - [`ConfigError`] - Configuration loading and validation errors
//! - [`ContentError`] - Content store failures

mod config;
mod content;

pub use config::ConfigError;
pub use content::ContentError;
