//! Configuration management module.
//!
//! This module provides:
//! - YAML, TOML and JSON configuration file loading
//! - Configuration validation with descriptive error messages
//! - Environment variable overrides
//!
//! # Example
//!
//! ```rust,ignore
//! use podhost_core::config::ConfigLoader;
//!
//! let config: ServerConfig = ConfigLoader::new()
//!     .with_env_prefix("PODHOST")
//!     .load_validated("config.yaml")?;
//! ```

mod loader;
mod traits;

pub use loader::{ConfigFormat, ConfigLoader};
pub use traits::{Configurable, Validatable};
