//! # Podhost Core
//!
//! Core types, traits, and contracts for the Podhost multi-tenant podcast
//! hosting service.
//!
//! This crate provides:
//! - `NewType` wrappers for tenant identity and request hostnames
//! - Content records (tenant profiles, shows, episodes)
//! - Error types shared across the workspace
//! - The tenant-scoped [`traits::ContentStore`] contract and an in-memory store
//! - Configuration management with YAML/TOML/JSON support and environment overrides

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::module_name_repetitions)]

/// Core type definitions and `NewType` wrappers
pub mod types;

/// Content records and the in-memory content store
pub mod data;

/// Error types
pub mod error;

/// Core trait definitions
pub mod traits;

/// Configuration management
pub mod config;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::*;
    pub use crate::data::*;
    pub use crate::error::*;
    pub use crate::traits::*;
    pub use crate::types::*;
}
