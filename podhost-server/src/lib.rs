//! # Podhost Server
//!
//! Process entry point for the Podhost multi-tenant podcast host.
//!
//! This crate provides:
//! - Configuration loading with `PODHOST_*` environment overrides
//! - The tenant catalog: directory snapshot and content seed
//! - Catalog hot reload on file change
//! - Graceful shutdown on SIGINT/SIGTERM

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::module_name_repetitions)]

pub mod catalog;
pub mod config;
pub mod reload;
pub mod server;
pub mod shutdown;

pub use catalog::{Catalog, CatalogError};
pub use config::ServerConfig;
pub use server::{PodhostServer, ServerError};
pub use shutdown::ShutdownController;
