//! # Podhost Tenancy
//!
//! Tenant resolution and request routing for the Podhost multi-tenant
//! podcast hosting service.
//!
//! This crate provides:
//! - The [`directory::TenantDirectory`] contract and a hot-reloadable
//!   snapshot-backed directory
//! - Host header to tenant resolution
//! - Tenant-scoped path routing with excluded prefixes
//! - The per-request [`context::RoutingContext`]
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use podhost_core::types::{Hostname, TenantId};
//! use podhost_tenancy::prelude::*;
//!
//! # async fn example() -> std::result::Result<(), Box<dyn std::error::Error>> {
//! let acme = TenantId::new("550e8400-e29b-41d4-a716-446655440000")?;
//! let mut builder = DirectorySnapshot::builder();
//! builder.register(Hostname::new("acme-podcasts.test")?, acme.clone())?;
//!
//! let directory = Arc::new(SnapshotDirectory::new(builder.build()));
//! let resolver = TenantResolver::new(directory);
//! let router = PathRouter::new(&RoutingConfig::default());
//!
//! let resolution = resolver.resolve(Some("acme-podcasts.test:3000")).await?;
//! assert_eq!(resolution.tenant(), Some(&acme));
//!
//! let decision = router.route(&resolution, "/");
//! assert_eq!(
//!     decision,
//!     RoutingDecision::Rewrite("/tenant/550e8400-e29b-41d4-a716-446655440000".to_string())
//! );
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::module_name_repetitions)]

/// Error types for the tenancy layer
pub mod error;

/// Routing configuration
pub mod config;

/// Tenant directory contract and snapshot implementation
pub mod directory;

/// Host header resolution
pub mod resolver;

/// Tenant-scoped path routing
pub mod router;

/// Per-request routing context
pub mod context;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::*;
    pub use crate::context::*;
    pub use crate::directory::*;
    pub use crate::error::*;
    pub use crate::resolver::*;
    pub use crate::router::*;
}
