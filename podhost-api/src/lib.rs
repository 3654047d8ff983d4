//! # Podhost API
//!
//! HTTP surface of the Podhost multi-tenant podcast hosting service.
//!
//! This crate provides:
//! - Tenant routing middleware: host resolution, trusted tenant header,
//!   tenant-scoped path rewriting
//! - Request ID middleware
//! - The [`middleware::TrustedTenant`] extractor
//! - Tenant-scoped content API and page model endpoints
//! - CORS, tracing and timeout layers
//!
//! # Architecture
//!
//! The routing middleware wraps the axum [`Router`](axum::Router) from the
//! outside, so a rewritten path is what the router matches on:
//!
//! ```text
//! RequestIdService -> TenantRoutingService -> Router (cors, trace, timeout)
//! ```
//!
//! Endpoints:
//! - `/api/health` - Health check
//! - `/api/shows` - Shows of the request's tenant
//! - `/api/shows/{show_id}` - A single show
//! - `/api/shows/{show_id}/episodes` - Episodes of a show
//! - `/tenant/{tenant_id}` - Tenant home page model
//! - `/tenant/{tenant_id}/shows/{show_id}` - Show page model
//!
//! Every endpoint except health takes its tenant from the trusted header set
//! by the routing middleware. Client-supplied copies of that header are
//! discarded before routing.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod server;
pub mod state;

pub use config::ApiConfig;
pub use error::ApiError;
pub use routes::{App, build_app};
pub use server::ApiServer;
pub use state::AppState;
