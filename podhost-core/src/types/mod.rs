//! NewType wrappers for tenancy primitives.
//!
//! # Types
//!
//! - [`TenantId`] - Opaque tenant identifier, safe to embed in paths and headers
//! - [`Hostname`] - Normalised request hostname used as a directory key
//! - [`ShowId`] / [`EpisodeId`] - Content identifiers

mod content_id;
mod hostname;
mod tenant_id;

pub use content_id::{EpisodeId, ShowId};
pub use hostname::Hostname;
pub use tenant_id::TenantId;

/// Validation error for `NewType` construction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Tenant ID is empty
    #[error("tenant ID cannot be empty")]
    EmptyTenantId,

    /// Tenant ID contains characters that are not path/header safe
    #[error("invalid tenant ID: {0}")]
    InvalidTenantId(String),

    /// Hostname is empty
    #[error("hostname cannot be empty")]
    EmptyHostname,

    /// Hostname is malformed
    #[error("invalid hostname: {0}")]
    InvalidHostname(String),

    /// Port suffix is not a decimal number
    #[error("invalid port in host: {0}")]
    InvalidPort(String),

    /// Content ID is empty
    #[error("content ID cannot be empty")]
    EmptyContentId,
}
