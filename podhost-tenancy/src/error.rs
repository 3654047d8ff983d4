//! Tenancy error types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by the tenant directory.
///
/// An unregistered hostname is not an error; lookups return `Ok(None)`.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DirectoryError {
    /// The directory backend could not answer.
    #[error("Tenant directory unavailable: {reason}")]
    Unavailable {
        /// Reason for the failure.
        reason: String,
    },

    /// A hostname was registered for two different tenants.
    #[error("Hostname '{hostname}' is registered to both '{existing}' and '{attempted}'")]
    Conflict {
        /// The contested hostname.
        hostname: String,
        /// Tenant already holding the hostname.
        existing: String,
        /// Tenant that tried to claim it.
        attempted: String,
    },

    /// A directory entry could not be turned into hostnames.
    #[error("Invalid directory entry for tenant '{tenant}': {reason}")]
    InvalidEntry {
        /// Tenant the entry belongs to.
        tenant: String,
        /// Reason the entry was rejected.
        reason: String,
    },
}

impl DirectoryError {
    /// Creates an unavailable error.
    #[must_use]
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }

    /// Creates an invalid entry error.
    #[must_use]
    pub fn invalid_entry(tenant: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidEntry {
            tenant: tenant.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for directory operations.
pub type Result<T> = std::result::Result<T, DirectoryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_message_names_both_tenants() {
        let err = DirectoryError::Conflict {
            hostname: "shared.test".to_string(),
            existing: "acme".to_string(),
            attempted: "indie".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("shared.test"));
        assert!(msg.contains("acme"));
        assert!(msg.contains("indie"));
    }
}
