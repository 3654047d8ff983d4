//! Content store error types.

use thiserror::Error;

/// Errors raised by a [`ContentStore`](crate::traits::ContentStore) backend.
///
/// "Not found" is not an error: lookups return `Option` so callers can render
/// a 404 without going through the error path.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContentError {
    /// The backing store could not be reached.
    #[error("content store unavailable: {reason}")]
    Unavailable {
        /// Reason for the failure.
        reason: String,
    },

    /// A record violates a tenancy invariant (e.g. an episode for a show
    /// that does not exist).
    #[error("content integrity violation: {reason}")]
    Integrity {
        /// Reason for the violation.
        reason: String,
    },
}

impl ContentError {
    /// Creates an integrity error.
    #[must_use]
    pub fn integrity(reason: impl Into<String>) -> Self {
        Self::Integrity {
            reason: reason.into(),
        }
    }
}
