//! API error types.
//!
//! This module provides error types for the API layer including:
//! - Unknown tenant and missing resource errors
//! - Directory and content store failures
//! - Configuration and internal errors
//!
//! Every error renders as the JSON envelope
//! `{"status":"error","code":...,"message":...,"request_id":...}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use podhost_core::error::{ConfigError, ContentError};
use podhost_tenancy::error::DirectoryError;
use serde::Serialize;
use thiserror::Error;

use crate::middleware::RequestId;

/// API error type.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request does not belong to any known tenant
    #[error("Tenant not found")]
    TenantNotFound,

    /// Resource not found
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// The tenant directory could not answer
    #[error("Tenant directory unavailable: {0}")]
    DirectoryUnavailable(String),

    /// A backing service could not answer
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Invalid configuration
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Internal server error
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::TenantNotFound | Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::DirectoryUnavailable(_) | Self::ServiceUnavailable(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            Self::Config(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the error code string.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::TenantNotFound => "TENANT_NOT_FOUND",
            Self::NotFound(_) => "NOT_FOUND",
            Self::DirectoryUnavailable(_) => "DIRECTORY_UNAVAILABLE",
            Self::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Renders the error, tagging the body with the request ID.
    #[must_use]
    pub fn into_response_with(self, request_id: Option<&RequestId>) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            status: "error",
            code: self.error_code(),
            message: self.to_string(),
            request_id: request_id.map(|id| id.as_str().to_string()),
        };

        (status, Json(body)).into_response()
    }
}

impl From<DirectoryError> for ApiError {
    fn from(err: DirectoryError) -> Self {
        match err {
            DirectoryError::Unavailable { reason } => Self::DirectoryUnavailable(reason),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<ContentError> for ApiError {
    fn from(err: ContentError) -> Self {
        match err {
            ContentError::Unavailable { reason } => Self::ServiceUnavailable(reason),
            other @ ContentError::Integrity { .. } => Self::Internal(other.to_string()),
        }
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error status
    pub status: &'static str,
    /// Error code
    pub code: &'static str,
    /// Error message
    pub message: String,
    /// Request ID (if available)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.into_response_with(None)
    }
}

/// Result type alias for API operations.
pub type ApiResult<T> = Result<T, ApiError>;
