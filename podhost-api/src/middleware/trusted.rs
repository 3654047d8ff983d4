//! Trusted tenant extractor.

use axum::{extract::FromRequestParts, http::request::Parts, response::Response};
use podhost_core::types::TenantId;
use std::sync::Arc;

use super::RequestId;
use crate::error::ApiError;
use crate::state::AppState;

/// Tenant of the current request, read from the trusted tenant header.
///
/// Only the routing middleware writes that header, after discarding any
/// client-supplied copy, so handlers can rely on it. A request without a
/// tenant is rejected with `404 TENANT_NOT_FOUND`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrustedTenant(pub TenantId);

impl TrustedTenant {
    /// Returns the tenant identifier.
    #[must_use]
    pub fn id(&self) -> &TenantId {
        &self.0
    }
}

impl FromRequestParts<Arc<AppState>> for TrustedTenant {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(state.tenant_header())
            .and_then(|value| value.to_str().ok())
            .and_then(|value| TenantId::new(value).ok())
            .map(Self)
            .ok_or_else(|| {
                let request_id = parts.extensions.get::<RequestId>();
                ApiError::TenantNotFound.into_response_with(request_id)
            })
    }
}
