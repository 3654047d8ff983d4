//! Fallback handler for unmatched requests.

use axum::{extract::Request, response::Response};
use podhost_tenancy::context::RoutingContext;

use crate::error::ApiError;
use crate::middleware::RequestId;

/// Renders the 404 for any path no route matched.
///
/// A request whose host resolved to no tenant gets `TENANT_NOT_FOUND`;
/// anything else is a plain `NOT_FOUND`.
pub async fn not_found(request: Request) -> Response {
    let request_id = request.extensions().get::<RequestId>();
    let unresolved = request
        .extensions()
        .get::<RoutingContext>()
        .is_none_or(RoutingContext::is_unresolved);

    let error = if unresolved {
        ApiError::TenantNotFound
    } else {
        ApiError::NotFound(request.uri().path().to_string())
    };
    error.into_response_with(request_id)
}
