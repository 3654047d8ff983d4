//! Tenant routing middleware.
//!
//! Runs before the router on every request:
//!
//! 1. removes every client-supplied copy of the trusted tenant header
//! 2. resolves the tenant from the host
//! 3. sets the trusted header when a tenant was resolved
//! 4. rewrites the path into the tenant namespace when the router says so
//! 5. stores the [`RoutingContext`] in the request extensions
//!
//! A directory failure ends the request with `503 DIRECTORY_UNAVAILABLE`
//! instead of continuing without a tenant.

use axum::{
    body::Body,
    extract::OriginalUri,
    http::{
        HeaderMap, HeaderName, HeaderValue, Request, Uri,
        header::HOST,
        uri::PathAndQuery,
    },
    response::{IntoResponse, Response},
};
use podhost_telemetry::metrics::PodhostMetrics;
use podhost_telemetry::spans::routing_span;
use podhost_tenancy::context::RoutingContext;
use podhost_tenancy::resolver::TenantResolver;
use podhost_tenancy::router::PathRouter;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Instant;
use tower::{Layer, Service};
use tracing::{Instrument, debug, error};

use super::RequestId;
use crate::error::ApiError;

/// Layer that resolves the tenant and routes the path of each request.
#[derive(Debug, Clone)]
pub struct TenantRoutingLayer {
    resolver: TenantResolver,
    router: Arc<PathRouter>,
    header: HeaderName,
}

impl TenantRoutingLayer {
    /// Creates a routing layer.
    #[must_use]
    pub fn new(resolver: TenantResolver, router: Arc<PathRouter>, header: HeaderName) -> Self {
        Self {
            resolver,
            router,
            header,
        }
    }
}

impl<S> Layer<S> for TenantRoutingLayer {
    type Service = TenantRoutingService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        TenantRoutingService {
            inner,
            resolver: self.resolver.clone(),
            router: Arc::clone(&self.router),
            header: self.header.clone(),
        }
    }
}

/// Service produced by [`TenantRoutingLayer`].
#[derive(Debug, Clone)]
pub struct TenantRoutingService<S> {
    inner: S,
    resolver: TenantResolver,
    router: Arc<PathRouter>,
    header: HeaderName,
}

impl<S> Service<Request<Body>> for TenantRoutingService<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut request: Request<Body>) -> Self::Future {
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        let resolver = self.resolver.clone();
        let router = Arc::clone(&self.router);
        let header = self.header.clone();

        // Sanitize before anything else can observe the header.
        let stripped = strip_header(request.headers_mut(), &header);
        let host = host_of(&request);
        let path = request.uri().path().to_string();
        let span = routing_span(host.as_deref(), &path);

        Box::pin(
            async move {
                if stripped > 0 {
                    debug!(
                        count = stripped,
                        header = %header,
                        "Stripped client-supplied tenant header"
                    );
                    PodhostMetrics::forged_header_stripped(stripped);
                }

                let started = Instant::now();
                let resolution = match resolver.resolve(host.as_deref()).await {
                    Ok(resolution) => {
                        PodhostMetrics::directory_lookup(
                            resolution.as_str(),
                            started.elapsed().as_secs_f64(),
                        );
                        resolution
                    }
                    Err(e) => {
                        PodhostMetrics::directory_lookup(
                            "error",
                            started.elapsed().as_secs_f64(),
                        );
                        error!(error = %e, "Tenant directory lookup failed");
                        let request_id = request.extensions().get::<RequestId>().cloned();
                        return Ok(ApiError::from(e).into_response_with(request_id.as_ref()));
                    }
                };

                let decision = router.route(&resolution, &path);

                if let Some(tenant) = resolution.tenant() {
                    tracing::Span::current().record("tenant", tenant.as_str());
                    match HeaderValue::from_str(tenant.as_str()) {
                        Ok(value) => {
                            request.headers_mut().insert(header.clone(), value);
                        }
                        Err(e) => {
                            let err =
                                ApiError::Internal(format!("tenant id not header-safe: {e}"));
                            return Ok(err.into_response());
                        }
                    }
                }

                if let Some(new_path) = decision.rewritten_path() {
                    match rewrite_uri(request.uri(), new_path) {
                        Ok(uri) => {
                            let original = std::mem::replace(request.uri_mut(), uri);
                            request.extensions_mut().insert(OriginalUri(original));
                        }
                        Err(e) => {
                            error!(error = %e, path = new_path, "Failed to rewrite request URI");
                            return Ok(e.into_response());
                        }
                    }
                }

                tracing::Span::current().record("decision", decision.as_str());
                debug!(
                    decision = %decision,
                    resolution = resolution.as_str(),
                    "Request routed"
                );
                PodhostMetrics::routing_decision(decision.as_str(), resolution.as_str());

                request
                    .extensions_mut()
                    .insert(RoutingContext::new(resolution, decision, path));

                inner.call(request).await
            }
            .instrument(span),
        )
    }
}

/// Removes every occurrence of `name`, returning how many were present.
fn strip_header(headers: &mut HeaderMap, name: &HeaderName) -> u64 {
    let count = u64::try_from(headers.get_all(name).iter().count()).unwrap_or(u64::MAX);
    if count > 0 {
        headers.remove(name);
    }
    count
}

/// Returns the request host.
///
/// An absolute-form target carries its own authority, which takes precedence
/// over `Host` (RFC 9112 section 3.2.2); this also covers HTTP/2, where the
/// authority replaces the header. Otherwise the single `Host` header is
/// used. Duplicate or non-UTF-8 `Host` headers yield `None`.
fn host_of(request: &Request<Body>) -> Option<String> {
    if let Some(authority) = request.uri().authority() {
        let host = match authority.port_u16() {
            Some(port) => format!("{}:{port}", authority.host()),
            None => authority.host().to_string(),
        };
        return Some(host);
    }

    let mut hosts = request.headers().get_all(HOST).iter();
    match (hosts.next(), hosts.next()) {
        (Some(value), None) => value.to_str().ok().map(str::to_string),
        _ => None,
    }
}

/// Replaces the path of `uri`, keeping its query string.
fn rewrite_uri(uri: &Uri, new_path: &str) -> Result<Uri, ApiError> {
    let path_and_query = match uri.query() {
        Some(query) => format!("{new_path}?{query}"),
        None => new_path.to_string(),
    };

    let mut parts = uri.clone().into_parts();
    parts.path_and_query = Some(
        PathAndQuery::try_from(path_and_query)
            .map_err(|e| ApiError::Internal(format!("invalid rewritten path: {e}")))?,
    );
    Uri::from_parts(parts).map_err(|e| ApiError::Internal(format!("invalid rewritten URI: {e}")))
}
