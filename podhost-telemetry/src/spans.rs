//! Span definitions for request tracing.
//!
//! - [`request_span`] wraps a whole HTTP request
//! - [`routing_span`] wraps tenant resolution and path routing; the `tenant`
//!   and `decision` fields are recorded once routing completes
//! - [`reload_span`] wraps a catalog reload

use tracing::{Span, field, info_span};

/// Create a span for HTTP request tracing.
///
/// # Example
///
/// ```
/// use podhost_telemetry::spans::request_span;
///
/// let span = request_span("req-123", "GET", "/api/shows");
/// let _guard = span.enter();
/// // ... handle request
/// ```
#[must_use]
pub fn request_span(request_id: &str, method: &str, path: &str) -> Span {
    info_span!(
        "request",
        request_id = %request_id,
        method = %method,
        path = %path,
        otel.kind = "server"
    )
}

/// Create a span for tenant routing of one request.
///
/// # Example
///
/// ```
/// use podhost_telemetry::spans::routing_span;
///
/// let span = routing_span(Some("acme-podcasts.test"), "/");
/// span.record("tenant", "550e8400-e29b-41d4-a716-446655440000");
/// span.record("decision", "rewrite");
/// ```
#[must_use]
pub fn routing_span(host: Option<&str>, path: &str) -> Span {
    info_span!(
        "routing",
        host = host.unwrap_or("-"),
        path = %path,
        tenant = field::Empty,
        decision = field::Empty
    )
}

/// Create a span for a catalog reload.
#[must_use]
pub fn reload_span(source: &str) -> Span {
    info_span!("catalog.reload", source = %source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    fn init_test_subscriber() {
        let _ = tracing_subscriber::registry()
            .with(tracing_subscriber::fmt::layer().with_test_writer())
            .try_init();
    }

    #[test]
    fn test_request_span() {
        init_test_subscriber();
        let span = request_span("req-123", "GET", "/api/shows");
        let _guard = span.enter();
    }

    #[test]
    fn test_routing_span_records_late_fields() {
        init_test_subscriber();
        let span = routing_span(None, "/shows/42");
        span.record("tenant", "acme");
        span.record("decision", "unresolved");
        let _guard = span.enter();
    }

    #[test]
    fn test_reload_span() {
        init_test_subscriber();
        let span = reload_span("catalog.yaml");
        let _guard = span.enter();
    }
}
