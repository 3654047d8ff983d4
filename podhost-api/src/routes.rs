//! API route definitions.
//!
//! [`create_router`] builds the axum router; [`build_app`] wraps it in the
//! request ID and tenant routing middleware, which must run before route
//! matching.

use axum::{
    Router,
    http::{HeaderName, HeaderValue, Method},
    routing::get,
};
use std::sync::Arc;
use tower::Layer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::CorsConfig;
use crate::handlers::{fallback, health, pages, shows};
use crate::middleware::{RequestIdLayer, RequestIdService, TenantRoutingLayer, TenantRoutingService};
use crate::state::AppState;

/// The complete HTTP application.
pub type App = RequestIdService<TenantRoutingService<Router>>;

/// Creates the router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    let segment = state.config.routing.namespace_segment.clone();

    let api_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/shows", get(shows::list_shows))
        .route("/shows/{show_id}", get(shows::get_show))
        .route("/shows/{show_id}/episodes", get(shows::list_episodes));

    let page_routes = Router::new()
        .route(&format!("/{segment}/{{tenant_id}}"), get(pages::tenant_home))
        .route(
            &format!("/{segment}/{{tenant_id}}/shows/{{show_id}}"),
            get(pages::show_page),
        );

    let router = Router::new()
        .nest("/api", api_routes)
        .merge(page_routes)
        .fallback(fallback::not_found)
        .layer(TimeoutLayer::new(state.config.request_timeout()))
        .layer(build_cors_layer(&state.config.cors));

    let router = if state.config.enable_request_logging {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    };

    router.with_state(state)
}

/// Wraps the router in the request ID and tenant routing middleware.
pub fn build_app(state: Arc<AppState>) -> App {
    let routing = TenantRoutingLayer::new(
        state.resolver().clone(),
        Arc::clone(state.router()),
        state.tenant_header().clone(),
    );
    let router = create_router(state);

    RequestIdLayer::new().layer(routing.layer(router))
}

/// Builds the CORS layer from configuration.
///
/// Entries that fail to parse are skipped; `CorsConfig::validate` rejects
/// them at startup.
fn build_cors_layer(config: &CorsConfig) -> CorsLayer {
    if !config.enabled {
        return CorsLayer::new();
    }

    let origins = if config.allowed_origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(
            config
                .allowed_origins
                .iter()
                .filter_map(|o| HeaderValue::from_str(o).ok()),
        )
    };

    let methods: Vec<Method> = config
        .allowed_methods
        .iter()
        .filter_map(|m| Method::from_bytes(m.as_bytes()).ok())
        .collect();

    let headers: Vec<HeaderName> = config
        .allowed_headers
        .iter()
        .filter_map(|h| HeaderName::from_bytes(h.as_bytes()).ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(methods)
        .allow_headers(headers)
        .allow_credentials(config.allow_credentials)
        .max_age(std::time::Duration::from_secs(config.max_age_secs))
}
