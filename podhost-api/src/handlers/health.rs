//! Health check handler.

use axum::{Json, extract::State};
use serde::Serialize;
use std::sync::Arc;

use crate::state::AppState;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: &'static str,
    /// Service version
    pub version: &'static str,
    /// Uptime in seconds
    pub uptime_secs: u64,
}

/// Health check handler.
///
/// GET /api/health
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        uptime_secs: state.uptime_secs(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiConfig;
    use podhost_core::data::InMemoryContentStore;
    use podhost_tenancy::directory::SnapshotDirectory;

    #[tokio::test]
    async fn test_health_check() {
        let state = AppState::new(
            ApiConfig::default(),
            Arc::new(SnapshotDirectory::default()),
            Arc::new(InMemoryContentStore::new()),
        )
        .unwrap();
        let response = health_check(State(Arc::new(state))).await;

        assert_eq!(response.status, "healthy");
        assert_eq!(response.version, env!("CARGO_PKG_VERSION"));
    }
}
