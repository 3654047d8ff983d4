//! Application state for the API server.

use axum::http::HeaderName;
use podhost_core::config::Validatable;
use podhost_core::error::ConfigError;
use podhost_core::traits::ContentStore;
use podhost_tenancy::directory::TenantDirectory;
use podhost_tenancy::resolver::TenantResolver;
use podhost_tenancy::router::PathRouter;
use std::sync::Arc;
use std::time::Instant;

use crate::config::ApiConfig;
use crate::error::ApiError;

/// Shared application state.
#[derive(Debug)]
pub struct AppState {
    /// API configuration
    pub config: ApiConfig,
    resolver: TenantResolver,
    router: Arc<PathRouter>,
    tenant_header: HeaderName,
    content: Arc<dyn ContentStore>,
    started_at: Instant,
}

impl AppState {
    /// Creates a new application state.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Config` if the configuration is invalid.
    pub fn new(
        config: ApiConfig,
        directory: Arc<dyn TenantDirectory>,
        content: Arc<dyn ContentStore>,
    ) -> Result<Self, ApiError> {
        config.validate()?;

        let tenant_header = HeaderName::from_bytes(config.routing.tenant_header.as_bytes())
            .map_err(|e| ConfigError::invalid_value("routing.tenant_header", e.to_string()))?;
        let router = Arc::new(PathRouter::new(&config.routing));

        Ok(Self {
            config,
            resolver: TenantResolver::new(directory),
            router,
            tenant_header,
            content,
            started_at: Instant::now(),
        })
    }

    /// Returns the tenant resolver.
    #[must_use]
    pub fn resolver(&self) -> &TenantResolver {
        &self.resolver
    }

    /// Returns the path router.
    #[must_use]
    pub fn router(&self) -> &Arc<PathRouter> {
        &self.router
    }

    /// Returns the name of the trusted tenant header.
    #[must_use]
    pub fn tenant_header(&self) -> &HeaderName {
        &self.tenant_header
    }

    /// Returns the content store.
    #[must_use]
    pub fn content(&self) -> &Arc<dyn ContentStore> {
        &self.content
    }

    /// Returns the time since the state was created.
    #[must_use]
    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use podhost_core::data::InMemoryContentStore;
    use podhost_tenancy::directory::SnapshotDirectory;

    fn parts() -> (Arc<dyn TenantDirectory>, Arc<dyn ContentStore>) {
        (
            Arc::new(SnapshotDirectory::default()),
            Arc::new(InMemoryContentStore::new()),
        )
    }

    #[test]
    fn test_app_state_new() {
        let (directory, content) = parts();
        let state = AppState::new(ApiConfig::default(), directory, content).unwrap();
        assert_eq!(state.tenant_header().as_str(), "x-tenant-id");
        assert_eq!(
            state.router().namespace(&"acme".parse().unwrap()),
            "/tenant/acme"
        );
    }

    #[test]
    fn test_app_state_rejects_invalid_config() {
        let (directory, content) = parts();
        let mut config = ApiConfig::default();
        config.routing.namespace_segment = String::new();

        let err = AppState::new(config, directory, content).unwrap_err();
        assert!(matches!(err, ApiError::Config(_)));
    }
}
