//! Host header to tenant resolution.

use podhost_core::types::{Hostname, TenantId};
use std::sync::Arc;
use tracing::debug;

use crate::directory::TenantDirectory;
use crate::error::Result;

/// Outcome of resolving a request's host.
///
/// `NotFound` is an ordinary outcome: the request continues without a
/// tenant and is never assigned a fallback one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Resolution {
    /// The host belongs to a tenant.
    Resolved(TenantId),
    /// The host is missing, malformed or unregistered.
    NotFound,
}

impl Resolution {
    /// Returns the resolved tenant, if any.
    #[must_use]
    pub fn tenant(&self) -> Option<&TenantId> {
        match self {
            Self::Resolved(tenant) => Some(tenant),
            Self::NotFound => None,
        }
    }

    /// Returns `true` if a tenant was resolved.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }

    /// Returns a stable label for logs and metrics.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Resolved(_) => "resolved",
            Self::NotFound => "not_found",
        }
    }
}

impl From<Option<TenantId>> for Resolution {
    fn from(tenant: Option<TenantId>) -> Self {
        tenant.map_or(Self::NotFound, Self::Resolved)
    }
}

/// Resolves host headers against a [`TenantDirectory`].
///
/// Holds no per-request state; clones share the directory.
#[derive(Debug, Clone)]
pub struct TenantResolver {
    directory: Arc<dyn TenantDirectory>,
}

impl TenantResolver {
    /// Creates a resolver over `directory`.
    #[must_use]
    pub fn new(directory: Arc<dyn TenantDirectory>) -> Self {
        Self { directory }
    }

    /// Returns the underlying directory.
    #[must_use]
    pub fn directory(&self) -> &Arc<dyn TenantDirectory> {
        &self.directory
    }

    /// Resolves a raw `Host` header value.
    ///
    /// Any `:port` suffix is ignored. A missing or malformed header resolves
    /// to [`Resolution::NotFound`] without consulting the directory.
    ///
    /// # Errors
    ///
    /// Returns the directory's error when it cannot answer.
    pub async fn resolve(&self, host_header: Option<&str>) -> Result<Resolution> {
        let Some(raw) = host_header else {
            debug!("Request has no host header");
            return Ok(Resolution::NotFound);
        };

        match Hostname::from_host_header(raw) {
            Ok(host) => self.resolve_hostname(&host).await,
            Err(e) => {
                debug!(host = raw, error = %e, "Malformed host header");
                Ok(Resolution::NotFound)
            }
        }
    }

    /// Resolves an already-normalised hostname.
    ///
    /// # Errors
    ///
    /// Returns the directory's error when it cannot answer.
    pub async fn resolve_hostname(&self, host: &Hostname) -> Result<Resolution> {
        self.directory.lookup(host).await.map(Resolution::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::{DirectorySnapshot, SnapshotDirectory};
    use crate::error::DirectoryError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const ACME: &str = "550e8400-e29b-41d4-a716-446655440000";

    #[derive(Debug, Default)]
    struct CountingDirectory {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl TenantDirectory for CountingDirectory {
        async fn lookup(&self, host: &Hostname) -> Result<Option<TenantId>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(DirectoryError::unavailable("backend down"));
            }
            Ok((host.as_str() == "acme-podcasts.test").then(|| TenantId::new(ACME).unwrap()))
        }
    }

    fn acme_resolver() -> TenantResolver {
        let mut builder = DirectorySnapshot::builder();
        builder
            .register(
                Hostname::new("acme-podcasts.test").unwrap(),
                TenantId::new(ACME).unwrap(),
            )
            .unwrap();
        TenantResolver::new(Arc::new(SnapshotDirectory::new(builder.build())))
    }

    #[tokio::test]
    async fn test_registered_host_resolves_on_any_port() {
        let resolver = acme_resolver();
        let expected = Resolution::Resolved(TenantId::new(ACME).unwrap());

        for header in [
            "acme-podcasts.test",
            "acme-podcasts.test:3000",
            "acme-podcasts.test:443",
            "ACME-Podcasts.Test:8080",
        ] {
            assert_eq!(resolver.resolve(Some(header)).await.unwrap(), expected);
        }
    }

    #[tokio::test]
    async fn test_unregistered_host_is_not_found() {
        let resolver = acme_resolver();
        let resolution = resolver.resolve(Some("unknown.test")).await.unwrap();
        assert_eq!(resolution, Resolution::NotFound);
        assert!(!resolution.is_resolved());
        assert!(resolution.tenant().is_none());
    }

    #[tokio::test]
    async fn test_no_suffix_matching() {
        let resolver = acme_resolver();
        for header in ["www.acme-podcasts.test", "podcasts.test", "acme-podcasts.test.evil"] {
            assert_eq!(
                resolver.resolve(Some(header)).await.unwrap(),
                Resolution::NotFound
            );
        }
    }

    #[tokio::test]
    async fn test_missing_or_malformed_host_skips_directory() {
        let directory = Arc::new(CountingDirectory::default());
        let resolver = TenantResolver::new(directory.clone());

        assert_eq!(resolver.resolve(None).await.unwrap(), Resolution::NotFound);
        for header in ["", "acme-podcasts.test:http", "bad host", "[::1"] {
            assert_eq!(
                resolver.resolve(Some(header)).await.unwrap(),
                Resolution::NotFound
            );
        }
        assert_eq!(directory.calls.load(Ordering::SeqCst), 0);

        resolver.resolve(Some("acme-podcasts.test")).await.unwrap();
        assert_eq!(directory.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_directory_failure_is_an_error() {
        let resolver = TenantResolver::new(Arc::new(CountingDirectory {
            calls: AtomicUsize::new(0),
            fail: true,
        }));
        let err = resolver.resolve(Some("acme-podcasts.test")).await.unwrap_err();
        assert!(matches!(err, DirectoryError::Unavailable { .. }));
    }

    #[tokio::test]
    async fn test_resolution_is_deterministic() {
        let resolver = acme_resolver();
        let first = resolver.resolve(Some("acme-podcasts.test:1")).await.unwrap();
        let second = resolver.resolve(Some("acme-podcasts.test:2")).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first.as_str(), "resolved");
    }
}
