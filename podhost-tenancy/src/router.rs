//! Tenant-scoped path routing.
//!
//! User-facing paths live under `/{segment}/{tenant_id}`. The router decides,
//! per request, whether a path is left alone or moved into the resolved
//! tenant's namespace. Rewriting is a fixed point: a rewritten path routes as
//! [`RoutingDecision::AlreadyScoped`].

use podhost_core::types::TenantId;
use std::fmt;

use crate::config::RoutingConfig;
use crate::resolver::Resolution;

/// What the router does with a request path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RoutingDecision {
    /// Excluded or non-origin path; forwarded untouched.
    PassThrough,
    /// Path is already inside the resolved tenant's namespace.
    AlreadyScoped,
    /// Path must be replaced by the contained tenant-scoped path.
    Rewrite(String),
    /// No tenant was resolved; forwarded untouched without a tenant.
    Unresolved,
}

impl RoutingDecision {
    /// Returns the rewritten path, if any.
    #[must_use]
    pub fn rewritten_path(&self) -> Option<&str> {
        match self {
            Self::Rewrite(path) => Some(path),
            _ => None,
        }
    }

    /// Returns a stable label for logs and metrics.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PassThrough => "pass_through",
            Self::AlreadyScoped => "already_scoped",
            Self::Rewrite(_) => "rewrite",
            Self::Unresolved => "unresolved",
        }
    }
}

impl fmt::Display for RoutingDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rewrite(path) => write!(f, "rewrite({path})"),
            other => f.write_str(other.as_str()),
        }
    }
}

/// Path prefixes that are never rewritten.
///
/// Matching is segment-aware: `/api` matches `/api` and `/api/shows` but not
/// `/apiary`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExcludedPrefixes {
    prefixes: Vec<String>,
}

impl ExcludedPrefixes {
    /// Creates a prefix set. Trailing slashes are ignored.
    #[must_use]
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            prefixes: prefixes
                .into_iter()
                .map(|p| p.as_ref().trim_end_matches('/').to_string())
                .filter(|p| !p.is_empty())
                .collect(),
        }
    }

    /// Returns `true` if `path` falls under any prefix.
    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        self.prefixes.iter().any(|prefix| has_segment_prefix(path, prefix))
    }
}

/// Routes request paths into tenant namespaces.
#[derive(Debug, Clone)]
pub struct PathRouter {
    segment: String,
    excluded: ExcludedPrefixes,
}

impl PathRouter {
    /// Creates a router from routing configuration.
    #[must_use]
    pub fn new(config: &RoutingConfig) -> Self {
        Self {
            segment: config.namespace_segment.clone(),
            excluded: ExcludedPrefixes::new(&config.excluded_prefixes),
        }
    }

    /// Returns the namespace prefix of `tenant`, e.g. `/tenant/acme`.
    #[must_use]
    pub fn namespace(&self, tenant: &TenantId) -> String {
        format!("/{}/{}", self.segment, tenant)
    }

    /// Returns `true` if `path` is excluded from rewriting.
    #[must_use]
    pub fn is_excluded(&self, path: &str) -> bool {
        self.excluded.matches(path)
    }

    /// Returns `true` if `path` is inside `tenant`'s namespace.
    #[must_use]
    pub fn is_scoped(&self, tenant: &TenantId, path: &str) -> bool {
        has_segment_prefix(path, &self.namespace(tenant))
    }

    /// Decides how to route `path` (path only, no query string).
    ///
    /// Precedence: non-origin and excluded paths pass through regardless of
    /// resolution; then an unresolved request is left alone; then a path
    /// already in the tenant's namespace; otherwise it is rewritten.
    #[must_use]
    pub fn route(&self, resolution: &Resolution, path: &str) -> RoutingDecision {
        if !path.starts_with('/') || self.is_excluded(path) {
            return RoutingDecision::PassThrough;
        }

        let Some(tenant) = resolution.tenant() else {
            return RoutingDecision::Unresolved;
        };

        if self.is_scoped(tenant, path) {
            return RoutingDecision::AlreadyScoped;
        }

        let namespace = self.namespace(tenant);
        if path == "/" {
            RoutingDecision::Rewrite(namespace)
        } else {
            RoutingDecision::Rewrite(namespace + path)
        }
    }
}

impl Default for PathRouter {
    fn default() -> Self {
        Self::new(&RoutingConfig::default())
    }
}

fn has_segment_prefix(path: &str, prefix: &str) -> bool {
    path.strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}
