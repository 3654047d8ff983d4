//! Per-request routing context.

use podhost_core::types::TenantId;

use crate::resolver::Resolution;
use crate::router::RoutingDecision;

/// Immutable record of how a request was routed.
///
/// Created once by the routing middleware and stored in the request
/// extensions. It carries the tenant the request belongs to, so handlers
/// never have to look at the host header or the path to find it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingContext {
    resolution: Resolution,
    decision: RoutingDecision,
    original_path: String,
}

impl RoutingContext {
    /// Creates a routing context.
    #[must_use]
    pub fn new(
        resolution: Resolution,
        decision: RoutingDecision,
        original_path: impl Into<String>,
    ) -> Self {
        Self {
            resolution,
            decision,
            original_path: original_path.into(),
        }
    }

    /// Returns the resolved tenant, if any.
    #[must_use]
    pub fn tenant(&self) -> Option<&TenantId> {
        self.resolution.tenant()
    }

    /// Returns the resolution outcome.
    #[must_use]
    pub fn resolution(&self) -> &Resolution {
        &self.resolution
    }

    /// Returns the routing decision.
    #[must_use]
    pub fn decision(&self) -> &RoutingDecision {
        &self.decision
    }

    /// Returns the path as received, before any rewrite.
    #[must_use]
    pub fn original_path(&self) -> &str {
        &self.original_path
    }

    /// Returns `true` if the request has no tenant.
    #[must_use]
    pub fn is_unresolved(&self) -> bool {
        !self.resolution.is_resolved()
    }
}
