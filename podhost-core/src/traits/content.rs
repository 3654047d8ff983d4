//! Tenant-scoped content contract.

use async_trait::async_trait;
use std::fmt::Debug;

use crate::data::{Episode, Show, TenantProfile};
use crate::error::ContentError;
use crate::types::{ShowId, TenantId};

/// Read access to shows and episodes.
///
/// Every operation takes the caller's [`TenantId`] and only returns records
/// owned by that tenant. A record owned by another tenant is indistinguishable
/// from a missing one.
#[async_trait]
pub trait ContentStore: Send + Sync + Debug {
    /// Returns the profile of a tenant.
    async fn tenant(&self, tenant: &TenantId) -> Result<Option<TenantProfile>, ContentError>;

    /// Lists the tenant's shows, oldest first.
    async fn list_shows(&self, tenant: &TenantId) -> Result<Vec<Show>, ContentError>;

    /// Returns a show if it belongs to the tenant.
    async fn show(&self, tenant: &TenantId, show: &ShowId) -> Result<Option<Show>, ContentError>;

    /// Lists a show's episodes, newest published first.
    ///
    /// Returns `None` when the show does not exist or belongs to another tenant.
    async fn list_episodes(
        &self,
        tenant: &TenantId,
        show: &ShowId,
    ) -> Result<Option<Vec<Episode>>, ContentError>;
}
