//! In-memory content store.

use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, info};

use super::records::{Episode, Show, TenantProfile};
use crate::error::ContentError;
use crate::traits::ContentStore;
use crate::types::{EpisodeId, ShowId, TenantId};

#[derive(Debug, Default)]
struct Tables {
    tenants: DashMap<TenantId, TenantProfile>,
    shows: DashMap<ShowId, Show>,
    episodes: DashMap<EpisodeId, Episode>,
}

impl Tables {
    fn owned_show(&self, tenant: &TenantId, show: &ShowId) -> Option<Show> {
        self.shows
            .get(show)
            .filter(|entry| &entry.tenant_id == tenant)
            .map(|entry| entry.value().clone())
    }
}

/// `DashMap`-backed content store.
///
/// Shows are indexed by id and carry their owning tenant; episodes are
/// reachable only through a show, so tenant filtering happens once, at the
/// show lookup.
///
/// The tables sit behind a swappable `Arc`: every read answers from one set
/// of tables, and [`InMemoryContentStore::replace_with`] publishes a store
/// built elsewhere in a single step.
#[derive(Debug, Default)]
pub struct InMemoryContentStore {
    tables: RwLock<Arc<Tables>>,
}

impl InMemoryContentStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> Arc<Tables> {
        Arc::clone(&*self.tables.read())
    }

    /// Inserts or replaces a tenant profile.
    pub fn upsert_tenant(&self, profile: TenantProfile) {
        debug!(tenant = %profile.id, "Upserting tenant profile");
        self.tables().tenants.insert(profile.id.clone(), profile);
    }

    /// Inserts or replaces a show.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::Integrity` if the owning tenant is unknown or
    /// the show id is already owned by a different tenant.
    pub fn upsert_show(&self, show: Show) -> Result<(), ContentError> {
        let tables = self.tables();
        if !tables.tenants.contains_key(&show.tenant_id) {
            return Err(ContentError::integrity(format!(
                "show {} references unknown tenant {}",
                show.id, show.tenant_id
            )));
        }
        if let Some(existing) = tables.shows.get(&show.id) {
            if existing.tenant_id != show.tenant_id {
                return Err(ContentError::integrity(format!(
                    "show {} is already owned by another tenant",
                    show.id
                )));
            }
        }
        tables.shows.insert(show.id.clone(), show);
        Ok(())
    }

    /// Inserts or replaces an episode.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::Integrity` if the parent show is unknown.
    pub fn upsert_episode(&self, episode: Episode) -> Result<(), ContentError> {
        let tables = self.tables();
        if !tables.shows.contains_key(&episode.show_id) {
            return Err(ContentError::integrity(format!(
                "episode {} references unknown show {}",
                episode.id, episode.show_id
            )));
        }
        tables.episodes.insert(episode.id.clone(), episode);
        Ok(())
    }

    /// Replaces the whole content of this store with the content of `other`.
    ///
    /// Records missing from `other` disappear; readers see either the old
    /// content or the new one, never a mix.
    pub fn replace_with(&self, other: Self) {
        let incoming = other.tables.into_inner();
        let tenants = incoming.tenants.len();
        let shows = incoming.shows.len();
        *self.tables.write() = incoming;
        info!(tenants, shows, "Content store replaced");
    }

    /// Returns the number of tenant profiles.
    #[must_use]
    pub fn tenant_count(&self) -> usize {
        self.tables().tenants.len()
    }
}

#[async_trait]
impl ContentStore for InMemoryContentStore {
    async fn tenant(&self, tenant: &TenantId) -> Result<Option<TenantProfile>, ContentError> {
        let tables = self.tables();
        let profile = tables.tenants.get(tenant).map(|entry| entry.value().clone());
        Ok(profile)
    }

    async fn list_shows(&self, tenant: &TenantId) -> Result<Vec<Show>, ContentError> {
        let mut shows: Vec<Show> = self
            .tables()
            .shows
            .iter()
            .filter(|entry| &entry.tenant_id == tenant)
            .map(|entry| entry.value().clone())
            .collect();
        shows.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(shows)
    }

    async fn show(&self, tenant: &TenantId, show: &ShowId) -> Result<Option<Show>, ContentError> {
        Ok(self.tables().owned_show(tenant, show))
    }

    async fn list_episodes(
        &self,
        tenant: &TenantId,
        show: &ShowId,
    ) -> Result<Option<Vec<Episode>>, ContentError> {
        let tables = self.tables();
        if tables.owned_show(tenant, show).is_none() {
            return Ok(None);
        }

        let mut episodes: Vec<Episode> = tables
            .episodes
            .iter()
            .filter(|entry| &entry.show_id == show)
            .map(|entry| entry.value().clone())
            .collect();
        episodes.sort_by(Episode::listing_order);
        Ok(Some(episodes))
    }
}
