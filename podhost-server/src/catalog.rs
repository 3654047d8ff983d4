//! Tenant catalog file.
//!
//! The catalog lists every tenant with its hostnames, branding, shows and
//! episodes. It is the server's seed for both the tenant directory and the
//! content store:
//!
//! ```yaml
//! tenants:
//!   - id: 550e8400-e29b-41d4-a716-446655440000
//!     name: Acme Podcast Network
//!     slug: acme
//!     custom_domains: [acme-podcasts.test]
//!     shows:
//!       - id: 660e8400-e29b-41d4-a716-446655440001
//!         title: Tech Talk Daily
//!         created_at: 2024-01-01T00:00:00Z
//!         episodes: []
//! ```

use chrono::{DateTime, Utc};
use podhost_core::config::ConfigLoader;
use podhost_core::data::{Branding, Episode, InMemoryContentStore, Show, TenantProfile};
use podhost_core::error::{ConfigError, ContentError};
use podhost_core::types::{EpisodeId, Hostname, ShowId, TenantId};
use podhost_tenancy::directory::{DirectorySnapshot, TenantEntry};
use podhost_tenancy::error::DirectoryError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

/// Errors raised while loading or applying a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The file could not be read or parsed.
    #[error("catalog file: {0}")]
    File(#[from] ConfigError),

    /// The hostnames do not form a valid directory.
    #[error("catalog hostnames: {0}")]
    Directory(#[from] DirectoryError),

    /// Content records are inconsistent.
    #[error("catalog content: {0}")]
    Content(#[from] ContentError),

    /// The same tenant id appears twice.
    #[error("tenant '{0}' is listed more than once")]
    DuplicateTenant(TenantId),
}

/// Parsed catalog file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    /// Tenants in file order.
    #[serde(default)]
    pub tenants: Vec<CatalogTenant>,
}

/// A tenant as listed in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogTenant {
    /// Tenant identifier.
    pub id: TenantId,
    /// Display name.
    pub name: String,
    /// URL-safe slug.
    pub slug: String,
    /// Custom domains; the first one is shown on the tenant profile.
    #[serde(default)]
    pub custom_domains: Vec<String>,
    /// Additional hostnames.
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Theme settings.
    #[serde(default)]
    pub branding: Branding,
    /// Shows owned by the tenant.
    #[serde(default)]
    pub shows: Vec<CatalogShow>,
}

/// A show as listed in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogShow {
    /// Show identifier.
    pub id: ShowId,
    /// Title.
    pub title: String,
    /// Description.
    #[serde(default)]
    pub description: Option<String>,
    /// Cover image URL.
    #[serde(default)]
    pub cover_image: Option<String>,
    /// Author name.
    #[serde(default)]
    pub author: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Episodes of the show.
    #[serde(default)]
    pub episodes: Vec<CatalogEpisode>,
}

/// An episode as listed in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEpisode {
    /// Episode identifier.
    pub id: EpisodeId,
    /// Title.
    pub title: String,
    /// Location of the audio asset.
    pub audio_url: String,
    /// Duration in seconds.
    #[serde(default)]
    pub duration_seconds: u32,
    /// Publication timestamp; omitted for drafts.
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Catalog {
    /// Reads a catalog file; the format follows the file extension.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::File` if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        Ok(ConfigLoader::new().load_file(path)?)
    }

    /// Returns the number of tenants.
    #[must_use]
    pub fn tenant_count(&self) -> usize {
        self.tenants.len()
    }

    /// Builds the directory entry of every tenant.
    #[must_use]
    pub fn entries(&self) -> Vec<TenantEntry> {
        self.tenants.iter().map(CatalogTenant::entry).collect()
    }

    /// Builds a directory snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error on duplicate tenant ids, invalid hostnames, or a
    /// hostname claimed by two tenants.
    pub fn snapshot(
        &self,
        platform_domain: Option<&Hostname>,
    ) -> Result<DirectorySnapshot, CatalogError> {
        let mut seen = HashSet::new();
        for tenant in &self.tenants {
            if !seen.insert(&tenant.id) {
                return Err(CatalogError::DuplicateTenant(tenant.id.clone()));
            }
        }
        Ok(DirectorySnapshot::from_entries(&self.entries(), platform_domain)?)
    }

    /// Upserts every tenant, show and episode into `store`.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Content` if a record is inconsistent, such as a
    /// show id reused by two tenants. Records before the failing one remain
    /// in the store.
    pub fn seed(&self, store: &InMemoryContentStore) -> Result<(), CatalogError> {
        for tenant in &self.tenants {
            store.upsert_tenant(tenant.profile()?);

            for show in &tenant.shows {
                store.upsert_show(show.record(&tenant.id))?;
                for episode in &show.episodes {
                    store.upsert_episode(episode.record(&show.id))?;
                }
            }
        }
        Ok(())
    }

    /// Builds the directory snapshot and a freshly seeded content store,
    /// without touching any live state.
    ///
    /// # Errors
    ///
    /// Returns the first error [`Catalog::snapshot`] or [`Catalog::seed`]
    /// would report.
    pub fn build(
        &self,
        platform_domain: Option<&Hostname>,
    ) -> Result<(DirectorySnapshot, InMemoryContentStore), CatalogError> {
        let snapshot = self.snapshot(platform_domain)?;
        let store = InMemoryContentStore::new();
        self.seed(&store)?;
        Ok((snapshot, store))
    }
}

impl CatalogTenant {
    fn entry(&self) -> TenantEntry {
        let mut entry = TenantEntry::new(self.id.clone()).with_slug(&self.slug);
        for domain in &self.custom_domains {
            entry = entry.with_custom_domain(domain);
        }
        for alias in &self.aliases {
            entry = entry.with_alias(alias);
        }
        entry
    }

    fn profile(&self) -> Result<TenantProfile, CatalogError> {
        let custom_domain = self
            .custom_domains
            .first()
            .map(Hostname::new)
            .transpose()
            .map_err(|e| DirectoryError::invalid_entry(self.id.as_str(), e.to_string()))?;

        Ok(TenantProfile {
            id: self.id.clone(),
            name: self.name.clone(),
            slug: self.slug.clone(),
            custom_domain,
            branding: self.branding.clone(),
        })
    }
}

impl CatalogShow {
    fn record(&self, tenant: &TenantId) -> Show {
        Show {
            id: self.id.clone(),
            tenant_id: tenant.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            cover_image: self.cover_image.clone(),
            author: self.author.clone(),
            created_at: self.created_at,
        }
    }
}

impl CatalogEpisode {
    fn record(&self, show: &ShowId) -> Episode {
        Episode {
            id: self.id.clone(),
            show_id: show.clone(),
            title: self.title.clone(),
            audio_url: self.audio_url.clone(),
            duration_seconds: self.duration_seconds,
            published_at: self.published_at,
            created_at: self.created_at,
        }
    }
}
