//! Tenant directory: hostname to tenant lookups.
//!
//! The directory is the only authority on which tenant owns a hostname.
//! [`SnapshotDirectory`] serves lookups from an immutable
//! [`DirectorySnapshot`] that can be swapped at runtime, so a reload never
//! exposes a half-built table.

use async_trait::async_trait;
use parking_lot::RwLock;
use podhost_core::types::{Hostname, TenantId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info};

use crate::error::{DirectoryError, Result};

/// Maps hostnames to tenants.
#[async_trait]
pub trait TenantDirectory: Send + Sync + Debug {
    /// Looks up the tenant registered for `host`.
    ///
    /// Returns `Ok(None)` for unregistered hostnames. Errors are reserved for
    /// a directory that cannot answer.
    async fn lookup(&self, host: &Hostname) -> Result<Option<TenantId>>;
}

/// Hostnames a single tenant is reachable under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantEntry {
    /// Tenant identifier.
    pub id: TenantId,
    /// Slug, registered as `{slug}.{platform_domain}` when a platform domain
    /// is configured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    /// Custom domains owned by the tenant.
    #[serde(default)]
    pub custom_domains: Vec<String>,
    /// Additional hostnames, e.g. `localhost` for development.
    #[serde(default)]
    pub aliases: Vec<String>,
}

impl TenantEntry {
    /// Creates an entry with no hostnames.
    #[must_use]
    pub fn new(id: TenantId) -> Self {
        Self {
            id,
            slug: None,
            custom_domains: Vec::new(),
            aliases: Vec::new(),
        }
    }

    /// Sets the slug.
    #[must_use]
    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }

    /// Adds a custom domain.
    #[must_use]
    pub fn with_custom_domain(mut self, domain: impl Into<String>) -> Self {
        self.custom_domains.push(domain.into());
        self
    }

    /// Adds an alias hostname.
    #[must_use]
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }
}

/// Immutable hostname to tenant table.
///
/// A hostname maps to at most one tenant; the builder rejects conflicting
/// registrations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectorySnapshot {
    hosts: HashMap<Hostname, TenantId>,
}

impl DirectorySnapshot {
    /// Returns a builder for a new snapshot.
    #[must_use]
    pub fn builder() -> DirectorySnapshotBuilder {
        DirectorySnapshotBuilder::default()
    }

    /// Builds a snapshot from tenant entries.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::InvalidEntry` for unparseable hostnames and
    /// `DirectoryError::Conflict` when two tenants claim the same hostname.
    pub fn from_entries<'a, I>(entries: I, platform_domain: Option<&Hostname>) -> Result<Self>
    where
        I: IntoIterator<Item = &'a TenantEntry>,
    {
        let mut builder = Self::builder();
        if let Some(domain) = platform_domain {
            builder = builder.with_platform_domain(domain.clone());
        }
        for entry in entries {
            builder.add_entry(entry)?;
        }
        Ok(builder.build())
    }

    /// Returns the tenant registered for `host`.
    #[must_use]
    pub fn get(&self, host: &Hostname) -> Option<&TenantId> {
        self.hosts.get(host)
    }

    /// Returns all hostnames registered for `tenant`, sorted.
    #[must_use]
    pub fn hostnames_for(&self, tenant: &TenantId) -> Vec<&Hostname> {
        let mut hosts: Vec<&Hostname> = self
            .hosts
            .iter()
            .filter(|(_, owner)| *owner == tenant)
            .map(|(host, _)| host)
            .collect();
        hosts.sort();
        hosts
    }

    /// Returns the number of registered hostnames.
    #[must_use]
    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    /// Returns `true` if no hostname is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }

    /// Returns the number of distinct tenants.
    #[must_use]
    pub fn tenant_count(&self) -> usize {
        let mut tenants: Vec<&TenantId> = self.hosts.values().collect();
        tenants.sort();
        tenants.dedup();
        tenants.len()
    }
}

/// Builder for [`DirectorySnapshot`].
#[derive(Debug, Default)]
pub struct DirectorySnapshotBuilder {
    platform_domain: Option<Hostname>,
    hosts: HashMap<Hostname, TenantId>,
}

impl DirectorySnapshotBuilder {
    /// Sets the platform domain under which tenant slugs are registered.
    #[must_use]
    pub fn with_platform_domain(mut self, domain: Hostname) -> Self {
        self.platform_domain = Some(domain);
        self
    }

    /// Registers a single hostname.
    ///
    /// Registering the same pair twice is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::Conflict` if the hostname belongs to another
    /// tenant.
    pub fn register(&mut self, host: Hostname, tenant: TenantId) -> Result<&mut Self> {
        if let Some(existing) = self.hosts.get(&host) {
            if *existing == tenant {
                return Ok(self);
            }
            return Err(DirectoryError::Conflict {
                hostname: host.to_string(),
                existing: existing.to_string(),
                attempted: tenant.to_string(),
            });
        }
        self.hosts.insert(host, tenant);
        Ok(self)
    }

    /// Registers every hostname of an entry.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::InvalidEntry` for unparseable hostnames and
    /// `DirectoryError::Conflict` for hostnames owned by another tenant.
    pub fn add_entry(&mut self, entry: &TenantEntry) -> Result<&mut Self> {
        let tenant = entry.id.to_string();

        if let (Some(slug), Some(domain)) = (&entry.slug, &self.platform_domain) {
            let host = domain.subdomain(slug).map_err(|e| {
                DirectoryError::invalid_entry(&tenant, format!("slug '{slug}': {e}"))
            })?;
            self.register(host, entry.id.clone())?;
        }

        for raw in entry.custom_domains.iter().chain(&entry.aliases) {
            let host = Hostname::new(raw)
                .map_err(|e| DirectoryError::invalid_entry(&tenant, e.to_string()))?;
            self.register(host, entry.id.clone())?;
        }

        Ok(self)
    }

    /// Finishes the snapshot.
    #[must_use]
    pub fn build(self) -> DirectorySnapshot {
        DirectorySnapshot { hosts: self.hosts }
    }
}

/// Hot-reloadable directory backed by a [`DirectorySnapshot`].
///
/// Each lookup clones the current `Arc` under a short read lock and answers
/// from that snapshot alone.
#[derive(Debug)]
pub struct SnapshotDirectory {
    current: RwLock<Arc<DirectorySnapshot>>,
    generation: AtomicU64,
}

impl SnapshotDirectory {
    /// Creates a directory serving `snapshot`.
    #[must_use]
    pub fn new(snapshot: DirectorySnapshot) -> Self {
        Self {
            current: RwLock::new(Arc::new(snapshot)),
            generation: AtomicU64::new(0),
        }
    }

    /// Returns the snapshot currently served.
    #[must_use]
    pub fn snapshot(&self) -> Arc<DirectorySnapshot> {
        Arc::clone(&*self.current.read())
    }

    /// Atomically replaces the served snapshot and returns the previous one.
    pub fn replace(&self, snapshot: DirectorySnapshot) -> Arc<DirectorySnapshot> {
        let hosts = snapshot.len();
        let previous = std::mem::replace(&mut *self.current.write(), Arc::new(snapshot));
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        info!(generation, hosts, "Tenant directory snapshot replaced");
        previous
    }

    /// Returns how many times the snapshot has been replaced.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }
}

impl Default for SnapshotDirectory {
    fn default() -> Self {
        Self::new(DirectorySnapshot::default())
    }
}

#[async_trait]
impl TenantDirectory for SnapshotDirectory {
    async fn lookup(&self, host: &Hostname) -> Result<Option<TenantId>> {
        let tenant = self.snapshot().get(host).cloned();
        debug!(host = %host, found = tenant.is_some(), "Directory lookup");
        Ok(tenant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ACME: &str = "550e8400-e29b-41d4-a716-446655440000";
    const INDIE: &str = "770e8400-e29b-41d4-a716-446655440000";

    fn tid(id: &str) -> TenantId {
        TenantId::new(id).unwrap()
    }

    fn host(name: &str) -> Hostname {
        Hostname::new(name).unwrap()
    }

    fn entries() -> Vec<TenantEntry> {
        vec![
            TenantEntry::new(tid(ACME))
                .with_slug("acme")
                .with_custom_domain("acme-podcasts.test")
                .with_alias("localhost"),
            TenantEntry::new(tid(INDIE))
                .with_slug("indie")
                .with_custom_domain("Indie-Media.test."),
        ]
    }

    #[test]
    fn test_from_entries_registers_all_hostnames() {
        let platform = host("podhost.test");
        let snapshot = DirectorySnapshot::from_entries(&entries(), Some(&platform)).unwrap();

        assert_eq!(snapshot.len(), 5);
        assert_eq!(snapshot.tenant_count(), 2);
        assert_eq!(snapshot.get(&host("acme.podhost.test")), Some(&tid(ACME)));
        assert_eq!(snapshot.get(&host("localhost")), Some(&tid(ACME)));
        assert_eq!(snapshot.get(&host("indie-media.test")), Some(&tid(INDIE)));
        assert_eq!(
            snapshot.hostnames_for(&tid(INDIE)),
            vec![&host("indie-media.test"), &host("indie.podhost.test")]
        );
    }

    #[test]
    fn test_slug_ignored_without_platform_domain() {
        let snapshot = DirectorySnapshot::from_entries(&entries(), None).unwrap();
        assert_eq!(snapshot.len(), 3);
        assert!(snapshot.get(&host("acme.podhost.test")).is_none());
    }

    #[test]
    fn test_conflict_detected() {
        let mut entries = entries();
        entries[1].aliases.push("ACME-PODCASTS.test".to_string());

        let err = DirectorySnapshot::from_entries(&entries, None).unwrap_err();
        assert!(matches!(
            err,
            DirectoryError::Conflict { ref hostname, .. } if hostname == "acme-podcasts.test"
        ));
    }

    #[test]
    fn test_same_pair_registration_is_idempotent() {
        let mut builder = DirectorySnapshot::builder();
        builder.register(host("a.test"), tid(ACME)).unwrap();
        builder.register(host("a.test"), tid(ACME)).unwrap();
        assert_eq!(builder.build().len(), 1);
    }

    #[test]
    fn test_invalid_hostname_rejected() {
        let entry = TenantEntry::new(tid(ACME)).with_custom_domain("bad host");
        let err = DirectorySnapshot::from_entries([&entry], None).unwrap_err();
        assert!(matches!(err, DirectoryError::InvalidEntry { .. }));
    }

    #[test]
    fn test_entry_deserializes_with_defaults() {
        let entry: TenantEntry = serde_yaml::from_str("id: acme\nslug: acme\n").unwrap();
        assert!(entry.custom_domains.is_empty());
        assert!(entry.aliases.is_empty());
    }

    #[tokio::test]
    async fn test_lookup_and_replace() {
        let snapshot = DirectorySnapshot::from_entries(&entries(), None).unwrap();
        let directory = SnapshotDirectory::new(snapshot);
        assert_eq!(
            directory.lookup(&host("acme-podcasts.test")).await.unwrap(),
            Some(tid(ACME))
        );
        assert_eq!(directory.lookup(&host("new.test")).await.unwrap(), None);

        let held = directory.snapshot();
        let mut builder = DirectorySnapshot::builder();
        builder.register(host("new.test"), tid(INDIE)).unwrap();
        let previous = directory.replace(builder.build());

        assert_eq!(directory.generation(), 1);
        assert_eq!(previous.len(), 3);
        assert_eq!(
            directory.lookup(&host("new.test")).await.unwrap(),
            Some(tid(INDIE))
        );
        assert_eq!(directory.lookup(&host("acme-podcasts.test")).await.unwrap(), None);
        // Readers holding the old snapshot keep a consistent view.
        assert_eq!(held.get(&host("acme-podcasts.test")), Some(&tid(ACME)));
    }
}
