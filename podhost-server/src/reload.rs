//! Catalog hot reload.
//!
//! [`CatalogReloader`] re-reads the catalog and swaps the directory
//! snapshot; [`CatalogWatcher`] triggers it on file changes. A reload that
//! fails leaves the previous snapshot in service.
//!
//! The watcher observes the catalog's parent directory, so editors that
//! replace the file by renaming a temporary one are picked up too.

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use notify_debouncer_mini::{DebouncedEvent, DebouncedEventKind, Debouncer, new_debouncer};
use podhost_core::data::InMemoryContentStore;
use podhost_core::types::Hostname;
use podhost_telemetry::metrics::PodhostMetrics;
use podhost_telemetry::spans::reload_span;
use podhost_tenancy::directory::SnapshotDirectory;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::catalog::{Catalog, CatalogError};

/// Errors raised while setting up the watcher.
#[derive(Debug, thiserror::Error)]
pub enum WatchError {
    /// Failed to create the file watcher.
    #[error("failed to create file watcher: {0}")]
    WatcherCreation(String),

    /// Failed to watch a path.
    #[error("failed to watch path '{path}': {message}")]
    WatchPath {
        /// The path that could not be watched
        path: String,
        /// Error message
        message: String,
    },
}

/// Loads the catalog into the live directory and content store.
#[derive(Debug, Clone)]
pub struct CatalogReloader {
    path: PathBuf,
    platform_domain: Option<Hostname>,
    directory: Arc<SnapshotDirectory>,
    content: Arc<InMemoryContentStore>,
}

impl CatalogReloader {
    /// Creates a reloader for the catalog at `path`.
    #[must_use]
    pub fn new(
        path: impl Into<PathBuf>,
        platform_domain: Option<Hostname>,
        directory: Arc<SnapshotDirectory>,
        content: Arc<InMemoryContentStore>,
    ) -> Self {
        Self {
            path: path.into(),
            platform_domain,
            directory,
            content,
        }
    }

    /// Returns the catalog path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the catalog and, if it is consistent, applies it.
    ///
    /// The new directory snapshot and content store are built off to the
    /// side. The content store is published first, so a newly routed tenant
    /// always finds its records; then the snapshot is swapped in.
    ///
    /// Returns the number of hostnames in the new snapshot.
    ///
    /// # Errors
    ///
    /// Returns the catalog error; nothing is applied in that case.
    pub fn reload(&self) -> Result<usize, CatalogError> {
        let span = reload_span(&self.path.display().to_string());
        let _entered = span.enter();

        let result = Catalog::load(&self.path).and_then(|catalog| {
            let (snapshot, content) = catalog.build(self.platform_domain.as_ref())?;
            Ok((catalog.tenant_count(), snapshot, content))
        });

        match result {
            Ok((tenants, snapshot, content)) => {
                let hosts = snapshot.len();
                self.content.replace_with(content);
                self.directory.replace(snapshot);
                PodhostMetrics::directory_reload(true);
                PodhostMetrics::directory_hostnames(hosts);
                info!(tenants, hosts, "Catalog loaded");
                Ok(hosts)
            }
            Err(e) => {
                PodhostMetrics::directory_reload(false);
                error!(error = %e, "Catalog reload failed; keeping previous snapshot");
                Err(e)
            }
        }
    }
}

/// Watches the catalog file and reloads it on change.
///
/// Watching stops when the value is dropped.
pub struct CatalogWatcher {
    _debouncer: Debouncer<RecommendedWatcher>,
    path: PathBuf,
}

impl std::fmt::Debug for CatalogWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogWatcher")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl CatalogWatcher {
    /// Starts watching the reloader's catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the path cannot be resolved or watched.
    pub fn start(reloader: CatalogReloader, debounce: Duration) -> Result<Self, WatchError> {
        let path = reloader
            .path()
            .canonicalize()
            .map_err(|e| WatchError::WatchPath {
                path: reloader.path().display().to_string(),
                message: format!("failed to canonicalize path: {e}"),
            })?;
        let parent = path
            .parent()
            .map(Path::to_path_buf)
            .ok_or_else(|| WatchError::WatchPath {
                path: path.display().to_string(),
                message: "catalog has no parent directory".to_string(),
            })?;

        let target = path.clone();
        let mut debouncer = new_debouncer(
            debounce,
            move |result: Result<Vec<DebouncedEvent>, notify::Error>| match result {
                Ok(events) => {
                    if touches(&events, &target) {
                        debug!(path = %target.display(), "Catalog changed");
                        // Failures are logged and counted by the reloader.
                        let _ = reloader.reload();
                    }
                }
                Err(e) => {
                    warn!(error = %e, "Catalog watcher error");
                }
            },
        )
        .map_err(|e| WatchError::WatcherCreation(e.to_string()))?;

        debouncer
            .watcher()
            .watch(&parent, RecursiveMode::NonRecursive)
            .map_err(|e| WatchError::WatchPath {
                path: parent.display().to_string(),
                message: e.to_string(),
            })?;

        info!(
            path = %path.display(),
            debounce_ms = debounce.as_millis(),
            "Watching catalog for changes"
        );

        Ok(Self {
            _debouncer: debouncer,
            path,
        })
    }

    /// Returns the watched catalog path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn touches(events: &[DebouncedEvent], target: &Path) -> bool {
    events.iter().any(|event| {
        event.kind == DebouncedEventKind::Any
            && (event.path == target || event.path.file_name() == target.file_name())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use podhost_core::traits::ContentStore;
    use podhost_core::types::TenantId;
    use podhost_tenancy::directory::TenantDirectory;
    use std::fs;

    const ACME: &str = "550e8400-e29b-41d4-a716-446655440000";
    const INDIE: &str = "770e8400-e29b-41d4-a716-446655440000";
    const SHOW_S1: &str =
        "    shows:\n      - id: s1\n        title: Shared\n        created_at: 2024-01-01T00:00:00Z\n";

    fn catalog(domain: &str) -> String {
        format!(
            "tenants:\n  - id: {ACME}\n    name: Acme\n    slug: acme\n    custom_domains: [{domain}]\n"
        )
    }

    fn setup(dir: &tempfile::TempDir) -> (CatalogReloader, Arc<SnapshotDirectory>) {
        let (reloader, directory, _) = setup_with_content(dir);
        (reloader, directory)
    }

    fn setup_with_content(
        dir: &tempfile::TempDir,
    ) -> (CatalogReloader, Arc<SnapshotDirectory>, Arc<InMemoryContentStore>) {
        let path = dir.path().join("catalog.yaml");
        fs::write(&path, catalog("acme-podcasts.test")).unwrap();

        let directory = Arc::new(SnapshotDirectory::default());
        let content = Arc::new(InMemoryContentStore::new());
        let reloader = CatalogReloader::new(
            path,
            None,
            Arc::clone(&directory),
            Arc::clone(&content),
        );
        (reloader, directory, content)
    }

    fn two_tenants(show_owner: &str, acme_aliases: &str) -> String {
        let acme_shows = if show_owner == ACME { SHOW_S1 } else { "" };
        let indie_shows = if show_owner == INDIE { SHOW_S1 } else { "" };
        format!(
            "tenants:\n  - id: {ACME}\n    name: Acme\n    slug: acme\n    aliases: [{acme_aliases}]\n{acme_shows}  - id: {INDIE}\n    name: Indie\n    slug: indie\n    aliases: [indie.test]\n{indie_shows}"
        )
    }

    async fn lookup(directory: &SnapshotDirectory, host: &str) -> Option<TenantId> {
        directory
            .lookup(&Hostname::new(host).unwrap())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_reload_swaps_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let (reloader, directory) = setup(&dir);

        assert_eq!(reloader.reload().unwrap(), 1);
        assert_eq!(directory.generation(), 1);
        assert!(lookup(&directory, "acme-podcasts.test").await.is_some());

        fs::write(reloader.path(), catalog("acme.fm")).unwrap();
        reloader.reload().unwrap();
        assert!(lookup(&directory, "acme-podcasts.test").await.is_none());
        assert!(lookup(&directory, "acme.fm").await.is_some());
    }

    #[tokio::test]
    async fn test_failed_reload_keeps_previous_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let (reloader, directory) = setup(&dir);
        reloader.reload().unwrap();

        fs::write(reloader.path(), "tenants: [unclosed").unwrap();
        assert!(reloader.reload().is_err());
        assert_eq!(directory.generation(), 1);
        assert!(lookup(&directory, "acme-podcasts.test").await.is_some());
    }

    #[tokio::test]
    async fn test_reload_moves_show_between_tenants() {
        let dir = tempfile::tempdir().unwrap();
        let (reloader, directory, content) = setup_with_content(&dir);
        let acme = TenantId::new(ACME).unwrap();
        let indie = TenantId::new(INDIE).unwrap();

        fs::write(reloader.path(), two_tenants(ACME, "a1.test")).unwrap();
        reloader.reload().unwrap();
        assert_eq!(content.list_shows(&acme).await.unwrap().len(), 1);

        // Same edit: s1 changes owner and acme gains a hostname.
        fs::write(reloader.path(), two_tenants(INDIE, "a1.test, a2.test")).unwrap();
        assert_eq!(reloader.reload().unwrap(), 3);

        assert_eq!(lookup(&directory, "a2.test").await, Some(acme.clone()));
        assert!(content.list_shows(&acme).await.unwrap().is_empty());
        let shows = content.list_shows(&indie).await.unwrap();
        assert_eq!(shows.len(), 1);
        assert_eq!(shows[0].tenant_id, indie);
    }

    #[tokio::test]
    async fn test_failed_reload_keeps_previous_content() {
        let dir = tempfile::tempdir().unwrap();
        let (reloader, _, content) = setup_with_content(&dir);
        let acme = TenantId::new(ACME).unwrap();

        fs::write(reloader.path(), two_tenants(ACME, "a1.test")).unwrap();
        reloader.reload().unwrap();

        // Acme is renamed, but s1 is now claimed by both tenants.
        let broken = format!(
            "tenants:\n  - id: {ACME}\n    name: Renamed\n    slug: acme\n{SHOW_S1}  - id: {INDIE}\n    name: Indie\n    slug: indie\n{SHOW_S1}"
        );
        fs::write(reloader.path(), broken).unwrap();
        assert!(matches!(reloader.reload(), Err(CatalogError::Content(_))));

        let profile = content.tenant(&acme).await.unwrap().unwrap();
        assert_eq!(profile.name, "Acme");
    }

    #[tokio::test]
    async fn test_watcher_picks_up_changes() {
        let dir = tempfile::tempdir().unwrap();
        let (reloader, directory) = setup(&dir);
        reloader.reload().unwrap();

        let watcher =
            CatalogWatcher::start(reloader.clone(), Duration::from_millis(50)).unwrap();
        assert!(watcher.path().ends_with("catalog.yaml"));

        fs::write(reloader.path(), catalog("acme.fm")).unwrap();

        let mut reloaded = false;
        for _ in 0..100 {
            if lookup(&directory, "acme.fm").await.is_some() {
                reloaded = true;
                break;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        assert!(reloaded, "watcher did not reload the catalog");
    }

    #[test]
    fn test_watch_missing_file() {
        let reloader = CatalogReloader::new(
            "/nonexistent/catalog.yaml",
            None,
            Arc::new(SnapshotDirectory::default()),
            Arc::new(InMemoryContentStore::new()),
        );
        assert!(matches!(
            CatalogWatcher::start(reloader, Duration::from_millis(50)),
            Err(WatchError::WatchPath { .. })
        ));
    }
}
