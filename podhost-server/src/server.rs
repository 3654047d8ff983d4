//! Server orchestration.
//!
//! Startup order: telemetry, catalog, catalog watcher, HTTP server. On a
//! shutdown signal the HTTP server drains for up to the configured timeout.

use podhost_api::{ApiServer, AppState};
use podhost_core::config::ConfigLoader;
use podhost_core::data::InMemoryContentStore;
use podhost_core::error::ConfigError;
use podhost_core::traits::ContentStore;
use podhost_core::types::Hostname;
use podhost_telemetry::logging::init_logging;
use podhost_telemetry::metrics::init_metrics;
use podhost_tenancy::directory::{SnapshotDirectory, TenantDirectory};
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;

use crate::catalog::CatalogError;
use crate::config::{ENV_PREFIX, ServerConfig};
use crate::reload::{CatalogReloader, CatalogWatcher, WatchError};
use crate::shutdown::{ShutdownController, setup_signal_handlers};

/// Errors raised while starting or running the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The catalog could not be loaded.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// The catalog watcher could not be started.
    #[error("Watcher error: {0}")]
    Watch(#[from] WatchError),

    /// A component failed to initialize.
    #[error("Initialization error: {0}")]
    Initialization(String),

    /// The HTTP server failed.
    #[error("Runtime error: {0}")]
    Runtime(String),
}

/// The Podhost server.
#[derive(Debug)]
pub struct PodhostServer {
    config: ServerConfig,
    shutdown: ShutdownController,
    directory: Arc<SnapshotDirectory>,
    content: Arc<InMemoryContentStore>,
    watcher: Option<CatalogWatcher>,
    log_guards: Vec<WorkerGuard>,
}

impl PodhostServer {
    /// Creates a server with an empty directory and content store.
    #[must_use]
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            shutdown: ShutdownController::new(),
            directory: Arc::new(SnapshotDirectory::default()),
            content: Arc::new(InMemoryContentStore::new()),
            watcher: None,
            log_guards: Vec::new(),
        }
    }

    /// Loads, overrides from `PODHOST_*` variables, and validates a
    /// configuration file.
    ///
    /// # Errors
    ///
    /// Returns `ServerError::Config` if any step fails.
    pub fn load_config(path: impl AsRef<Path>) -> Result<ServerConfig, ServerError> {
        Ok(ConfigLoader::new()
            .with_env_prefix(ENV_PREFIX)
            .load_validated(path)?)
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Returns the shutdown controller.
    #[must_use]
    pub fn shutdown_controller(&self) -> &ShutdownController {
        &self.shutdown
    }

    /// Returns the live tenant directory.
    #[must_use]
    pub fn directory(&self) -> &Arc<SnapshotDirectory> {
        &self.directory
    }

    /// Initializes telemetry, then loads and watches the catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if logging or the catalog cannot be set up. Metrics
    /// failures are logged and tolerated.
    pub fn initialize(&mut self) -> Result<(), ServerError> {
        self.log_guards = init_logging(&self.config.logging).map_err(|e| {
            ServerError::Initialization(format!("Failed to initialize logging: {e}"))
        })?;
        info!(level = %self.config.logging.level, "Logging initialized");

        match init_metrics(&self.config.metrics) {
            Ok(()) => info!("Metrics initialized"),
            Err(e) => warn!(error = %e, "Metrics initialization failed"),
        }

        self.load_catalog()
    }

    /// Loads the configured catalog and starts watching it.
    ///
    /// Without a catalog path the directory stays empty and every host is
    /// answered with "tenant not found".
    ///
    /// # Errors
    ///
    /// Returns an error if the initial load fails or the watcher cannot start.
    pub fn load_catalog(&mut self) -> Result<(), ServerError> {
        let Some(path) = self.config.catalog.path.clone() else {
            warn!("No catalog configured; no tenant will resolve");
            return Ok(());
        };

        let platform: Option<Hostname> = self.config.catalog.platform_hostname()?;
        let reloader = CatalogReloader::new(
            path,
            platform,
            Arc::clone(&self.directory),
            Arc::clone(&self.content),
        );
        reloader.reload()?;

        if self.config.catalog.watch {
            self.watcher = Some(CatalogWatcher::start(
                reloader,
                self.config.catalog.debounce(),
            )?);
        }
        Ok(())
    }

    fn api_server(&self) -> Result<ApiServer, ServerError> {
        let directory: Arc<dyn TenantDirectory> = self.directory.clone();
        let content: Arc<dyn ContentStore> = self.content.clone();
        let state = AppState::new(self.config.api.clone(), directory, content)
            .map_err(|e| ServerError::Initialization(e.to_string()))?;
        Ok(ApiServer::new(Arc::new(state)))
    }

    /// Runs until SIGINT or SIGTERM.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP server cannot bind or fails.
    pub async fn run(self) -> Result<(), ServerError> {
        tokio::spawn(setup_signal_handlers(self.shutdown.clone()));

        let api = self.api_server()?;
        let listener = api
            .bind()
            .await
            .map_err(|e| ServerError::Runtime(e.to_string()))?;
        self.serve(api, listener).await
    }

    /// Serves on `listener` until shutdown is initiated.
    async fn serve(self, api: ApiServer, listener: TcpListener) -> Result<(), ServerError> {
        let shutdown = self.shutdown.clone();
        let mut server = tokio::spawn(api.serve(listener, async move {
            shutdown.wait_for_shutdown().await;
        }));

        let finished = tokio::select! {
            result = &mut server => Some(result),
            () = self.shutdown.wait_for_shutdown() => None,
        };

        let drained = match finished {
            Some(result) => Some(result),
            None => {
                let timeout = self.config.shutdown.timeout();
                info!(?timeout, "Draining in-flight requests");
                match tokio::time::timeout(timeout, &mut server).await {
                    Ok(result) => Some(result),
                    Err(_) => {
                        warn!("Drain timeout elapsed; aborting open connections");
                        server.abort();
                        None
                    }
                }
            }
        };

        // Stop reacting to catalog changes before reporting completion.
        drop(self.watcher);
        self.shutdown.mark_complete();

        match drained {
            Some(Ok(Ok(()))) | None => {
                info!("Podhost server stopped");
                Ok(())
            }
            Some(Ok(Err(e))) => Err(ServerError::Runtime(e.to_string())),
            Some(Err(e)) => Err(ServerError::Runtime(format!("server task failed: {e}"))),
        }
    }
}
