//! Graceful shutdown coordination.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::{broadcast, watch};
use tracing::{error, info, warn};

/// Coordinates shutdown between the signal handlers, the HTTP server and
/// whoever waits for the process to finish.
#[derive(Debug, Clone)]
pub struct ShutdownController {
    shutdown_initiated: Arc<AtomicBool>,
    shutdown_tx: broadcast::Sender<()>,
    completion_tx: Arc<watch::Sender<bool>>,
    completion_rx: watch::Receiver<bool>,
}

impl Default for ShutdownController {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownController {
    /// Creates a new shutdown controller.
    #[must_use]
    pub fn new() -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);
        let (completion_tx, completion_rx) = watch::channel(false);

        Self {
            shutdown_initiated: Arc::new(AtomicBool::new(false)),
            shutdown_tx,
            completion_tx: Arc::new(completion_tx),
            completion_rx,
        }
    }

    /// Initiates shutdown. Later calls are no-ops.
    pub fn initiate_shutdown(&self) {
        if self
            .shutdown_initiated
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
        {
            info!("Shutdown initiated");
            let _ = self.shutdown_tx.send(());
        }
    }

    /// Returns whether shutdown has been initiated.
    #[must_use]
    pub fn is_shutdown_initiated(&self) -> bool {
        self.shutdown_initiated.load(Ordering::SeqCst)
    }

    /// Completes once shutdown has been initiated, including before the call.
    pub async fn wait_for_shutdown(&self) {
        let mut rx = self.shutdown_tx.subscribe();
        if self.is_shutdown_initiated() {
            return;
        }
        let _ = rx.recv().await;
    }

    /// Marks shutdown as complete.
    pub fn mark_complete(&self) {
        let _ = self.completion_tx.send(true);
    }

    /// Waits for [`mark_complete`](Self::mark_complete), up to `timeout`.
    ///
    /// Returns `false` on timeout.
    pub async fn wait_for_completion(&self, timeout: Duration) -> bool {
        let mut rx = self.completion_rx.clone();

        match tokio::time::timeout(timeout, rx.wait_for(|done| *done)).await {
            Ok(result) => result.is_ok(),
            Err(_) => {
                warn!(?timeout, "Shutdown completion timed out");
                false
            }
        }
    }
}

/// Initiates shutdown on SIGINT (Ctrl+C) or SIGTERM.
pub async fn setup_signal_handlers(controller: ShutdownController) {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let (mut sigint, mut sigterm) =
            match (signal(SignalKind::interrupt()), signal(SignalKind::terminate())) {
                (Ok(sigint), Ok(sigterm)) => (sigint, sigterm),
                (Err(e), _) | (_, Err(e)) => {
                    error!(error = %e, "Failed to install signal handlers");
                    return;
                }
            };

        tokio::select! {
            _ = sigint.recv() => info!("Received SIGINT (Ctrl+C)"),
            _ = sigterm.recv() => info!("Received SIGTERM"),
        }
    }

    #[cfg(not(unix))]
    {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            return;
        }
        info!("Received Ctrl+C");
    }

    controller.initiate_shutdown();
}
