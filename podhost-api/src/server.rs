//! API server implementation.

use axum::ServiceExt;
use axum::extract::Request;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::error::ApiError;
use crate::routes::build_app;
use crate::state::AppState;

/// API server.
#[derive(Debug)]
pub struct ApiServer {
    state: Arc<AppState>,
}

impl ApiServer {
    /// Creates a new API server.
    #[must_use]
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    /// Returns a reference to the application state.
    #[must_use]
    pub fn state(&self) -> &Arc<AppState> {
        &self.state
    }

    /// Binds the configured address.
    ///
    /// # Errors
    ///
    /// Returns an error if the address is invalid or cannot be bound.
    pub async fn bind(&self) -> Result<TcpListener, ApiError> {
        let addr = self.state.config.bind_address();
        let socket_addr: SocketAddr = addr
            .parse()
            .map_err(|e| ApiError::Internal(format!("Invalid bind address {addr}: {e}")))?;

        TcpListener::bind(socket_addr)
            .await
            .map_err(|e| ApiError::Internal(format!("Failed to bind to {addr}: {e}")))
    }

    /// Runs the API server until `shutdown_signal` completes.
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind or run.
    pub async fn run_with_shutdown(
        self,
        shutdown_signal: impl Future<Output = ()> + Send + 'static,
    ) -> Result<(), ApiError> {
        let listener = self.bind().await?;
        self.serve(listener, shutdown_signal).await
    }

    /// Serves on an already-bound listener until `shutdown_signal` completes.
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails while running.
    pub async fn serve(
        self,
        listener: TcpListener,
        shutdown_signal: impl Future<Output = ()> + Send + 'static,
    ) -> Result<(), ApiError> {
        if let Ok(addr) = listener.local_addr() {
            info!(address = %addr, "API server listening");
        }

        let app = build_app(self.state);

        axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
            .with_graceful_shutdown(shutdown_signal)
            .await
            .map_err(|e| ApiError::Internal(format!("Server error: {e}")))?;

        warn!("API server shut down");
        Ok(())
    }
}
