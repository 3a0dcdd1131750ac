//! # VanityHub Server
//!
//! The HTTP frontend over the package registry. Requests resolve against
//! the registry's longest-prefix lookup; the registry itself is kept
//! fresh by a background watcher on the definition file.
//!
//! ## Example
//! ```no_run
//! use vhub_server::Server;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     Server::builder()
//!         .port(9090)
//!         .build()?
//!         .run()
//!         .await
//! }
//! ```

pub mod router;
pub mod state;
mod views;

use crate::state::AppState;
use anyhow::{Context, Result};
use axum_server::Handle;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};
use vhub_kernel::config::AppConfig;
use vhub_registry::PackageRegistry;
use vhub_registry::watch::watch_packages;

/// A fluent builder for configuring and initializing the [`Server`].
#[must_use = "builders do nothing unless you call .build()"]
#[derive(Debug, Default)]
pub struct ServerBuilder {
    cfg: AppConfig,
}

impl ServerBuilder {
    /// Set up the server's configuration.
    pub fn config(mut self, cfg: AppConfig) -> Self {
        self.cfg = cfg;
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.cfg.server.port = port;
        self
    }

    /// Consumes the builder and initializes the server.
    ///
    /// Performs the initial package list load. Unlike later reloads, a
    /// missing or malformed list is fatal here: the process never starts
    /// serving without a complete package set.
    ///
    /// # Errors
    /// Returns an error if no package file is configured or the initial
    /// load fails.
    pub fn build(self) -> Result<Server> {
        let file = &self.cfg.packages.file;
        if file.as_os_str().is_empty() {
            anyhow::bail!("No package list configured; set packages.file or VHUB__PACKAGES__FILE");
        }

        let registry =
            Arc::new(PackageRegistry::load(file).context("Reading package list failed")?);
        info!(file = %file.display(), packages = registry.len(), "Package list loaded");

        Ok(Server { state: AppState::new(self.cfg, registry) })
    }
}

/// A fully initialized server instance ready to run.
#[must_use = "call .run().await to start the server"]
#[derive(Debug)]
pub struct Server {
    state: AppState,
}

impl Server {
    /// Returns a new [`ServerBuilder`] to configure the server.
    pub fn builder() -> ServerBuilder {
        ServerBuilder::default()
    }

    /// Starts the change watcher and the HTTP listener, then runs until
    /// the shutdown signal is received.
    ///
    /// # Errors
    /// Returns an error if the server fails to bind to the configured
    /// address.
    pub async fn run(self) -> Result<()> {
        let address = SocketAddr::new(self.state.config.server.address, self.state.config.server.port);

        // The watcher keeps the registry fresh for the process lifetime;
        // its failures never take down request serving.
        let watcher = tokio::spawn(watch_packages(Arc::clone(&self.state.registry)));

        let app = router::init(self.state);

        let handle = Handle::<SocketAddr>::new();
        let shutdown_handle = handle.clone();

        tokio::spawn(async move {
            if let Err(e) = shutdown_signal().await {
                error!("Error while waiting for shutdown signal: {e}");
                return;
            }
            info!("Shutdown signal received, starting graceful shutdown...");
            shutdown_handle.graceful_shutdown(Some(std::time::Duration::from_secs(30)));
        });

        info!("Starting HTTP server on http://{address}");
        axum_server::bind(address)
            .handle(handle)
            .serve(app.into_make_service())
            .await
            .context("HTTP server failed")?;

        watcher.abort();
        info!("Server shutdown complete");
        Ok(())
    }
}

/// Listens for shutdown signals (Ctrl+C, SIGTERM).
async fn shutdown_signal() -> Result<()> {
    let ctrl_c = async { signal::ctrl_c().await.context("Failed to install Ctrl+C handler") };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .context("Failed to install SIGTERM handler")?
            .recv()
            .await;
        Ok::<_, anyhow::Error>(())
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<Result<()>>();

    tokio::select! {
        res = ctrl_c => {
            res.context("Ctrl+C signal received")?;
        },
        res = terminate => {
            res.context("SIGTERM signal received")?;
        },
    }

    Ok(())
}
