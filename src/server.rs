// ABOUTME: Server lifecycle: explicit registry init, transport selection, graceful shutdown
// ABOUTME: Tears the registry down in reverse registration order when the transport stops
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! # Server Lifecycle
//!
//! Startup is explicit: construct the registry, register the built-in
//! services, build the adapter, then run the configured transport. Shutdown
//! is driven by a [`CancellationToken`] fired on Ctrl-C or SIGTERM.

use std::future::pending;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::config::{ServerConfig, TransportMode};
use crate::errors::{AppError, AppResult};
use crate::mcp::ProtocolAdapter;
use crate::routes;
use crate::services::{builtin, ServiceRegistry};
use crate::transport;

/// A configured proxy ready to run one transport
pub struct ProxyServer {
    adapter: Arc<ProtocolAdapter>,
    shutdown: CancellationToken,
}

impl ProxyServer {
    /// Build the registry with the built-in services and wrap it in an adapter
    ///
    /// # Errors
    ///
    /// Returns an error if a built-in service fails registration
    pub async fn bootstrap(config: ServerConfig) -> AppResult<Self> {
        let registry = Arc::new(ServiceRegistry::new(config.collision_policy));
        registry
            .initialize(builtin::default_services(&registry))
            .await?;
        info!(
            services = registry.service_count().await,
            collision_policy = %registry.policy(),
            "Service registry initialized"
        );
        Ok(Self::from_adapter(Arc::new(ProtocolAdapter::new(
            Arc::new(config),
            registry,
        ))))
    }

    /// Wrap an adapter built elsewhere
    #[must_use]
    pub fn from_adapter(adapter: Arc<ProtocolAdapter>) -> Self {
        Self {
            adapter,
            shutdown: CancellationToken::new(),
        }
    }

    /// The adapter serving requests
    #[must_use]
    pub const fn adapter(&self) -> &Arc<ProtocolAdapter> {
        &self.adapter
    }

    /// Token that stops the running transport when cancelled
    #[must_use]
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Run the configured transport until shutdown, then tear down
    ///
    /// # Errors
    ///
    /// Returns an error if the transport fails to start or stops abnormally
    pub async fn run(self) -> AppResult<()> {
        let watcher = self.shutdown.clone();
        tokio::spawn(async move {
            shutdown_signal().await;
            watcher.cancel();
        });

        let result = match self.adapter.config().transport {
            TransportMode::Http => {
                let address = self.adapter.config().bind_address();
                let listener = TcpListener::bind(&address).await.map_err(|e| {
                    AppError::config(format!("Failed to bind {address}: {e}")).with_source(e)
                })?;
                self.serve_http(listener).await
            }
            TransportMode::Stdio => self.serve_stdio().await,
        };

        self.teardown().await;
        result
    }

    /// Serve HTTP on an already-bound listener until the shutdown token fires
    ///
    /// # Errors
    ///
    /// Returns an error if the server stops abnormally
    pub async fn serve_http(&self, listener: TcpListener) -> AppResult<()> {
        let app = routes::router(Arc::clone(&self.adapter));
        let local = listener
            .local_addr()
            .map_or_else(|_| "unknown".to_owned(), |addr| addr.to_string());
        info!(
            address = %local,
            base_path = %self.adapter.config().base_path,
            "HTTP transport listening"
        );

        let token = self.shutdown.clone();
        axum::serve(listener, app)
            .with_graceful_shutdown(async move { token.cancelled().await })
            .await
            .map_err(|e| AppError::internal(format!("HTTP server error: {e}")).with_source(e))
    }

    /// Serve stdio until input closes or the shutdown token fires
    ///
    /// # Errors
    ///
    /// Returns an error if stdin cannot be read
    pub async fn serve_stdio(&self) -> AppResult<()> {
        tokio::select! {
            result = transport::serve_stdio(Arc::clone(&self.adapter)) => result,
            () = self.shutdown.cancelled() => {
                info!("Stdio transport interrupted");
                Ok(())
            }
        }
    }

    /// Unregister every service in reverse registration order
    pub async fn teardown(&self) {
        let removed = self.adapter.registry().teardown().await;
        info!(services = removed, "Service registry torn down");
    }
}

/// Resolves on Ctrl-C, or SIGTERM on Unix
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl-C");
            pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
                pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl-C, shutting down"),
        () = terminate => info!("Received SIGTERM, shutting down"),
    }
}
