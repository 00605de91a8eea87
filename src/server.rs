//! Server module for managing HTTP server lifecycle
//!
//! Handles startup logging, per-service configuration validation, address
//! binding, and graceful shutdown.

use tokio::net::TcpListener;
use tokio::signal;

use crate::api::routes::{gateway_router, relay_router};
use crate::config::{Environment, Settings};
use crate::state::{GatewayState, RelayState};

/// Which of the two services a process runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceKind {
    Relay,
    Gateway,
}

impl ServiceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceKind::Relay => "relay",
            ServiceKind::Gateway => "gateway",
        }
    }
}

/// HTTP server manager
pub struct Server {
    settings: Settings,
    kind: ServiceKind,
}

impl Server {
    /// Create a new server for the given service
    pub fn new(settings: Settings, kind: ServiceKind) -> Self {
        Self { settings, kind }
    }

    /// Start the server and run until shutdown signal
    ///
    /// Validates the configuration section of the selected service, builds
    /// its router, binds the listener, and serves until Ctrl+C or SIGTERM.
    pub async fn run(self) -> anyhow::Result<()> {
        tracing::info!(
            app_name = %self.settings.application.name,
            app_version = %self.settings.application.version,
            environment = %Environment::from_env(),
            service = %self.kind.as_str(),
            "Application starting"
        );

        tracing::info!(
            host = %self.settings.server.host,
            port = %self.settings.server.port,
            "Server configuration loaded"
        );

        let router = match self.kind {
            ServiceKind::Relay => {
                self.settings.relay.validate().map_err(|e| {
                    tracing::error!(error = %e, "Relay configuration validation failed");
                    anyhow::anyhow!("relay configuration invalid: {}", e)
                })?;
                tracing::info!(
                    fixed_webhook = %self.settings.relay.webhook_url.is_some(),
                    per_device = %self.settings.relay.base_url.is_some(),
                    timeout_secs = %self.settings.relay.timeout_secs,
                    "Relay configuration loaded"
                );
                relay_router(RelayState::new(self.settings.relay.clone()))
            }
            ServiceKind::Gateway => {
                self.settings.gateway.validate().map_err(|e| {
                    tracing::error!(error = %e, "Gateway configuration validation failed");
                    anyhow::anyhow!("gateway configuration invalid: {}", e)
                })?;
                tracing::info!(
                    search_api_url = %self.settings.gateway.search_api_url,
                    add_api_url = %self.settings.gateway.add_api_url,
                    uses_login = %self.settings.gateway.uses_login(),
                    timeout_secs = %self.settings.gateway.timeout_secs,
                    "Gateway configuration loaded"
                );
                gateway_router(GatewayState::new(self.settings.gateway.clone()))
            }
        };
        tracing::info!("Router configured");

        let address = self.settings.server.address();
        let listener = TcpListener::bind(&address).await.map_err(|e| {
            tracing::error!(error = %e, address = %address, "Failed to bind to address");
            anyhow::anyhow!("Failed to bind to {}: {}", address, e)
        })?;

        tracing::info!(address = %address, "Server listening");

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}

/// Waits for a shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
