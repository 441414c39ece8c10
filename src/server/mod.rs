pub mod handler;
pub mod transport;

use crate::{Config, Error, Result};
use rmcp::{service::ServiceExt, transport::stdio};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

pub use handler::{UnsplashServerHandler, SERVER_NAME};

pub struct Server {
    config: Arc<Config>,
    cancellation_token: CancellationToken,
}

impl Server {
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
            cancellation_token: CancellationToken::new(),
        }
    }

    pub async fn run(&self) -> Result<()> {
        info!("Starting MCP server infrastructure");

        let handler = UnsplashServerHandler::new(Arc::clone(&self.config))?;

        transport::StdioStatus::detect().log();

        let shutdown_token = self.cancellation_token.clone();
        tokio::spawn(async move {
            wait_for_signal().await;
            shutdown_token.cancel();
        });

        info!(
            "Unsplash MCP server running on stdio (response format: {})",
            self.config.response_format
        );

        let server_result = tokio::select! {
            result = Self::run_mcp_server(handler) => result,
            () = self.cancellation_token.cancelled() => {
                info!("Shutdown signal received, stopping MCP server");
                Ok(())
            }
        };

        info!("MCP server shutdown complete");
        server_result
    }

    async fn run_mcp_server(handler: UnsplashServerHandler) -> Result<()> {
        let server = handler
            .serve(stdio())
            .await
            .map_err(|e| Error::Service(format!("Failed to start MCP server: {e}")))?;

        let quit_reason = server
            .waiting()
            .await
            .map_err(|e| Error::Service(format!("MCP server error: {e}")))?;

        info!("MCP server completed with reason: {:?}", quit_reason);
        Ok(())
    }

    /// Get the server configuration
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = match signal(SignalKind::terminate()) {
        Ok(sigterm) => sigterm,
        Err(e) => {
            warn!("Failed to install SIGTERM handler: {}", e);
            let _ = tokio::signal::ctrl_c().await;
            return;
        }
    };

    tokio::select! {
        _ = sigterm.recv() => info!("Received SIGTERM, initiating graceful shutdown"),
        _ = tokio::signal::ctrl_c() => info!("Received SIGINT, initiating graceful shutdown"),
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Received Ctrl-C, initiating graceful shutdown");
    }
}
