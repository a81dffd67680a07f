//! LearnHub - backend-access service
//!
//! Main entry point for the HTTP server.

use anyhow::Context;
use learnhub_api::utils::{init_tracing, LogFormat};
use learnhub_api::{router, AppContext};
use learnhub_domain::constants::ENV_BIND_ADDR;
use learnhub_domain::ServerConfig;
use learnhub_infra::backend::backend_client;
use learnhub_infra::config;
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Read .env before anything inspects the environment
    let dotenv = dotenvy::dotenv();

    init_tracing(LogFormat::from_env()).map_err(|e| anyhow::anyhow!(e))?;

    match dotenv {
        Ok(path) => info!(path = %path.display(), "Loaded .env"),
        Err(e) => debug!(error = %e, "No .env file loaded"),
    }

    let bind = bind_address();

    // Warm up the client so the first diagnostics request has a status
    match backend_client() {
        Ok(client) => {
            tokio::spawn(async move {
                let status = client.check_connection().await;
                info!(online = status.online, "initial connection probe finished");
            });
        }
        Err(e) => warn!(error = %e, "backend client unavailable; diagnostics will answer 503"),
    }

    let listener =
        TcpListener::bind(&bind).await.with_context(|| format!("failed to bind {bind}"))?;
    info!(addr = %listener.local_addr()?, "LearnHub API listening");

    axum::serve(listener, router(AppContext::default()))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("LearnHub API stopped");
    Ok(())
}

/// Listen address from configuration, or from the environment alone when the
/// backend section is not configured yet.
fn bind_address() -> String {
    match config::load() {
        Ok(config) => config.server.bind,
        Err(e) => {
            debug!(error = %e, "using bind address without full configuration");
            std::env::var(ENV_BIND_ADDR)
                .ok()
                .filter(|value| !value.trim().is_empty())
                .unwrap_or_else(|| ServerConfig::default().bind)
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
