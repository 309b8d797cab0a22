//! tvrelay service entrypoint

use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tvrelay::config::AppConfig;
use tvrelay::pipeline::Pipeline;
use tvrelay::relay::RelayClient;
use tvrelay::resolver::NameResolver;
use tvrelay::server::{create_router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::load()?;
    info!("🚀 tvrelay starting: {}", config.digest());

    if config.routes.is_empty() {
        tracing::warn!("no routes configured, every alert will be rejected with 404");
    }

    let resolver = NameResolver::new(Duration::from_millis(config.lookup.timeout_ms))?;
    let relay = RelayClient::new(Duration::from_millis(config.relay.timeout_ms))?;

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = Arc::new(AppState {
        config,
        pipeline: Pipeline::new(resolver),
        relay,
    });

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("✅ Listening on http://{}", addr);

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("👋 tvrelay stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to install shutdown handler");
    }
}
