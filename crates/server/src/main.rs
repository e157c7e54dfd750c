mod config;
mod routes;

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use ledgerlens_extract::{AutoDecoder, DocumentDecoder, DocumentPipeline, StatementEngine};

use crate::config::ServerConfig;
use crate::routes::{router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::load().context("loading server config")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_filter)),
        )
        .init();

    let registry = config.build_registry().context("loading bank profiles")?;
    tracing::info!(profiles = registry.len(), "bank profiles loaded");

    let decoder: Arc<dyn DocumentDecoder> = Arc::new(AutoDecoder {
        accept_plain_text: config.accept_plain_text,
    });
    let pipeline = DocumentPipeline::new(decoder, StatementEngine::new(registry));
    let state = Arc::new(AppState::new(pipeline, &config));

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("binding {}", config.bind_addr))?;
    tracing::info!("server listening on {}", config.bind_addr);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {e}");
    }
}
