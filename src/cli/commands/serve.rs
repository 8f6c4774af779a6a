use std::sync::Arc;

use anyhow::Context;

use crate::config::AppConfig;
use crate::database::{ForumStore, MemoryStore, PgStore};
use crate::AppState;

pub async fn handle(config: AppConfig, port: Option<u16>, in_memory: bool) -> anyhow::Result<()> {
    tracing::info!("Starting forum API in {:?} mode", config.environment);

    let store: Arc<dyn ForumStore> = if in_memory {
        tracing::warn!("Using in-memory store; data will not survive a restart");
        Arc::new(MemoryStore::new())
    } else {
        let store = PgStore::connect(&config.database)
            .await
            .context("failed to connect to database")?;
        store
            .bootstrap()
            .await
            .context("failed to create schema")?;
        Arc::new(store)
    };

    let state = AppState::new(store, &config);
    let app = crate::app(state, &config.security.cors_origins);

    let port = port.unwrap_or(config.server.port);
    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Forum API listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
