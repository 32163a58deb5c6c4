use anyhow::{Context, Result};
use axum::Router;
use gallery_core::WorkerConfig;
use gallery_infra::shutdown_signal;

pub async fn start_server(config: &WorkerConfig, app: Router) -> Result<()> {
    let addr = format!("0.0.0.0:{}", config.base.server_port);
    tracing::info!(addr = %addr, "Starting worker");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("Worker ready to receive push messages");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
