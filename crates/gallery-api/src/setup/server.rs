//! Server startup and graceful shutdown

use anyhow::{Context, Result};
use axum::Router;
use gallery_core::ApiConfig;
use gallery_infra::shutdown_signal;

/// Start the server with graceful shutdown
pub async fn start_server(config: &ApiConfig, app: Router) -> Result<()> {
    let addr = format!("0.0.0.0:{}", config.base.server_port);
    tracing::info!(addr = %addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!(
        bucket = %config.bucket_name,
        topic = %config.topic_id,
        max_upload_mb = config.max_upload_size_bytes / 1024 / 1024,
        "Server ready and accepting connections"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
