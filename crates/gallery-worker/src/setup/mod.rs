//! Worker setup and initialization

pub mod routes;
pub mod server;
pub mod services;

use crate::constants::{DEFAULT_LOG_FILTER, SERVICE_NAME};
use crate::state::WorkerState;
use anyhow::Result;
use gallery_core::WorkerConfig;
use std::sync::Arc;

pub async fn initialize_worker(config: WorkerConfig) -> Result<(Arc<WorkerState>, axum::Router)> {
    gallery_infra::init_telemetry(SERVICE_NAME, DEFAULT_LOG_FILTER, config.base.log_format)
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!(
        environment = %config.base.environment,
        project_id = %config.base.gcp.project_id,
        "Configuration loaded"
    );
    gallery_infra::configure_error_details(config.base.is_production());

    let state = services::initialize_services(config).await?;
    let router = routes::setup_routes(state.clone());

    Ok((state, router))
}
