use crate::state::AppState;
use anyhow::{Context, Result};
use gallery_core::ApiConfig;
use gallery_services::{
    create_publisher, create_repository, create_storage, create_token_provider,
};
use std::sync::Arc;

/// Build the storage, document store and publisher clients
pub async fn initialize_services(config: ApiConfig) -> Result<Arc<AppState>> {
    let token_provider = create_token_provider(&config.base.gcp)
        .context("Failed to initialize Google Cloud credentials")?;

    let storage = create_storage(&config.base, &config.bucket_name)
        .await
        .context("Failed to initialize blob storage")?;

    let repository = create_repository(&config.base, token_provider.clone())
        .context("Failed to initialize document store")?;

    let publisher = create_publisher(&config, token_provider)
        .context("Failed to initialize event publisher")?;

    tracing::info!(
        bucket = %config.bucket_name,
        storage_backend = %storage.backend_type(),
        document_store = %repository.backend_type(),
        event_backend = %publisher.backend_type(),
        "Services initialized"
    );

    Ok(Arc::new(AppState {
        config,
        storage,
        publisher,
        repository,
    }))
}
