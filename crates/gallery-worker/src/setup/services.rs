use crate::state::WorkerState;
use anyhow::{Context, Result};
use gallery_core::WorkerConfig;
use gallery_services::{
    create_label_detector, create_repository, create_storage, create_token_provider,
};
use std::sync::Arc;

/// Build the storage, vision and document store clients
///
/// A missing `BUCKET_NAME` does not stop startup; requests fail until it is set.
pub async fn initialize_services(config: WorkerConfig) -> Result<Arc<WorkerState>> {
    let token_provider = create_token_provider(&config.base.gcp)
        .context("Failed to initialize Google Cloud credentials")?;

    let storage = match &config.bucket_name {
        Some(bucket) => Some(
            create_storage(&config.base, bucket)
                .await
                .context("Failed to initialize blob storage")?,
        ),
        None => {
            tracing::warn!("BUCKET_NAME is not set; push messages will be rejected");
            None
        }
    };

    let detector = create_label_detector(&config, token_provider.clone())
        .context("Failed to initialize Vision client")?;

    let repository = create_repository(&config.base, token_provider)
        .context("Failed to initialize document store")?;

    let vision_auth = if config.vision_api_key.is_some() {
        "api-key"
    } else {
        "oauth"
    };
    tracing::info!(
        bucket = ?config.bucket_name,
        storage_backend = ?storage.as_ref().map(|s| s.backend_type()),
        document_store = %repository.backend_type(),
        vision_auth,
        "Services initialized"
    );

    Ok(Arc::new(WorkerState {
        config,
        storage,
        detector,
        repository,
    }))
}
