#[cfg(feature = "firestore")]
use crate::firestore::{FirestoreImageAnalysisRepository, FIRESTORE_BASE_URL};
use crate::memory::InMemoryImageAnalysisRepository;
use crate::repository::{ImageAnalysisRepository, RepositoryError};
use gallery_core::{BaseConfig, DocumentStoreBackend};
use gallery_infra::TokenProvider;
use std::sync::Arc;

/// Create the document store selected by `DOCUMENT_STORE_BACKEND`
///
/// With `FIRESTORE_EMULATOR_HOST` set, requests go to the emulator unauthenticated.
pub fn create_repository(
    config: &BaseConfig,
    token_provider: Arc<dyn TokenProvider>,
) -> Result<Arc<dyn ImageAnalysisRepository>, RepositoryError> {
    match config.document_store_backend {
        #[cfg(feature = "firestore")]
        DocumentStoreBackend::Firestore => {
            let (base_url, token_provider) = match &config.firestore_emulator_host {
                Some(host) => {
                    tracing::info!(emulator_host = %host, "Using Firestore emulator");
                    (format!("http://{}", host), None)
                }
                None => (FIRESTORE_BASE_URL.to_string(), Some(token_provider)),
            };

            tracing::info!(
                project_id = %config.gcp.project_id,
                database = %config.firestore_database,
                "Initializing Firestore document store"
            );

            let repository = FirestoreImageAnalysisRepository::new(
                base_url,
                config.gcp.project_id.clone(),
                config.firestore_database.clone(),
                token_provider,
            )?;
            Ok(Arc::new(repository))
        }

        #[cfg(not(feature = "firestore"))]
        DocumentStoreBackend::Firestore => {
            let _ = token_provider;
            Err(RepositoryError::Config(
                "Firestore backend not available (firestore feature not enabled)".to_string(),
            ))
        }

        DocumentStoreBackend::Memory => {
            tracing::warn!("Using in-memory document store; results are lost on restart");
            Ok(Arc::new(InMemoryImageAnalysisRepository::new()))
        }
    }
}
