use async_trait::async_trait;
use gallery_core::models::{ImageAnalysis, NewImageAnalysis};
use gallery_core::DocumentStoreBackend;
use gallery_infra::AuthError;

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Document store request failed: {0}")]
    Request(String),

    #[error("Document store returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed document: {0}")]
    Decode(String),

    #[error("Authentication failed: {0}")]
    Auth(#[from] AuthError),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Persistence for label-detection results
#[async_trait]
pub trait ImageAnalysisRepository: Send + Sync {
    /// Store a new analysis and return it with the id assigned by the store.
    async fn insert(&self, analysis: NewImageAnalysis) -> Result<ImageAnalysis, RepositoryError>;

    /// Every analysis, ordered by `created_at` descending.
    async fn list_newest_first(&self) -> Result<Vec<ImageAnalysis>, RepositoryError>;

    fn backend_type(&self) -> DocumentStoreBackend;
}
