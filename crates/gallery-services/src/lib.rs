//! Intelli-Gallery Services Layer
//!
//! Clients for the managed services the pipeline delegates to (Pub/Sub for upload
//! notifications, Cloud Vision for label detection), plus re-exports of the blob
//! store and document store so the HTTP crates depend on a single facade.

pub mod services;

pub use gallery_db::{
    create_repository, ImageAnalysisRepository, InMemoryImageAnalysisRepository,
    RepositoryError,
};
pub use gallery_infra::{create_token_provider, TokenProvider};
#[cfg(feature = "pubsub")]
pub use services::{
    create_publisher, EventPublisher, PubSubPublisher, PublishError, PushRelayPublisher,
};
#[cfg(feature = "vision")]
pub use services::{
    create_label_detector, GoogleVisionLabelDetector, LabelDetector, VisionCredentials,
    VisionError,
};
pub use gallery_storage::{
    create_storage, LocalStorage, Storage, StorageBackend, StorageError, StorageResult,
};
