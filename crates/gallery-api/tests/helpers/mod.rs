//! Test helpers: build AppState and router for integration tests.
//!
//! Blobs go to a temporary directory through `LocalStorage`, analyses to the in-memory
//! document store. Publishers and repositories can be swapped for failing fakes.

#![allow(dead_code)]

use async_trait::async_trait;
use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use gallery_api::setup::routes;
use gallery_api::state::AppState;
use gallery_core::models::{ImageAnalysis, NewImageAnalysis, UploadEvent};
use gallery_core::{ApiConfig, DocumentStoreBackend, EventBackend};
use gallery_services::{
    EventPublisher, ImageAnalysisRepository, InMemoryImageAnalysisRepository, LocalStorage,
    PublishError, RepositoryError, Storage, StorageBackend, StorageError, StorageResult,
};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

pub const TEST_BUCKET: &str = "test-bucket";

/// Publisher that records every filename it is asked to announce
#[derive(Default)]
pub struct RecordingPublisher {
    published: Mutex<Vec<String>>,
}

impl RecordingPublisher {
    pub fn published(&self) -> Vec<String> {
        self.published.lock().unwrap().clone()
    }
}

#[async_trait]
impl EventPublisher for RecordingPublisher {
    async fn publish(&self, event: &UploadEvent) -> Result<String, PublishError> {
        let mut published = self.published.lock().unwrap();
        published.push(event.filename.clone());
        Ok(format!("msg-{}", published.len()))
    }

    fn backend_type(&self) -> EventBackend {
        EventBackend::PubSub
    }
}

/// Publisher whose broker is unreachable
pub struct FailingPublisher;

#[async_trait]
impl EventPublisher for FailingPublisher {
    async fn publish(&self, _event: &UploadEvent) -> Result<String, PublishError> {
        Err(PublishError::Request("connection refused".to_string()))
    }

    fn backend_type(&self) -> EventBackend {
        EventBackend::PubSub
    }
}

/// Document store that rejects every call
pub struct FailingRepository;

#[async_trait]
impl ImageAnalysisRepository for FailingRepository {
    async fn insert(&self, _analysis: NewImageAnalysis) -> Result<ImageAnalysis, RepositoryError> {
        Err(RepositoryError::Status {
            status: 503,
            body: "unavailable".to_string(),
        })
    }

    async fn list_newest_first(&self) -> Result<Vec<ImageAnalysis>, RepositoryError> {
        Err(RepositoryError::Status {
            status: 503,
            body: "unavailable".to_string(),
        })
    }

    fn backend_type(&self) -> DocumentStoreBackend {
        DocumentStoreBackend::Firestore
    }
}

/// Blob store whose bucket is unreachable
pub struct FailingStorage;

#[async_trait]
impl Storage for FailingStorage {
    async fn upload(
        &self,
        _key: &str,
        _content_type: &str,
        _data: bytes::Bytes,
    ) -> StorageResult<String> {
        Err(StorageError::UploadFailed("bucket unavailable".to_string()))
    }

    async fn download(&self, key: &str) -> StorageResult<Vec<u8>> {
        Err(StorageError::NotFound(key.to_string()))
    }

    fn bucket(&self) -> &str {
        TEST_BUCKET
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Gcs
    }
}

pub fn test_config(max_upload_mb: usize) -> ApiConfig {
    let max_upload_mb = max_upload_mb.to_string();
    ApiConfig::from_lookup(move |key: &str| match key {
        "BUCKET_NAME" => Some(TEST_BUCKET.to_string()),
        "STORAGE_BACKEND" => Some("local".to_string()),
        "DOCUMENT_STORE_BACKEND" => Some("memory".to_string()),
        "MAX_UPLOAD_SIZE_MB" => Some(max_upload_mb.clone()),
        _ => None,
    })
    .expect("Failed to build test config")
}

/// Test application: server plus handles on the collaborators for assertions.
pub struct TestApp {
    pub server: TestServer,
    pub storage: Arc<LocalStorage>,
    pub _temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }
}

pub async fn setup_test_app_with(
    publisher: Arc<dyn EventPublisher>,
    repository: Arc<dyn ImageAnalysisRepository>,
) -> TestApp {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let storage = Arc::new(
        LocalStorage::new(temp_dir.path(), TEST_BUCKET)
            .await
            .expect("Failed to create local storage"),
    );

    let state = Arc::new(AppState {
        config: test_config(1),
        storage: storage.clone() as Arc<dyn Storage>,
        publisher,
        repository,
    });

    let app = routes::setup_routes(state);
    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp {
        server,
        storage,
        _temp_dir: temp_dir,
    }
}

/// App over an arbitrary blob store and the in-memory document store
pub fn setup_test_app_with_storage(
    storage: Arc<dyn Storage>,
    publisher: Arc<dyn EventPublisher>,
) -> TestServer {
    let state = Arc::new(AppState {
        config: test_config(1),
        storage,
        publisher,
        repository: memory_repository(),
    });

    TestServer::new(routes::setup_routes(state).into_make_service())
        .expect("Failed to create test server")
}

/// Multipart form with one `file` part
pub fn file_form(filename: &str, content: Vec<u8>) -> MultipartForm {
    let part = Part::bytes(bytes::Bytes::from(content))
        .file_name(filename.to_string())
        .mime_type("image/jpeg");
    MultipartForm::new().add_part("file", part)
}

pub fn memory_repository() -> Arc<InMemoryImageAnalysisRepository> {
    Arc::new(InMemoryImageAnalysisRepository::new())
}
