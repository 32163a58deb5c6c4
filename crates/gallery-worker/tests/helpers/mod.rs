//! Test helpers: worker state over a temporary blob directory and the in-memory
//! document store, with a scripted label detector.

#![allow(dead_code)]

use async_trait::async_trait;
use axum_test::TestServer;
use gallery_core::models::{ImageAnalysis, NewImageAnalysis, PushEnvelope, UploadEvent};
use gallery_core::{DocumentStoreBackend, WorkerConfig};
use gallery_services::{
    ImageAnalysisRepository, InMemoryImageAnalysisRepository, LabelDetector, LocalStorage,
    RepositoryError, Storage, VisionError,
};
use gallery_worker::setup::routes;
use gallery_worker::WorkerState;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

pub const TEST_BUCKET: &str = "test-bucket";

/// Detector that returns a fixed label list and counts its calls
pub struct StaticDetector {
    labels: Vec<String>,
    calls: AtomicUsize,
}

impl StaticDetector {
    pub fn new(labels: &[&str]) -> Self {
        Self {
            labels: labels.iter().map(|l| l.to_string()).collect(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LabelDetector for StaticDetector {
    async fn detect_labels(&self, _image_data: Vec<u8>) -> Result<Vec<String>, VisionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.labels.clone())
    }
}

/// Detector whose API is down
pub struct FailingDetector;

#[async_trait]
impl LabelDetector for FailingDetector {
    async fn detect_labels(&self, _image_data: Vec<u8>) -> Result<Vec<String>, VisionError> {
        Err(VisionError::Status {
            status: 503,
            body: "backend unavailable".to_string(),
        })
    }
}

/// Document store that rejects writes
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
        Ok(Vec::new())
    }

    fn backend_type(&self) -> DocumentStoreBackend {
        DocumentStoreBackend::Firestore
    }
}

pub fn test_config(bucket: Option<&str>) -> WorkerConfig {
    let bucket = bucket.map(str::to_string);
    WorkerConfig::from_lookup(move |key: &str| match key {
        "BUCKET_NAME" => bucket.clone(),
        "STORAGE_BACKEND" => Some("local".to_string()),
        "DOCUMENT_STORE_BACKEND" => Some("memory".to_string()),
        _ => None,
    })
    .expect("Failed to build test config")
}

pub struct TestWorker {
    pub server: TestServer,
    pub storage: Arc<LocalStorage>,
    pub repository: Arc<InMemoryImageAnalysisRepository>,
    pub _temp_dir: TempDir,
}

impl TestWorker {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    pub async fn put_blob(&self, filename: &str, content: &[u8]) {
        self.storage
            .upload(filename, "image/jpeg", bytes::Bytes::copy_from_slice(content))
            .await
            .expect("Failed to seed blob");
    }
}

/// Build the worker state; `bucket_configured = false` mimics a missing `BUCKET_NAME`.
pub async fn build_state(
    detector: Arc<dyn LabelDetector>,
    bucket_configured: bool,
) -> (Arc<WorkerState>, Arc<LocalStorage>, Arc<InMemoryImageAnalysisRepository>, TempDir) {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let storage = Arc::new(
        LocalStorage::new(temp_dir.path(), TEST_BUCKET)
            .await
            .expect("Failed to create local storage"),
    );
    let repository = Arc::new(InMemoryImageAnalysisRepository::new());

    let state = Arc::new(WorkerState {
        config: test_config(bucket_configured.then_some(TEST_BUCKET)),
        storage: bucket_configured.then(|| storage.clone() as Arc<dyn Storage>),
        detector,
        repository: repository.clone() as Arc<dyn ImageAnalysisRepository>,
    });

    (state, storage, repository, temp_dir)
}

pub async fn setup_test_worker_with(
    detector: Arc<dyn LabelDetector>,
    bucket_configured: bool,
) -> TestWorker {
    let (state, storage, repository, temp_dir) = build_state(detector, bucket_configured).await;
    let server = TestServer::new(routes::setup_routes(state).into_make_service())
        .expect("Failed to create test server");

    TestWorker {
        server,
        storage,
        repository,
        _temp_dir: temp_dir,
    }
}

/// Worker over the given document store; blobs are seeded through the returned storage.
pub async fn setup_test_worker_with_repository(
    detector: Arc<dyn LabelDetector>,
    repository: Arc<dyn ImageAnalysisRepository>,
) -> (TestServer, Arc<LocalStorage>, TempDir) {
    let (state, storage, _memory, temp_dir) = build_state(detector, true).await;
    let state = Arc::new(WorkerState {
        config: test_config(Some(TEST_BUCKET)),
        storage: state.storage.clone(),
        detector: state.detector.clone(),
        repository,
    });
    let server = TestServer::new(routes::setup_routes(state).into_make_service())
        .expect("Failed to create test server");

    (server, storage, temp_dir)
}

/// Envelope a push subscription would deliver for `filename`
pub fn push_envelope(filename: &str) -> PushEnvelope {
    PushEnvelope::for_event(&UploadEvent::new(filename), "1234567890")
}
