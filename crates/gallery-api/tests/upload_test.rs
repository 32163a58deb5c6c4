mod helpers;

use axum_test::multipart::{MultipartForm, Part};
use gallery_services::Storage;
use helpers::{FailingPublisher, FailingStorage, RecordingPublisher};
use serde_json::Value;
use std::sync::Arc;

#[tokio::test]
async fn test_upload_stores_file_and_publishes_filename() {
    let publisher = Arc::new(RecordingPublisher::default());
    let app = helpers::setup_test_app_with(publisher.clone(), helpers::memory_repository()).await;
    let client = app.client();

    let response = client
        .post("/upload")
        .multipart(helpers::file_form("cat.jpg", b"fake jpeg bytes".to_vec()))
        .await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(response.text(), "File cat.jpg uploaded and notification sent.");

    let stored = app.storage.download("cat.jpg").await.unwrap();
    assert_eq!(stored, b"fake jpeg bytes");
    assert_eq!(publisher.published(), vec!["cat.jpg"]);
}

#[tokio::test]
async fn test_upload_replaces_file_with_same_name() {
    let publisher = Arc::new(RecordingPublisher::default());
    let app = helpers::setup_test_app_with(publisher.clone(), helpers::memory_repository()).await;
    let client = app.client();

    for content in [b"first".to_vec(), b"second".to_vec()] {
        let response = client
            .post("/upload")
            .multipart(helpers::file_form("cat.jpg", content))
            .await;
        assert_eq!(response.status_code(), 200);
    }

    let stored = app.storage.download("cat.jpg").await.unwrap();
    assert_eq!(stored, b"second");
    assert_eq!(publisher.published(), vec!["cat.jpg", "cat.jpg"]);
}

#[tokio::test]
async fn test_upload_without_file_field() {
    let publisher = Arc::new(RecordingPublisher::default());
    let app = helpers::setup_test_app_with(publisher.clone(), helpers::memory_repository()).await;

    let form = MultipartForm::new().add_text("note", "no file here");
    let response = app.client().post("/upload").multipart(form).await;

    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert_eq!(body["error"], "No file uploaded.");
    assert_eq!(body["code"], "MISSING_FILE");
    assert!(publisher.published().is_empty());
}

#[tokio::test]
async fn test_upload_part_without_filename() {
    let publisher = Arc::new(RecordingPublisher::default());
    let app = helpers::setup_test_app_with(publisher.clone(), helpers::memory_repository()).await;

    let part = Part::bytes(b"data".to_vec()).mime_type("image/jpeg");
    let form = MultipartForm::new().add_part("file", part);
    let response = app.client().post("/upload").multipart(form).await;

    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert_eq!(body["code"], "MISSING_FILE");
    assert!(publisher.published().is_empty());
}

#[tokio::test]
async fn test_upload_not_multipart() {
    let publisher = Arc::new(RecordingPublisher::default());
    let app = helpers::setup_test_app_with(publisher.clone(), helpers::memory_repository()).await;

    let response = app.client().post("/upload").text("just text").await;

    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert_eq!(body["error"], "No file uploaded.");
    assert!(publisher.published().is_empty());
}

#[tokio::test]
async fn test_upload_empty_file_rejected() {
    let publisher = Arc::new(RecordingPublisher::default());
    let app = helpers::setup_test_app_with(publisher.clone(), helpers::memory_repository()).await;

    let response = app
        .client()
        .post("/upload")
        .multipart(helpers::file_form("empty.jpg", Vec::new()))
        .await;

    assert_eq!(response.status_code(), 400);
    assert!(publisher.published().is_empty());
    assert!(app.storage.download("empty.jpg").await.is_err());
}

#[tokio::test]
async fn test_upload_over_size_limit() {
    let publisher = Arc::new(RecordingPublisher::default());
    let app = helpers::setup_test_app_with(publisher.clone(), helpers::memory_repository()).await;

    // The test app accepts at most 1 MB.
    let response = app
        .client()
        .post("/upload")
        .multipart(helpers::file_form("big.jpg", vec![0u8; 2 * 1024 * 1024]))
        .await;

    assert_eq!(response.status_code(), 413);
    assert!(publisher.published().is_empty());
}

#[tokio::test]
async fn test_upload_kept_when_publish_fails() {
    let app =
        helpers::setup_test_app_with(Arc::new(FailingPublisher), helpers::memory_repository())
            .await;

    let response = app
        .client()
        .post("/upload")
        .multipart(helpers::file_form("dog.png", b"png".to_vec()))
        .await;

    assert_eq!(response.status_code(), 500);
    let body: Value = response.json();
    assert_eq!(
        body["error"],
        "File uploaded, but failed to publish notification."
    );
    assert_eq!(body["code"], "NOTIFICATION_FAILED");

    let stored = app.storage.download("dog.png").await.unwrap();
    assert_eq!(stored, b"png");
}

#[tokio::test]
async fn test_upload_with_unsafe_filename() {
    let publisher = Arc::new(RecordingPublisher::default());
    let app = helpers::setup_test_app_with(publisher.clone(), helpers::memory_repository()).await;

    for filename in ["../escape.jpg", "/etc/cat.jpg"] {
        let response = app
            .client()
            .post("/upload")
            .multipart(helpers::file_form(filename, b"jpeg".to_vec()))
            .await;

        assert_eq!(response.status_code(), 400, "{}", filename);
        let body: Value = response.json();
        assert_eq!(body["code"], "INVALID_INPUT");
    }

    assert!(publisher.published().is_empty());
    let parent = app._temp_dir.path();
    assert!(!parent.join("escape.jpg").exists());
}

#[tokio::test]
async fn test_upload_when_blob_store_fails() {
    let publisher = Arc::new(RecordingPublisher::default());
    let server = helpers::setup_test_app_with_storage(Arc::new(FailingStorage), publisher.clone());

    let response = server
        .post("/upload")
        .multipart(helpers::file_form("cat.jpg", b"jpeg".to_vec()))
        .await;

    assert_eq!(response.status_code(), 500);
    let body: Value = response.json();
    assert_eq!(body["error"], "Error uploading file.");
    assert_eq!(body["code"], "STORAGE_ERROR");
    assert!(publisher.published().is_empty());
}
