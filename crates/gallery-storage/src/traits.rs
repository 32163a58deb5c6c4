//! Blob store seam shared by the GCS and local-disk backends.

use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// A backend is bound to one bucket at construction. Keys are filenames; an upload to
/// an existing key replaces its content.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Write `data` under `key`, replacing any previous object. Returns the object URL.
    async fn upload(&self, key: &str, content_type: &str, data: Bytes) -> StorageResult<String>;

    /// Read the full content stored under `key`.
    async fn download(&self, key: &str) -> StorageResult<Vec<u8>>;

    /// Bucket this backend reads and writes.
    fn bucket(&self) -> &str;

    fn backend_type(&self) -> StorageBackend;
}
