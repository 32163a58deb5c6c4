#[cfg(feature = "storage-gcs")]
use crate::GcsStorage;
#[cfg(feature = "storage-local")]
use crate::LocalStorage;
use crate::{Storage, StorageBackend, StorageError, StorageResult};
use gallery_core::BaseConfig;
use std::sync::Arc;

/// Create a storage backend for `bucket` based on configuration
pub async fn create_storage(config: &BaseConfig, bucket: &str) -> StorageResult<Arc<dyn Storage>> {
    match config.storage_backend {
        #[cfg(feature = "storage-gcs")]
        StorageBackend::Gcs => {
            let storage = GcsStorage::new(bucket.to_string())?;
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-gcs"))]
        StorageBackend::Gcs => Err(StorageError::ConfigError(
            "GCS storage backend not available (storage-gcs feature not enabled)".to_string(),
        )),

        #[cfg(feature = "storage-local")]
        StorageBackend::Local => {
            if config.local_storage_path.is_empty() {
                return Err(StorageError::ConfigError(
                    "LOCAL_STORAGE_PATH not configured".to_string(),
                ));
            }
            let storage = LocalStorage::new(config.local_storage_path.clone(), bucket).await?;
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-local"))]
        StorageBackend::Local => Err(StorageError::ConfigError(
            "Local storage backend not available (storage-local feature not enabled)".to_string(),
        )),
    }
}

#[cfg(all(test, feature = "storage-local"))]
mod tests {
    use super::*;
    use bytes::Bytes;
    use gallery_core::{DocumentStoreBackend, GcpConfig, LogFormat};

    fn local_config(path: &std::path::Path) -> BaseConfig {
        BaseConfig {
            server_port: 0,
            environment: "test".to_string(),
            log_format: LogFormat::Pretty,
            gcp: GcpConfig {
                project_id: "test-project".to_string(),
                access_token: None,
            },
            storage_backend: StorageBackend::Local,
            local_storage_path: path.display().to_string(),
            document_store_backend: DocumentStoreBackend::Memory,
            firestore_database: "(default)".to_string(),
            firestore_emulator_host: None,
        }
    }

    #[tokio::test]
    async fn test_factory_builds_local_backend_for_bucket() {
        let dir = tempfile::tempdir().unwrap();
        let storage = create_storage(&local_config(dir.path()), "gallery")
            .await
            .unwrap();

        assert_eq!(storage.backend_type(), StorageBackend::Local);
        assert_eq!(storage.bucket(), "gallery");

        storage
            .upload("a.jpg", "image/jpeg", Bytes::from_static(b"abc"))
            .await
            .unwrap();
        assert!(dir.path().join("gallery").join("a.jpg").exists());
    }
}
