use crate::keys::validate_key;
use crate::traits::{Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use object_store::gcp::{GoogleCloudStorage, GoogleCloudStorageBuilder};
use object_store::path::Path;
use object_store::Error as ObjectStoreError;
use object_store::{Attribute, Attributes, ObjectStore, ObjectStoreExt, PutOptions, PutPayload};

/// Objects in one GCS bucket
///
/// `object_store` resolves credentials itself: service account file from
/// `GOOGLE_APPLICATION_CREDENTIALS`, else the metadata server.
#[derive(Clone)]
pub struct GcsStorage {
    store: GoogleCloudStorage,
    bucket: String,
}

impl GcsStorage {
    pub fn new(bucket: String) -> StorageResult<Self> {
        let store = GoogleCloudStorageBuilder::from_env()
            .with_bucket_name(bucket.clone())
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        Ok(GcsStorage { store, bucket })
    }

    fn object_url(&self, key: &str) -> String {
        format!("gs://{}/{}", self.bucket, key)
    }
}

/// Object location whose name is exactly `key`.
///
/// `Path::parse` keeps characters such as `#`, `%` or `[` as they are, but it drops a
/// leading or trailing `/` and rejects empty segments. Any key it would not keep
/// verbatim is refused.
fn object_path(key: &str) -> StorageResult<Path> {
    validate_key(key)?;
    let path = Path::parse(key)
        .map_err(|e| StorageError::InvalidKey(format!("{}: {}", key, e)))?;
    let stored: &str = path.as_ref();
    if stored != key {
        return Err(StorageError::InvalidKey(format!(
            "{} would be stored as {}",
            key, path
        )));
    }
    Ok(path)
}

#[async_trait]
impl Storage for GcsStorage {
    async fn upload(&self, key: &str, content_type: &str, data: Bytes) -> StorageResult<String> {
        let location = object_path(key)?;
        let start = std::time::Instant::now();
        let size_bytes = data.len();

        let mut attributes = Attributes::new();
        attributes.insert(Attribute::ContentType, content_type.to_string().into());
        let options = PutOptions {
            attributes,
            ..Default::default()
        };

        self.store
            .put_opts(&location, PutPayload::from(data), options)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, bucket = %self.bucket, key = %key, "GCS put failed");
                StorageError::UploadFailed(e.to_string())
            })?;

        tracing::info!(
            bucket = %self.bucket,
            key = %key,
            size_bytes,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Object written to GCS"
        );

        Ok(self.object_url(key))
    }

    async fn download(&self, key: &str) -> StorageResult<Vec<u8>> {
        let location = object_path(key)?;
        let start = std::time::Instant::now();

        let object = match self.store.get(&location).await {
            Ok(object) => object,
            Err(ObjectStoreError::NotFound { .. }) => {
                return Err(StorageError::NotFound(key.to_string()))
            }
            Err(e) => {
                tracing::error!(error = %e, bucket = %self.bucket, key = %key, "GCS get failed");
                return Err(StorageError::DownloadFailed(e.to_string()));
            }
        };

        let data = object
            .bytes()
            .await
            .map_err(|e| StorageError::DownloadFailed(e.to_string()))?;

        tracing::info!(
            bucket = %self.bucket,
            key = %key,
            size_bytes = data.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Object read from GCS"
        );

        Ok(data.to_vec())
    }

    fn bucket(&self) -> &str {
        &self.bucket
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Gcs
    }
}
