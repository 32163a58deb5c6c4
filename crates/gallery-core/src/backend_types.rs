use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// Blob store backend types
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Google Cloud Storage
    Gcs,
    /// Local filesystem, one directory per bucket
    Local,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gcs" => Ok(StorageBackend::Gcs),
            "local" => Ok(StorageBackend::Local),
            _ => Err(anyhow::anyhow!("Invalid storage backend: {}", s)),
        }
    }
}

impl Display for StorageBackend {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            StorageBackend::Gcs => write!(f, "gcs"),
            StorageBackend::Local => write!(f, "local"),
        }
    }
}

/// Document store backend types
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStoreBackend {
    Firestore,
    Memory,
}

impl FromStr for DocumentStoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "firestore" => Ok(DocumentStoreBackend::Firestore),
            "memory" => Ok(DocumentStoreBackend::Memory),
            _ => Err(anyhow::anyhow!("Invalid document store backend: {}", s)),
        }
    }
}

impl Display for DocumentStoreBackend {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            DocumentStoreBackend::Firestore => write!(f, "firestore"),
            DocumentStoreBackend::Memory => write!(f, "memory"),
        }
    }
}

/// How upload events reach the worker
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventBackend {
    /// Publish to a Cloud Pub/Sub topic; the push subscription delivers to the worker.
    PubSub,
    /// POST a push envelope straight to the worker. For local runs without Pub/Sub.
    Push,
}

impl FromStr for EventBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pubsub" => Ok(EventBackend::PubSub),
            "push" => Ok(EventBackend::Push),
            _ => Err(anyhow::anyhow!("Invalid event backend: {}", s)),
        }
    }
}

impl Display for EventBackend {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            EventBackend::PubSub => write!(f, "pubsub"),
            EventBackend::Push => write!(f, "push"),
        }
    }
}
