//! Configuration module
//!
//! Both services read their settings from the process environment (a `.env` file is
//! honoured). Every `from_env` constructor delegates to a `from_lookup` variant that
//! takes the variable source as a closure, so configuration parsing can be exercised
//! without touching the real environment.

use std::env;

use crate::backend_types::{DocumentStoreBackend, EventBackend, StorageBackend};
use crate::constants::{
    DEFAULT_API_PORT, DEFAULT_BUCKET_NAME, DEFAULT_FIRESTORE_DATABASE, DEFAULT_PROJECT_ID,
    DEFAULT_TOPIC_ID, DEFAULT_WORKER_PORT,
};

const MAX_UPLOAD_SIZE_MB: usize = 32;
const VISION_MAX_RESULTS: u32 = 50;
const LOCAL_STORAGE_PATH: &str = "./data/blobs";

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(anyhow::anyhow!("Invalid log format: {}", s)),
        }
    }
}

/// Google Cloud project and credentials
#[derive(Clone, Debug)]
pub struct GcpConfig {
    pub project_id: String,
    /// Pre-issued OAuth access token. When unset the metadata server is used.
    pub access_token: Option<String>,
}

/// Base configuration shared by both services
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub environment: String,
    pub log_format: LogFormat,
    pub gcp: GcpConfig,
    pub storage_backend: StorageBackend,
    pub local_storage_path: String,
    pub document_store_backend: DocumentStoreBackend,
    pub firestore_database: String,
    pub firestore_emulator_host: Option<String>,
}

/// Upload-and-query service configuration
#[derive(Clone, Debug)]
pub struct ApiConfig {
    pub base: BaseConfig,
    pub bucket_name: String,
    pub topic_id: String,
    pub event_backend: EventBackend,
    /// Worker endpoint used by the `push` event backend.
    pub worker_push_url: Option<String>,
    pub pubsub_emulator_host: Option<String>,
    pub max_upload_size_bytes: usize,
}

/// Image-processing worker configuration
#[derive(Clone, Debug)]
pub struct WorkerConfig {
    pub base: BaseConfig,
    /// Bucket holding uploaded images. Absence is reported per request, not at startup.
    pub bucket_name: Option<String>,
    pub vision_api_key: Option<String>,
    pub vision_max_results: u32,
}

/// Read a variable, treating empty values as unset.
fn lookup_var<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> Result<T, anyhow::Error>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup_var(lookup, key) {
        Some(raw) => raw
            .parse::<T>()
            .map_err(|_| anyhow::anyhow!("{} has an invalid value: {}", key, raw)),
        None => Ok(default),
    }
}

impl BaseConfig {
    pub fn from_lookup<F>(lookup: &F, default_port: u16) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup_var(lookup, "ENVIRONMENT")
            .or_else(|| lookup_var(lookup, "APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let project_id = lookup_var(lookup, "GCP_PROJECT_ID")
            .or_else(|| lookup_var(lookup, "GOOGLE_CLOUD_PROJECT"))
            .unwrap_or_else(|| DEFAULT_PROJECT_ID.to_string());

        Ok(BaseConfig {
            server_port: lookup_var(lookup, "PORT")
                .map(|p| p.parse::<u16>())
                .transpose()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?
                .unwrap_or(default_port),
            environment,
            log_format: parse_var(lookup, "LOG_FORMAT", LogFormat::Pretty)?,
            gcp: GcpConfig {
                project_id,
                access_token: lookup_var(lookup, "GOOGLE_OAUTH_ACCESS_TOKEN"),
            },
            storage_backend: parse_var(lookup, "STORAGE_BACKEND", StorageBackend::Gcs)?,
            local_storage_path: lookup_var(lookup, "LOCAL_STORAGE_PATH")
                .unwrap_or_else(|| LOCAL_STORAGE_PATH.to_string()),
            document_store_backend: parse_var(
                lookup,
                "DOCUMENT_STORE_BACKEND",
                DocumentStoreBackend::Firestore,
            )?,
            firestore_database: lookup_var(lookup, "FIRESTORE_DATABASE")
                .unwrap_or_else(|| DEFAULT_FIRESTORE_DATABASE.to_string()),
            firestore_emulator_host: lookup_var(lookup, "FIRESTORE_EMULATOR_HOST"),
        })
    }

    /// Check if the service is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base = BaseConfig::from_lookup(&lookup, DEFAULT_API_PORT)?;
        let event_backend = parse_var(&lookup, "EVENT_BACKEND", EventBackend::PubSub)?;
        let worker_push_url = lookup_var(&lookup, "WORKER_PUSH_URL");

        if event_backend == EventBackend::Push && worker_push_url.is_none() {
            return Err(anyhow::anyhow!(
                "WORKER_PUSH_URL must be set when EVENT_BACKEND=push"
            ));
        }

        let max_upload_size_mb: usize =
            parse_var(&lookup, "MAX_UPLOAD_SIZE_MB", MAX_UPLOAD_SIZE_MB)?;

        Ok(ApiConfig {
            base,
            bucket_name: lookup_var(&lookup, "BUCKET_NAME")
                .unwrap_or_else(|| DEFAULT_BUCKET_NAME.to_string()),
            topic_id: lookup_var(&lookup, "TOPIC_ID")
                .unwrap_or_else(|| DEFAULT_TOPIC_ID.to_string()),
            event_backend,
            worker_push_url,
            pubsub_emulator_host: lookup_var(&lookup, "PUBSUB_EMULATOR_HOST"),
            max_upload_size_bytes: max_upload_size_mb * 1024 * 1024,
        })
    }
}

impl WorkerConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base = BaseConfig::from_lookup(&lookup, DEFAULT_WORKER_PORT)?;

        Ok(WorkerConfig {
            base,
            bucket_name: lookup_var(&lookup, "BUCKET_NAME"),
            vision_api_key: lookup_var(&lookup, "VISION_API_KEY"),
            vision_max_results: parse_var(&lookup, "VISION_MAX_RESULTS", VISION_MAX_RESULTS)?,
        })
    }
}
