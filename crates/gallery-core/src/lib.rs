//! Intelli-Gallery Core Library
//!
//! This crate provides the domain models, error types, configuration and constants
//! shared by the upload/query service and the image-processing worker.

pub mod backend_types;
pub mod config;
pub mod constants;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use backend_types::{DocumentStoreBackend, EventBackend, StorageBackend};
pub use config::{ApiConfig, BaseConfig, GcpConfig, LogFormat, WorkerConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
