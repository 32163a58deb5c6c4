//! Intelli-Gallery Storage Library
//!
//! Blob store abstraction shared by the upload service (writes) and the worker (reads).
//!
//! # Key format
//!
//! Objects are addressed by the uploaded filename, unchanged, inside a single bucket.
//! Writing an existing key overwrites it. Keys must not be empty, start with `/`, or
//! contain `..` segments; see the `keys` module.

pub mod factory;
pub(crate) mod keys;
#[cfg(feature = "storage-gcs")]
pub mod gcs;
#[cfg(feature = "storage-local")]
pub mod local;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use gallery_core::StorageBackend;
#[cfg(feature = "storage-gcs")]
pub use gcs::GcsStorage;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
pub use traits::{Storage, StorageError, StorageResult};
