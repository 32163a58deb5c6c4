//! Intelli-Gallery document store
//!
//! Analysis results live in the `images` collection, one document per processed
//! upload. The worker inserts, the upload service lists newest first.

pub mod factory;
#[cfg(feature = "firestore")]
pub mod firestore;
pub mod memory;
pub mod repository;

pub use factory::create_repository;
#[cfg(feature = "firestore")]
pub use firestore::FirestoreImageAnalysisRepository;
pub use memory::InMemoryImageAnalysisRepository;
pub use repository::{ImageAnalysisRepository, RepositoryError};
