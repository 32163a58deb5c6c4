//! Application state shared by all handlers.

use gallery_core::ApiConfig;
use gallery_services::{EventPublisher, ImageAnalysisRepository, Storage};
use std::sync::Arc;

/// Client handles are built once at startup and never mutated.
pub struct AppState {
    pub config: ApiConfig,
    /// Bound to `config.bucket_name`
    pub storage: Arc<dyn Storage>,
    pub publisher: Arc<dyn EventPublisher>,
    pub repository: Arc<dyn ImageAnalysisRepository>,
}
