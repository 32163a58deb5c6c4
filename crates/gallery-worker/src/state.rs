use gallery_core::WorkerConfig;
use gallery_services::{ImageAnalysisRepository, LabelDetector, Storage};
use std::sync::Arc;

pub struct WorkerState {
    pub config: WorkerConfig,
    /// `None` when `BUCKET_NAME` is unset; every push is then rejected.
    pub storage: Option<Arc<dyn Storage>>,
    pub detector: Arc<dyn LabelDetector>,
    pub repository: Arc<dyn ImageAnalysisRepository>,
}
