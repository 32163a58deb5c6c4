pub mod analysis;
pub mod event;

pub use analysis::{GalleryItem, ImageAnalysis, NewImageAnalysis};
pub use event::{EventDecodeError, PushEnvelope, PushMessage, UploadEvent};
