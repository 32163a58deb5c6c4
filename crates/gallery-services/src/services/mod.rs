#[cfg(feature = "pubsub")]
pub mod pubsub;
#[cfg(feature = "vision")]
pub mod vision;

#[cfg(feature = "pubsub")]
pub use pubsub::{
    create_publisher, EventPublisher, PubSubPublisher, PublishError, PushRelayPublisher,
};
#[cfg(feature = "vision")]
pub use vision::{
    create_label_detector, GoogleVisionLabelDetector, LabelDetector, VisionCredentials,
    VisionError,
};
