//! Error types module
//!
//! All failures surfaced by the HTTP services are unified under the `AppError` enum.
//! Backend crates keep their own error types and handlers map them into the variant
//! that matches the operation that failed, so the client sees the operation-level
//! message (e.g. "Error processing image") while the log keeps the backend detail.

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "STORAGE_ERROR")
    fn error_code(&self) -> &'static str;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("No file uploaded")]
    MissingFile,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Invalid push envelope: {0}")]
    InvalidEnvelope(String),

    #[error("Invalid message payload: {0}")]
    InvalidPayload(String),

    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Failed to publish upload notification: {0}")]
    NotificationFailed(String),

    #[error("Failed to query gallery: {0}")]
    GalleryUnavailable(String),

    #[error("Error processing image {filename}: {message}")]
    ProcessingFailed { filename: String, message: String },

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Static metadata for each variant: (http_status, error_code, log_level).
fn app_error_static_metadata(err: &AppError) -> (u16, &'static str, LogLevel) {
    match err {
        AppError::MissingFile => (400, "MISSING_FILE", LogLevel::Debug),
        AppError::InvalidInput(_) => (400, "INVALID_INPUT", LogLevel::Debug),
        AppError::PayloadTooLarge(_) => (413, "PAYLOAD_TOO_LARGE", LogLevel::Debug),
        AppError::InvalidEnvelope(_) => (400, "INVALID_ENVELOPE", LogLevel::Warn),
        AppError::InvalidPayload(_) => (400, "INVALID_PAYLOAD", LogLevel::Warn),
        AppError::UploadFailed(_) => (500, "STORAGE_ERROR", LogLevel::Error),
        AppError::NotificationFailed(_) => (500, "NOTIFICATION_FAILED", LogLevel::Error),
        AppError::GalleryUnavailable(_) => (500, "DATABASE_ERROR", LogLevel::Error),
        AppError::ProcessingFailed { .. } => (500, "PROCESSING_ERROR", LogLevel::Error),
        AppError::Configuration(_) => (500, "CONFIGURATION_ERROR", LogLevel::Error),
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn client_message(&self) -> String {
        match self {
            AppError::MissingFile => "No file uploaded.".to_string(),
            AppError::InvalidInput(msg) => msg.clone(),
            AppError::PayloadTooLarge(msg) => msg.clone(),
            AppError::InvalidEnvelope(_) => "Invalid Pub/Sub message format".to_string(),
            AppError::InvalidPayload(_) => "Error decoding message".to_string(),
            AppError::UploadFailed(_) => "Error uploading file.".to_string(),
            AppError::NotificationFailed(_) => {
                "File uploaded, but failed to publish notification.".to_string()
            }
            AppError::GalleryUnavailable(_) => "Error retrieving gallery data.".to_string(),
            AppError::ProcessingFailed { .. } => "Error processing image".to_string(),
            AppError::Configuration(_) => "Configuration error".to_string(),
        }
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).2
    }
}

impl AppError {
    /// Short variant name used as a structured log field.
    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::MissingFile => "MissingFile",
            AppError::InvalidInput(_) => "InvalidInput",
            AppError::PayloadTooLarge(_) => "PayloadTooLarge",
            AppError::InvalidEnvelope(_) => "InvalidEnvelope",
            AppError::InvalidPayload(_) => "InvalidPayload",
            AppError::UploadFailed(_) => "UploadFailed",
            AppError::NotificationFailed(_) => "NotificationFailed",
            AppError::GalleryUnavailable(_) => "GalleryUnavailable",
            AppError::ProcessingFailed { .. } => "ProcessingFailed",
            AppError::Configuration(_) => "Configuration",
        }
    }
}
