//! Fixed names shared by both services.

/// Firestore collection holding one document per analysed image.
pub const IMAGES_COLLECTION: &str = "images";

/// Document field the gallery is ordered by.
pub const CREATED_AT_FIELD: &str = "created_at";

/// Multipart form field carrying the uploaded file.
pub const UPLOAD_FIELD: &str = "file";

pub const DEFAULT_PROJECT_ID: &str = "intelli-gallery-project";
pub const DEFAULT_BUCKET_NAME: &str = "intelli-gallery-uploads-gnu2";
pub const DEFAULT_TOPIC_ID: &str = "image-uploaded";
pub const DEFAULT_FIRESTORE_DATABASE: &str = "(default)";

pub const DEFAULT_API_PORT: u16 = 8080;
pub const DEFAULT_WORKER_PORT: u16 = 8081;
