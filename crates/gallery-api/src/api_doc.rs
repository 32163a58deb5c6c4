//! OpenAPI documentation, served at `/api/openapi.json`.

use utoipa::OpenApi;

use crate::handlers;
use gallery_core::models::GalleryItem;
use gallery_infra::ErrorResponse;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Intelli-Gallery API",
        version = "0.1.0",
        description = "Upload images for label detection and browse the analysed gallery."
    ),
    paths(
        handlers::upload::upload_file,
        handlers::gallery::get_gallery,
        handlers::health::health_check,
    ),
    components(schemas(GalleryItem, ErrorResponse, handlers::health::HealthResponse)),
    tags(
        (name = "gallery", description = "Uploads and analysed images"),
        (name = "health", description = "Liveness check")
    )
)]
pub struct ApiDoc;
