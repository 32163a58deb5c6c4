use std::sync::Arc;

use axum::{extract::State, Json};
use gallery_core::models::GalleryItem;
use gallery_core::AppError;
use gallery_infra::{ErrorResponse, HttpAppError};

use crate::state::AppState;

/// List analysed images, newest first
#[utoipa::path(
    get,
    path = "/gallery",
    tag = "gallery",
    responses(
        (status = 200, description = "Analysed images ordered by created_at descending", body = Vec<GalleryItem>),
        (status = 500, description = "Document store failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "get_gallery"))]
pub async fn get_gallery(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<GalleryItem>>, HttpAppError> {
    let analyses = state
        .repository
        .list_newest_first()
        .await
        .map_err(|e| AppError::GalleryUnavailable(e.to_string()))?;

    tracing::debug!(count = analyses.len(), "Gallery retrieved");

    Ok(Json(analyses.into_iter().map(GalleryItem::from).collect()))
}
