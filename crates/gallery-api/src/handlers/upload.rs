use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::StatusCode,
};
use bytes::Bytes;
use gallery_core::constants::UPLOAD_FIELD;
use gallery_core::models::UploadEvent;
use gallery_core::AppError;
use gallery_infra::{ErrorResponse, HttpAppError};
use gallery_services::StorageError;

use crate::state::AppState;

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// The `file` part of an upload form
#[derive(Debug)]
pub(crate) struct UploadedFile {
    pub filename: String,
    pub content_type: String,
    pub data: Bytes,
}

/// Read the first `file` field. Other fields are ignored.
pub(crate) async fn extract_upload(
    mut multipart: Multipart,
    max_size_bytes: usize,
) -> Result<UploadedFile, AppError> {
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge(format!(
                "File exceeds maximum upload size of {} MB",
                max_size_bytes / 1024 / 1024
            ))
        } else {
            AppError::InvalidInput(format!("Failed to read multipart: {}", e))
        }
    })? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let filename = field.file_name().map(str::to_string).unwrap_or_default();
        if filename.is_empty() {
            return Err(AppError::MissingFile);
        }
        let content_type = field
            .content_type()
            .map(str::to_string)
            .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());

        let data = field.bytes().await.map_err(|e| {
            if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
                AppError::PayloadTooLarge(format!(
                    "File exceeds maximum upload size of {} MB",
                    max_size_bytes / 1024 / 1024
                ))
            } else {
                AppError::InvalidInput(format!("Failed to read file data: {}", e))
            }
        })?;

        if data.is_empty() {
            return Err(AppError::InvalidInput("Uploaded file is empty.".to_string()));
        }

        return Ok(UploadedFile {
            filename,
            content_type,
            data,
        });
    }

    Err(AppError::MissingFile)
}

/// Upload a file and notify the processing worker
///
/// The file is stored under its original name, replacing any earlier upload with the
/// same name. The stored file is kept even when the notification fails.
#[utoipa::path(
    post,
    path = "/upload",
    tag = "gallery",
    request_body(content = inline(Object), content_type = "multipart/form-data", description = "Form with a single `file` part"),
    responses(
        (status = 200, description = "File stored and notification published", body = String, content_type = "text/plain"),
        (status = 400, description = "No file, empty file or invalid filename", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 500, description = "Storage or notification failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(operation = "upload_file"))]
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<String, HttpAppError> {
    // A request that is not multipart at all carries no file either.
    let multipart = multipart.map_err(|_| AppError::MissingFile)?;
    let upload = extract_upload(multipart, state.config.max_upload_size_bytes).await?;
    let filename = upload.filename;
    let size_bytes = upload.data.len();

    state
        .storage
        .upload(&filename, &upload.content_type, upload.data)
        .await
        .map_err(|e| match e {
            StorageError::InvalidKey(msg) => {
                AppError::InvalidInput(format!("Invalid filename: {}", msg))
            }
            other => AppError::UploadFailed(format!("{}: {}", filename, other)),
        })?;

    let message_id = state
        .publisher
        .publish(&UploadEvent::new(filename.clone()))
        .await
        .map_err(|e| AppError::NotificationFailed(format!("{}: {}", filename, e)))?;

    tracing::info!(
        filename = %filename,
        size_bytes,
        message_id = %message_id,
        "File uploaded and notification sent"
    );

    Ok(format!("File {} uploaded and notification sent.", filename))
}
