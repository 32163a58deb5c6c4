//! Push subscription endpoint.
//!
//! A 2xx response acknowledges the message. Any 5xx makes the subscription
//! redeliver it, so downstream failures are reported as 500 and client-side
//! problems with the envelope as 400.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode};
use bytes::Bytes;
use gallery_core::models::{NewImageAnalysis, PushEnvelope};
use gallery_core::AppError;
use gallery_infra::HttpAppError;

use crate::state::WorkerState;

/// Parse a push request body. The body must be a JSON object with a `message` key.
pub(crate) fn parse_envelope(body: &[u8]) -> Result<PushEnvelope, AppError> {
    let value: serde_json::Value = serde_json::from_slice(body)
        .map_err(|e| AppError::InvalidEnvelope(format!("body is not JSON: {}", e)))?;

    if value.get("message").is_none() {
        return Err(AppError::InvalidEnvelope(
            "body has no message field".to_string(),
        ));
    }

    serde_json::from_value(value).map_err(|e| AppError::InvalidEnvelope(e.to_string()))
}

#[tracing::instrument(skip(state, body), fields(operation = "process_upload", size_bytes = body.len()))]
pub async fn handle_push(
    State(state): State<Arc<WorkerState>>,
    body: Bytes,
) -> Result<StatusCode, HttpAppError> {
    let start = std::time::Instant::now();
    let envelope = parse_envelope(&body)?;
    let event = envelope
        .decode_event()
        .map_err(|e| AppError::InvalidPayload(e.to_string()))?;
    let filename = event.filename;

    tracing::info!(
        filename = %filename,
        message_id = ?envelope.message.message_id,
        "Processing uploaded image"
    );

    let storage = state
        .storage
        .as_ref()
        .ok_or_else(|| AppError::Configuration("BUCKET_NAME is not set".to_string()))?;

    let processing_failed = |message: String| AppError::ProcessingFailed {
        filename: filename.clone(),
        message,
    };

    let image_data = storage
        .download(&filename)
        .await
        .map_err(|e| processing_failed(e.to_string()))?;

    let labels = state
        .detector
        .detect_labels(image_data)
        .await
        .map_err(|e| processing_failed(e.to_string()))?;

    let document = state
        .repository
        .insert(NewImageAnalysis::new(filename.clone(), labels))
        .await
        .map_err(|e| processing_failed(e.to_string()))?;

    tracing::info!(
        filename = %filename,
        document_id = %document.id,
        labels = ?document.labels,
        duration_ms = start.elapsed().as_secs_f64() * 1000.0,
        "Image analysed"
    );

    Ok(StatusCode::NO_CONTENT)
}
