//! HTTP error rendering
//!
//! `HttpAppError` wraps `AppError` so it can implement `IntoResponse` (orphan rule).
//! Handlers return `Result<impl IntoResponse, HttpAppError>` and build errors from
//! `AppError` variants.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use gallery_core::{AppError, ErrorMetadata, LogLevel};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use utoipa::ToSchema;

/// JSON body of every non-2xx response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    /// Machine-readable error code for programmatic handling
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: code.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

fn log_error(error: &AppError, status: StatusCode) {
    let status = status.as_u16();
    let error_type = error.error_type();
    match error.log_level() {
        LogLevel::Debug => tracing::debug!(%error, error_type, status, "Request rejected"),
        LogLevel::Warn => tracing::warn!(%error, error_type, status, "Request rejected"),
        LogLevel::Error => tracing::error!(%error, error_type, status, "Request failed"),
    }
}

static HIDE_DETAILS: OnceLock<bool> = OnceLock::new();

/// Fix once at startup whether error bodies omit `details`. Later calls are ignored.
///
/// Services pass `BaseConfig::is_production()`; until this is called details are shown.
pub fn configure_error_details(hide: bool) {
    if HIDE_DETAILS.set(hide).is_err() {
        tracing::debug!("Error detail mode already configured");
    }
}

fn hides_details() -> bool {
    HIDE_DETAILS.get().copied().unwrap_or(false)
}

fn error_body(error: &AppError, hide_details: bool) -> ErrorResponse {
    let body = ErrorResponse::new(error.client_message(), error.error_code());
    if hide_details {
        body
    } else {
        body.with_details(error.to_string())
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let HttpAppError(error) = self;
        let status = StatusCode::from_u16(error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        log_error(&error, status);

        (status, Json(error_body(&error, hides_details()))).into_response()
    }
}
