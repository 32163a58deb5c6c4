//! Cloud Vision label detection.

use async_trait::async_trait;
use base64::Engine;
use gallery_core::WorkerConfig;
use gallery_infra::{AuthError, TokenProvider};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

pub const VISION_BASE_URL: &str = "https://vision.googleapis.com";

#[derive(Debug, thiserror::Error)]
pub enum VisionError {
    #[error("Vision request failed: {0}")]
    Request(String),

    #[error("Vision API returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Vision API error {code:?}: {message}")]
    Api { code: Option<i32>, message: String },

    #[error("Invalid Vision API response: {0}")]
    InvalidResponse(String),

    #[error("Authentication failed: {0}")]
    Auth(#[from] AuthError),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Image classifier returning label descriptions, most relevant first.
#[async_trait]
pub trait LabelDetector: Send + Sync {
    async fn detect_labels(&self, image_data: Vec<u8>) -> Result<Vec<String>, VisionError>;
}

/// How requests to the Vision API are authenticated
#[derive(Clone)]
pub enum VisionCredentials {
    /// `?key=` query parameter
    ApiKey(String),
    /// OAuth bearer token
    Token(Arc<dyn TokenProvider>),
}

#[derive(Debug, Deserialize)]
struct VisionResponse {
    #[serde(default)]
    responses: Vec<AnnotateImageResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnnotateImageResponse {
    #[serde(default)]
    label_annotations: Vec<LabelAnnotation>,
    error: Option<StatusError>,
}

#[derive(Debug, Deserialize)]
struct LabelAnnotation {
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StatusError {
    code: Option<i32>,
    #[serde(default)]
    message: String,
}

pub struct GoogleVisionLabelDetector {
    http_client: reqwest::Client,
    base_url: String,
    credentials: VisionCredentials,
    max_results: u32,
}

impl GoogleVisionLabelDetector {
    pub fn new(
        base_url: impl Into<String>,
        credentials: VisionCredentials,
        max_results: u32,
    ) -> Result<Self, VisionError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| VisionError::Config(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credentials,
            max_results,
        })
    }
}

#[async_trait]
impl LabelDetector for GoogleVisionLabelDetector {
    #[tracing::instrument(skip(self, image_data), fields(size_bytes = image_data.len()))]
    async fn detect_labels(&self, image_data: Vec<u8>) -> Result<Vec<String>, VisionError> {
        let start = std::time::Instant::now();
        let url = format!("{}/v1/images:annotate", self.base_url);

        let image_base64 = base64::engine::general_purpose::STANDARD.encode(&image_data);
        let request_body = json!({
            "requests": [{
                "image": { "content": image_base64 },
                "features": [{ "type": "LABEL_DETECTION", "maxResults": self.max_results }]
            }]
        });

        let request = self.http_client.post(&url).json(&request_body);
        let request = match &self.credentials {
            VisionCredentials::ApiKey(key) => request.query(&[("key", key)]),
            VisionCredentials::Token(provider) => {
                request.bearer_auth(provider.access_token().await?)
            }
        };

        let response = request
            .send()
            .await
            .map_err(|e| VisionError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(VisionError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let vision_response: VisionResponse = response
            .json()
            .await
            .map_err(|e| VisionError::InvalidResponse(e.to_string()))?;

        let Some(first) = vision_response.responses.into_iter().next() else {
            return Ok(Vec::new());
        };

        if let Some(error) = first.error {
            return Err(VisionError::Api {
                code: error.code,
                message: error.message,
            });
        }

        let labels: Vec<String> = first
            .label_annotations
            .into_iter()
            .filter_map(|label| label.description)
            .collect();

        tracing::info!(
            labels_count = labels.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Label detection completed"
        );

        Ok(labels)
    }
}

/// Build the Vision client, preferring `VISION_API_KEY` over OAuth tokens
pub fn create_label_detector(
    config: &WorkerConfig,
    token_provider: Arc<dyn TokenProvider>,
) -> Result<Arc<dyn LabelDetector>, VisionError> {
    let credentials = match &config.vision_api_key {
        Some(key) => VisionCredentials::ApiKey(key.clone()),
        None => VisionCredentials::Token(token_provider),
    };
    Ok(Arc::new(GoogleVisionLabelDetector::new(
        VISION_BASE_URL,
        credentials,
        config.vision_max_results,
    )?))
}
