//! Upload notifications.
//!
//! In production the filename is published to a Cloud Pub/Sub topic whose push
//! subscription targets the worker. For local runs without Pub/Sub, the push relay
//! POSTs the same envelope a push subscription would deliver straight to the worker.

use async_trait::async_trait;
use gallery_core::models::{PushEnvelope, UploadEvent};
use gallery_core::{ApiConfig, EventBackend};
use gallery_infra::{AuthError, TokenProvider};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

pub const PUBSUB_BASE_URL: &str = "https://pubsub.googleapis.com";

/// Upper bound on a single publish call to the broker.
pub const PUBLISH_TIMEOUT: Duration = Duration::from_secs(30);

/// Upper bound on a relayed push. Covers the worker's download, detection and insert.
pub const RELAY_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("Publish request failed: {0}")]
    Request(String),

    #[error("Publish endpoint returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid publish response: {0}")]
    InvalidResponse(String),

    #[error("Authentication failed: {0}")]
    Auth(#[from] AuthError),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Publishes upload notifications. Returns the message id once the broker has
/// acknowledged the message.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, event: &UploadEvent) -> Result<String, PublishError>;

    fn backend_type(&self) -> EventBackend;
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PublishResponse {
    #[serde(default)]
    message_ids: Vec<String>,
}

fn http_client(timeout: Duration) -> Result<reqwest::Client, PublishError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| PublishError::Config(e.to_string()))
}

async fn error_for_status(response: reqwest::Response) -> Result<reqwest::Response, PublishError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    Err(PublishError::Status {
        status: status.as_u16(),
        body,
    })
}

/// Cloud Pub/Sub REST publisher (`topics.publish`)
pub struct PubSubPublisher {
    http_client: reqwest::Client,
    publish_url: String,
    topic: String,
    /// `None` when talking to the emulator.
    token_provider: Option<Arc<dyn TokenProvider>>,
}

impl PubSubPublisher {
    pub fn new(
        base_url: &str,
        project_id: &str,
        topic_id: &str,
        token_provider: Option<Arc<dyn TokenProvider>>,
    ) -> Result<Self, PublishError> {
        let topic = format!("projects/{}/topics/{}", project_id, topic_id);
        Ok(Self {
            http_client: http_client(PUBLISH_TIMEOUT)?,
            publish_url: format!("{}/v1/{}:publish", base_url.trim_end_matches('/'), topic),
            topic,
            token_provider,
        })
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }
}

#[async_trait]
impl EventPublisher for PubSubPublisher {
    #[tracing::instrument(skip(self, event), fields(topic = %self.topic, filename = %event.filename))]
    async fn publish(&self, event: &UploadEvent) -> Result<String, PublishError> {
        let start = std::time::Instant::now();
        let body = json!({
            "messages": [{ "data": event.encoded_payload() }]
        });

        let mut request = self.http_client.post(&self.publish_url).json(&body);
        if let Some(provider) = &self.token_provider {
            request = request.bearer_auth(provider.access_token().await?);
        }

        let response = request
            .send()
            .await
            .map_err(|e| PublishError::Request(e.to_string()))?;
        let response = error_for_status(response).await?;

        let parsed: PublishResponse = response
            .json()
            .await
            .map_err(|e| PublishError::InvalidResponse(e.to_string()))?;
        let message_id = parsed
            .message_ids
            .into_iter()
            .next()
            .ok_or_else(|| PublishError::InvalidResponse("no message id returned".to_string()))?;

        tracing::info!(
            message_id = %message_id,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Published upload notification"
        );

        Ok(message_id)
    }

    fn backend_type(&self) -> EventBackend {
        EventBackend::PubSub
    }
}

/// Delivers events directly to the worker's push endpoint
///
/// The request completes only after the worker has processed the image, so a
/// worker failure surfaces as a publish failure.
pub struct PushRelayPublisher {
    http_client: reqwest::Client,
    endpoint: String,
}

impl PushRelayPublisher {
    pub fn new(endpoint: impl Into<String>) -> Result<Self, PublishError> {
        Ok(Self {
            http_client: http_client(RELAY_TIMEOUT)?,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl EventPublisher for PushRelayPublisher {
    #[tracing::instrument(skip(self, event), fields(endpoint = %self.endpoint, filename = %event.filename))]
    async fn publish(&self, event: &UploadEvent) -> Result<String, PublishError> {
        let message_id = Uuid::new_v4().to_string();
        let envelope = PushEnvelope::for_event(event, message_id.clone());

        let response = self
            .http_client
            .post(&self.endpoint)
            .json(&envelope)
            .send()
            .await
            .map_err(|e| PublishError::Request(e.to_string()))?;
        error_for_status(response).await?;

        tracing::info!(message_id = %message_id, "Relayed upload notification to worker");
        Ok(message_id)
    }

    fn backend_type(&self) -> EventBackend {
        EventBackend::Push
    }
}

/// Create the publisher selected by `EVENT_BACKEND`
///
/// With `PUBSUB_EMULATOR_HOST` set, requests go to the emulator unauthenticated.
pub fn create_publisher(
    config: &ApiConfig,
    token_provider: Arc<dyn TokenProvider>,
) -> Result<Arc<dyn EventPublisher>, PublishError> {
    match config.event_backend {
        EventBackend::PubSub => {
            let (base_url, token_provider) = match &config.pubsub_emulator_host {
                Some(host) => {
                    tracing::info!(emulator_host = %host, "Using Pub/Sub emulator");
                    (format!("http://{}", host), None)
                }
                None => (PUBSUB_BASE_URL.to_string(), Some(token_provider)),
            };
            let publisher = PubSubPublisher::new(
                &base_url,
                &config.base.gcp.project_id,
                &config.topic_id,
                token_provider,
            )?;
            tracing::info!(topic = %publisher.topic(), "Initializing Pub/Sub publisher");
            Ok(Arc::new(publisher))
        }
        EventBackend::Push => {
            let endpoint = config.worker_push_url.clone().ok_or_else(|| {
                PublishError::Config(
                    "WORKER_PUSH_URL must be set when EVENT_BACKEND=push".to_string(),
                )
            })?;
            tracing::warn!(
                endpoint = %endpoint,
                "Relaying upload notifications directly to the worker"
            );
            Ok(Arc::new(PushRelayPublisher::new(endpoint)?))
        }
    }
}
