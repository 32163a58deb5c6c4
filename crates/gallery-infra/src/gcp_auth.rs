//! Google Cloud access tokens for the REST clients (Pub/Sub, Firestore, Vision).
//!
//! On Cloud Run and GCE the metadata server issues tokens for the attached service
//! account. For local runs a pre-issued token can be supplied with
//! `GOOGLE_OAUTH_ACCESS_TOKEN` (e.g. from `gcloud auth print-access-token`).

use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use gallery_core::GcpConfig;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

const METADATA_TOKEN_URL: &str =
    "http://metadata.google.internal/computeMetadata/v1/instance/service-accounts/default/token";

/// Tokens are refreshed this long before the metadata server says they expire.
const REFRESH_MARGIN_SECS: i64 = 60;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Token request failed: {0}")]
    Request(String),

    #[error("Token endpoint returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid token response: {0}")]
    InvalidResponse(String),
}

/// Source of OAuth bearer tokens for Google APIs
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn access_token(&self) -> Result<String, AuthError>;

    fn name(&self) -> &'static str;
}

/// Fixed token supplied through configuration
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn access_token(&self) -> Result<String, AuthError> {
        Ok(self.token.clone())
    }

    fn name(&self) -> &'static str {
        "static"
    }
}

#[derive(Debug, Deserialize)]
struct MetadataTokenResponse {
    access_token: String,
    expires_in: i64,
}

#[derive(Clone)]
struct CachedToken {
    token: String,
    expires_at: DateTime<Utc>,
}

/// Token provider backed by the GCE/Cloud Run metadata server
pub struct MetadataServerTokenProvider {
    http_client: reqwest::Client,
    token_url: String,
    cached: RwLock<Option<CachedToken>>,
}

impl MetadataServerTokenProvider {
    pub fn new() -> Result<Self, AuthError> {
        Self::with_token_url(METADATA_TOKEN_URL)
    }

    pub fn with_token_url(token_url: impl Into<String>) -> Result<Self, AuthError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| AuthError::Request(e.to_string()))?;

        Ok(Self {
            http_client,
            token_url: token_url.into(),
            cached: RwLock::new(None),
        })
    }

    async fn fetch(&self) -> Result<CachedToken, AuthError> {
        let response = self
            .http_client
            .get(&self.token_url)
            .header("Metadata-Flavor", "Google")
            .send()
            .await
            .map_err(|e| AuthError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AuthError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let token: MetadataTokenResponse = response
            .json()
            .await
            .map_err(|e| AuthError::InvalidResponse(e.to_string()))?;

        tracing::debug!(expires_in = token.expires_in, "Fetched access token from metadata server");

        Ok(CachedToken {
            token: token.access_token,
            expires_at: Utc::now() + ChronoDuration::seconds(token.expires_in - REFRESH_MARGIN_SECS),
        })
    }
}

#[async_trait]
impl TokenProvider for MetadataServerTokenProvider {
    async fn access_token(&self) -> Result<String, AuthError> {
        if let Some(cached) = self.cached.read().await.as_ref() {
            if cached.expires_at > Utc::now() {
                return Ok(cached.token.clone());
            }
        }

        let mut guard = self.cached.write().await;
        // Another request may have refreshed while we waited for the lock.
        if let Some(cached) = guard.as_ref() {
            if cached.expires_at > Utc::now() {
                return Ok(cached.token.clone());
            }
        }

        let fresh = self.fetch().await?;
        let token = fresh.token.clone();
        *guard = Some(fresh);
        Ok(token)
    }

    fn name(&self) -> &'static str {
        "metadata-server"
    }
}

/// Pick the token source for the configured project
pub fn create_token_provider(config: &GcpConfig) -> Result<Arc<dyn TokenProvider>, AuthError> {
    match &config.access_token {
        Some(token) => {
            tracing::info!("Using access token from GOOGLE_OAUTH_ACCESS_TOKEN");
            Ok(Arc::new(StaticTokenProvider::new(token.clone())))
        }
        None => {
            tracing::info!("Using metadata server for Google Cloud access tokens");
            Ok(Arc::new(MetadataServerTokenProvider::new()?))
        }
    }
}
