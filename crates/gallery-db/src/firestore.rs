//! Cloud Firestore backend over the REST API (`v1`).
//!
//! Documents are written with typed field values (`stringValue`, `arrayValue`,
//! `timestampValue`) and listed with a `runQuery` structured query.

use crate::repository::{ImageAnalysisRepository, RepositoryError};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use gallery_core::constants::{CREATED_AT_FIELD, IMAGES_COLLECTION};
use gallery_core::models::{ImageAnalysis, NewImageAnalysis};
use gallery_core::DocumentStoreBackend;
use gallery_infra::TokenProvider;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::sync::Arc;
use std::time::Duration;

pub const FIRESTORE_BASE_URL: &str = "https://firestore.googleapis.com";

#[derive(Debug, Deserialize)]
struct FirestoreDocument {
    name: String,
    #[serde(default)]
    fields: Map<String, Value>,
}

/// One element of a `runQuery` response. Entries without a document only carry
/// progress information (`readTime`, `skippedResults`).
#[derive(Debug, Deserialize)]
struct RunQueryResponseItem {
    #[serde(default)]
    document: Option<FirestoreDocument>,
}

pub struct FirestoreImageAnalysisRepository {
    http_client: reqwest::Client,
    base_url: String,
    project_id: String,
    database: String,
    /// `None` when talking to the emulator.
    token_provider: Option<Arc<dyn TokenProvider>>,
}

impl FirestoreImageAnalysisRepository {
    pub fn new(
        base_url: impl Into<String>,
        project_id: impl Into<String>,
        database: impl Into<String>,
        token_provider: Option<Arc<dyn TokenProvider>>,
    ) -> Result<Self, RepositoryError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| RepositoryError::Config(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            project_id: project_id.into(),
            database: database.into(),
            token_provider,
        })
    }

    fn documents_url(&self) -> String {
        format!(
            "{}/v1/projects/{}/databases/{}/documents",
            self.base_url, self.project_id, self.database
        )
    }

    async fn authorize(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::RequestBuilder, RepositoryError> {
        match &self.token_provider {
            Some(provider) => Ok(request.bearer_auth(provider.access_token().await?)),
            None => Ok(request),
        }
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, RepositoryError> {
        let response = self
            .authorize(request)
            .await?
            .send()
            .await
            .map_err(|e| RepositoryError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(RepositoryError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

fn encode_fields(analysis: &NewImageAnalysis) -> Value {
    let labels: Vec<Value> = analysis
        .labels
        .iter()
        .map(|label| json!({ "stringValue": label }))
        .collect();

    let mut fields = Map::new();
    fields.insert(
        "filename".to_string(),
        json!({ "stringValue": analysis.filename }),
    );
    fields.insert(
        "labels".to_string(),
        json!({ "arrayValue": { "values": labels } }),
    );
    fields.insert(
        CREATED_AT_FIELD.to_string(),
        json!({
            "timestampValue": analysis.created_at.to_rfc3339_opts(SecondsFormat::Micros, true)
        }),
    );
    Value::Object(fields)
}

fn decode_document(document: FirestoreDocument) -> Result<ImageAnalysis, RepositoryError> {
    let id = document
        .name
        .rsplit('/')
        .next()
        .filter(|id| !id.is_empty())
        .ok_or_else(|| RepositoryError::Decode(format!("bad document name: {}", document.name)))?
        .to_string();

    let filename = document
        .fields
        .get("filename")
        .and_then(|v| v.get("stringValue"))
        .and_then(Value::as_str)
        .ok_or_else(|| RepositoryError::Decode(format!("document {} has no filename", id)))?
        .to_string();

    // An empty array comes back as `{"arrayValue": {}}`; a missing field means no labels.
    let labels = document
        .fields
        .get("labels")
        .and_then(|v| v.get("arrayValue"))
        .and_then(|v| v.get("values"))
        .and_then(Value::as_array)
        .map(|values| {
            values
                .iter()
                .filter_map(|v| v.get("stringValue").and_then(Value::as_str))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    let raw_created_at = document
        .fields
        .get(CREATED_AT_FIELD)
        .and_then(|v| v.get("timestampValue"))
        .and_then(Value::as_str)
        .ok_or_else(|| RepositoryError::Decode(format!("document {} has no created_at", id)))?;
    let created_at = DateTime::parse_from_rfc3339(raw_created_at)
        .map_err(|e| RepositoryError::Decode(format!("document {}: {}", id, e)))?
        .with_timezone(&Utc);

    Ok(ImageAnalysis {
        id,
        filename,
        labels,
        created_at,
    })
}

#[async_trait]
impl ImageAnalysisRepository for FirestoreImageAnalysisRepository {
    #[tracing::instrument(skip(self, analysis), fields(db.system = "firestore", db.collection = "images", db.operation = "insert", filename = %analysis.filename))]
    async fn insert(&self, analysis: NewImageAnalysis) -> Result<ImageAnalysis, RepositoryError> {
        let start = std::time::Instant::now();
        let url = format!("{}/{}", self.documents_url(), IMAGES_COLLECTION);

        let response = self
            .send(
                self.http_client
                    .post(&url)
                    .json(&json!({ "fields": encode_fields(&analysis) })),
            )
            .await?;

        let document: FirestoreDocument = response
            .json()
            .await
            .map_err(|e| RepositoryError::Decode(e.to_string()))?;
        let stored = decode_document(document)?;

        tracing::info!(
            document_id = %stored.id,
            labels = stored.labels.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Stored image analysis"
        );

        Ok(stored)
    }

    #[tracing::instrument(skip(self), fields(db.system = "firestore", db.collection = "images", db.operation = "query"))]
    async fn list_newest_first(&self) -> Result<Vec<ImageAnalysis>, RepositoryError> {
        let start = std::time::Instant::now();
        let url = format!("{}:runQuery", self.documents_url());
        let query = json!({
            "structuredQuery": {
                "from": [{ "collectionId": IMAGES_COLLECTION }],
                "orderBy": [{
                    "field": { "fieldPath": CREATED_AT_FIELD },
                    "direction": "DESCENDING"
                }]
            }
        });

        let response = self.send(self.http_client.post(&url).json(&query)).await?;
        let items: Vec<RunQueryResponseItem> = response
            .json()
            .await
            .map_err(|e| RepositoryError::Decode(e.to_string()))?;

        let documents = items
            .into_iter()
            .filter_map(|item| item.document)
            .map(decode_document)
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(
            count = documents.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Queried image analyses"
        );

        Ok(documents)
    }

    fn backend_type(&self) -> DocumentStoreBackend {
        DocumentStoreBackend::Firestore
    }
}
