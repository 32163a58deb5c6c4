use crate::repository::{ImageAnalysisRepository, RepositoryError};
use async_trait::async_trait;
use gallery_core::models::{ImageAnalysis, NewImageAnalysis};
use gallery_core::DocumentStoreBackend;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Process-local document store for tests and single-machine runs
///
/// Documents are lost on restart. Both services must share the same instance for
/// results written by the worker to show up in the gallery.
#[derive(Default)]
pub struct InMemoryImageAnalysisRepository {
    documents: RwLock<Vec<ImageAnalysis>>,
}

impl InMemoryImageAnalysisRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }
}

#[async_trait]
impl ImageAnalysisRepository for InMemoryImageAnalysisRepository {
    #[tracing::instrument(skip(self, analysis), fields(db.collection = "images", db.operation = "insert", filename = %analysis.filename))]
    async fn insert(&self, analysis: NewImageAnalysis) -> Result<ImageAnalysis, RepositoryError> {
        let document = analysis.with_id(Uuid::new_v4().simple().to_string());
        self.documents.write().await.push(document.clone());
        Ok(document)
    }

    #[tracing::instrument(skip(self), fields(db.collection = "images", db.operation = "query"))]
    async fn list_newest_first(&self) -> Result<Vec<ImageAnalysis>, RepositoryError> {
        // Reverse insertion order first so equal timestamps list the latest insert first.
        let mut documents: Vec<ImageAnalysis> =
            self.documents.read().await.iter().rev().cloned().collect();
        documents.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(documents)
    }

    fn backend_type(&self) -> DocumentStoreBackend {
        DocumentStoreBackend::Memory
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn analysis_at(filename: &str, seconds: i64) -> NewImageAnalysis {
        NewImageAnalysis {
            filename: filename.to_string(),
            labels: vec!["Cat".to_string()],
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
                + Duration::seconds(seconds),
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_unique_ids() {
        let repo = InMemoryImageAnalysisRepository::new();
        let a = repo.insert(analysis_at("a.jpg", 0)).await.unwrap();
        let b = repo.insert(analysis_at("a.jpg", 0)).await.unwrap();

        assert_ne!(a.id, b.id);
        assert_eq!(a.filename, "a.jpg");
        assert_eq!(repo.len().await, 2);
    }

    #[tokio::test]
    async fn test_list_is_newest_first() {
        let repo = InMemoryImageAnalysisRepository::new();
        repo.insert(analysis_at("middle.jpg", 10)).await.unwrap();
        repo.insert(analysis_at("oldest.jpg", 0)).await.unwrap();
        repo.insert(analysis_at("newest.jpg", 20)).await.unwrap();

        let names: Vec<String> = repo
            .list_newest_first()
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.filename)
            .collect();
        assert_eq!(names, vec!["newest.jpg", "middle.jpg", "oldest.jpg"]);
    }

    #[tokio::test]
    async fn test_equal_timestamps_list_latest_insert_first() {
        let repo = InMemoryImageAnalysisRepository::new();
        repo.insert(analysis_at("first.jpg", 0)).await.unwrap();
        repo.insert(analysis_at("second.jpg", 0)).await.unwrap();

        let listed = repo.list_newest_first().await.unwrap();
        assert_eq!(listed[0].filename, "second.jpg");
        assert_eq!(listed[1].filename, "first.jpg");
    }

    #[tokio::test]
    async fn test_empty_store() {
        let repo = InMemoryImageAnalysisRepository::new();
        assert!(repo.is_empty().await);
        assert!(repo.list_newest_first().await.unwrap().is_empty());
    }
}
