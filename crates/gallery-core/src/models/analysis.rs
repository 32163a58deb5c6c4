use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Label-detection result for one uploaded image, as stored in the `images` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageAnalysis {
    /// Identifier assigned by the document store
    pub id: String,
    pub filename: String,
    /// Label descriptions in the order the vision service returned them
    pub labels: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for a new analysis document; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewImageAnalysis {
    pub filename: String,
    pub labels: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl NewImageAnalysis {
    /// Build a document stamped with the current UTC time.
    pub fn new(filename: impl Into<String>, labels: Vec<String>) -> Self {
        Self {
            filename: filename.into(),
            labels,
            created_at: Utc::now(),
        }
    }

    pub fn with_id(self, id: impl Into<String>) -> ImageAnalysis {
        ImageAnalysis {
            id: id.into(),
            filename: self.filename,
            labels: self.labels,
            created_at: self.created_at,
        }
    }
}

/// Gallery entry returned by `GET /gallery`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GalleryItem {
    pub id: String,
    pub filename: String,
    pub labels: Vec<String>,
    /// ISO-8601 timestamp, e.g. `2024-05-01T12:00:00.123456+00:00`
    pub created_at: String,
}

impl From<ImageAnalysis> for GalleryItem {
    fn from(analysis: ImageAnalysis) -> Self {
        GalleryItem {
            id: analysis.id,
            filename: analysis.filename,
            labels: analysis.labels,
            created_at: analysis.created_at.to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_gallery_item_projection() {
        let created_at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let analysis = ImageAnalysis {
            id: "abc123".to_string(),
            filename: "cat.jpg".to_string(),
            labels: vec!["Cat".to_string(), "Mammal".to_string()],
            created_at,
        };

        let item = GalleryItem::from(analysis);
        assert_eq!(item.id, "abc123");
        assert_eq!(item.labels, vec!["Cat", "Mammal"]);
        assert_eq!(item.created_at, "2024-05-01T12:00:00+00:00");

        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["created_at"], "2024-05-01T12:00:00+00:00");
        assert_eq!(json["id"], "abc123");
    }

    #[test]
    fn test_new_analysis_keeps_label_order() {
        let before = Utc::now();
        let doc = NewImageAnalysis::new(
            "dog.png",
            vec!["Dog".to_string(), "Pet".to_string(), "Canidae".to_string()],
        );
        assert!(doc.created_at >= before);
        let stored = doc.with_id("id-1");
        assert_eq!(stored.labels, vec!["Dog", "Pet", "Canidae"]);
        assert_eq!(stored.id, "id-1");
    }
}
