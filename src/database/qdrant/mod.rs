// Qdrant vector database module
// Point and payload types exchanged with the Qdrant REST API


pub mod vector_store;

use serde::{Deserialize, Serialize};

pub use vector_store::VectorStore;

/// Payload stored next to each material vector
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentPayload {
    #[serde(default)]
    pub filename: String,
    /// Full extracted text of the material
    #[serde(default)]
    pub page_content: String,
}

/// A material as stored in the collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexedDocument {
    /// Position of the material in the listing at ingestion time
    pub id: u64,
    pub vector: Vec<f32>,
    pub payload: DocumentPayload,
}

/// A search hit, most similar first
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScoredDocument {
    pub id: PointId,
    pub score: f32,
    #[serde(default)]
    pub payload: Option<DocumentPayload>,
}

impl ScoredDocument {
    /// Stored text, or an empty string when the point carries no payload
    #[inline]
    pub fn page_content(&self) -> &str {
        self.payload
            .as_ref()
            .map_or("", |payload| payload.page_content.as_str())
    }
}

/// Qdrant accepts both unsigned integers and UUID strings as point ids
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PointId {
    Num(u64),
    Uuid(String),
}
