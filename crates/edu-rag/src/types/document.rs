//! Document chunk and retrieval result types

use serde::{Deserialize, Serialize};

use super::generation::Metadata;

/// A span of source material produced by chunking, consumed by indexing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentChunk {
    /// Unique id within a corpus
    pub id: String,
    /// Chunk text, bounded length
    pub text: String,
    /// Open key-value metadata; must include a `source` field
    pub metadata: Metadata,
}

impl DocumentChunk {
    /// Create a chunk with its provenance recorded in metadata
    pub fn new(id: impl Into<String>, text: impl Into<String>, source: impl Into<String>) -> Self {
        let mut metadata = Metadata::new();
        metadata.insert("source".to_string(), source.into().into());
        Self {
            id: id.into(),
            text: text.into(),
            metadata,
        }
    }
}

/// A document retrieved for one query, produced transiently, never persisted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievedDoc {
    /// Retrieved text
    pub text: String,
    /// Provenance of the text
    pub source: String,
    /// Similarity score, higher is more relevant
    pub score: f32,
}
