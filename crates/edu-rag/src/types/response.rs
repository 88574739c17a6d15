//! QA response types

use serde::{Deserialize, Serialize};

use super::document::RetrievedDoc;
use super::generation::Metadata;

/// Final answer object returned to the upstream request handler
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QaResult {
    /// Answer text
    pub answer: String,
    /// Provider that produced the answer (the actual producer, not the
    /// originally requested one when fallback occurred)
    pub provider: String,
    /// Retrieved documents in the order the vector index returned them.
    /// Same cardinality and order as the retrieval call that produced them.
    pub citations: Vec<RetrievedDoc>,
    /// Opaque token accounting from the provider
    #[serde(default)]
    pub usage: Metadata,
    /// Request metadata plus a `safety` sub-object
    #[serde(default)]
    pub metadata: Metadata,
}

/// Outcome of the safety gate for one generated text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetyReport {
    /// True when no disallowed keyword matched
    pub is_safe: bool,
    /// Sorted list of matched keyword categories
    pub flags: Vec<String>,
}
