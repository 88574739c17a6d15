//! Shared types for generation, retrieval, and QA responses

pub mod document;
pub mod generation;
pub mod query;
pub mod response;

pub use document::{DocumentChunk, RetrievedDoc};
pub use generation::{GenerationRequest, GenerationResult, Metadata};
pub use query::QaRequest;
pub use response::{QaResult, SafetyReport};
