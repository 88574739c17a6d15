//! edu-rag: AI orchestration and retrieval-augmented QA for the tutoring platform
//!
//! This crate accepts a natural-language question, retrieves supporting
//! context from a vector index, renders a subject-aware prompt, dispatches it
//! to one of several interchangeable language-model providers with automatic
//! fallback on failure, screens the result for unsafe content, and returns a
//! structured, citation-bearing answer.

pub mod config;
pub mod error;
pub mod ingestion;
pub mod orchestrator;
pub mod pipeline;
pub mod prompting;
pub mod providers;
pub mod retrieval;
pub mod safety;
pub mod service;
pub mod types;

pub use config::AiConfig;
pub use error::{Error, Result};
pub use orchestrator::LlmOrchestrator;
pub use pipeline::QaPipeline;
pub use service::AiService;
pub use types::{
    document::{DocumentChunk, RetrievedDoc},
    query::QaRequest,
    response::{QaResult, SafetyReport},
};
