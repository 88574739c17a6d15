//! LLM provider trait for text generation and embeddings

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{GenerationRequest, GenerationResult};

/// Trait for interchangeable language-model backends
///
/// Implementations:
/// - `DeepSeekProvider`: DeepSeek chat completions (no embeddings)
/// - `OpenAiProvider`: OpenAI chat completions and embeddings
/// - `MockProvider`: deterministic offline double, used as the fallback target
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Generate a model response.
    ///
    /// Fails with `Error::ProviderConfig` when required credentials are
    /// absent, before any network round trip. Fails with
    /// `Error::ProviderUnavailable` when the backing service is unreachable
    /// or returns a malformed response.
    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResult>;

    /// Compute embeddings, one vector per input text, preserving input order.
    ///
    /// Variants without an embedding endpoint fail with `Error::NotSupported`
    /// rather than attempting a degraded call.
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Best-effort connectivity probe. Errors are swallowed; warm-up failure
    /// never blocks pipeline startup.
    async fn warmup(&self) {}

    /// Unique registry key for this provider
    fn name(&self) -> &str;
}
