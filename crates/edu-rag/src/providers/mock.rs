//! Deterministic mock provider
//!
//! Serves two roles: the orchestrator's fallback target and an offline test
//! double. Both require bit-for-bit reproducible output.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{GenerationRequest, GenerationResult, Metadata};

use super::llm::LlmProvider;

/// Fixed seed for embedding generation; resets on every call so identical
/// inputs always yield identical vectors.
const EMBED_SEED: u64 = 42;

/// Number of dimensions in mock embedding vectors
const EMBED_DIMENSIONS: usize = 10;

/// Prompt prefix length echoed back by `generate`, in characters
const PROMPT_ECHO_CHARS: usize = 200;

/// Deterministic offline provider
#[derive(Debug, Default, Clone)]
pub struct MockProvider;

impl MockProvider {
    /// Create a new mock provider
    pub fn new() -> Self {
        Self
    }
}

/// SplitMix64 sequence. Not a stdlib replacement for an RNG crate: the mock's
/// contract is bit-identical vectors across processes and crate versions,
/// which a pinned algorithm guarantees and library RNGs do not.
struct SplitMix64 {
    state: u64,
}

impl SplitMix64 {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9e3779b97f4a7c15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
        z ^ (z >> 31)
    }

    /// Uniform f32 in [0, 1) with 24 bits of precision
    fn next_f32(&mut self) -> f32 {
        (self.next_u64() >> 40) as f32 / (1u64 << 24) as f32
    }
}

#[async_trait]
impl LlmProvider for MockProvider {
    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResult> {
        let system = request.system_prompt.as_deref().unwrap_or("None");
        let prefix: String = request.prompt.chars().take(PROMPT_ECHO_CHARS).collect();

        let mut usage = Metadata::new();
        usage.insert(
            "prompt_tokens".to_string(),
            request.prompt.split_whitespace().count().into(),
        );
        usage.insert("completion_tokens".to_string(), 50.into());

        Ok(GenerationResult {
            content: format!("[MOCK RESPONSE]\nSystem: {}\nPrompt: {}", system, prefix),
            provider: self.name().to_string(),
            usage,
            metadata: request.metadata.clone(),
        })
    }

    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut rng = SplitMix64::new(EMBED_SEED);
        Ok(texts
            .iter()
            .map(|_| (0..EMBED_DIMENSIONS).map(|_| rng.next_f32()).collect())
            .collect())
    }

    fn name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_generate_echoes_system_and_prompt() {
        let provider = MockProvider::new();
        let request = GenerationRequest::new("解释牛顿第二定律")
            .with_system_prompt("你是一名物理老师");

        let result = provider.generate(&request).await.unwrap();

        assert!(result.content.starts_with("[MOCK RESPONSE]"));
        assert!(result.content.contains("你是一名物理老师"));
        assert!(result.content.contains("解释牛顿第二定律"));
        assert_eq!(result.provider, "mock");
        assert_eq!(result.usage["completion_tokens"], 50);
    }

    #[tokio::test]
    async fn test_generate_truncates_long_prompts_on_char_boundary() {
        let provider = MockProvider::new();
        // Multi-byte text longer than the echo window
        let prompt = "数".repeat(500);
        let request = GenerationRequest::new(prompt);

        let result = provider.generate(&request).await.unwrap();
        let echoed = result.content.split("Prompt: ").nth(1).unwrap();

        assert_eq!(echoed.chars().count(), 200);
    }

    #[tokio::test]
    async fn test_generate_usage_counts_words() {
        let provider = MockProvider::new();
        let request = GenerationRequest::new("one two three four");

        let result = provider.generate(&request).await.unwrap();

        assert_eq!(result.usage["prompt_tokens"], 4);
    }

    #[tokio::test]
    async fn test_embed_is_idempotent() {
        let provider = MockProvider::new();
        let texts = vec!["first text".to_string(), "second text".to_string()];

        let first = provider.embed(&texts).await.unwrap();
        let second = provider.embed(&texts).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
        assert_eq!(first[0].len(), EMBED_DIMENSIONS);
        for vector in &first {
            for value in vector {
                assert!((0.0..1.0).contains(value));
            }
        }
    }
}
