//! Provider registry and routing with fallback policy

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::join_all;

use crate::config::AiConfig;
use crate::error::{Error, Result};
use crate::providers::{DeepSeekProvider, LlmProvider, MockProvider, OpenAiProvider};
use crate::types::{GenerationRequest, GenerationResult};

/// Registry key of the deterministic mock provider
pub const MOCK_PROVIDER: &str = "mock";

/// Fixed substitution target when a provider lacks embedding support
const EMBED_FALLBACK_PROVIDER: &str = "openai";

/// Metadata key carrying the stringified original error after a fallback
pub const FALLBACK_ERROR_KEY: &str = "fallback_error";

/// Routes requests to registered providers with one-shot fallback.
///
/// The registry is seeded at construction and never mutated afterwards; the
/// orchestrator is shared across concurrent pipeline runs behind an `Arc`.
pub struct LlmOrchestrator {
    providers: HashMap<String, Arc<dyn LlmProvider>>,
    default_provider: String,
    mock_mode: bool,
    auto_fallback: bool,
}

impl LlmOrchestrator {
    /// Build the orchestrator from configuration, seeding the registry with
    /// the DeepSeek, OpenAI, and mock providers.
    pub fn new(config: &AiConfig) -> Self {
        let mut providers: HashMap<String, Arc<dyn LlmProvider>> = HashMap::new();

        let deepseek = DeepSeekProvider::new(&config.deepseek);
        providers.insert(deepseek.name().to_string(), Arc::new(deepseek));
        let openai = OpenAiProvider::new(&config.openai);
        providers.insert(openai.name().to_string(), Arc::new(openai));
        let mock = MockProvider::new();
        providers.insert(mock.name().to_string(), Arc::new(mock));

        Self {
            providers,
            default_provider: config.default_provider.clone(),
            mock_mode: config.mock_mode,
            auto_fallback: config.auto_fallback,
        }
    }

    /// Build the orchestrator over a caller-supplied registry. Used by tests
    /// to substitute fakes without touching process-wide state.
    pub fn with_providers(
        providers: HashMap<String, Arc<dyn LlmProvider>>,
        default_provider: impl Into<String>,
    ) -> Self {
        Self {
            providers,
            default_provider: default_provider.into(),
            mock_mode: false,
            auto_fallback: true,
        }
    }

    /// Toggle the global mock mode
    pub fn with_mock_mode(mut self, enabled: bool) -> Self {
        self.mock_mode = enabled;
        self
    }

    /// Toggle automatic mock fallback for generation
    pub fn with_auto_fallback(mut self, enabled: bool) -> Self {
        self.auto_fallback = enabled;
        self
    }

    /// Resolve a provider by name, or the configured default when omitted
    pub fn get_provider(&self, name: Option<&str>) -> Result<&Arc<dyn LlmProvider>> {
        let key = name.unwrap_or(&self.default_provider);
        self.providers
            .get(key)
            .ok_or_else(|| Error::UnknownProvider(key.to_string()))
    }

    /// Generate text via the requested provider, with one-shot mock fallback.
    ///
    /// When the resolved provider is the mock itself, or automatic fallback
    /// is disabled, any error is re-raised untouched so callers relying on a
    /// specific provider see real failures. Otherwise a failure is retried
    /// exactly once against the mock provider, with the original error
    /// recorded under `fallback_error` in the result metadata. The mock call
    /// is never retried further.
    pub async fn generate(
        &self,
        request: &GenerationRequest,
        provider: Option<&str>,
    ) -> Result<GenerationResult> {
        // Mock mode forces every generation onto the deterministic mock
        let requested = if self.mock_mode {
            Some(MOCK_PROVIDER)
        } else {
            provider
        };
        let resolved = self.get_provider(requested)?;

        match resolved.generate(request).await {
            Ok(result) => Ok(result),
            Err(first_error) => {
                if resolved.name() == MOCK_PROVIDER || !self.auto_fallback {
                    return Err(first_error);
                }

                tracing::warn!(
                    provider = resolved.name(),
                    error = %first_error,
                    "generation failed, falling back to mock provider"
                );

                let mock = self.get_provider(Some(MOCK_PROVIDER))?;
                let mut metadata = request.metadata.clone();
                metadata.insert(
                    FALLBACK_ERROR_KEY.to_string(),
                    first_error.to_string().into(),
                );
                let fallback_request = GenerationRequest {
                    metadata,
                    ..request.clone()
                };
                mock.generate(&fallback_request).await
            }
        }
    }

    /// Compute embeddings via the requested provider.
    ///
    /// A `NotSupported` error means the provider lacks the capability and is
    /// recovered by one retry against the fixed embedding-capable provider.
    /// Any other error means the call itself failed and propagates untouched.
    /// Unlike generation, this path does not consult the mock-mode flag; the
    /// two fallback policies are independent.
    pub async fn embed(&self, texts: &[String], provider: Option<&str>) -> Result<Vec<Vec<f32>>> {
        let resolved = self.get_provider(provider)?;

        match resolved.embed(texts).await {
            Err(Error::NotSupported {
                provider: unsupported,
                ..
            }) => {
                tracing::debug!(
                    provider = unsupported,
                    "provider lacks embeddings, substituting {}",
                    EMBED_FALLBACK_PROVIDER
                );
                let fallback = self.get_provider(Some(EMBED_FALLBACK_PROVIDER))?;
                fallback.embed(texts).await
            }
            other => other,
        }
    }

    /// Concurrently probe every registered provider. Best-effort: warm-up
    /// never fails and never blocks startup on an unreachable backend.
    pub async fn warmup_all(&self) {
        join_all(self.providers.values().map(|provider| provider.warmup())).await;
    }
}
