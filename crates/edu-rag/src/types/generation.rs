//! Generation request/response types

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Open key-value bag carried through requests and responses.
///
/// Opaque to the orchestrator: forwarded unchanged into the response
/// metadata, except for fallback annotations added on provider substitution.
pub type Metadata = serde_json::Map<String, Value>;

/// A single text-generation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// User prompt text
    pub prompt: String,
    /// Optional system instruction
    pub system_prompt: Option<String>,
    /// Sampling temperature. Network-backed providers clip absurd values
    /// into [0.0, 2.0] before forwarding.
    pub temperature: f32,
    /// Maximum tokens to generate
    pub max_tokens: u32,
    /// Caller metadata, forwarded unchanged into the result
    #[serde(default)]
    pub metadata: Metadata,
}

impl GenerationRequest {
    /// Create a request with the default temperature and token budget
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            system_prompt: None,
            temperature: 0.3,
            max_tokens: 800,
            metadata: Metadata::new(),
        }
    }

    /// Set the system instruction
    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(system_prompt.into());
        self
    }

    /// Set the sampling temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the token budget
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Attach caller metadata
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }
}

/// Result of a text-generation call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationResult {
    /// Generated text
    pub content: String,
    /// Name of the provider that actually produced the content.
    /// May differ from the requested provider when fallback occurred.
    pub provider: String,
    /// Token accounting, provider-specific shape, treated as opaque
    #[serde(default)]
    pub usage: Metadata,
    /// Request metadata merged with any fallback annotations
    #[serde(default)]
    pub metadata: Metadata,
}
