//! Error types for the AI orchestration core

use thiserror::Error;

/// Result type alias for AI core operations
pub type Result<T> = std::result::Result<T, Error>;

/// AI orchestration and retrieval errors
#[derive(Debug, Error)]
pub enum Error {
    /// Required provider credentials are absent; checked before any network call
    #[error("Provider configuration error: {0}")]
    ProviderConfig(String),

    /// The backing service is unreachable, rejected the request, or returned
    /// a malformed response
    #[error("Provider '{provider}' unavailable: {message}")]
    ProviderUnavailable { provider: String, message: String },

    /// The provider lacks the requested capability
    #[error("Provider '{provider}' does not support {capability}")]
    NotSupported { provider: String, capability: String },

    /// Caller named a provider absent from the registry
    #[error("Provider '{0}' is not configured")]
    UnknownProvider(String),

    /// The vector index or the embedding step failed outright.
    /// Distinct from an empty result list, which is not an error.
    #[error("Retrieval failed: {0}")]
    RetrievalUnavailable(String),

    /// Configuration error (file/env parsing, invalid values)
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a provider-unavailable error
    pub fn unavailable(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ProviderUnavailable {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create a not-supported error
    pub fn not_supported(provider: impl Into<String>, capability: impl Into<String>) -> Self {
        Self::NotSupported {
            provider: provider.into(),
            capability: capability.into(),
        }
    }

    /// Create a provider configuration error
    pub fn provider_config(message: impl Into<String>) -> Self {
        Self::ProviderConfig(message.into())
    }

    /// Create a retrieval error
    pub fn retrieval(message: impl Into<String>) -> Self {
        Self::RetrievalUnavailable(message.into())
    }
}
