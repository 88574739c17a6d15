//! Configuration for the AI orchestration core

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};

/// Main configuration for the orchestration and retrieval core
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    /// Provider used when the caller does not name one
    #[serde(default = "default_provider")]
    pub default_provider: String,
    /// Force every retrieval and generation onto the deterministic mock.
    /// Used for offline and test operation.
    #[serde(default)]
    pub mock_mode: bool,
    /// Automatic one-shot mock fallback on generation failure.
    /// Disable to surface real provider errors to callers.
    #[serde(default = "default_auto_fallback")]
    pub auto_fallback: bool,
    /// DeepSeek provider configuration
    #[serde(default)]
    pub deepseek: DeepSeekConfig,
    /// OpenAI provider configuration
    #[serde(default)]
    pub openai: OpenAiConfig,
    /// Vector index configuration
    #[serde(default)]
    pub vector_db: VectorDbConfig,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            default_provider: default_provider(),
            mock_mode: false,
            auto_fallback: true,
            deepseek: DeepSeekConfig::default(),
            openai: OpenAiConfig::default(),
            vector_db: VectorDbConfig::default(),
        }
    }
}

fn default_provider() -> String {
    "deepseek".to_string()
}

fn default_auto_fallback() -> bool {
    true
}

/// DeepSeek chat-completions configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeepSeekConfig {
    /// Bearer credential; generation fails with a configuration error when absent
    pub api_key: Option<String>,
    /// API base URL
    pub base_url: String,
    /// Chat model name
    pub model: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for DeepSeekConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.deepseek.com/v1".to_string(),
            model: "deepseek-chat".to_string(),
            timeout_secs: 60,
        }
    }
}

/// OpenAI chat and embeddings configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiConfig {
    /// Bearer credential; calls fail with a configuration error when absent
    pub api_key: Option<String>,
    /// API base URL
    pub base_url: String,
    /// Chat model name
    pub chat_model: String,
    /// Embedding model name
    pub embed_model: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openai.com/v1".to_string(),
            chat_model: "gpt-4o-mini".to_string(),
            embed_model: "text-embedding-3-small".to_string(),
            timeout_secs: 60,
        }
    }
}

/// Vector index connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorDbConfig {
    /// Index URL. When absent the adapter runs in disabled mode: every
    /// operation is a no-op and retrieval degrades to the synthetic document.
    pub url: Option<String>,
    /// Optional api-key header value
    pub api_key: Option<String>,
    /// Collection name, one per deployment
    pub collection: String,
    /// Embedding dimensionality. All embeddings for one collection must
    /// share this dimensionality.
    pub vector_size: usize,
    /// Distance metric for the collection
    pub distance: DistanceMetric,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for VectorDbConfig {
    fn default() -> Self {
        Self {
            url: None,
            api_key: None,
            collection: "learning-materials".to_string(),
            vector_size: 1536,
            distance: DistanceMetric::Cosine,
            timeout_secs: 30,
        }
    }
}

/// Distance metric for the similarity index
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DistanceMetric {
    /// Cosine similarity
    #[default]
    Cosine,
    /// Dot product
    Dot,
    /// Euclidean distance
    Euclid,
}

impl DistanceMetric {
    /// Wire name understood by the index service
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cosine => "Cosine",
            Self::Dot => "Dot",
            Self::Euclid => "Euclid",
        }
    }
}

impl AiConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        toml::from_str(&raw).map_err(|e| Error::Config(format!("invalid config file: {}", e)))
    }

    /// Build configuration from environment variables, starting from defaults.
    ///
    /// Recognized variables: `EDU_RAG_DEFAULT_PROVIDER`, `EDU_RAG_MOCK_MODE`,
    /// `EDU_RAG_AUTO_FALLBACK`, `DEEPSEEK_API_KEY`, `DEEPSEEK_MODEL`,
    /// `OPENAI_API_KEY`, `OPENAI_CHAT_MODEL`, `OPENAI_EMBED_MODEL`,
    /// `QDRANT_URL`, `QDRANT_API_KEY`, `QDRANT_COLLECTION`,
    /// `EDU_RAG_VECTOR_SIZE`.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(name) = std::env::var("EDU_RAG_DEFAULT_PROVIDER") {
            config.default_provider = name;
        }
        if let Ok(flag) = std::env::var("EDU_RAG_MOCK_MODE") {
            config.mock_mode = parse_bool(&flag);
        }
        if let Ok(flag) = std::env::var("EDU_RAG_AUTO_FALLBACK") {
            config.auto_fallback = parse_bool(&flag);
        }
        if let Ok(key) = std::env::var("DEEPSEEK_API_KEY") {
            config.deepseek.api_key = Some(key);
        }
        if let Ok(model) = std::env::var("DEEPSEEK_MODEL") {
            config.deepseek.model = model;
        }
        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            config.openai.api_key = Some(key);
        }
        if let Ok(model) = std::env::var("OPENAI_CHAT_MODEL") {
            config.openai.chat_model = model;
        }
        if let Ok(model) = std::env::var("OPENAI_EMBED_MODEL") {
            config.openai.embed_model = model;
        }
        if let Ok(url) = std::env::var("QDRANT_URL") {
            config.vector_db.url = Some(url);
        }
        if let Ok(key) = std::env::var("QDRANT_API_KEY") {
            config.vector_db.api_key = Some(key);
        }
        if let Ok(name) = std::env::var("QDRANT_COLLECTION") {
            config.vector_db.collection = name;
        }
        if let Ok(size) = std::env::var("EDU_RAG_VECTOR_SIZE") {
            if let Ok(parsed) = size.parse() {
                config.vector_db.vector_size = parsed;
            }
        }

        config
    }
}

fn parse_bool(raw: &str) -> bool {
    matches!(raw.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AiConfig::default();

        assert_eq!(config.default_provider, "deepseek");
        assert!(!config.mock_mode);
        assert!(config.auto_fallback);
        assert_eq!(config.vector_db.collection, "learning-materials");
        assert_eq!(config.vector_db.vector_size, 1536);
        assert!(config.vector_db.url.is_none());
    }

    #[test]
    fn test_parse_toml() {
        let raw = r#"
            default_provider = "openai"
            mock_mode = true

            [deepseek]
            base_url = "https://api.deepseek.com/v1"
            model = "deepseek-chat"
            timeout_secs = 30

            [vector_db]
            url = "http://qdrant:6333"
            collection = "learning-materials"
            vector_size = 768
            distance = "Cosine"
            timeout_secs = 10
        "#;

        let config: AiConfig = toml::from_str(raw).unwrap();
        assert_eq!(config.default_provider, "openai");
        assert!(config.mock_mode);
        assert!(config.auto_fallback);
        assert_eq!(config.deepseek.timeout_secs, 30);
        assert_eq!(config.vector_db.vector_size, 768);
        assert_eq!(config.vector_db.url.as_deref(), Some("http://qdrant:6333"));
    }

    #[test]
    fn test_parse_bool_forms() {
        assert!(parse_bool("true"));
        assert!(parse_bool("1"));
        assert!(parse_bool("YES"));
        assert!(!parse_bool("false"));
        assert!(!parse_bool("0"));
        assert!(!parse_bool(""));
    }
}
