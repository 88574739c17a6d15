//! OpenAI provider for chat completions and embeddings

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::OpenAiConfig;
use crate::error::{Error, Result};
use crate::types::{GenerationRequest, GenerationResult, Metadata};

use super::llm::LlmProvider;

/// OpenAI provider. The embedding endpoint makes this the substitution
/// target when another provider reports `NotSupported` for embeddings.
pub struct OpenAiProvider {
    client: Client,
    config: OpenAiConfig,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Metadata,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

#[derive(Serialize)]
struct EmbedRequest {
    model: String,
    input: Vec<String>,
}

#[derive(Deserialize)]
struct EmbedResponse {
    data: Vec<EmbedItem>,
}

#[derive(Deserialize)]
struct EmbedItem {
    index: usize,
    embedding: Vec<f32>,
}

impl OpenAiProvider {
    /// Create a new OpenAI provider with a pooled HTTP client
    pub fn new(config: &OpenAiConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(5)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            config: config.clone(),
        }
    }

    fn api_key(&self) -> Result<&str> {
        self.config
            .api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| Error::provider_config("OpenAI API key not configured"))
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResult> {
        let api_key = self.api_key()?;

        let mut messages = Vec::with_capacity(2);
        if let Some(system_prompt) = &request.system_prompt {
            messages.push(ChatMessage {
                role: "system",
                content: system_prompt.clone(),
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: request.prompt.clone(),
        });

        let payload = ChatRequest {
            model: self.config.chat_model.clone(),
            messages,
            temperature: request.temperature.clamp(0.0, 2.0),
            max_tokens: request.max_tokens,
        };

        let url = format!("{}/chat/completions", self.config.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| Error::unavailable(self.name(), format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::unavailable(
                self.name(),
                format!("generation failed ({}): {}", status, body),
            ));
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| Error::unavailable(self.name(), format!("malformed response: {}", e)))?;

        let content = chat_response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| Error::unavailable(self.name(), "no choices in response"))?;

        Ok(GenerationResult {
            content,
            provider: self.name().to_string(),
            usage: chat_response.usage,
            metadata: request.metadata.clone(),
        })
    }

    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let api_key = self.api_key()?;

        let payload = EmbedRequest {
            model: self.config.embed_model.clone(),
            input: texts.to_vec(),
        };

        let url = format!("{}/embeddings", self.config.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| Error::unavailable(self.name(), format!("embedding request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::unavailable(
                self.name(),
                format!("embedding failed ({}): {}", status, body),
            ));
        }

        let embed_response: EmbedResponse = response
            .json()
            .await
            .map_err(|e| Error::unavailable(self.name(), format!("malformed response: {}", e)))?;

        if embed_response.data.len() != texts.len() {
            return Err(Error::unavailable(
                self.name(),
                format!(
                    "expected {} embeddings, got {}",
                    texts.len(),
                    embed_response.data.len()
                ),
            ));
        }

        // The service tags each vector with its input index; re-order so
        // output order always matches input order.
        let mut items = embed_response.data;
        items.sort_by_key(|item| item.index);

        Ok(items.into_iter().map(|item| item.embedding).collect())
    }

    async fn warmup(&self) {
        let Some(api_key) = self.config.api_key.as_deref().filter(|key| !key.is_empty()) else {
            return;
        };

        let url = format!("{}/models", self.config.base_url);
        if let Err(e) = self.client.get(&url).bearer_auth(api_key).send().await {
            tracing::debug!("OpenAI warmup probe failed: {}", e);
        }
    }

    fn name(&self) -> &str {
        "openai"
    }
}
