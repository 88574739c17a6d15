//! DeepSeek provider over the OpenAI-compatible chat completions API

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::DeepSeekConfig;
use crate::error::{Error, Result};
use crate::types::{GenerationRequest, GenerationResult, Metadata};

use super::llm::LlmProvider;

/// DeepSeek chat-completions provider. Generation only; embedding requests
/// fail with `NotSupported` so the orchestrator can substitute a capable
/// provider.
pub struct DeepSeekProvider {
    client: Client,
    config: DeepSeekConfig,
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

impl DeepSeekProvider {
    /// Create a new DeepSeek provider with a pooled HTTP client
    pub fn new(config: &DeepSeekConfig) -> Self {
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
            .ok_or_else(|| Error::provider_config("DeepSeek API key not configured"))
    }
}

#[async_trait]
impl LlmProvider for DeepSeekProvider {
    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResult> {
        // Credential check happens before any network round trip
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
            model: self.config.model.clone(),
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

    async fn embed(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Err(Error::not_supported(self.name(), "embeddings"))
    }

    async fn warmup(&self) {
        // Lightweight connectivity probe; skipped without credentials
        let Some(api_key) = self.config.api_key.as_deref().filter(|key| !key.is_empty()) else {
            return;
        };

        let url = format!("{}/models", self.config.base_url);
        if let Err(e) = self.client.get(&url).bearer_auth(api_key).send().await {
            tracing::debug!("DeepSeek warmup probe failed: {}", e);
        }
    }

    fn name(&self) -> &str {
        "deepseek"
    }
}
