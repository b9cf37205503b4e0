//! Ollama-compatible chat model.

use std::time::Duration;

use async_trait::async_trait;
use fathom_core::errors::{ConfigError, ProviderError};
use fathom_core::traits::IReasoningModel;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    stream: bool,
    options: ChatOptions,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatOptions {
    temperature: f64,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: String,
}

/// Reasoning model served by `POST {base_url}/api/chat`, non-streaming.
pub struct OllamaModel {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    name: String,
    timeout: Duration,
}

impl OllamaModel {
    pub fn new(base_url: &str, model: &str, timeout: Duration) -> Result<Self, ConfigError> {
        let base_url = base_url.trim().trim_end_matches('/');
        if base_url.is_empty() {
            return Err(ConfigError::MissingCredential {
                name: "providers.model_base_url".to_string(),
            });
        }
        if model.trim().is_empty() {
            return Err(ConfigError::MissingCredential {
                name: "providers.model_name".to_string(),
            });
        }
        let client = reqwest::Client::builder()
            .user_agent(concat!("fathom/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ConfigError::ValidationFailed {
                field: "providers.model_base_url".to_string(),
                message: e.to_string(),
            })?;
        Ok(Self {
            client,
            endpoint: format!("{base_url}/api/chat"),
            model: model.trim().to_string(),
            name: format!("ollama:{}", model.trim()),
            timeout,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn map_error(&self, e: reqwest::Error) -> ProviderError {
        if e.is_timeout() {
            ProviderError::Timeout {
                operation: "chat completion".to_string(),
                timeout_ms: self.timeout.as_millis() as u64,
            }
        } else {
            ProviderError::Unavailable {
                provider: self.name.clone(),
                reason: e.to_string(),
            }
        }
    }
}

#[async_trait]
impl IReasoningModel for OllamaModel {
    async fn complete(&self, prompt: &str, temperature: f64) -> Result<String, ProviderError> {
        let body = ChatRequest {
            model: &self.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
            stream: false,
            options: ChatOptions { temperature },
        };
        let response = self
            .client
            .post(&self.endpoint)
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_error(e))?
            .error_for_status()
            .map_err(|e| self.map_error(e))?;
        let parsed: ChatResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                self.map_error(e)
            } else {
                ProviderError::malformed(&self.name, e.to_string())
            }
        })?;
        tracing::trace!(model = %self.model, chars = parsed.message.content.len(), "chat completion");
        Ok(parsed.message.content)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
