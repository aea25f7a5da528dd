//! OpenAI-compatible chat completions transport.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::config::RemoteConfig;
use crate::error::{SentimentError, SentimentResult};
use crate::remote::CompletionTransport;

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Value,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

/// HTTP transport posting to a chat completions endpoint with bearer auth.
#[derive(Debug, Clone)]
pub struct HttpCompletionTransport {
    client: Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl HttpCompletionTransport {
    /// Build from config, reading the API key from `config.api_key_env`.
    pub fn from_config(config: &RemoteConfig) -> SentimentResult<Self> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                SentimentError::Configuration(format!("missing {}", config.api_key_env))
            })?;
        Self::new(config, api_key)
    }

    /// Build with an explicit API key.
    pub fn new(config: &RemoteConfig, api_key: impl Into<String>) -> SentimentResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                SentimentError::Configuration(format!("failed to build HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            api_key: api_key.into(),
        })
    }
}

#[async_trait]
impl CompletionTransport for HttpCompletionTransport {
    async fn complete(&self, instruction: &str, text: &str) -> SentimentResult<String> {
        let payload = json!({
            "model": self.model,
            "temperature": 0,
            "messages": [
                { "role": "system", "content": instruction },
                { "role": "user", "content": text },
            ],
        });

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| SentimentError::Configuration(format!("sentiment request failed: {}", e)))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(SentimentError::Configuration(format!(
                "sentiment provider rejected credentials ({})",
                status
            )));
        }
        if !status.is_success() {
            return Err(SentimentError::Transport(format!(
                "sentiment provider returned {}",
                status
            )));
        }

        // An undecodable envelope is treated like undecodable content: the
        // caller falls back to local scoring.
        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| SentimentError::MalformedResponse(format!("invalid response: {}", e)))?;

        let content = body
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| SentimentError::MalformedResponse("no choices in response".into()))?;

        Ok(match content {
            Value::String(text) => text,
            other => other.to_string(),
        })
    }
}
