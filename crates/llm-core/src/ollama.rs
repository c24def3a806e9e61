//! Ollama API client

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

use crate::client::{ChatMessage, ChatOptions, CompletionClient};

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<ModelOptions>,
}

/// Ollama's name for the sampling knobs
#[derive(Debug, Serialize)]
struct ModelOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
}

impl From<ChatOptions> for ModelOptions {
    fn from(options: ChatOptions) -> Self {
        Self {
            temperature: options.temperature,
            num_predict: options.max_tokens,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: ChatMessage,
}

/// Ollama API client
#[derive(Debug, Clone)]
pub struct OllamaClient {
    base_url: String,
    model: String,
    options: ChatOptions,
    client: reqwest::Client,
}

impl OllamaClient {
    /// Create a new client with default timeout
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(base_url, 30)
    }

    /// Create a new client whose requests give up after `timeout_secs`
    pub fn with_timeout(base_url: impl Into<String>, timeout_secs: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: "llama3.2".to_string(),
            options: ChatOptions::default(),
            client,
        })
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_options(mut self, options: ChatOptions) -> Self {
        self.options = options;
        self
    }

    /// Check if Ollama is running
    pub async fn health_check(&self) -> Result<bool> {
        let url = format!("{}/api/tags", self.base_url);

        match self
            .client
            .get(&url)
            .timeout(Duration::from_secs(5))
            .send()
            .await
        {
            Ok(resp) => Ok(resp.status().is_success()),
            Err(_) => Ok(false),
        }
    }

    /// Non-streaming chat request, returning the assistant's reply
    #[instrument(skip(self, messages), fields(model = %self.model))]
    pub async fn chat(&self, messages: &[ChatMessage]) -> Result<String> {
        let url = format!("{}/api/chat", self.base_url);

        let req = ChatRequest {
            model: &self.model,
            messages,
            stream: false,
            options: Some(self.options.into()),
        };

        let resp: ChatResponse = self
            .client
            .post(&url)
            .json(&req)
            .send()
            .await
            .context("Failed to connect to Ollama")?
            .error_for_status()
            .context("Ollama chat request failed")?
            .json()
            .await
            .context("Failed to parse chat response")?;

        debug!(reply_len = resp.message.content.len(), "Received chat reply");
        Ok(resp.message.content.trim().to_string())
    }
}

#[async_trait]
impl CompletionClient for OllamaClient {
    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        self.chat(&[ChatMessage::user(prompt)]).await
    }
}
