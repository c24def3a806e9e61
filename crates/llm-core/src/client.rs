//! The completion boundary shared by all providers

use anyhow::{bail, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::{Config, ProviderKind};
use crate::ollama::OllamaClient;
use crate::openai::OpenAiClient;

/// Chat message role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    /// Role of every reply
    Assistant,
}

/// A single chat message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Sampling options sent with every request
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ChatOptions {
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

/// Anything that turns a prompt into a completion.
///
/// The agent only ever sends a single user message and reads back the text
/// of the reply, so this is the whole contract.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Model identifier used for requests
    fn model(&self) -> &str;

    /// Send `prompt` as a single user message and return the reply text
    async fn complete(&self, prompt: &str) -> Result<String>;
}

/// Build the client described by `config`
pub fn from_config(config: &Config) -> Result<Box<dyn CompletionClient>> {
    let provider = &config.provider;
    let options = ChatOptions {
        temperature: Some(provider.temperature),
        max_tokens: Some(provider.max_tokens),
    };

    match provider.kind {
        ProviderKind::Ollama => {
            let client = OllamaClient::with_timeout(&provider.base_url, provider.timeout_secs)?
                .with_model(&provider.model)
                .with_options(options);
            Ok(Box::new(client))
        }
        ProviderKind::OpenAi => {
            let Some(api_key) = provider.api_key() else {
                bail!(
                    "No API key found; set {} or switch provider.kind to \"ollama\" in llm.toml",
                    provider.api_key_env.as_deref().unwrap_or("an api_key_env")
                );
            };
            let client = OpenAiClient::new(&provider.base_url, api_key, provider.timeout_secs)?
                .with_model(&provider.model)
                .with_options(options);
            Ok(Box::new(client))
        }
    }
}
