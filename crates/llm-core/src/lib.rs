//! llm-core: model-calling boundary for fs-agent
//!
//! Provides:
//! - Configuration loading (llm.toml)
//! - The `CompletionClient` trait (prompt in, text out)
//! - Ollama chat client
//! - OpenAI-compatible chat client (Groq, OpenRouter, local gateways)

pub mod client;
pub mod config;
pub mod ollama;
pub mod openai;

pub use client::{from_config, ChatMessage, ChatOptions, CompletionClient, Role};
pub use config::{Config, ProviderConfig, ProviderKind};
pub use ollama::OllamaClient;
pub use openai::OpenAiClient;
