//! Configuration management for llm.toml

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Which wire protocol the provider speaks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Ollama's native `/api/chat`
    Ollama,
    /// OpenAI-compatible `/chat/completions` (Groq, OpenRouter, ...)
    #[serde(alias = "groq")]
    OpenAi,
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderKind::Ollama => write!(f, "ollama"),
            ProviderKind::OpenAi => write!(f, "openai"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub provider: ProviderConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    #[serde(default = "default_kind")]
    pub kind: ProviderKind,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Upper bound on a single model call
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Environment variable holding the API key (OpenAI-compatible providers)
    #[serde(default = "default_api_key_env")]
    pub api_key_env: Option<String>,
}

fn default_kind() -> ProviderKind {
    ProviderKind::OpenAi
}

fn default_base_url() -> String {
    "https://api.groq.com/openai/v1".to_string()
}

fn default_model() -> String {
    "llama3-8b-8192".to_string()
}

fn default_temperature() -> f32 {
    0.2
}

fn default_max_tokens() -> u32 {
    500
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_api_key_env() -> Option<String> {
    Some("GROQ_API_KEY".to_string())
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            kind: default_kind(),
            base_url: default_base_url(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout_secs(),
            api_key_env: default_api_key_env(),
        }
    }
}

impl ProviderConfig {
    /// Read the API key from the configured environment variable
    pub fn api_key(&self) -> Option<String> {
        self.api_key_env
            .as_deref()
            .and_then(|name| std::env::var(name).ok())
            .filter(|key| !key.trim().is_empty())
    }
}

impl Config {
    /// Load configuration from llm.toml
    pub fn load() -> Result<Self> {
        Self::load_from(Self::find_config_path()?)
    }

    /// Try to load configuration, returning None if not found
    pub fn try_load() -> Option<Self> {
        Self::load().ok()
    }

    /// Create a minimal default configuration for when llm.toml is missing
    pub fn default_minimal() -> Self {
        Self {
            provider: ProviderConfig::default(),
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read {}", path.as_ref().display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.as_ref().display()))
    }

    /// Find llm.toml by searching current directory and parents
    pub fn find_config_path() -> Result<PathBuf> {
        let mut current = std::env::current_dir()?;

        for _ in 0..10 {
            let candidate = current.join("llm.toml");
            if candidate.exists() {
                return Ok(candidate);
            }
            if !current.pop() {
                break;
            }
        }

        anyhow::bail!("llm.toml not found in current directory or parents")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let toml = r#"
[provider]
kind = "ollama"
base_url = "http://127.0.0.1:11434"
model = "qwen2.5-coder:7b"
temperature = 0.0
timeout_secs = 120
"#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.provider.kind, ProviderKind::Ollama);
        assert_eq!(config.provider.model, "qwen2.5-coder:7b");
        assert_eq!(config.provider.timeout_secs, 120);
        // Unset fields fall back to defaults
        assert_eq!(config.provider.max_tokens, 500);
    }

    #[test]
    fn test_groq_alias() {
        let config: Config = toml::from_str("[provider]\nkind = \"groq\"\n").unwrap();
        assert_eq!(config.provider.kind, ProviderKind::OpenAi);
        assert_eq!(config.provider.api_key_env.as_deref(), Some("GROQ_API_KEY"));
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.provider.kind, ProviderKind::OpenAi);
        assert_eq!(config.provider.model, "llama3-8b-8192");
        assert!((config.provider.temperature - 0.2).abs() < f32::EPSILON);
    }

    #[test]
    fn test_load_from_missing_file() {
        let err = Config::load_from("/nonexistent/llm.toml").unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }

    #[test]
    fn test_api_key_unset_env() {
        let provider = ProviderConfig {
            api_key_env: Some("FS_AGENT_TEST_KEY_THAT_IS_NOT_SET".to_string()),
            ..Default::default()
        };
        assert!(provider.api_key().is_none());
    }
}
