//! User configuration for fs-agent
//!
//! Configuration file: ~/.config/fs-agent/config.toml (or platform equivalent)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::agent::{AgentConfig, DEFAULT_HISTORY_LIMIT, DEFAULT_MAX_CYCLES};
use crate::tools::path_guard::DEFAULT_ROOT;
use crate::tools::ToolContext;
use crate::workflow::DEFAULT_STATE_FILE;

/// User configuration for the fs-agent CLI
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UserConfig {
    /// Agent loop configuration
    #[serde(default)]
    pub agent: AgentSection,

    /// Scripted workflow configuration
    #[serde(default)]
    pub workflow: WorkflowSection,
}

/// Agent loop configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSection {
    /// Directory every tool path is rewritten under
    #[serde(default = "default_sandbox_root")]
    pub sandbox_root: PathBuf,

    /// Model override (uses llm.toml provider model if not set)
    #[serde(default)]
    pub model: Option<String>,

    /// Maximum model calls per run
    #[serde(default = "default_max_cycles")]
    pub max_cycles: usize,

    /// History entries fed back into each prompt
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    /// Depth of the directory snapshot taken after each action
    #[serde(default = "default_list_depth")]
    pub list_depth: usize,

    /// Lines shown around each keyword match in `read_file`
    #[serde(default = "default_read_context")]
    pub read_context: usize,

    /// Print each action and result
    #[serde(default = "default_verbose")]
    pub verbose: bool,
}

/// Scripted workflow configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowSection {
    /// Path of the JSON state file
    #[serde(default = "default_state_file")]
    pub state_file: PathBuf,
}

fn default_sandbox_root() -> PathBuf {
    PathBuf::from(DEFAULT_ROOT)
}

fn default_max_cycles() -> usize {
    DEFAULT_MAX_CYCLES
}

fn default_history_limit() -> usize {
    DEFAULT_HISTORY_LIMIT
}

fn default_list_depth() -> usize {
    2
}

fn default_read_context() -> usize {
    2
}

fn default_verbose() -> bool {
    true
}

fn default_state_file() -> PathBuf {
    PathBuf::from(DEFAULT_STATE_FILE)
}

impl Default for AgentSection {
    fn default() -> Self {
        Self {
            sandbox_root: default_sandbox_root(),
            model: None,
            max_cycles: default_max_cycles(),
            history_limit: default_history_limit(),
            list_depth: default_list_depth(),
            read_context: default_read_context(),
            verbose: default_verbose(),
        }
    }
}

impl Default for WorkflowSection {
    fn default() -> Self {
        Self {
            state_file: default_state_file(),
        }
    }
}

impl AgentSection {
    pub fn agent_config(&self) -> AgentConfig {
        AgentConfig::default()
            .with_max_cycles(self.max_cycles)
            .with_history_limit(self.history_limit)
            .with_verbose(self.verbose)
    }

    pub fn tool_context(&self) -> ToolContext {
        ToolContext::new(&self.sandbox_root)
            .with_list_depth(self.list_depth)
            .with_read_context(self.read_context)
    }
}

impl UserConfig {
    /// Load user configuration from default location
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("fs-agent").join("config.toml"))
    }

    /// Create a default configuration file with comments
    pub fn create_default() -> Result<PathBuf> {
        let path = Self::config_path()?;

        if path.exists() {
            anyhow::bail!("Config file already exists: {}", path.display());
        }

        // Create directory if needed
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(&path, DEFAULT_CONFIG)?;

        Ok(path)
    }
}

const DEFAULT_CONFIG: &str = r#"# fs-agent configuration
# Location: ~/.config/fs-agent/config.toml

[agent]
# Directory the agent may touch; every tool path is rewritten under it
sandbox_root = "workspace"

# Model override (uses the llm.toml provider model if not set)
# model = "llama3-8b-8192"

# Maximum model calls per run
max_cycles = 10

# History entries fed back into each prompt
history_limit = 10

# Depth of the directory snapshot taken after each action
list_depth = 2

# Lines shown around each keyword match in read_file
read_context = 2

# Print each action and result
verbose = true

[workflow]
# State file for the scripted workflow
state_file = "agent_state.json"
"#;
