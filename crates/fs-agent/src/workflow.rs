//! Scripted, model-free workflow
//!
//! A fixed two-step flow driven by a JSON state file: the first step creates a
//! page component under `sample_project`, the second marks the task complete.
//! Useful for exercising the tool set without a model.

use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::{debug, info, warn};

use crate::tools::builtin::{list_directory, write_file};
use crate::tools::{ToolContext, ToolError};

/// Default state file name, relative to the working directory
pub const DEFAULT_STATE_FILE: &str = "agent_state.json";

/// Task a fresh state file starts with
pub const DEFAULT_TASK: &str = "Add a new page in React app";

const PROJECT_DIR: &str = "sample_project";
const PAGE_FILE: &str = "NewPage.jsx";
const PAGE_COMPONENT: &str =
    "export default function NewPage() {\n    return <div>New Page</div>\n}";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    InProgress,
    Continue,
    Complete,
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskStatus::InProgress => write!(f, "in_progress"),
            TaskStatus::Continue => write!(f, "continue"),
            TaskStatus::Complete => write!(f, "complete"),
        }
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "in_progress" => Ok(TaskStatus::InProgress),
            "continue" => Ok(TaskStatus::Continue),
            "complete" => Ok(TaskStatus::Complete),
            other => anyhow::bail!(
                "Invalid status '{}'. Use 'in_progress', 'continue' or 'complete'.",
                other
            ),
        }
    }
}

/// Persisted workflow state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowState {
    pub task: String,
    pub status: TaskStatus,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub cycle: u32,
}

impl Default for WorkflowState {
    fn default() -> Self {
        Self::new(DEFAULT_TASK)
    }
}

impl WorkflowState {
    pub fn new(task: impl Into<String>) -> Self {
        Self {
            task: task.into(),
            status: TaskStatus::InProgress,
            message: None,
            cycle: 0,
        }
    }
}

/// Reads and writes the state file
#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<WorkflowState> {
        let content = fs::read_to_string(&self.path).with_context(|| {
            format!(
                "Failed to read workflow state from {} (run `fs-agent workflow init` first)",
                self.path.display()
            )
        })?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse workflow state from {}", self.path.display()))
    }

    pub fn save(&self, state: &WorkflowState) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string_pretty(state)?;
        fs::write(&self.path, content)
            .with_context(|| format!("Failed to write workflow state to {}", self.path.display()))?;
        debug!(path = %self.path.display(), cycle = state.cycle, "Saved workflow state");
        Ok(())
    }

    /// Overwrite the state file with a fresh state for `task`
    pub fn reset(&self, task: Option<&str>) -> Result<WorkflowState> {
        let state = task.map(WorkflowState::new).unwrap_or_default();
        self.save(&state)?;
        info!(path = %self.path.display(), "Workflow state initialized");
        Ok(state)
    }
}

/// Record a status change; returns the confirmation line
pub fn set_task_flag(state: &mut WorkflowState, status: TaskStatus, message: Option<&str>) -> String {
    state.status = status;
    state.message = message.map(str::to_string);
    format!(
        "[TASK FLAG] Status set to '{}'. Message: {}",
        status,
        message.unwrap_or("None")
    )
}

/// What one scripted step did
#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    /// The page component was written
    Created { tree: String, file: PathBuf },
    /// The component already existed; task is done
    Completed { tree: String },
    /// The task text matches no scripted flow
    NoHandler,
}

/// Advance the workflow by one step
pub fn run_cycle(state: &mut WorkflowState, ctx: &ToolContext) -> Result<CycleOutcome> {
    if !state.task.to_lowercase().contains("new page") {
        warn!(task = %state.task, "No handler for this task");
        return Ok(CycleOutcome::NoHandler);
    }

    state.cycle += 1;
    info!(cycle = state.cycle, task = %state.task, "Workflow cycle");

    let project = ctx.sandbox.normalize(PROJECT_DIR);
    let tree = match list_directory(&project, ctx.list_depth) {
        Ok(tree) => tree,
        Err(e) => e.to_string(),
    };

    let page = project.join(PAGE_FILE);
    if page.exists() {
        debug!(file = %page.display(), "Page component already exists");
        set_task_flag(state, TaskStatus::Complete, Some("Page setup complete."));
        return Ok(CycleOutcome::Completed { tree });
    }

    write_file(&page, PAGE_COMPONENT, "overwrite")?;
    set_task_flag(
        state,
        TaskStatus::Continue,
        Some("Component created. Router update next."),
    );
    Ok(CycleOutcome::Created { tree, file: page })
}

/// Static outline of a source file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileSummary {
    pub file: String,
    pub lines: usize,
    pub functions: Vec<String>,
    pub classes: Vec<String>,
}

struct Patterns {
    function: Regex,
    class: Regex,
}

fn patterns() -> Result<&'static Patterns> {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    if let Some(p) = PATTERNS.get() {
        return Ok(p);
    }
    let compiled = Patterns {
        function: Regex::new(r"^\s*(?:def|function)\s+\w+\(")?,
        class: Regex::new(r"^\s*class\s+\w+")?,
    };
    Ok(PATTERNS.get_or_init(|| compiled))
}

/// Count lines and pick out Python/JS function and class declarations
pub fn summarize_file(path: &Path) -> Result<FileSummary> {
    if !path.exists() {
        return Err(ToolError::FileNotFound(path.to_path_buf()).into());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let patterns = patterns()?;

    let mut summary = FileSummary {
        file: path.display().to_string(),
        lines: content.lines().count(),
        functions: Vec::new(),
        classes: Vec::new(),
    };

    for line in content.lines() {
        if patterns.function.is_match(line) {
            summary.functions.push(line.trim().to_string());
        }
        if patterns.class.is_match(line) {
            summary.classes.push(line.trim().to_string());
        }
    }

    Ok(summary)
}
