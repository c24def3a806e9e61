//! Agent state management

use crate::tools::{Action, ToolResult};

/// Default cap on model calls per run
pub const DEFAULT_MAX_CYCLES: usize = 10;

/// Default number of history entries fed back into the prompt
pub const DEFAULT_HISTORY_LIMIT: usize = 10;

/// Configuration for the agent
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Maximum cycles before stopping
    pub max_cycles: usize,
    /// Trailing history entries included in each prompt
    pub history_limit: usize,
    /// Whether to print actions and results
    pub verbose: bool,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_cycles: DEFAULT_MAX_CYCLES,
            history_limit: DEFAULT_HISTORY_LIMIT,
            verbose: true,
        }
    }
}

impl AgentConfig {
    pub fn with_max_cycles(mut self, max: usize) -> Self {
        self.max_cycles = max;
        self
    }

    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

/// Where the loop is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopStatus {
    Running,
    /// The model sent `end` (or something unparseable)
    StoppedByModel,
    /// The cycle cap was hit
    StoppedByLimit,
}

impl std::fmt::Display for LoopStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoopStatus::Running => write!(f, "running"),
            LoopStatus::StoppedByModel => write!(f, "stopped by model"),
            LoopStatus::StoppedByLimit => write!(f, "stopped by cycle limit"),
        }
    }
}

/// Rendered record of past cycles.
///
/// Storage is unbounded; only the trailing window goes into a prompt.
#[derive(Debug, Clone, Default)]
pub struct History {
    entries: Vec<String>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one cycle's action, its result and the sandbox snapshot
    pub fn record(&mut self, action: &Action, result: &ToolResult, snapshot: &str) {
        self.entries.push(format!(
            "Action: {} => Result: {} + File Structure till now:\n{}",
            action, result, snapshot
        ));
    }

    /// The last `limit` entries, oldest first
    pub fn recent(&self, limit: usize) -> &[String] {
        let start = self.entries.len().saturating_sub(limit);
        &self.entries[start..]
    }

    /// The trailing window joined into a single context block
    pub fn render(&self, limit: usize) -> String {
        self.recent(limit).join("\n")
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// State of the agent during execution
#[derive(Debug)]
pub struct AgentState {
    pub history: History,
    /// Cycles started so far; one past the cap once the limit trips
    pub cycle: usize,
    pub status: LoopStatus,
    /// The model's closing message, when it stopped the run
    pub final_message: Option<String>,
}

impl AgentState {
    pub fn new() -> Self {
        Self {
            history: History::new(),
            cycle: 0,
            status: LoopStatus::Running,
            final_message: None,
        }
    }

    pub fn increment_cycle(&mut self) {
        self.cycle += 1;
    }

    pub fn mark_finished(&mut self, message: String) {
        self.status = LoopStatus::StoppedByModel;
        self.final_message = Some(message);
    }

    pub fn mark_limit_reached(&mut self) {
        self.status = LoopStatus::StoppedByLimit;
    }

    /// Cycles that actually called the model
    pub fn cycles_run(&self, max_cycles: usize) -> usize {
        self.cycle.min(max_cycles)
    }
}

impl Default for AgentState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::{ToolError, ToolResult};

    #[test]
    fn test_agent_config_builder() {
        let config = AgentConfig::default()
            .with_max_cycles(3)
            .with_history_limit(1)
            .with_verbose(false);

        assert_eq!(config.max_cycles, 3);
        assert_eq!(config.history_limit, 1);
        assert!(!config.verbose);
    }

    #[test]
    fn test_agent_state_transitions() {
        let mut state = AgentState::new();
        assert_eq!(state.cycle, 0);
        assert_eq!(state.status, LoopStatus::Running);

        state.increment_cycle();
        assert_eq!(state.cycle, 1);

        state.mark_finished("Task complete.".to_string());
        assert_eq!(state.status, LoopStatus::StoppedByModel);
        assert_eq!(state.final_message.as_deref(), Some("Task complete."));
    }

    #[test]
    fn test_history_window() {
        let mut history = History::new();
        let action = Action::end("x");
        for i in 0..5 {
            history.record(&action, &ToolResult::success(format!("r{}", i)), "tree");
        }

        assert_eq!(history.len(), 5);
        let recent = history.recent(2);
        assert_eq!(recent.len(), 2);
        assert!(recent[0].contains("Result: r3"));
        assert!(recent[1].contains("Result: r4"));
        assert_eq!(history.recent(50).len(), 5);
        assert_eq!(history.render(0), "");
    }

    #[test]
    fn test_history_entry_format() {
        let mut history = History::new();
        history.record(
            &Action::end("bye"),
            &ToolResult::failure(ToolError::InvalidRange),
            "workspace\n└── a.txt",
        );
        assert_eq!(
            history.entries()[0],
            "Action: {\"action\":\"end\",\"args\":{},\"message\":\"bye\"} => Result: [ERROR] Invalid line range. \
             + File Structure till now:\nworkspace\n└── a.txt"
        );
    }

    #[test]
    fn test_cycles_run_caps_at_max() {
        let mut state = AgentState::new();
        for _ in 0..11 {
            state.increment_cycle();
        }
        state.mark_limit_reached();
        assert_eq!(state.cycles_run(10), 10);
        assert_eq!(state.status, LoopStatus::StoppedByLimit);
    }
}
