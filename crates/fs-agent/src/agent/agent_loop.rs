//! Agent loop implementation

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use llm_core::CompletionClient;
use tracing::{debug, info, instrument, warn};

use crate::tools::builtin::{catalog, list_directory};
use crate::tools::{execute, ToolContext, ToolDescriptor};

use super::parse::parse_response;
use super::prompt::build_prompt;
use super::state::{AgentConfig, AgentState};

// ANSI colors
const GREEN: &str = "\x1b[92m";
const YELLOW: &str = "\x1b[93m";
const CYAN: &str = "\x1b[96m";
const DIM: &str = "\x1b[2m";
const RESET: &str = "\x1b[0m";

/// The agent loop orchestrator
pub struct AgentLoop {
    client: Arc<dyn CompletionClient>,
    ctx: ToolContext,
    config: AgentConfig,
    tools: Vec<ToolDescriptor>,
}

impl AgentLoop {
    /// Create a new agent loop
    pub fn new(client: Arc<dyn CompletionClient>, ctx: ToolContext, config: AgentConfig) -> Self {
        Self {
            client,
            ctx,
            config,
            tools: catalog(),
        }
    }

    /// Run the agent with a task
    #[instrument(skip(self), fields(model = %self.client.model()))]
    pub async fn run(&self, task: &str) -> Result<AgentState> {
        info!(
            task_len = task.len(),
            max_cycles = self.config.max_cycles,
            root = %self.ctx.sandbox.root().display(),
            "Starting agent loop"
        );
        let mut state = AgentState::new();

        if self.config.verbose {
            println!("{}[Task]{} {}", CYAN, RESET, task);
        }

        loop {
            state.increment_cycle();
            if state.cycle > self.config.max_cycles {
                warn!(max_cycles = self.config.max_cycles, "Agent reached maximum cycles");
                if self.config.verbose {
                    println!("{}[STOP]{} Max cycles reached without completion.", YELLOW, RESET);
                }
                state.mark_limit_reached();
                break;
            }
            debug!(cycle = state.cycle, history = state.history.len(), "Starting cycle");

            let context = state.history.render(self.config.history_limit);
            let prompt = build_prompt(task, &context, &self.tools);

            let response = self
                .ask_model(&prompt, state.cycle)
                .await
                .with_context(|| format!("Model call failed in cycle {}", state.cycle))?;

            let action = parse_response(&response);
            if self.config.verbose {
                println!("{}[Cycle {}]{} {}[LLM ACTION]{} {}", DIM, state.cycle, RESET, CYAN, RESET, action);
            }

            if action.is_end() {
                info!(cycles = state.cycle, message = %action.message, "Agent completed task");
                if self.config.verbose {
                    println!("{}Task completed by LLM.{}", GREEN, RESET);
                }
                state.mark_finished(action.message);
                break;
            }

            let result = execute(&action, &self.ctx);
            if self.config.verbose {
                let color = if result.success { GREEN } else { YELLOW };
                println!("{}[TOOL RESULT]{} {}\n", color, RESET, result);
            }

            let snapshot = self.snapshot();
            state.history.record(&action, &result, &snapshot);
        }

        info!(
            status = %state.status,
            cycles = state.cycles_run(self.config.max_cycles),
            history = state.history.len(),
            "Agent loop completed"
        );

        Ok(state)
    }

    /// Full re-walk of the sandbox after every action
    fn snapshot(&self) -> String {
        match list_directory(self.ctx.sandbox.root(), self.ctx.list_depth) {
            Ok(tree) => tree,
            Err(e) => e.to_string(),
        }
    }

    async fn ask_model(&self, prompt: &str, cycle: usize) -> Result<String> {
        debug!(prompt_len = prompt.len(), "Calling model");

        let spinner = self.config.verbose.then(|| {
            let pb = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
                pb.set_style(style);
            }
            pb.set_message(format!("Cycle {}: waiting for {}...", cycle, self.client.model()));
            pb.enable_steady_tick(Duration::from_millis(100));
            pb
        });

        let response = self.client.complete(prompt).await;

        if let Some(pb) = spinner {
            pb.finish_and_clear();
        }

        let response = response?;
        debug!(response_len = response.len(), "Model replied");
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::LoopStatus;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Replays canned responses; repeats the last one when the script runs out
    struct ScriptedClient {
        responses: Mutex<VecDeque<String>>,
        last: Mutex<String>,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedClient {
        fn new(responses: &[&str]) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses.iter().map(|s| s.to_string()).collect()),
                last: Mutex::new(String::new()),
                prompts: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> usize {
            self.prompts.lock().unwrap().len()
        }

        fn prompt(&self, idx: usize) -> String {
            self.prompts.lock().unwrap()[idx].clone()
        }
    }

    #[async_trait]
    impl CompletionClient for ScriptedClient {
        fn model(&self) -> &str {
            "scripted"
        }

        async fn complete(&self, prompt: &str) -> Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            let mut last = self.last.lock().unwrap();
            if let Some(next) = self.responses.lock().unwrap().pop_front() {
                *last = next;
            }
            Ok(last.clone())
        }
    }

    struct FailingClient;

    #[async_trait]
    impl CompletionClient for FailingClient {
        fn model(&self) -> &str {
            "failing"
        }

        async fn complete(&self, _prompt: &str) -> Result<String> {
            anyhow::bail!("connection refused")
        }
    }

    fn quiet() -> AgentConfig {
        AgentConfig::default().with_verbose(false)
    }

    #[tokio::test]
    async fn test_write_file_scenario() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("workspace");
        fs::create_dir(&root).unwrap();

        let client = ScriptedClient::new(&[
            r#"{"action":"write_file","args":{"filepath":"X","content":"Y","mode":"overwrite"},"message":"Creating X."}"#,
            r#"{"action":"end","args":{},"message":"Task complete."}"#,
        ]);
        let agent = AgentLoop::new(client.clone(), ToolContext::new(&root), quiet());

        let state = agent.run("add a file named X with content Y").await.unwrap();

        assert_eq!(state.status, LoopStatus::StoppedByModel);
        assert_eq!(state.final_message.as_deref(), Some("Task complete."));
        assert_eq!(fs::read_to_string(root.join("X")).unwrap(), "Y");
        assert_eq!(client.calls(), 2);

        let second_prompt = client.prompt(1);
        assert!(second_prompt.contains("[OVERWRITE] File"));
        assert!(second_prompt.contains("File Structure till now:"));
        assert!(second_prompt.contains("└── X"));
    }

    #[tokio::test]
    async fn test_never_ending_model_hits_limit() {
        let dir = TempDir::new().unwrap();
        let client = ScriptedClient::new(&[r#"{"action":"list_directory","args":{},"message":"look"}"#]);
        let agent = AgentLoop::new(client.clone(), ToolContext::new(dir.path()), quiet());

        let state = agent.run("loop forever").await.unwrap();

        assert_eq!(state.status, LoopStatus::StoppedByLimit);
        assert_eq!(client.calls(), 10);
        assert_eq!(state.history.len(), 10);
        assert_eq!(state.cycles_run(10), 10);
    }

    #[tokio::test]
    async fn test_custom_cycle_cap() {
        let dir = TempDir::new().unwrap();
        let client = ScriptedClient::new(&[r#"{"action":"list_directory","args":{}}"#]);
        let agent = AgentLoop::new(
            client.clone(),
            ToolContext::new(dir.path()),
            quiet().with_max_cycles(3),
        );

        let state = agent.run("t").await.unwrap();
        assert_eq!(state.status, LoopStatus::StoppedByLimit);
        assert_eq!(client.calls(), 3);
    }

    #[tokio::test]
    async fn test_garbled_response_stops_run() {
        let dir = TempDir::new().unwrap();
        let client = ScriptedClient::new(&["I am not sure what to do."]);
        let agent = AgentLoop::new(client.clone(), ToolContext::new(dir.path()), quiet());

        let state = agent.run("t").await.unwrap();
        assert_eq!(state.status, LoopStatus::StoppedByModel);
        assert_eq!(state.final_message.as_deref(), Some("Invalid JSON after extraction"));
        assert!(state.history.is_empty());
        assert_eq!(client.calls(), 1);
    }

    #[tokio::test]
    async fn test_tool_failure_does_not_stop_loop() {
        let dir = TempDir::new().unwrap();
        let client = ScriptedClient::new(&[
            r#"{"action":"read_file","args":{"filepath":"missing.txt"}}"#,
            r#"{"action":"teleport","args":{}}"#,
            r#"{"action":"end","args":{},"message":"gave up"}"#,
        ]);
        let agent = AgentLoop::new(client.clone(), ToolContext::new(dir.path()), quiet());

        let state = agent.run("t").await.unwrap();
        assert_eq!(state.status, LoopStatus::StoppedByModel);
        assert_eq!(state.history.len(), 2);
        assert!(state.history.entries()[0].contains("not found."));
        assert!(state.history.entries()[1].contains("[ERROR] Unknown tool: teleport"));
    }

    #[tokio::test]
    async fn test_prompt_history_is_windowed() {
        let dir = TempDir::new().unwrap();
        let client = ScriptedClient::new(&[
            r#"{"action":"make_directory","args":{"path":"first"}}"#,
            r#"{"action":"make_directory","args":{"path":"second"}}"#,
            r#"{"action":"end","args":{}}"#,
        ]);
        let agent = AgentLoop::new(
            client.clone(),
            ToolContext::new(dir.path()),
            quiet().with_history_limit(1),
        );

        let state = agent.run("t").await.unwrap();
        assert_eq!(state.history.len(), 2);

        let third_prompt = client.prompt(2);
        assert!(third_prompt.contains(r#""path":"second""#));
        assert!(!third_prompt.contains(r#""path":"first""#));
    }

    #[tokio::test]
    async fn test_model_error_aborts() {
        let dir = TempDir::new().unwrap();
        let agent = AgentLoop::new(Arc::new(FailingClient), ToolContext::new(dir.path()), quiet());

        let err = agent.run("t").await.unwrap_err();
        assert!(err.to_string().contains("cycle 1"));
        assert!(format!("{:#}", err).contains("connection refused"));
    }
}
