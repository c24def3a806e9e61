//! CLI commands implementation

use anyhow::{Context, Result};
use llm_core::{from_config, CompletionClient, Config, OllamaClient, ProviderKind};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use fs_agent::agent::{AgentLoop, LoopStatus};
use fs_agent::config::UserConfig;
use fs_agent::tools::builtin::list_directory;
use fs_agent::tools::{execute, Action, RawAction};
use fs_agent::workflow::{self, CycleOutcome, StateStore, TaskStatus};

// ANSI color codes
const GREEN: &str = "\x1b[92m";
const RED: &str = "\x1b[91m";
const YELLOW: &str = "\x1b[93m";
const BLUE: &str = "\x1b[94m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const RESET: &str = "\x1b[0m";

fn print_status(ok: bool, msg: &str) {
    let icon = if ok {
        format!("{}✓{}", GREEN, RESET)
    } else {
        format!("{}✗{}", RED, RESET)
    };
    println!("  {} {}", icon, msg);
}

/// Overrides for `run`, each falling back to the user config
#[derive(Debug, Default)]
pub struct RunOptions {
    pub model: Option<String>,
    pub max_cycles: Option<usize>,
    pub history_limit: Option<usize>,
    pub root: Option<PathBuf>,
    pub quiet: bool,
}

/// Run the model-driven loop on a task
pub async fn run(task: &str, opts: RunOptions) -> Result<()> {
    let user = UserConfig::load()?;
    let mut agent_section = user.agent;
    if let Some(root) = opts.root {
        agent_section.sandbox_root = root;
    }
    if let Some(max) = opts.max_cycles {
        agent_section.max_cycles = max;
    }
    if let Some(limit) = opts.history_limit {
        agent_section.history_limit = limit;
    }
    if opts.quiet {
        agent_section.verbose = false;
    }

    let mut config = Config::try_load().unwrap_or_else(Config::default_minimal);
    if let Some(model) = opts.model.or(agent_section.model.clone()) {
        config.provider.model = model;
    }

    fs::create_dir_all(&agent_section.sandbox_root).with_context(|| {
        format!(
            "Failed to create sandbox root {}",
            agent_section.sandbox_root.display()
        )
    })?;

    if config.provider.kind == ProviderKind::Ollama {
        let ollama = OllamaClient::with_timeout(&config.provider.base_url, 5)?;
        if !ollama.health_check().await? {
            anyhow::bail!(
                "Ollama is not running at {}. Start with: ollama serve",
                config.provider.base_url
            );
        }
    }

    let client: Arc<dyn CompletionClient> = Arc::from(from_config(&config)?);
    let ctx = agent_section.tool_context();
    let agent = AgentLoop::new(client, ctx, agent_section.agent_config());

    if agent_section.verbose {
        println!("{}Agent Mode{}", BOLD, RESET);
        println!("  Model: {} ({:?})", config.provider.model, config.provider.kind);
        println!("  Sandbox: {}", agent_section.sandbox_root.display());
        println!("  Max cycles: {}", agent_section.max_cycles);
        println!();
    }

    let state = agent.run(task).await?;
    let cycles = state.cycles_run(agent_section.max_cycles);

    println!();
    match state.status {
        LoopStatus::StoppedByModel => {
            print_status(true, &format!("Stopped by model after {} cycle(s)", cycles));
            if let Some(message) = state.final_message {
                println!("  {}{}{}", DIM, message, RESET);
            }
        }
        LoopStatus::StoppedByLimit => {
            print_status(false, &format!("Max cycles ({}) reached without completion", cycles));
        }
        LoopStatus::Running => {}
    }

    Ok(())
}

/// Execute one action given as wire JSON, no model involved
pub fn exec(action_json: &str, root: Option<PathBuf>) -> Result<()> {
    let mut agent_section = UserConfig::load()?.agent;
    if let Some(root) = root {
        agent_section.sandbox_root = root;
    }

    let raw: RawAction = serde_json::from_str(action_json)
        .context("Expected {\"action\": ..., \"args\": {...}, \"message\": ...}")?;
    let action = Action::from(raw);

    let result = execute(&action, &agent_section.tool_context());
    let color = if result.success { GREEN } else { YELLOW };
    println!("{}{}{}", color, result, RESET);

    if !result.success {
        std::process::exit(1);
    }
    Ok(())
}

/// Print the sandbox tree
pub fn tree(path: Option<&str>, depth: Option<usize>, root: Option<PathBuf>) -> Result<()> {
    let mut agent_section = UserConfig::load()?.agent;
    if let Some(root) = root {
        agent_section.sandbox_root = root;
    }
    let ctx = agent_section.tool_context();

    let target = match path {
        Some(p) => ctx.sandbox.normalize(p),
        None => ctx.sandbox.root().to_path_buf(),
    };

    let listing = list_directory(&target, depth.unwrap_or(ctx.list_depth))?;
    println!("{}", listing);
    Ok(())
}

fn state_store(state_file: Option<PathBuf>) -> Result<StateStore> {
    let path = match state_file {
        Some(p) => p,
        None => UserConfig::load()?.workflow.state_file,
    };
    Ok(StateStore::new(path))
}

/// Initialize the workflow state file
pub fn workflow_init(task: Option<&str>, state_file: Option<PathBuf>) -> Result<()> {
    let store = state_store(state_file)?;
    let state = store.reset(task)?;
    println!(
        "{}[RESET]{} {} initialized with task: {}",
        GREEN,
        RESET,
        store.path().display(),
        state.task
    );
    Ok(())
}

/// Advance the scripted workflow by one step
pub fn workflow_step(state_file: Option<PathBuf>, root: Option<PathBuf>) -> Result<()> {
    let store = state_store(state_file)?;
    let mut state = store.load()?;

    let mut agent_section = UserConfig::load()?.agent;
    if let Some(root) = root {
        agent_section.sandbox_root = root;
    }
    let ctx = agent_section.tool_context();

    println!(
        "{}Workflow cycle {}{} | Task: {}",
        BOLD,
        state.cycle + 1,
        RESET,
        state.task
    );

    match workflow::run_cycle(&mut state, &ctx)? {
        CycleOutcome::Created { tree, file } => {
            println!("\n{}\n", tree);
            println!("{}[CREATE]{} {} created.", GREEN, RESET, file.display());
        }
        CycleOutcome::Completed { tree } => {
            println!("\n{}\n", tree);
            println!("{}[INFO]{} Page component already exists.", BLUE, RESET);
            println!("{}[TODO]{} Wire the new page into the router.", DIM, RESET);
        }
        CycleOutcome::NoHandler => {
            println!("{}[ERROR]{} No handler for this task.", RED, RESET);
            return Ok(());
        }
    }

    store.save(&state)?;
    print_status(
        state.status == TaskStatus::Complete,
        &format!(
            "Status: {} ({})",
            state.status,
            state.message.as_deref().unwrap_or("")
        ),
    );
    Ok(())
}

/// Show the workflow state
pub fn workflow_status(state_file: Option<PathBuf>) -> Result<()> {
    let store = state_store(state_file)?;
    let state = store.load()?;

    println!("{}Workflow{}", BOLD, RESET);
    println!("  File: {}", store.path().display());
    println!("  Task: {}", state.task);
    println!("  Status: {}", state.status);
    println!("  Cycle: {}", state.cycle);
    if let Some(message) = state.message {
        println!("  Message: {}", message);
    }
    Ok(())
}

/// Overwrite the task status
pub fn workflow_flag(status: &str, message: Option<&str>, state_file: Option<PathBuf>) -> Result<()> {
    let status: TaskStatus = status.parse()?;
    let store = state_store(state_file)?;
    let mut state = store.load()?;

    let line = workflow::set_task_flag(&mut state, status, message);
    store.save(&state)?;
    println!("{}{}{}", GREEN, line, RESET);
    Ok(())
}

/// Print a static outline of a file
pub fn workflow_summarize(file: &Path, json: bool) -> Result<()> {
    let summary = workflow::summarize_file(file)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("{}{}{} ({} lines)", BOLD, summary.file, RESET, summary.lines);
    println!("  Functions ({}):", summary.functions.len());
    for f in &summary.functions {
        println!("    - {}", f);
    }
    println!("  Classes ({}):", summary.classes.len());
    for c in &summary.classes {
        println!("    - {}", c);
    }
    Ok(())
}

/// Create default config file
pub fn config_init() -> Result<()> {
    let path = UserConfig::create_default()?;
    println!("{}Created config file:{} {}", GREEN, RESET, path.display());
    Ok(())
}

/// Print the config file location
pub fn config_path() -> Result<()> {
    let path = UserConfig::config_path()?;
    let exists = path.exists();
    println!("{}", path.display());
    if !exists {
        println!("{}(not created yet; run `fs-agent config init`){}", DIM, RESET);
    }
    Ok(())
}
