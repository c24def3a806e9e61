//! fs-agent: autonomous file-editing agent CLI

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "fs-agent")]
#[command(about = "Let a language model edit files inside a sandbox, one action at a time", version)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the agent loop on a task
    Run {
        /// The task description
        #[arg(required = true)]
        task: Vec<String>,

        /// Model to use (overrides config)
        #[arg(short, long, env = "FS_AGENT_MODEL")]
        model: Option<String>,

        /// Maximum model calls
        #[arg(long)]
        max_cycles: Option<usize>,

        /// History entries included in each prompt
        #[arg(long)]
        history_limit: Option<usize>,

        /// Sandbox root directory
        #[arg(long, env = "FS_AGENT_ROOT")]
        root: Option<PathBuf>,

        /// Only print the final outcome
        #[arg(short, long)]
        quiet: bool,
    },

    /// Execute a single action JSON without a model
    Exec {
        /// e.g. '{"action": "list_directory", "args": {}}'
        action: String,

        /// Sandbox root directory
        #[arg(long, env = "FS_AGENT_ROOT")]
        root: Option<PathBuf>,
    },

    /// Print the sandbox directory tree
    Tree {
        /// Path inside the sandbox
        path: Option<String>,

        /// Levels to expand
        #[arg(short, long)]
        depth: Option<usize>,

        /// Sandbox root directory
        #[arg(long, env = "FS_AGENT_ROOT")]
        root: Option<PathBuf>,
    },

    /// Scripted workflow driven by a state file
    Workflow {
        /// State file (overrides config)
        #[arg(long, global = true)]
        state_file: Option<PathBuf>,

        #[command(subcommand)]
        action: WorkflowAction,
    },

    /// Manage the user config file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Subcommand)]
enum WorkflowAction {
    /// Reset the state file
    Init {
        /// Task to start with
        #[arg(short, long)]
        task: Option<String>,
    },
    /// Run one workflow cycle
    Step {
        /// Sandbox root directory
        #[arg(long, env = "FS_AGENT_ROOT")]
        root: Option<PathBuf>,
    },
    /// Show the current state
    Status,
    /// Set the task status by hand
    Flag {
        /// in_progress, continue or complete
        status: String,

        /// Status message
        #[arg(short, long)]
        message: Option<String>,
    },
    /// Outline the functions and classes in a file
    Summarize {
        file: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    /// Create a default config file
    Init,
    /// Print the config file location
    Path,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Run {
            task,
            model,
            max_cycles,
            history_limit,
            root,
            quiet,
        } => {
            let task_text = task.join(" ");
            let opts = commands::RunOptions {
                model,
                max_cycles,
                history_limit,
                root,
                quiet,
            };
            commands::run(&task_text, opts).await
        }
        Commands::Exec { action, root } => commands::exec(&action, root),
        Commands::Tree { path, depth, root } => commands::tree(path.as_deref(), depth, root),
        Commands::Workflow { state_file, action } => match action {
            WorkflowAction::Init { task } => commands::workflow_init(task.as_deref(), state_file),
            WorkflowAction::Step { root } => commands::workflow_step(state_file, root),
            WorkflowAction::Status => commands::workflow_status(state_file),
            WorkflowAction::Flag { status, message } => {
                commands::workflow_flag(&status, message.as_deref(), state_file)
            }
            WorkflowAction::Summarize { file, json } => commands::workflow_summarize(&file, json),
        },
        Commands::Config { action } => match action {
            ConfigAction::Init => commands::config_init(),
            ConfigAction::Path => commands::config_path(),
        },
    }
}
