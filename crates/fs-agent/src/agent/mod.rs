//! Agent framework for autonomous file editing
//!
//! Implements a one-action-per-cycle loop: prompt, parse, execute, record.

mod agent_loop;
pub mod parse;
pub mod prompt;
mod state;

pub use agent_loop::AgentLoop;
pub use parse::parse_response;
pub use prompt::build_prompt;
pub use state::{
    AgentConfig, AgentState, History, LoopStatus, DEFAULT_HISTORY_LIMIT, DEFAULT_MAX_CYCLES,
};
