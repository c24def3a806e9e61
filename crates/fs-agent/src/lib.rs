//! fs-agent: a minimal autonomous file-editing agent
//!
//! The model picks one filesystem action per cycle; the action runs inside a
//! sandbox directory and its result is fed back on the next prompt.

pub mod agent;
pub mod config;
pub mod tools;
pub mod workflow;
