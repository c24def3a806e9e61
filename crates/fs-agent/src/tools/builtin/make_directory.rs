//! Directory creation tool

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fs;
use std::path::Path;

use crate::tools::{ParameterSchema, Tool, ToolContext, ToolError};

/// Arguments for `make_directory`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MakeDirectoryArgs {
    pub path: String,
}

pub struct MakeDirectoryTool;

impl Tool for MakeDirectoryTool {
    type Args = MakeDirectoryArgs;

    fn name(&self) -> &'static str {
        "make_directory"
    }

    fn description(&self) -> &'static str {
        "Creates a directory and any missing parents. Succeeds if it already exists."
    }

    fn parameters_schema(&self) -> ParameterSchema {
        ParameterSchema::new().with_required("path", "string", "Directory to create")
    }

    fn example(&self) -> (Value, &'static str) {
        (json!({"path": "src/components"}), "Creating components folder.")
    }

    fn run(&self, args: &MakeDirectoryArgs, ctx: &ToolContext) -> Result<String, ToolError> {
        make_directory(&ctx.sandbox.normalize(&args.path))
    }
}

pub fn make_directory(path: &Path) -> Result<String, ToolError> {
    if path.exists() {
        return Ok(format!("[MKDIR] Directory '{}' already exists.", path.display()));
    }

    fs::create_dir_all(path).map_err(ToolError::io("Creating directory", path))?;
    Ok(format!("[MKDIR] Directory '{}' created.", path.display()))
}
