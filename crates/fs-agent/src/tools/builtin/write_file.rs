//! File write tool

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fs;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;

use super::split_lines;
use crate::tools::{ParameterSchema, Tool, ToolContext, ToolError};

fn default_mode() -> String {
    "overwrite".to_string()
}

/// Arguments for `write_file`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteFileArgs {
    pub filepath: String,
    pub content: String,
    #[serde(default = "default_mode")]
    pub mode: String,
}

/// How `write_file` applies its content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    Overwrite,
    Append,
    /// Insert before this 1-based line
    InsertAtLine(i64),
}

impl FromStr for WriteMode {
    type Err = ToolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "overwrite" => Ok(WriteMode::Overwrite),
            "append" => Ok(WriteMode::Append),
            other => match other.strip_prefix("insert_at_line:") {
                Some(line) => line
                    .trim()
                    .parse()
                    .map(WriteMode::InsertAtLine)
                    .map_err(|_| ToolError::InvalidLineNumber),
                None => Err(ToolError::InvalidMode(other.to_string())),
            },
        }
    }
}

/// Tool for writing file contents
pub struct WriteFileTool;

impl Tool for WriteFileTool {
    type Args = WriteFileArgs;

    fn name(&self) -> &'static str {
        "write_file"
    }

    fn description(&self) -> &'static str {
        "Creates or edits a file. Missing parent directories are created. \
         mode: \"overwrite\", \"append\" or \"insert_at_line:N\"."
    }

    fn parameters_schema(&self) -> ParameterSchema {
        ParameterSchema::new()
            .with_required("filepath", "string", "File to write")
            .with_required("content", "string", "Text to write")
            .with_property("mode", "string", "overwrite | append | insert_at_line:N (default: overwrite)")
    }

    fn example(&self) -> (Value, &'static str) {
        (
            json!({"filepath": "app.js", "content": "console.log('Hello');", "mode": "overwrite"}),
            "Creating JS file.",
        )
    }

    fn run(&self, args: &WriteFileArgs, ctx: &ToolContext) -> Result<String, ToolError> {
        let path = ctx.sandbox.normalize(&args.filepath);
        write_file(&path, &args.content, &args.mode)
    }
}

/// Write `content` to `path` according to `mode`
pub fn write_file(path: &Path, content: &str, mode: &str) -> Result<String, ToolError> {
    match mode.parse::<WriteMode>()? {
        WriteMode::Overwrite => {
            create_parent(path)?;
            fs::write(path, content).map_err(ToolError::io("Writing", path))?;
            Ok(format!("[OVERWRITE] File '{}' updated.", path.display()))
        }
        WriteMode::Append => {
            create_parent(path)?;
            fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .and_then(|mut f| f.write_all(content.as_bytes()))
                .map_err(ToolError::io("Appending to", path))?;
            Ok(format!("[APPEND] Content added to '{}'.", path.display()))
        }
        WriteMode::InsertAtLine(line) => insert_at_line(path, content, line),
    }
}

fn create_parent(path: &Path) -> Result<(), ToolError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !parent.exists() => {
            fs::create_dir_all(parent).map_err(ToolError::io("Creating directory", parent))
        }
        _ => Ok(()),
    }
}

fn insert_at_line(path: &Path, content: &str, line: i64) -> Result<String, ToolError> {
    if !path.exists() {
        return Err(ToolError::FileNotFound(path.to_path_buf()));
    }

    let existing = fs::read_to_string(path).map_err(ToolError::io("Reading", path))?;
    let mut lines: Vec<String> = split_lines(&existing).into_iter().map(String::from).collect();

    if line < 1 || line as usize > lines.len() + 1 {
        return Err(ToolError::LineOutOfRange);
    }
    let idx = line as usize - 1;

    // Appending after an unterminated last line must not glue onto it
    if idx == lines.len() {
        if let Some(last) = lines.last_mut() {
            if !last.ends_with('\n') {
                last.push('\n');
            }
        }
    }

    let mut inserted = content.to_string();
    if !inserted.ends_with('\n') {
        inserted.push('\n');
    }
    lines.insert(idx, inserted);

    fs::write(path, lines.concat()).map_err(ToolError::io("Writing", path))?;
    Ok(format!(
        "[INSERT] Content inserted at line {} in '{}'.",
        line,
        path.display()
    ))
}
