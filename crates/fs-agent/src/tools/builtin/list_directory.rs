//! Directory tree listing tool

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::ffi::OsString;
use std::fs;
use std::io::{self, ErrorKind};
use std::path::Path;

use crate::tools::{ParameterSchema, Tool, ToolContext, ToolError};

/// Arguments for `list_directory`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListDirectoryArgs {
    /// Directory to list; the sandbox root when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depth: Option<usize>,
}

/// Tool for listing a directory as an ASCII tree
pub struct ListDirectoryTool;

impl Tool for ListDirectoryTool {
    type Args = ListDirectoryArgs;

    fn name(&self) -> &'static str {
        "list_directory"
    }

    fn description(&self) -> &'static str {
        "Lists files/folders in a directory as a tree."
    }

    fn parameters_schema(&self) -> ParameterSchema {
        ParameterSchema::new()
            .with_property("path", "string", "Directory to list (default: workspace root)")
            .with_property("depth", "integer", "How many levels to descend (default: 2)")
    }

    fn example(&self) -> (Value, &'static str) {
        (json!({"path": "."}), "Checking project structure.")
    }

    fn run(&self, args: &ListDirectoryArgs, ctx: &ToolContext) -> Result<String, ToolError> {
        let path = match args.path.as_deref() {
            Some(p) => ctx.sandbox.normalize(p),
            None => ctx.sandbox.root().to_path_buf(),
        };
        list_directory(&path, args.depth.unwrap_or(ctx.list_depth))
    }
}

/// Render `path` as a tree, descending at most `depth` levels.
///
/// The first line is the path itself. Directories or entries that cannot be
/// read show a placeholder line instead of aborting the walk.
pub fn list_directory(path: &Path, depth: usize) -> Result<String, ToolError> {
    if !path.exists() {
        return Err(ToolError::PathNotFound(path.to_path_buf()));
    }

    let mut tree = vec![path.display().to_string()];
    walk(path, 1, depth, "", &mut tree);
    Ok(tree.join("\n"))
}

fn walk(dir: &Path, level: usize, depth: usize, prefix: &str, out: &mut Vec<String>) {
    let (mut names, failures) = match fs::read_dir(dir) {
        Ok(entries) => partition_entries(entries.map(|e| e.map(|e| e.file_name()))),
        Err(e) if e.kind() == ErrorKind::PermissionDenied => {
            out.push(format!("{}[Permission Denied]", prefix));
            return;
        }
        Err(e) => {
            out.push(format!("{}[Error: {}]", prefix, e));
            return;
        }
    };
    names.sort();
    for e in failures {
        out.push(format!("{}[Error: {}]", prefix, e));
    }

    let count = names.len();
    for (i, name) in names.iter().enumerate() {
        let last = i + 1 == count;
        let connector = if last { "└── " } else { "├── " };
        out.push(format!("{}{}{}", prefix, connector, name.to_string_lossy()));

        let full = dir.join(name);
        if full.is_dir() && level < depth {
            let child_prefix = format!("{}{}", prefix, if last { "    " } else { "│   " });
            walk(&full, level + 1, depth, &child_prefix, out);
        }
    }
}

/// Split directory entries into names and the errors hit while reading them
fn partition_entries(
    entries: impl IntoIterator<Item = io::Result<OsString>>,
) -> (Vec<OsString>, Vec<io::Error>) {
    let mut names = Vec::new();
    let mut failures = Vec::new();
    for entry in entries {
        match entry {
            Ok(name) => names.push(name),
            Err(e) => failures.push(e),
        }
    }
    (names, failures)
}
