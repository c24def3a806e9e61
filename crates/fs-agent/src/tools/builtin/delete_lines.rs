//! Line deletion tool

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fs;
use std::path::Path;

use super::split_lines;
use crate::tools::{ParameterSchema, Tool, ToolContext, ToolError};

/// Arguments for `delete_lines`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteLinesArgs {
    pub filepath: String,
    pub start: i64,
    pub end: i64,
}

/// Tool for removing an inclusive range of lines
pub struct DeleteLinesTool;

impl Tool for DeleteLinesTool {
    type Args = DeleteLinesArgs;

    fn name(&self) -> &'static str {
        "delete_lines"
    }

    fn description(&self) -> &'static str {
        "Deletes a range of lines (1-based, inclusive) from a file."
    }

    fn parameters_schema(&self) -> ParameterSchema {
        ParameterSchema::new()
            .with_required("filepath", "string", "File to edit")
            .with_required("start", "integer", "First line to delete")
            .with_required("end", "integer", "Last line to delete")
    }

    fn example(&self) -> (Value, &'static str) {
        (
            json!({"filepath": "app.js", "start": 2, "end": 5}),
            "Removing unused code.",
        )
    }

    fn run(&self, args: &DeleteLinesArgs, ctx: &ToolContext) -> Result<String, ToolError> {
        let path = ctx.sandbox.normalize(&args.filepath);
        delete_lines(&path, args.start, args.end)
    }
}

/// Remove lines `start..=end` (1-based); the file is untouched on a bad range
pub fn delete_lines(path: &Path, start: i64, end: i64) -> Result<String, ToolError> {
    if !path.exists() {
        return Err(ToolError::FileNotFound(path.to_path_buf()));
    }

    let content = fs::read_to_string(path).map_err(ToolError::io("Reading", path))?;
    let mut lines = split_lines(&content);

    if start < 1 || end > lines.len() as i64 || start > end {
        return Err(ToolError::InvalidRange);
    }

    lines.drain((start - 1) as usize..end as usize);
    fs::write(path, lines.concat()).map_err(ToolError::io("Writing", path))?;

    Ok(format!(
        "[DELETE] Lines {}-{} removed from '{}'.",
        start,
        end,
        path.display()
    ))
}
