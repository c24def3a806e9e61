//! Action dispatch

use tracing::{info, instrument, warn};

use super::action::{Action, ActionKind};
use super::builtin::{
    DeleteLinesTool, ListDirectoryTool, MakeDirectoryTool, ReadFileTool, WriteFileTool,
};
use super::{Tool, ToolContext, ToolError, ToolResult, STOP_MARKER};

/// Execute a single action against the sandbox
#[instrument(skip_all, fields(tool = %action.name()))]
pub fn execute(action: &Action, ctx: &ToolContext) -> ToolResult {
    match &action.kind {
        ActionKind::ListDirectory(args) => invoke(&ListDirectoryTool, args, ctx),
        ActionKind::ReadFile(args) => invoke(&ReadFileTool, args, ctx),
        ActionKind::WriteFile(args) => invoke(&WriteFileTool, args, ctx),
        ActionKind::DeleteLines(args) => invoke(&DeleteLinesTool, args, ctx),
        ActionKind::MakeDirectory(args) => invoke(&MakeDirectoryTool, args, ctx),
        ActionKind::End => ToolResult::success(STOP_MARKER),
        ActionKind::Unknown { name, .. } => {
            warn!(tool = %name, "Tool not found");
            ToolResult::failure(ToolError::UnknownTool(name.clone()))
        }
        ActionKind::InvalidArgs { tool, reason, .. } => {
            warn!(tool = %tool, reason = %reason, "Tool arguments did not decode");
            ToolResult::failure(ToolError::InvalidArgs {
                tool: tool.clone(),
                reason: reason.clone(),
            })
        }
    }
}

fn invoke<T: Tool>(tool: &T, args: &T::Args, ctx: &ToolContext) -> ToolResult {
    info!(tool = tool.name(), "Executing tool");
    match tool.run(args, ctx) {
        Ok(output) => {
            info!(tool = tool.name(), output_len = output.len(), "Tool executed successfully");
            ToolResult::success(output)
        }
        Err(e) => {
            warn!(tool = tool.name(), error = %e, "Tool execution failed");
            ToolResult::failure(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::RawAction;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn action(value: serde_json::Value) -> Action {
        serde_json::from_value::<RawAction>(value).unwrap().into()
    }

    #[test]
    fn test_write_then_read() {
        let dir = TempDir::new().unwrap();
        let ctx = ToolContext::new(dir.path());

        let write = execute(
            &action(json!({"action": "write_file", "args": {"filepath": "X", "content": "Y"}})),
            &ctx,
        );
        assert!(write.success);
        assert!(write.output.starts_with("[OVERWRITE] File"));
        assert_eq!(fs::read_to_string(dir.path().join("X")).unwrap(), "Y");

        let read = execute(
            &action(json!({"action": "read_file", "args": {"filepath": "X"}})),
            &ctx,
        );
        assert_eq!(read.output, "Y");
    }

    #[test]
    fn test_list_directory_default_root() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("index.html"), "").unwrap();
        let ctx = ToolContext::new(dir.path());

        let result = execute(&action(json!({"action": "list_directory"})), &ctx);
        assert!(result.success);
        assert!(result.output.contains("└── index.html"));
    }

    #[test]
    fn test_delete_and_mkdir_dispatch() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.txt"), "1\n2\n3\n").unwrap();
        let ctx = ToolContext::new(dir.path());

        let deleted = execute(
            &action(json!({"action": "delete_lines", "args": {"filepath": "a.txt", "start": 1, "end": 2}})),
            &ctx,
        );
        assert!(deleted.success);
        assert_eq!(fs::read_to_string(dir.path().join("a.txt")).unwrap(), "3\n");

        let made = execute(
            &action(json!({"action": "make_directory", "args": {"path": "lib"}})),
            &ctx,
        );
        assert!(made.output.starts_with("[MKDIR]"));
        assert!(dir.path().join("lib").is_dir());
    }

    #[test]
    fn test_end_returns_stop_marker() {
        let ctx = ToolContext::default();
        let result = execute(&Action::end("done"), &ctx);
        assert_eq!(result.output, STOP_MARKER);
    }

    #[test]
    fn test_unknown_tool() {
        let ctx = ToolContext::default();
        let result = execute(&action(json!({"action": "format_disk", "args": {}})), &ctx);
        assert!(!result.success);
        assert_eq!(result.output, "[ERROR] Unknown tool: format_disk");
    }

    #[test]
    fn test_missing_argument_reported() {
        let dir = TempDir::new().unwrap();
        let ctx = ToolContext::new(dir.path());
        let result = execute(
            &action(json!({"action": "write_file", "args": {"filepath": "a.txt"}})),
            &ctx,
        );
        assert!(!result.success);
        assert!(result.output.starts_with("[ERROR] Invalid arguments for 'write_file':"));
        assert!(result.output.contains("content"));
        assert!(!dir.path().join("a.txt").exists());
    }

    #[test]
    fn test_tool_failure_is_a_result() {
        let dir = TempDir::new().unwrap();
        let ctx = ToolContext::new(dir.path());
        let result = execute(
            &action(json!({"action": "read_file", "args": {"filepath": "ghost.txt"}})),
            &ctx,
        );
        assert!(!result.success);
        assert!(result.output.starts_with("[ERROR] File '"));
        assert!(result.output.ends_with("ghost.txt' not found."));
    }
}
