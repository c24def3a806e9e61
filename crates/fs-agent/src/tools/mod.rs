//! Tool framework for the file-editing agent
//!
//! Every tool is synchronous and returns a bracketed status string. Failures
//! are values, never panics: a `ToolError` renders to the same kind of string
//! the model reads back on the next turn.

pub mod action;
pub mod builtin;
pub mod executor;
pub mod path_guard;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;

pub use action::{Action, ActionKind, RawAction};
pub use executor::execute;
pub use path_guard::Sandbox;

/// Marker returned when the executor is handed an `end` action
pub const STOP_MARKER: &str = "[END] Agent stopped.";

/// Failures a tool call can report
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("[ERROR] Path '{}' does not exist.", .0.display())]
    PathNotFound(PathBuf),

    #[error("[ERROR] File '{}' not found.", .0.display())]
    FileNotFound(PathBuf),

    #[error("[ERROR] Invalid line range.")]
    InvalidRange,

    #[error("[ERROR] Invalid mode '{0}'.")]
    InvalidMode(String),

    #[error("[ERROR] Invalid line number in 'insert_at_line'.")]
    InvalidLineNumber,

    #[error("[ERROR] Line number out of range.")]
    LineOutOfRange,

    #[error("[ERROR] Unknown tool: {0}")]
    UnknownTool(String),

    #[error("[ERROR] Invalid arguments for '{tool}': {reason}")]
    InvalidArgs { tool: String, reason: String },

    #[error("[ERROR] {op} '{}' failed: {source}", .path.display())]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ToolError {
    pub(crate) fn io(op: &'static str, path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| ToolError::Io { op, path, source }
    }
}

/// Result of tool execution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolResult {
    /// Whether the tool executed successfully
    pub success: bool,
    /// Bracketed status text shown to the user and fed back to the model
    pub output: String,
}

impl ToolResult {
    /// Create a successful result
    pub fn success(output: impl Into<String>) -> Self {
        Self {
            success: true,
            output: output.into(),
        }
    }

    /// Create a failed result
    pub fn failure(error: ToolError) -> Self {
        Self {
            success: false,
            output: error.to_string(),
        }
    }
}

impl std::fmt::Display for ToolResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.output)
    }
}

/// Context provided to tools during execution
#[derive(Debug, Clone)]
pub struct ToolContext {
    /// Directory every path is rewritten under
    pub sandbox: Sandbox,
    /// Default depth for directory listings
    pub list_depth: usize,
    /// Default lines of context around keyword matches
    pub read_context: usize,
}

impl Default for ToolContext {
    fn default() -> Self {
        Self {
            sandbox: Sandbox::default(),
            list_depth: 2,
            read_context: 2,
        }
    }
}

impl ToolContext {
    /// Create a new context rooted at the given sandbox directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            sandbox: Sandbox::new(root),
            ..Default::default()
        }
    }

    pub fn with_list_depth(mut self, depth: usize) -> Self {
        self.list_depth = depth;
        self
    }

    pub fn with_read_context(mut self, context: usize) -> Self {
        self.read_context = context;
        self
    }
}

/// A single named tool parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    /// Parameter type (string, integer, array)
    pub param_type: String,
    pub description: String,
    pub required: bool,
}

/// Ordered parameter list; the order is the order shown to the model
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterSchema {
    pub parameters: Vec<Parameter>,
}

impl ParameterSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_required(self, name: &str, param_type: &str, description: &str) -> Self {
        self.push(name, param_type, description, true)
    }

    pub fn with_property(self, name: &str, param_type: &str, description: &str) -> Self {
        self.push(name, param_type, description, false)
    }

    fn push(mut self, name: &str, param_type: &str, description: &str, required: bool) -> Self {
        self.parameters.push(Parameter {
            name: name.to_string(),
            param_type: param_type.to_string(),
            description: description.to_string(),
            required,
        });
        self
    }

    /// `name: type` pairs, optional ones marked with `?`
    pub fn signature(&self) -> String {
        self.parameters
            .iter()
            .map(|p| {
                let marker = if p.required { "" } else { "?" };
                format!("{}{}: {}", p.name, marker, p.param_type)
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Everything the prompt needs to advertise a tool
#[derive(Debug, Clone)]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    pub parameters: ParameterSchema,
    /// One complete example action in wire form
    pub example: Value,
}

/// The trait every builtin tool implements
pub trait Tool {
    /// Typed argument record decoded from the model's `args` object
    type Args: DeserializeOwned + Serialize;

    /// Get the tool name
    fn name(&self) -> &'static str;

    /// Get a description of what the tool does
    fn description(&self) -> &'static str;

    /// Get the parameter schema
    fn parameters_schema(&self) -> ParameterSchema;

    /// Example arguments plus the advisory message that goes with them
    fn example(&self) -> (Value, &'static str);

    /// Execute the tool with already-decoded arguments
    fn run(&self, args: &Self::Args, ctx: &ToolContext) -> Result<String, ToolError>;

    /// Describe the tool for the prompt catalog
    fn describe(&self) -> ToolDescriptor {
        let (args, message) = self.example();
        ToolDescriptor {
            name: self.name(),
            description: self.description(),
            parameters: self.parameters_schema(),
            example: serde_json::json!({
                "action": self.name(),
                "args": args,
                "message": message,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_error_strings() {
        assert_eq!(
            ToolError::FileNotFound(PathBuf::from("workspace/a.txt")).to_string(),
            "[ERROR] File 'workspace/a.txt' not found."
        );
        assert_eq!(ToolError::InvalidRange.to_string(), "[ERROR] Invalid line range.");
        assert_eq!(
            ToolError::InvalidMode("prepend".to_string()).to_string(),
            "[ERROR] Invalid mode 'prepend'."
        );
        assert_eq!(
            ToolError::UnknownTool("rm_rf".to_string()).to_string(),
            "[ERROR] Unknown tool: rm_rf"
        );
    }

    #[test]
    fn test_tool_result_display() {
        let ok = ToolResult::success("[MKDIR] Directory 'workspace/a' created.");
        assert!(ok.success);
        assert_eq!(ok.to_string(), "[MKDIR] Directory 'workspace/a' created.");

        let err = ToolResult::failure(ToolError::LineOutOfRange);
        assert!(!err.success);
        assert_eq!(err.to_string(), "[ERROR] Line number out of range.");
    }

    #[test]
    fn test_schema_signature() {
        let schema = ParameterSchema::new()
            .with_required("filepath", "string", "File to write")
            .with_property("mode", "string", "Write mode");
        assert_eq!(schema.signature(), "filepath: string, mode?: string");
    }

    #[test]
    fn test_context_builder() {
        let ctx = ToolContext::new("/tmp/sandbox").with_list_depth(3).with_read_context(1);
        assert_eq!(ctx.sandbox.root(), std::path::Path::new("/tmp/sandbox"));
        assert_eq!(ctx.list_depth, 3);
        assert_eq!(ctx.read_context, 1);
    }
}
