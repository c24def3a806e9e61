//! Actions the model can request
//!
//! The wire shape is `{"action": name, "args": {...}, "message": "..."}`.
//! `RawAction` is that shape verbatim; `Action` is the decoded form with one
//! variant per tool and its typed arguments.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::builtin::{
    DeleteLinesArgs, ListDirectoryArgs, MakeDirectoryArgs, ReadFileArgs, WriteFileArgs,
};

/// An action exactly as it appears on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawAction {
    pub action: String,
    #[serde(default)]
    pub args: Map<String, Value>,
    /// Advisory only; non-string values are kept as their JSON text
    #[serde(default, deserialize_with = "lenient_message")]
    pub message: String,
}

fn lenient_message<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    })
}

/// What the model asked for
#[derive(Debug, Clone, PartialEq)]
pub enum ActionKind {
    ListDirectory(ListDirectoryArgs),
    ReadFile(ReadFileArgs),
    WriteFile(WriteFileArgs),
    DeleteLines(DeleteLinesArgs),
    MakeDirectory(MakeDirectoryArgs),
    End,
    /// A tool name outside the known set
    Unknown { name: String, args: Map<String, Value> },
    /// A known tool whose arguments did not decode
    InvalidArgs {
        tool: String,
        args: Map<String, Value>,
        reason: String,
    },
}

/// A decoded action plus the model's advisory message
#[derive(Debug, Clone, PartialEq)]
pub struct Action {
    pub kind: ActionKind,
    pub message: String,
}

impl Action {
    pub fn new(kind: ActionKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// A stop request carrying `message`
    pub fn end(message: impl Into<String>) -> Self {
        Self::new(ActionKind::End, message)
    }

    pub fn is_end(&self) -> bool {
        matches!(self.kind, ActionKind::End)
    }

    /// Tool name as the model spells it
    pub fn name(&self) -> &str {
        match &self.kind {
            ActionKind::ListDirectory(_) => "list_directory",
            ActionKind::ReadFile(_) => "read_file",
            ActionKind::WriteFile(_) => "write_file",
            ActionKind::DeleteLines(_) => "delete_lines",
            ActionKind::MakeDirectory(_) => "make_directory",
            ActionKind::End => "end",
            ActionKind::Unknown { name, .. } => name,
            ActionKind::InvalidArgs { tool, .. } => tool,
        }
    }

    /// Back to wire form, for logging and history
    pub fn to_raw(&self) -> RawAction {
        let args = match &self.kind {
            ActionKind::ListDirectory(a) => to_map(a),
            ActionKind::ReadFile(a) => to_map(a),
            ActionKind::WriteFile(a) => to_map(a),
            ActionKind::DeleteLines(a) => to_map(a),
            ActionKind::MakeDirectory(a) => to_map(a),
            ActionKind::End => Map::new(),
            ActionKind::Unknown { args, .. } | ActionKind::InvalidArgs { args, .. } => args.clone(),
        };
        RawAction {
            action: self.name().to_string(),
            args,
            message: self.message.clone(),
        }
    }
}

impl From<RawAction> for Action {
    fn from(raw: RawAction) -> Self {
        let RawAction { action, args, message } = raw;

        let decoded = match action.as_str() {
            "list_directory" => decode(&args).map(ActionKind::ListDirectory),
            "read_file" => decode(&args).map(ActionKind::ReadFile),
            "write_file" => decode(&args).map(ActionKind::WriteFile),
            "delete_lines" => decode(&args).map(ActionKind::DeleteLines),
            "make_directory" => decode(&args).map(ActionKind::MakeDirectory),
            "end" => Ok(ActionKind::End),
            _ => Ok(ActionKind::Unknown {
                name: action.clone(),
                args: args.clone(),
            }),
        };

        let kind = decoded.unwrap_or_else(|e| ActionKind::InvalidArgs {
            tool: action,
            args,
            reason: e.to_string(),
        });

        Self { kind, message }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match serde_json::to_string(&self.to_raw()) {
            Ok(json) => f.write_str(&json),
            Err(_) => write!(f, "{{\"action\":\"{}\"}}", self.name()),
        }
    }
}

fn decode<T: DeserializeOwned>(args: &Map<String, Value>) -> Result<T, serde_json::Error> {
    serde_json::from_value(Value::Object(args.clone()))
}

fn to_map<T: Serialize>(args: &T) -> Map<String, Value> {
    match serde_json::to_value(args) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    }
}
