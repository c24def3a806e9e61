//! File read tool

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fs;
use std::path::Path;

use super::split_lines;
use crate::tools::{ParameterSchema, Tool, ToolContext, ToolError};

/// Arguments for `read_file`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadFileArgs {
    pub filepath: String,
    /// `[start, end]`, 1-based and inclusive
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lines: Option<(usize, usize)>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<usize>,
}

/// Tool for reading file contents
pub struct ReadFileTool;

impl Tool for ReadFileTool {
    type Args = ReadFileArgs;

    fn name(&self) -> &'static str {
        "read_file"
    }

    fn description(&self) -> &'static str {
        "Reads a file: whole, a [start, end] line range, or keyword matches with surrounding lines."
    }

    fn parameters_schema(&self) -> ParameterSchema {
        ParameterSchema::new()
            .with_required("filepath", "string", "File to read")
            .with_property("lines", "array", "[start, end] line range, 1-based inclusive")
            .with_property("keyword", "string", "Case-insensitive text to search for")
            .with_property("context", "integer", "Lines shown around each keyword match (default: 2)")
    }

    fn example(&self) -> (Value, &'static str) {
        (json!({"filepath": "index.html"}), "Reading HTML file.")
    }

    fn run(&self, args: &ReadFileArgs, ctx: &ToolContext) -> Result<String, ToolError> {
        let path = ctx.sandbox.normalize(&args.filepath);
        read_file(
            &path,
            args.lines,
            args.keyword.as_deref(),
            args.context.unwrap_or(ctx.read_context),
        )
    }
}

/// Read a whole file, a line range, or keyword matches with context.
///
/// A line range takes precedence over a keyword. An empty keyword counts as
/// no keyword.
pub fn read_file(
    path: &Path,
    lines: Option<(usize, usize)>,
    keyword: Option<&str>,
    context: usize,
) -> Result<String, ToolError> {
    if !path.exists() {
        return Err(ToolError::FileNotFound(path.to_path_buf()));
    }

    let content = fs::read_to_string(path).map_err(ToolError::io("Reading", path))?;
    let all = split_lines(&content);

    if let Some((start, end)) = lines {
        let from = start.max(1) - 1;
        let to = end.min(all.len());
        if from >= to {
            return Ok(String::new());
        }
        return Ok(all[from..to].concat());
    }

    if let Some(keyword) = keyword.filter(|k| !k.is_empty()) {
        return Ok(keyword_context(&all, keyword, context));
    }

    Ok(content)
}

/// Blocks of `context` lines around each match, overlapping windows merged
fn keyword_context(lines: &[&str], keyword: &str, context: usize) -> String {
    let needle = keyword.to_lowercase();
    // Half-open [start, end) line windows
    let mut blocks: Vec<(usize, usize)> = Vec::new();

    for (idx, line) in lines.iter().enumerate() {
        if !line.to_lowercase().contains(&needle) {
            continue;
        }
        let start = idx.saturating_sub(context);
        let end = idx.saturating_add(context).saturating_add(1).min(lines.len());

        match blocks.last_mut() {
            Some(last) if start <= last.1 => last.1 = last.1.max(end),
            _ => blocks.push((start, end)),
        }
    }

    if blocks.is_empty() {
        return format!("[No matches for '{}']", keyword);
    }

    blocks
        .iter()
        .map(|&(start, end)| {
            format!(
                "--- Context (lines {}-{}) ---\n{}\n",
                start + 1,
                end,
                lines[start..end].concat().trim()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn numbered(count: usize) -> NamedTempFile {
        let mut temp = NamedTempFile::new().unwrap();
        for i in 1..=count {
            writeln!(temp, "line {}", i).unwrap();
        }
        temp
    }

    #[test]
    fn test_read_whole_file_unchanged() {
        let mut temp = NamedTempFile::new().unwrap();
        write!(temp, "  first\n\nthird  ").unwrap();
        let out = read_file(temp.path(), None, None, 2).unwrap();
        assert_eq!(out, "  first\n\nthird  ");
    }

    #[test]
    fn test_read_line_range() {
        let temp = numbered(10);
        let out = read_file(temp.path(), Some((3, 4)), None, 2).unwrap();
        assert_eq!(out, "line 3\nline 4\n");
    }

    #[test]
    fn test_line_range_clamped() {
        let temp = numbered(3);
        assert_eq!(read_file(temp.path(), Some((2, 99)), None, 2).unwrap(), "line 2\nline 3\n");
        assert_eq!(read_file(temp.path(), Some((5, 9)), None, 2).unwrap(), "");
        assert_eq!(read_file(temp.path(), Some((3, 1)), None, 2).unwrap(), "");
    }

    #[test]
    fn test_keyword_adjacent_matches_merge() {
        let mut temp = NamedTempFile::new().unwrap();
        for i in 1..=10 {
            if i == 4 || i == 5 {
                writeln!(temp, "line {} TODO", i).unwrap();
            } else {
                writeln!(temp, "line {}", i).unwrap();
            }
        }

        let out = read_file(temp.path(), None, Some("todo"), 2).unwrap();
        assert_eq!(out.matches("--- Context").count(), 1);
        assert!(out.starts_with("--- Context (lines 2-7) ---\nline 2\n"));
        assert!(out.contains("line 7"));
        assert!(!out.contains("line 8"));
    }

    #[test]
    fn test_keyword_separate_blocks() {
        let mut temp = NamedTempFile::new().unwrap();
        for i in 1..=20 {
            let tag = if i == 2 || i == 15 { " needle" } else { "" };
            writeln!(temp, "line {}{}", i, tag).unwrap();
        }

        let out = read_file(temp.path(), None, Some("NEEDLE"), 1).unwrap();
        assert_eq!(
            out,
            "--- Context (lines 1-3) ---\nline 1\nline 2 needle\nline 3\n\n\
             --- Context (lines 14-16) ---\nline 14\nline 15 needle\nline 16\n"
        );
    }

    #[test]
    fn test_keyword_context_clamped_to_bounds() {
        let temp = numbered(3);
        let out = read_file(temp.path(), None, Some("line 3"), 5).unwrap();
        assert!(out.starts_with("--- Context (lines 1-3) ---"));
    }

    #[test]
    fn test_keyword_huge_context_covers_file() {
        let dir = tempfile::TempDir::new().unwrap();
        fs::write(dir.path().join("a.txt"), "alpha\nneedle\nomega\n").unwrap();
        let ctx = ToolContext::new(dir.path());
        let args: ReadFileArgs = serde_json::from_value(json!({
            "filepath": "a.txt",
            "keyword": "needle",
            "context": usize::MAX,
        }))
        .unwrap();

        let out = ReadFileTool.run(&args, &ctx).unwrap();
        assert_eq!(out, "--- Context (lines 1-3) ---\nalpha\nneedle\nomega\n");
    }

    #[test]
    fn test_keyword_no_match() {
        let temp = numbered(3);
        let out = read_file(temp.path(), None, Some("console"), 2).unwrap();
        assert_eq!(out, "[No matches for 'console']");
    }

    #[test]
    fn test_missing_file() {
        let err = read_file(Path::new("workspace/missing.txt"), None, None, 2).unwrap_err();
        assert_eq!(err.to_string(), "[ERROR] File 'workspace/missing.txt' not found.");
    }

    #[test]
    fn test_tool_reads_under_sandbox() {
        let dir = tempfile::TempDir::new().unwrap();
        fs::write(dir.path().join("notes.md"), "hello").unwrap();
        let ctx = ToolContext::new(dir.path());
        let args = ReadFileArgs {
            filepath: "/notes.md".to_string(),
            lines: None,
            keyword: None,
            context: None,
        };
        assert_eq!(ReadFileTool.run(&args, &ctx).unwrap(), "hello");
    }
}
