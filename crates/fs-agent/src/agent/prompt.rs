//! Prompt template

use crate::tools::ToolDescriptor;

const END_EXAMPLE: &str = r#"{"action": "end", "args": {}, "message": "Task complete."}"#;

/// Build the full prompt for one cycle
pub fn build_prompt(task: &str, context: &str, tools: &[ToolDescriptor]) -> String {
    format!(
        r#"
TASK: {task}

CONTEXT (Previous actions and results):
{context}

Your job:
- Think step by step.
- Use only the tools listed.
- Output a valid JSON response with one action at a time.

What is your next action?

You are an autonomous coding agent with access to these tools:

TOOLS:
{catalog}

FINAL RULES:
- Paths are relative to the workspace root.
- write_file creates missing parent directories; use make_directory only for empty folders.
- Respond **only** with a single valid JSON object (no extra text or commentary).
- End the task with:
  {end}
"#,
        task = task,
        context = context,
        catalog = render_catalog(tools),
        end = END_EXAMPLE,
    )
}

fn render_catalog(tools: &[ToolDescriptor]) -> String {
    tools
        .iter()
        .enumerate()
        .map(|(i, tool)| {
            format!(
                "{}. {}({})\n   - {}\n   - Example:\n     {}\n",
                i + 1,
                tool.name,
                tool.parameters.signature(),
                tool.description,
                tool.example
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
