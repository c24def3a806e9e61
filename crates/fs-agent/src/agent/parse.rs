//! Turning free-form model text into an action
//!
//! Models rarely reply with bare JSON. Candidates are tried from most to least
//! specific; the first one that decodes as `{action, args, message}` wins.
//! Nothing decoding is treated as a stop request, not retried.

use tracing::{debug, warn};

use crate::tools::{Action, RawAction};

/// Message carried by the synthetic stop action
pub const INVALID_JSON_MESSAGE: &str = "Invalid JSON after extraction";

/// Decode the first action found in `response`
pub fn parse_response(response: &str) -> Action {
    for candidate in candidates(response) {
        if let Ok(raw) = serde_json::from_str::<RawAction>(candidate) {
            debug!(action = %raw.action, "Parsed action from response");
            return raw.into();
        }
    }

    warn!(response = %response, "Invalid JSON after extraction");
    Action::end(INVALID_JSON_MESSAGE)
}

fn candidates(response: &str) -> Vec<&str> {
    let trimmed = response.trim();
    let mut out = vec![trimmed];
    if let Some(fenced) = extract_json_from_markdown(trimmed) {
        out.push(fenced);
    }
    if let Some(span) = outer_braces(trimmed) {
        out.push(span);
    }
    out
}

/// Extract JSON content from markdown code blocks
fn extract_json_from_markdown(content: &str) -> Option<&str> {
    // Match ```json ... ``` or ``` ... ```
    let patterns = ["```json\n", "```JSON\n", "```\n"];

    for pattern in patterns {
        if let Some(start) = content.find(pattern) {
            let json_start = start + pattern.len();
            if let Some(end) = content[json_start..].find("```") {
                return Some(content[json_start..json_start + end].trim());
            }
        }
    }

    None
}

/// Greedy span from the first `{` to the last `}`
fn outer_braces(content: &str) -> Option<&str> {
    let start = content.find('{')?;
    let end = content.rfind('}')?;
    (start < end).then(|| &content[start..=end])
}
