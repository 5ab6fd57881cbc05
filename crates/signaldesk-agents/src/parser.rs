use serde_json::Value;

use crate::error::AgentError;

/// Isolate the JSON payload in a model response. Never fails and never
/// parses JSON; a bad payload is reported by the caller that parses it.
///
/// Handles the common response formats:
/// - Clean JSON: `{"key": "value"}` or `[...]`
/// - Markdown-wrapped: ```json\n{"key": "value"}\n```
/// - Prefix text: `Here is the analysis:\n{"key": "value"}`
///
/// Anything else comes back trimmed but otherwise unchanged.
///
/// The result is a fixed point: extracting it again returns it unchanged.
pub fn extract_json(text: &str) -> String {
    let mut current = text.trim().to_string();
    // Each step either shrinks the text or leaves it as is.
    loop {
        let next = extract_step(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn extract_step(trimmed: &str) -> String {
    if let Some(inner) = extract_from_markdown_block(trimmed) {
        return inner;
    }

    if !trimmed.starts_with('{') && !trimmed.starts_with('[') {
        if let Some(payload) = extract_first_balanced(trimmed) {
            return payload.to_string();
        }
    }

    trimmed.to_string()
}

/// Extract the body of a markdown code block (```json ... ``` or ``` ... ```).
fn extract_from_markdown_block(text: &str) -> Option<String> {
    let start_markers = [
        "```json\n",
        "```json\r\n",
        "```JSON\n",
        "```JSON\r\n",
        "```\n",
        "```\r\n",
    ];

    for marker in &start_markers {
        if let Some(start) = text.find(marker) {
            let body_start = start + marker.len();
            if let Some(end) = text[body_start..].find("```") {
                return Some(text[body_start..body_start + end].trim().to_string());
            }
        }
    }

    None
}

/// Find the first balanced `{ ... }` or `[ ... ]` in the text, skipping
/// brackets inside string literals.
fn extract_first_balanced(text: &str) -> Option<&str> {
    let (start, open) = text.char_indices().find(|(_, ch)| *ch == '{' || *ch == '[')?;
    let close = if open == '{' { '}' } else { ']' };

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape_next = false;

    for (i, ch) in text[start..].char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }

        match ch {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            c if c == open && !in_string => depth += 1,
            c if c == close && !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..=start + i]);
                }
            }
            _ => {}
        }
    }

    None
}

/// Parse extracted text into a generic JSON value. Syntax errors map to
/// `AgentError::Parse` so callers can tell them apart from shape problems.
pub fn parse_json_value(json_text: &str) -> Result<Value, AgentError> {
    serde_json::from_str(json_text).map_err(|e| {
        AgentError::Parse(format!(
            "{e} (payload length={})",
            json_text.len()
        ))
    })
}
