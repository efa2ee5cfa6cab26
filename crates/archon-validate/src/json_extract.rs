//! ABOUTME: Stage 1 (structural) extraction: find the first well-formed JSON object
//! ABOUTME: in a raw model response, whether fenced in ```json or emitted bare

use archon_core::error::{OrchestratorError, Result};
use serde_json::Value;

/// Extract and parse the first well-formed JSON object from `raw`.
///
/// Tries, in order: a fenced ` ```json ... ``` ` block, a fenced ` ``` ... ``` `
/// block, then a brace-matched scan for the first top-level `{ ... }` in the
/// raw text. Providers are inconsistent about JSON-mode support (spec §9
/// Open Questions), so this never assumes a particular shape — it always
/// runs, even when the caller believes the provider honored `response_format`.
pub fn extract_json_object(raw: &str) -> Result<Value> {
    if let Some(json) = try_fenced(raw, "```json") {
        if let Ok(value) = serde_json::from_str(&json) {
            return Ok(value);
        }
    }
    if let Some(json) = try_fenced(raw, "```") {
        if let Ok(value) = serde_json::from_str(&json) {
            return Ok(value);
        }
    }
    if let Some(json) = brace_match(raw) {
        if let Ok(value) = serde_json::from_str(&json) {
            return Ok(value);
        }
    }
    Err(OrchestratorError::OutputValidation {
        message: "no well-formed JSON object found in provider response".to_string(),
    })
}

fn try_fenced(raw: &str, opener: &str) -> Option<String> {
    let start = raw.find(opener)? + opener.len();
    let rest = &raw[start..];
    let end = rest.find("```")?;
    Some(rest[..end].trim().to_string())
}

/// Scan for the first balanced `{ ... }` span, respecting string literals so
/// braces inside quoted strings don't throw off the depth count.
fn brace_match(raw: &str) -> Option<String> {
    let bytes = raw.as_bytes();
    let open = bytes.iter().position(|&b| b == b'{')?;

    let mut depth = 0i32;
    let mut in_string = false;
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate().skip(open) {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return std::str::from_utf8(&bytes[open..=i]).ok().map(str::to_string);
                }
            }
            _ => {}
        }
    }
    None
}
