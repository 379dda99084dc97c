//! Defensive JSON extraction for LLM completions (§9): strip a leading
//! `<think>...</think>` block and ```json fences, try a strict parse, then
//! fall back to the first balanced `{...}`/`[...]` substring.

use serde_json::Value;

pub fn extract_json(raw: &str) -> Result<Value, String> {
    let cleaned = strip_think_block(raw);
    let cleaned = strip_code_fence(cleaned);

    if let Ok(value) = serde_json::from_str(cleaned.trim()) {
        return Ok(value);
    }

    match first_balanced_json(cleaned) {
        Some(candidate) => serde_json::from_str(&candidate).map_err(|e| format!("could not parse extracted JSON: {e}")),
        None => Err("no JSON object or array found in response".to_string()),
    }
}

fn strip_think_block(text: &str) -> &str {
    match (text.find("<think>"), text.find("</think>")) {
        (Some(start), Some(end)) if end > start => {
            let after = end + "</think>".len();
            text[after..].trim_start()
        }
        _ => text,
    }
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(after_open) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let after_open = after_open.strip_prefix("json").unwrap_or(after_open);
    let after_open = after_open.trim_start_matches('\n');
    match after_open.rfind("```") {
        Some(close) => after_open[..close].trim_end(),
        None => after_open,
    }
}

/// Scans for the first top-level `{`/`[` and returns the substring up to
/// its matching close, respecting string/escape state so braces inside
/// string literals don't confuse the bracket counter.
fn first_balanced_json(text: &str) -> Option<String> {
    let bytes = text.as_bytes();
    let start = bytes.iter().position(|b| *b == b'{' || *b == b'[')?;
    let opening = bytes[start];
    let closing = if opening == b'{' { b'}' } else { b']' };

    let mut depth = 0i32;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, &byte) in bytes[start..].iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if byte == b'\\' {
                escaped = true;
            } else if byte == b'"' {
                in_string = false;
            }
            continue;
        }
        match byte {
            b'"' => in_string = true,
            b if b == opening => depth += 1,
            b if b == closing => {
                depth -= 1;
                if depth == 0 {
                    let end = start + offset + 1;
                    return Some(text[start..end].to_string());
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_strict_json_directly() {
        assert_eq!(extract_json(r#"{"a": 1}"#).unwrap(), json!({"a": 1}));
    }

    #[test]
    fn strips_think_block_before_parsing() {
        let raw = "<think>reasoning here</think>\n{\"a\": 1}";
        assert_eq!(extract_json(raw).unwrap(), json!({"a": 1}));
    }

    #[test]
    fn strips_json_code_fence() {
        let raw = "```json\n{\"a\": 1}\n```";
        assert_eq!(extract_json(raw).unwrap(), json!({"a": 1}));
    }

    #[test]
    fn extracts_first_balanced_object_from_surrounding_prose() {
        let raw = "Sure, here you go: {\"a\": [1, 2, {\"b\": 3}]} — hope that helps!";
        assert_eq!(extract_json(raw).unwrap(), json!({"a": [1, 2, {"b": 3}]}));
    }

    #[test]
    fn ignores_braces_inside_string_literals() {
        let raw = r#"{"text": "a { b } c", "n": 1}"#;
        assert_eq!(extract_json(raw).unwrap(), json!({"text": "a { b } c", "n": 1}));
    }

    #[test]
    fn fails_when_no_json_present() {
        assert!(extract_json("no json here").is_err());
    }
}
