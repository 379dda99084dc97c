// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Defensive parsing of LLM JSON output that may have been truncated
//! mid-stream, grounded on `utils/json_repair.py`.

use serde_json::Value;

/// Best-effort repair of a truncated JSON string: closes an unterminated
/// string, then any open `[`/`{` nesting, in that order.
pub fn repair_truncated_json(text: &str) -> String {
    let text = text.trim();
    if text.is_empty() {
        return "{}".to_string();
    }

    let mut in_string = false;
    let mut escape_next = false;
    let mut brace_count: i32 = 0;
    let mut bracket_count: i32 = 0;

    for ch in text.chars() {
        if escape_next {
            escape_next = false;
            continue;
        }
        match ch {
            '\\' => escape_next = true,
            '"' => in_string = !in_string,
            '{' if !in_string => brace_count += 1,
            '}' if !in_string => brace_count -= 1,
            '[' if !in_string => bracket_count += 1,
            ']' if !in_string => bracket_count -= 1,
            _ => {}
        }
    }

    let mut result = text.to_string();
    if in_string {
        result.push('"');
    }
    while bracket_count > 0 {
        result.push(']');
        bracket_count -= 1;
    }
    while brace_count > 0 {
        result.push('}');
        brace_count -= 1;
    }
    result
}

/// Strict parse, then repair-and-retry, then a last-ditch regex-free scan
/// for the first balanced `{...}` or `[...]` span. Returns `None` rather
/// than an error — callers decide whether a missing result is fatal.
pub fn parse_json_safe(raw: &str) -> Option<Value> {
    let text = raw.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(value) = serde_json::from_str(text) {
        return Some(value);
    }

    let repaired = repair_truncated_json(text);
    if let Ok(value) = serde_json::from_str(&repaired) {
        return Some(value);
    }

    extract_balanced_span(text).and_then(|span| serde_json::from_str(span).ok())
}

/// Finds the first top-level `{...}` or `[...]` span in `text`, ignoring
/// nested nesting of the other bracket kind and string contents — a
/// dependency-free stand-in for the original's single-level regex scan.
fn extract_balanced_span(text: &str) -> Option<&str> {
    let bytes = text.as_bytes();
    let (start_idx, open, close) = text
        .char_indices()
        .find_map(|(i, c)| match c {
            '{' => Some((i, b'{', b'}')),
            '[' => Some((i, b'[', b']')),
            _ => None,
        })?;

    let mut depth: i32 = 0;
    let mut in_string = false;
    let mut escape_next = false;
    for (i, &b) in bytes.iter().enumerate().skip(start_idx) {
        if escape_next {
            escape_next = false;
            continue;
        }
        match b {
            b'\\' => escape_next = true,
            b'"' => in_string = !in_string,
            b if !in_string && b == open => depth += 1,
            b if !in_string && b == close => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start_idx..=i]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Parses tool-call arguments, which must be a JSON object.
pub fn parse_tool_arguments_safe(raw: &str) -> Option<serde_json::Map<String, Value>> {
    match parse_json_safe(raw)? {
        Value::Object(map) => Some(map),
        _ => None,
    }
}
