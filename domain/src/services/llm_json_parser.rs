// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Parses the `[{"id": x, "text": "..."}]` shape the ASR-correction stage
//! expects back from the model, grounded on `utils/llm_json_parser.py`.

use std::collections::BTreeMap;

use serde_json::Value;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum LlmJsonParseError {
    #[error("invalid JSON: {0}")]
    InvalidJson(String),
    #[error("expected a JSON array, got {0}")]
    NotAnArray(&'static str),
    #[error("missing translations for ids={0:?}")]
    MissingIds(Vec<i64>),
}

fn strip_code_fence(raw: &str) -> String {
    let text = raw.trim();
    if !text.starts_with("```") {
        return text.to_string();
    }
    text.lines()
        .filter(|line| !line.trim_start().starts_with("```"))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

fn parse_array(raw: &str) -> Result<Vec<Value>, LlmJsonParseError> {
    let text = strip_code_fence(raw);
    let value: Value = serde_json::from_str(&text).map_err(|e| LlmJsonParseError::InvalidJson(e.to_string()))?;
    match value {
        Value::Array(items) => Ok(items),
        other => Err(LlmJsonParseError::NotAnArray(value_type_name(&other))),
    }
}

fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn collect_id_text_map(items: Vec<Value>) -> BTreeMap<i64, String> {
    let mut out = BTreeMap::new();
    for item in items {
        let Value::Object(map) = item else { continue };
        let Some(raw_id) = map.get("id") else { continue };
        let Some(id) = raw_id.as_i64() else { continue };
        out.entry(id).or_insert_with(|| {
            map.get("text")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .trim()
                .to_string()
        });
    }
    out
}

/// Strict parse: fails if any `expected_ids` entry is absent from the
/// response, matching the original's `parse_id_text_array`.
pub fn parse_id_text_array(raw_output: &str, expected_ids: &[u32]) -> Result<BTreeMap<i64, String>, LlmJsonParseError> {
    let items = parse_array(raw_output)?;
    let out = collect_id_text_map(items);

    let missing: Vec<i64> = expected_ids
        .iter()
        .map(|id| *id as i64)
        .filter(|id| !out.contains_key(id))
        .collect();
    if !missing.is_empty() {
        return Err(LlmJsonParseError::MissingIds(missing));
    }
    Ok(out)
}

/// Best-effort parse with no completeness requirement, matching the
/// original's `parse_id_text_array_partial` — used when missing ids are
/// acceptable (e.g. the ASR-correction stage, which may legitimately
/// correct zero segments).
pub fn parse_id_text_array_partial(raw_output: &str) -> Result<BTreeMap<i64, String>, LlmJsonParseError> {
    let items = parse_array(raw_output)?;
    Ok(collect_id_text_map(items))
}
