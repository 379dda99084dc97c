// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Per-project structured summary produced by the global-understanding
//! pass (C11 Pass A) and used to condition semantic chunking/translation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GlobalContext {
    pub topic: String,
    pub domain: String,
    pub style: String,
    pub glossary: BTreeMap<String, String>,
    pub translation_notes: Vec<String>,
}

impl GlobalContext {
    /// The fallback value when the model's response is missing fields,
    /// matching the original's `{"topic": "unknown", ...}` default.
    pub fn unknown() -> Self {
        Self {
            topic: "unknown".to_string(),
            domain: "unknown".to_string(),
            style: "unknown".to_string(),
            glossary: BTreeMap::new(),
            translation_notes: Vec::new(),
        }
    }
}
