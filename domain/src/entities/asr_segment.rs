// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! A transcribed speech segment, optionally LLM-corrected.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AsrSegment {
    /// Contiguous 0-based index, unique per project.
    pub id: u32,
    pub start: f64,
    pub end: f64,
    pub text: String,
    pub corrected_text: Option<String>,
    pub language: Option<String>,
}

impl AsrSegment {
    pub fn new(id: u32, start: f64, end: f64, text: impl Into<String>) -> Self {
        Self {
            id,
            start,
            end,
            text: text.into(),
            corrected_text: None,
            language: None,
        }
    }

    /// The text downstream stages should read: corrected if present,
    /// otherwise the raw ASR output.
    pub fn effective_text(&self) -> &str {
        self.corrected_text.as_deref().unwrap_or(&self.text)
    }
}

/// Verifies `{seg.id for seg in segments} == {0, .., N-1}`, the contiguity
/// invariant from SPEC_FULL.md §8.
pub fn segments_are_contiguous(segments: &[AsrSegment]) -> bool {
    let mut ids: Vec<u32> = segments.iter().map(|s| s.id).collect();
    ids.sort_unstable();
    ids.iter().enumerate().all(|(i, id)| *id == i as u32)
}
