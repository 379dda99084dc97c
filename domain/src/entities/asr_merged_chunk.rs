// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! A contiguous grouping of ASR segments forming one LLM-correction context
//! window.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AsrMergedChunk {
    pub region_id: u32,
    pub chunk_id: u32,
    pub start: f64,
    pub end: f64,
    /// Ordered ASR segment ids this chunk covers.
    pub segment_ids: Vec<u32>,
    pub merged_text: String,
}

impl AsrMergedChunk {
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}
