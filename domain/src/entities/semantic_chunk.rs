// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Semantic Chunk Entity
//!
//! A unit of semantic translation covering one or more ASR segments, owning
//! an ordered set of [`TranslationChunk`] children.
//!
//! `TranslationChunk.segment_ids` is a *list*, not a single id: the model
//! may return one translation chunk spanning several source segments when
//! the target-language phrasing doesn't align 1:1 with recognition
//! boundaries (see DESIGN.md's Open Questions for why this follows the
//! richer shape rather than the "exactly one" wording).

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationChunk {
    pub text: String,
    /// Absolute ASR segment ids this translation slice covers.
    pub segment_ids: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemanticChunk {
    pub chunk_index: u32,
    pub source_text: String,
    pub translation: String,
    /// Ordered, contiguous ASR segment ids covered by this chunk.
    pub asr_segment_ids: Vec<u32>,
    pub translation_chunks: Vec<TranslationChunk>,
}

impl SemanticChunk {
    /// Checks the foundational invariant from SPEC_FULL.md §3: the union of
    /// `translation_chunks[*].segment_ids` equals `asr_segment_ids` exactly,
    /// with no id repeated across chunks.
    pub fn translation_chunks_partition_segments(&self) -> bool {
        let mut seen = BTreeSet::new();
        for tc in &self.translation_chunks {
            for id in &tc.segment_ids {
                if !seen.insert(*id) {
                    return false; // repeated across chunks
                }
            }
        }
        let expected: BTreeSet<u32> = self.asr_segment_ids.iter().copied().collect();
        seen == expected
    }
}
