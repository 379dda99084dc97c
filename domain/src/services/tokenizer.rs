// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Token counting and prompt truncation, grounded on `utils/tokenizer.py`.
//! Uses `tiktoken-rs`'s `cl100k_base` encoding when it can be constructed,
//! falling back to `text.len() / 2` on construction failure — the same
//! shape as the original's `ImportError` fallback, just triggered by a
//! `Result` instead of a missing module.

use tiktoken_rs::CoreBPE;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TruncationStrategy {
    /// Keep beginning + middle + end, joined by an ellipsis marker.
    Sample,
    Head,
    Tail,
}

const ELLIPSIS: &str = "\n\n[...中间省略...]\n\n";

fn encoder() -> Option<CoreBPE> {
    tiktoken_rs::cl100k_base().ok()
}

pub fn count_tokens(text: &str) -> usize {
    match encoder() {
        Some(bpe) => bpe.encode_ordinary(text).len(),
        None => text.len() / 2,
    }
}

pub fn truncate_to_tokens(text: &str, max_tokens: usize, strategy: TruncationStrategy) -> String {
    match encoder() {
        Some(bpe) => truncate_with_encoder(&bpe, text, max_tokens, strategy),
        None => truncate_by_chars(text, max_tokens * 2, strategy),
    }
}

fn truncate_with_encoder(bpe: &CoreBPE, text: &str, max_tokens: usize, strategy: TruncationStrategy) -> String {
    let tokens = bpe.encode_ordinary(text);
    if tokens.len() <= max_tokens {
        return text.to_string();
    }

    match strategy {
        TruncationStrategy::Head => bpe.decode(tokens[..max_tokens].to_vec()).unwrap_or_default(),
        TruncationStrategy::Tail => bpe
            .decode(tokens[tokens.len() - max_tokens..].to_vec())
            .unwrap_or_default(),
        TruncationStrategy::Sample => {
            let part_size = max_tokens / 3;
            let remainder = max_tokens - part_size * 3;

            let begin = &tokens[..part_size + remainder];
            let mid_start = tokens.len() / 2 - part_size / 2;
            let middle = &tokens[mid_start..mid_start + part_size];
            let end = &tokens[tokens.len() - part_size..];

            let begin_text = bpe.decode(begin.to_vec()).unwrap_or_default();
            let middle_text = bpe.decode(middle.to_vec()).unwrap_or_default();
            let end_text = bpe.decode(end.to_vec()).unwrap_or_default();

            format!("{begin_text}{ELLIPSIS}{middle_text}{ELLIPSIS}{end_text}")
        }
    }
}

fn truncate_by_chars(text: &str, max_chars: usize, strategy: TruncationStrategy) -> String {
    if text.len() <= max_chars {
        return text.to_string();
    }

    match strategy {
        TruncationStrategy::Head => text.chars().take(max_chars).collect(),
        TruncationStrategy::Tail => {
            let skip = text.chars().count().saturating_sub(max_chars);
            text.chars().skip(skip).collect()
        }
        TruncationStrategy::Sample => {
            let chars: Vec<char> = text.chars().collect();
            let part_size = max_chars / 3;
            let begin: String = chars[..part_size].iter().collect();
            let mid_start = chars.len() / 2 - part_size / 2;
            let middle: String = chars[mid_start..mid_start + part_size].iter().collect();
            let end: String = chars[chars.len() - part_size..].iter().collect();
            format!("{begin}{ELLIPSIS}{middle}{ELLIPSIS}{end}")
        }
    }
}

/// Adds ~10 tokens of overhead for message-role formatting, matching the
/// original's `estimate_prompt_tokens`.
pub fn estimate_prompt_tokens(system_prompt: &str, user_content: &str) -> usize {
    const OVERHEAD: usize = 10;
    count_tokens(system_prompt) + count_tokens(user_content) + OVERHEAD
}
