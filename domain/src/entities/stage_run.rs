// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # StageRun Entity
//!
//! The durable record of one execution of one stage for one project.
//! Grounded on the original `StageRun` dataclass and `StageRunRepository`'s
//! metadata-bag shape (progress/progress_message/metrics live inside a
//! single JSON `metadata` column, not separate SQL columns).

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ErrorCode;
use crate::value_objects::{StageName, StageRunStatus};

/// The metrics bag merged into stage-run metadata. Field names match the
/// persisted-metadata keys named in SPEC_FULL.md §6.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StageMetrics {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items_processed: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items_total: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items_per_second: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub llm_prompt_tokens: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub llm_completion_tokens: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub llm_calls_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub llm_tokens_per_second: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_tasks: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_concurrent: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_status: Option<String>,
    /// Anything else a runner wants to persist that isn't named above.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl StageMetrics {
    /// Merges `other` into `self`; `other`'s values win on key collision,
    /// mirroring the original `set_progress`'s `current_metrics.update(...)`.
    pub fn merge(&mut self, other: StageMetrics) {
        macro_rules! take_if_some {
            ($field:ident) => {
                if other.$field.is_some() {
                    self.$field = other.$field;
                }
            };
        }
        take_if_some!(items_processed);
        take_if_some!(items_total);
        take_if_some!(items_per_second);
        take_if_some!(llm_prompt_tokens);
        take_if_some!(llm_completion_tokens);
        take_if_some!(llm_calls_count);
        take_if_some!(llm_tokens_per_second);
        take_if_some!(active_tasks);
        take_if_some!(max_concurrent);
        take_if_some!(retry_status);
        self.extra.extend(other.extra);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageRun {
    pub stage: StageName,
    pub status: StageRunStatus,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub progress: u8,
    pub progress_message: String,
    pub metrics: StageMetrics,
    pub error_code: Option<ErrorCode>,
    pub error_message: Option<String>,
    pub input_artifacts: BTreeMap<String, String>,
    pub output_artifacts: BTreeMap<String, String>,
}

impl StageRun {
    pub fn pending(stage: StageName) -> Self {
        Self {
            stage,
            status: StageRunStatus::Pending,
            started_at: None,
            completed_at: None,
            progress: 0,
            progress_message: String::new(),
            metrics: StageMetrics::default(),
            error_code: None,
            error_message: None,
            input_artifacts: BTreeMap::new(),
            output_artifacts: BTreeMap::new(),
        }
    }

    /// Duration in milliseconds, derived from `started_at`/`completed_at`
    /// when both are present (the original computes this lazily rather than
    /// storing it, to avoid a second source of truth).
    pub fn duration_ms(&self) -> Option<i64> {
        match (self.started_at, self.completed_at) {
            (Some(start), Some(end)) => Some((end - start).num_milliseconds()),
            _ => None,
        }
    }
}
