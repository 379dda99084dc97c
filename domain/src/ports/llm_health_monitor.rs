// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! LLM Health Monitor (C10): a passive observer fed by every LLM call,
//! grounded on `services/llm_health.py`'s per-profile state and sliding
//! 1-hour event window. Optional Redis mirroring (see SPEC_FULL.md §4.11)
//! is a concrete decorator in `subflow`, not part of this port.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::LlmProfile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    Ok,
    Error,
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileHealth {
    pub status: HealthStatus,
    pub configured_provider: String,
    pub configured_model: String,
    pub last_success_at: Option<DateTime<Utc>>,
    pub last_error_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
    pub last_latency_ms: Option<u64>,
    pub calls_last_hour: u64,
    pub errors_last_hour: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverallStatus {
    Healthy,
    Degraded,
    Unhealthy,
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub overall: OverallStatus,
    pub profiles: BTreeMap<LlmProfile, ProfileHealth>,
}

/// Configured `(provider, model)` per profile, supplied by the caller since
/// the monitor itself holds no configuration state.
pub type ConfiguredProviders = BTreeMap<LlmProfile, (String, String)>;

#[async_trait]
pub trait LlmHealthMonitor: Send + Sync {
    /// Never fails; implementations log and swallow their own I/O errors
    /// rather than propagate them into a stage runner's call path.
    async fn report_success(&self, profile: LlmProfile, provider: &str, model: &str, latency_ms: u64);

    async fn report_error(&self, profile: LlmProfile, provider: &str, model: &str, latency_ms: u64, error: &str);

    async fn snapshot(&self, configured: ConfiguredProviders) -> HealthResponse;
}
