// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Progress Reporter (C5): rate-limited stage progress persisted via
//! [`crate::repositories::StageRunRepository::set_progress`]. Concrete
//! implementations own the rate-limit clock and the monotonic clamp; a
//! composed variant maps an LLM sub-phase's [0..100] range into an outer
//! window for the combined Pass A + Pass B progress bar.

use async_trait::async_trait;

use crate::entities::StageMetrics;
use crate::error::SubflowResult;

#[async_trait]
pub trait ProgressReporter: Send + Sync {
    /// Persists `progress`/`message` if the rate limits (minimum percent
    /// delta, minimum wall-clock interval) allow it, and notifies any
    /// registered "project updated" watcher. Progress below the
    /// previously-reported value is dropped, not clamped up or down.
    async fn report(&self, progress: u8, message: &str) -> SubflowResult<()>;

    /// Merges `metrics` into the stage run's metadata, subject to the same
    /// rate limiting as `report`.
    async fn report_metrics(&self, metrics: StageMetrics) -> SubflowResult<()>;

    /// Emits a terminal `(100, message)` unconditionally, bypassing rate
    /// limits — callers invoke this exactly once, on stage success.
    async fn finish(&self, message: &str) -> SubflowResult<()>;
}
