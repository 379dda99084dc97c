// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! StageRun persistence contract, grounded on the original
//! `StageRunRepository` (`mark_running`/`mark_completed`/`mark_failed`/
//! `reset_to_pending`/`set_progress` with metrics merged into a metadata
//! JSON bag).

use async_trait::async_trait;

use crate::entities::{StageMetrics, StageRun};
use crate::error::{ErrorCode, SubflowResult};
use crate::value_objects::{ProjectId, StageName};

#[async_trait]
pub trait StageRunRepository: Send + Sync {
    async fn get(&self, project_id: ProjectId, stage: StageName) -> SubflowResult<Option<StageRun>>;

    async fn list_by_project(&self, project_id: ProjectId) -> SubflowResult<Vec<StageRun>>;

    async fn mark_running(&self, project_id: ProjectId, stage: StageName) -> SubflowResult<StageRun>;

    async fn mark_completed(
        &self,
        project_id: ProjectId,
        stage: StageName,
        output_artifacts: std::collections::BTreeMap<String, String>,
    ) -> SubflowResult<StageRun>;

    async fn mark_failed(
        &self,
        project_id: ProjectId,
        stage: StageName,
        error_code: ErrorCode,
        error_message: String,
    ) -> SubflowResult<StageRun>;

    /// Clears timestamps, error, and metadata — used by retry (C7) to reset
    /// a stage and every downstream stage to pending.
    async fn reset_to_pending(&self, project_id: ProjectId, stage: StageName) -> SubflowResult<StageRun>;

    /// Merges `metrics` into the persisted metadata and updates
    /// progress/progress_message, honoring the monotonic-progress
    /// invariant (callers are expected to have already clamped/rate-limited
    /// via the Progress Reporter; the repository itself does not regress a
    /// higher stored value to a lower one).
    async fn set_progress(
        &self,
        project_id: ProjectId,
        stage: StageName,
        progress: u8,
        message: String,
        metrics: Option<StageMetrics>,
    ) -> SubflowResult<()>;
}
