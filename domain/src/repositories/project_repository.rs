// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Project persistence contract. Grounded on the reference
//! `PipelineRepository` trait and the original `ProjectRepository`
//! (`update_status`, `find_stale_processing` for crash recovery,
//! `update_media_files` for the audio-preprocess stage's ingest step).

use async_trait::async_trait;

use crate::entities::Project;
use crate::entities::project::StageArtifacts;
use crate::error::SubflowResult;
use crate::value_objects::{ProjectId, ProjectStatus};

#[async_trait]
pub trait ProjectRepository: Send + Sync {
    async fn create(&self, project: &Project) -> SubflowResult<()>;

    async fn get(&self, id: ProjectId) -> SubflowResult<Option<Project>>;

    async fn update(&self, project: &Project) -> SubflowResult<()>;

    /// Updates status/current_stage/error_message without requiring the
    /// caller to round-trip the whole aggregate.
    async fn update_status(
        &self,
        id: ProjectId,
        status: ProjectStatus,
        current_stage: Option<u32>,
        error_message: Option<String>,
    ) -> SubflowResult<()>;

    async fn update_media_files(
        &self,
        id: ProjectId,
        media_files: std::collections::BTreeMap<String, String>,
    ) -> SubflowResult<()>;

    async fn set_stage_artifacts(
        &self,
        id: ProjectId,
        stage: &str,
        artifacts: StageArtifacts,
    ) -> SubflowResult<()>;

    async fn list(&self, limit: i64, offset: i64) -> SubflowResult<Vec<Project>>;

    async fn list_all_ids(&self) -> SubflowResult<Vec<ProjectId>>;

    /// Projects stuck `processing` with `updated_at` older than
    /// `max_age_minutes`, for crash recovery (C9).
    async fn find_stale_processing(
        &self,
        max_age_minutes: i64,
        limit: i64,
    ) -> SubflowResult<Vec<Project>>;

    /// Deletes the project and cascades to all child rows.
    async fn delete(&self, id: ProjectId) -> SubflowResult<()>;
}
