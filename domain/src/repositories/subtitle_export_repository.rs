// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

use async_trait::async_trait;

use crate::entities::SubtitleExport;
use crate::error::SubflowResult;
use crate::value_objects::ProjectId;

#[async_trait]
pub trait SubtitleExportRepository: Send + Sync {
    async fn create(&self, project_id: ProjectId, export: &SubtitleExport) -> SubflowResult<()>;

    async fn get(&self, project_id: ProjectId, export_id: uuid::Uuid) -> SubflowResult<Option<SubtitleExport>>;

    /// Newest first.
    async fn list_by_project(&self, project_id: ProjectId) -> SubflowResult<Vec<SubtitleExport>>;
}
