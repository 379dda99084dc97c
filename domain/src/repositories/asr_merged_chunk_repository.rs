// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

use async_trait::async_trait;

use crate::entities::AsrMergedChunk;
use crate::error::SubflowResult;
use crate::value_objects::ProjectId;

#[async_trait]
pub trait AsrMergedChunkRepository: Send + Sync {
    /// Unique on `(project_id, region_id, chunk_id)`; re-running the merge
    /// pass for a region replaces its chunks.
    async fn bulk_upsert(&self, project_id: ProjectId, chunks: Vec<AsrMergedChunk>) -> SubflowResult<()>;

    async fn get_by_project(&self, project_id: ProjectId) -> SubflowResult<Vec<AsrMergedChunk>>;

    async fn delete_by_project(&self, project_id: ProjectId) -> SubflowResult<u64>;
}
