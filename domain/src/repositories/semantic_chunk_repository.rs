// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

use async_trait::async_trait;

use crate::entities::SemanticChunk;
use crate::error::SubflowResult;
use crate::value_objects::ProjectId;

#[async_trait]
pub trait SemanticChunkRepository: Send + Sync {
    /// Inserts the parent chunk rows, then their `translation_chunks`
    /// children, inside a single transaction. Replaces any chunks already
    /// stored for the project.
    async fn bulk_insert(&self, project_id: ProjectId, chunks: Vec<SemanticChunk>) -> SubflowResult<()>;

    /// Parents joined with their translation children, grouped back into
    /// `SemanticChunk`, ordered by `chunk_index`.
    async fn get_by_project(&self, project_id: ProjectId) -> SubflowResult<Vec<SemanticChunk>>;

    /// Cascades to `translation_chunks`.
    async fn delete_by_project(&self, project_id: ProjectId) -> SubflowResult<u64>;
}
