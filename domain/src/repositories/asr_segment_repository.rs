// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::entities::AsrSegment;
use crate::error::SubflowResult;
use crate::value_objects::ProjectId;

#[async_trait]
pub trait AsrSegmentRepository: Send + Sync {
    async fn bulk_insert(&self, project_id: ProjectId, segments: Vec<AsrSegment>) -> SubflowResult<()>;

    /// All segments in time order, with `corrected_text` applied where set.
    async fn get_by_project(&self, project_id: ProjectId) -> SubflowResult<Vec<AsrSegment>>;

    /// `{segment_id: corrected_text}` for segments that have a correction.
    async fn get_corrected_map(&self, project_id: ProjectId) -> SubflowResult<BTreeMap<u32, String>>;

    async fn update_corrected_texts(
        &self,
        project_id: ProjectId,
        corrections: BTreeMap<u32, String>,
    ) -> SubflowResult<()>;

    async fn clear_corrected_texts(&self, project_id: ProjectId) -> SubflowResult<()>;

    async fn get_by_time_range(
        &self,
        project_id: ProjectId,
        start: f64,
        end: f64,
    ) -> SubflowResult<Vec<AsrSegment>>;

    async fn delete_by_project(&self, project_id: ProjectId) -> SubflowResult<u64>;
}
