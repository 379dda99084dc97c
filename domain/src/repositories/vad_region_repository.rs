// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

use async_trait::async_trait;

use crate::entities::VadRegion;
use crate::error::SubflowResult;
use crate::value_objects::ProjectId;

#[async_trait]
pub trait VadRegionRepository: Send + Sync {
    async fn bulk_insert(&self, project_id: ProjectId, regions: Vec<VadRegion>) -> SubflowResult<()>;

    /// Ordered by `start`.
    async fn get_by_project(&self, project_id: ProjectId) -> SubflowResult<Vec<VadRegion>>;

    async fn delete_by_project(&self, project_id: ProjectId) -> SubflowResult<u64>;
}
