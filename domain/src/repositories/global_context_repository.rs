// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

use async_trait::async_trait;

use crate::entities::GlobalContext;
use crate::error::SubflowResult;
use crate::value_objects::ProjectId;

#[async_trait]
pub trait GlobalContextRepository: Send + Sync {
    /// Upserts on `project_id` — a project has at most one global context.
    async fn save(&self, project_id: ProjectId, context: &GlobalContext) -> SubflowResult<()>;

    async fn get(&self, project_id: ProjectId) -> SubflowResult<Option<GlobalContext>>;

    async fn delete(&self, project_id: ProjectId) -> SubflowResult<()>;
}
