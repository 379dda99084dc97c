// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Project Store (C8): a short-TTL cache of project state for the API
//! layer. Authoritative state always lives in the repositories (C3); this
//! cache is advisory and may be absent or stale without affecting
//! correctness.

use async_trait::async_trait;

use crate::entities::Project;
use crate::error::SubflowResult;
use crate::value_objects::ProjectId;

#[async_trait]
pub trait ProjectStore: Send + Sync {
    async fn get(&self, project_id: ProjectId) -> SubflowResult<Option<Project>>;

    /// Touches `updated_at` before writing.
    async fn save(&self, project: &Project) -> SubflowResult<()>;

    async fn delete(&self, project_id: ProjectId) -> SubflowResult<()>;
}
