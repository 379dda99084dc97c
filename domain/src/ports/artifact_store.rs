// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Artifact Store (C1): a namespaced key-value byte store for per-stage
//! artifacts, keyed by `(project_id, stage, name)`. Local-filesystem and
//! S3-compatible backends live in `subflow::infrastructure::artifacts`.

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{SubflowError, SubflowResult};
use crate::value_objects::ProjectId;

/// Object-safe core: every method here can be called through `dyn
/// ArtifactStore`. Text/JSON convenience wrappers live on [`ArtifactStoreExt`]
/// since generic methods would make the trait non-object-safe.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    async fn save(&self, project_id: ProjectId, stage: &str, name: &str, bytes: Vec<u8>) -> SubflowResult<String>;

    async fn load(&self, project_id: ProjectId, stage: &str, name: &str) -> SubflowResult<Vec<u8>>;

    async fn list(&self, project_id: ProjectId, stage: Option<&str>) -> SubflowResult<Vec<String>>;

    async fn list_project_ids(&self) -> SubflowResult<Vec<ProjectId>>;

    async fn delete_project(&self, project_id: ProjectId) -> SubflowResult<u64>;
}

/// Text/JSON convenience wrappers over any [`ArtifactStore`], including
/// through `&dyn ArtifactStore` (the blanket impl covers `?Sized`).
#[async_trait]
pub trait ArtifactStoreExt: ArtifactStore {
    async fn save_text(&self, project_id: ProjectId, stage: &str, name: &str, text: &str) -> SubflowResult<String> {
        self.save(project_id, stage, name, text.as_bytes().to_vec()).await
    }

    async fn load_text(&self, project_id: ProjectId, stage: &str, name: &str) -> SubflowResult<String> {
        let bytes = self.load(project_id, stage, name).await?;
        String::from_utf8(bytes).map_err(|e| SubflowError::artifact_store(e.to_string()))
    }

    async fn save_json<T: Serialize + Sync>(
        &self,
        project_id: ProjectId,
        stage: &str,
        name: &str,
        value: &T,
    ) -> SubflowResult<String> {
        let text = serde_json::to_string_pretty(value).map_err(|e| SubflowError::artifact_store(e.to_string()))?;
        self.save_text(project_id, stage, name, &text).await
    }

    async fn load_json<T: DeserializeOwned>(&self, project_id: ProjectId, stage: &str, name: &str) -> SubflowResult<T> {
        let text = self.load_text(project_id, stage, name).await?;
        serde_json::from_str(&text).map_err(|e| SubflowError::artifact_store(e.to_string()))
    }
}

impl<T: ArtifactStore + ?Sized> ArtifactStoreExt for T {}
