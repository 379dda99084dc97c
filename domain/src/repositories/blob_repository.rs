// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Pure data-access port over `file_blobs` / `project_files` /
//! `derived_blobs`. The content-addressed ingest/GC algorithm (hashing,
//! sharded layout, reference counting) is a concrete service in the
//! `subflow` crate; this trait only covers its row-level reads/writes.

use async_trait::async_trait;

use crate::entities::{Blob, DerivedBlob, FileType, ProjectFile};
use crate::error::SubflowResult;
use crate::value_objects::{BlobHash, ProjectId};

#[async_trait]
pub trait BlobRepository: Send + Sync {
    async fn get_blob(&self, hash: &BlobHash) -> SubflowResult<Option<Blob>>;

    /// Inserts a new blob row with `ref_count = 0`, or no-ops if it exists.
    async fn ensure_blob(&self, hash: &BlobHash, size: u64, mime: &str) -> SubflowResult<()>;

    async fn increment_ref_count(&self, hash: &BlobHash) -> SubflowResult<()>;

    async fn decrement_ref_count(&self, hash: &BlobHash) -> SubflowResult<()>;

    async fn touch_last_accessed(&self, hash: &BlobHash) -> SubflowResult<()>;

    /// Blobs with `ref_count <= 0`, candidates for GC sweep.
    async fn list_unreferenced(&self, limit: i64) -> SubflowResult<Vec<Blob>>;

    async fn delete_blob(&self, hash: &BlobHash) -> SubflowResult<()>;

    async fn link_project_file(&self, link: &ProjectFile) -> SubflowResult<()>;

    async fn get_project_file(
        &self,
        project_id: ProjectId,
        file_type: FileType,
    ) -> SubflowResult<Option<ProjectFile>>;

    async fn list_project_files(&self, project_id: ProjectId) -> SubflowResult<Vec<ProjectFile>>;

    async fn record_derived_blob(&self, derived: &DerivedBlob) -> SubflowResult<()>;

    async fn get_derived_blob(
        &self,
        transform: &str,
        source_hash: &BlobHash,
        params_hash: &str,
    ) -> SubflowResult<Option<DerivedBlob>>;
}
