// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Blob Store (C2) entities: content-addressed media blobs, the per-project
//! file association, and the derived-blob cache index.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{BlobHash, ProjectId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Blob {
    pub hash: BlobHash,
    pub size: u64,
    pub mime: Option<String>,
    pub ref_count: i64,
    pub created_at: DateTime<Utc>,
    pub last_accessed_at: DateTime<Utc>,
}

/// Which role a project's ingested file plays, per SPEC_FULL.md §3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileType {
    InputVideo,
    Audio,
    Vocals,
}

impl FileType {
    pub fn as_str(self) -> &'static str {
        match self {
            FileType::InputVideo => "input_video",
            FileType::Audio => "audio",
            FileType::Vocals => "vocals",
        }
    }
}

impl std::fmt::Display for FileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectFile {
    pub project_id: ProjectId,
    pub file_type: FileType,
    pub blob_hash: BlobHash,
}

/// `(transform, source_hash, params_hash) -> dst_hash`, enabling
/// deterministic reuse of expensive derivatives (e.g. vocal separation).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedBlob {
    pub transform: String,
    pub source_hash: BlobHash,
    pub params_hash: String,
    pub dst_hash: BlobHash,
}
