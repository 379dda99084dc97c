// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Project Entity
//!
//! The root aggregate of a pipeline run. Mutated only through the
//! orchestrator (C7); queries must treat it as read-only.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::StageRun;
use crate::value_objects::{ProjectId, ProjectStatus, StageName};

/// Per-stage artifact identifier map: artifact name -> storage identifier
/// (an Artifact Store key or equivalent opaque handle).
pub type StageArtifacts = BTreeMap<String, String>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub media_url: String,
    pub media_files: BTreeMap<String, String>,
    pub source_language: Option<String>,
    pub target_language: String,
    pub auto_workflow: bool,
    pub status: ProjectStatus,
    /// Monotonic index of the last completed stage, in `[0, StageName::ORDER.len()]`.
    pub current_stage: u32,
    pub artifacts: BTreeMap<String, StageArtifacts>,
    pub stage_runs: Vec<StageRun>,
    pub errors: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    pub fn new(name: impl Into<String>, media_url: impl Into<String>, target_language: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: ProjectId::new(),
            name: name.into(),
            media_url: media_url.into(),
            media_files: BTreeMap::new(),
            source_language: None,
            target_language: target_language.into(),
            auto_workflow: true,
            status: ProjectStatus::Pending,
            current_stage: 0,
            artifacts: BTreeMap::new(),
            stage_runs: Vec::new(),
            errors: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Whether `stage` has already been completed for this project, per the
    /// `current_stage = max(i : StageRun(stage_i).status = completed)` invariant.
    pub fn has_completed(&self, stage: StageName) -> bool {
        self.current_stage >= stage.index()
    }

    pub fn stage_run(&self, stage: StageName) -> Option<&StageRun> {
        self.stage_runs.iter().find(|r| r.stage == stage)
    }

    pub fn stage_run_mut(&mut self, stage: StageName) -> Option<&mut StageRun> {
        self.stage_runs.iter_mut().find(|r| r.stage == stage)
    }

    pub fn set_artifacts(&mut self, stage: StageName, artifacts: StageArtifacts) {
        self.artifacts.insert(stage.as_str().to_string(), artifacts);
    }

    pub fn append_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
        self.touch();
    }
}
