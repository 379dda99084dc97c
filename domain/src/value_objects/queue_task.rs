// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! The task shape the Task Queue Consumer (C9) dequeues, grounded on the
//! original `{"type": ..., "project_id": ..., "stage": ..., "from_stage": ...}`
//! queue message.

use serde::{Deserialize, Serialize};

use crate::value_objects::{ProjectId, StageName};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueTaskKind {
    RunAll,
    RunStage,
    RetryStage,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueTask {
    pub kind: QueueTaskKind,
    pub project_id: ProjectId,
    /// Required for `run_stage`/`retry_stage`; ignored for `run_all`.
    pub stage: Option<StageName>,
    /// Optional override for `run_all`'s starting point; defaults to the
    /// next stage after `project.current_stage`.
    pub from_stage: Option<StageName>,
}

impl QueueTask {
    pub fn run_all(project_id: ProjectId) -> Self {
        Self { kind: QueueTaskKind::RunAll, project_id, stage: None, from_stage: None }
    }

    pub fn run_stage(project_id: ProjectId, stage: StageName) -> Self {
        Self { kind: QueueTaskKind::RunStage, project_id, stage: Some(stage), from_stage: None }
    }

    pub fn retry_stage(project_id: ProjectId, stage: StageName) -> Self {
        Self { kind: QueueTaskKind::RetryStage, project_id, stage: Some(stage), from_stage: None }
    }
}
