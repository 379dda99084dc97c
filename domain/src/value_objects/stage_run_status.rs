// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

use serde::{Deserialize, Serialize};

/// Status of one [`crate::entities::StageRun`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageRunStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

impl StageRunStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            StageRunStatus::Pending => "pending",
            StageRunStatus::Running => "running",
            StageRunStatus::Completed => "completed",
            StageRunStatus::Failed => "failed",
        }
    }
}

impl std::fmt::Display for StageRunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for StageRunStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(StageRunStatus::Pending),
            "running" => Ok(StageRunStatus::Running),
            "completed" => Ok(StageRunStatus::Completed),
            "failed" => Ok(StageRunStatus::Failed),
            other => Err(format!("unknown stage run status: {other}")),
        }
    }
}
