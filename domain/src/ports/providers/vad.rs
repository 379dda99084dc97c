// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Voice-activity detection, grounded on `providers/vad/base.py`'s
//! `VADProvider` ABC. `detect` returns raw `(start, end)` pairs; the stage
//! runner assigns `region_id`s on insert.

use std::path::Path;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::SubflowResult;

/// Per-frame speech probability, used only when a provider exposes it.
#[derive(Debug, Clone)]
pub struct VadFrameProbs {
    pub frame_hop_s: f64,
    pub probs: Vec<f32>,
}

#[async_trait]
pub trait VadProvider: Send + Sync {
    async fn detect(
        &self,
        audio_path: &Path,
        cancel: &CancellationToken,
    ) -> SubflowResult<(Vec<(f64, f64)>, Option<VadFrameProbs>)>;

    async fn close(&self) -> SubflowResult<()>;
}
