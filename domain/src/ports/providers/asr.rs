// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Speech recognition, grounded on `providers/asr/base.py`'s `ASRProvider`
//! ABC. `AsrProviderSegment` is the raw provider-level shape returned per
//! call, distinct from the persisted [`crate::entities::AsrSegment`] the
//! stage runner builds from it (it carries no stable `id` yet).

use std::path::Path;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::SubflowResult;

#[derive(Debug, Clone, PartialEq)]
pub struct AsrProviderSegment {
    pub text: String,
    pub start: f64,
    pub end: f64,
    pub language: Option<String>,
    pub confidence: Option<f64>,
}

#[async_trait]
pub trait AsrProvider: Send + Sync {
    /// Transcribes the whole file.
    async fn transcribe(&self, audio_path: &Path, cancel: &CancellationToken) -> SubflowResult<Vec<AsrProviderSegment>>;

    /// Transcribes a single pre-cut region, used by the per-region
    /// bounded-concurrency fan-out in the `asr` stage runner.
    async fn transcribe_segment(
        &self,
        audio_path: &Path,
        start: f64,
        end: f64,
        cancel: &CancellationToken,
    ) -> SubflowResult<AsrProviderSegment>;

    async fn close(&self) -> SubflowResult<()>;
}
