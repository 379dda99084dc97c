// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Audio extraction/separation/normalisation, grounded on
//! `providers/audio/base.py`'s `AudioProvider` ABC.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::SubflowResult;

#[async_trait]
pub trait AudioProvider: Send + Sync {
    async fn extract_audio(
        &self,
        source_path: &Path,
        max_duration_s: Option<f64>,
        cancel: &CancellationToken,
    ) -> SubflowResult<PathBuf>;

    async fn separate_vocals(&self, audio_path: &Path, cancel: &CancellationToken) -> SubflowResult<PathBuf>;

    async fn normalize_audio(
        &self,
        audio_path: &Path,
        target_db: f64,
        cancel: &CancellationToken,
    ) -> SubflowResult<PathBuf>;

    async fn close(&self) -> SubflowResult<()>;
}
