// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Stage Name Value Object
//!
//! The five ordered stages of the pipeline. `StageName` carries its own
//! 1-based index so `current_stage` comparisons and `ORDER` iteration never
//! drift out of sync with each other.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageName {
    AudioPreprocess,
    Vad,
    Asr,
    LlmAsrCorrection,
    Llm,
}

impl StageName {
    /// All stages in pipeline order.
    pub const ORDER: [StageName; 5] = [
        StageName::AudioPreprocess,
        StageName::Vad,
        StageName::Asr,
        StageName::LlmAsrCorrection,
        StageName::Llm,
    ];

    /// 1-based index matching `Project.current_stage` once completed.
    pub fn index(self) -> u32 {
        match self {
            StageName::AudioPreprocess => 1,
            StageName::Vad => 2,
            StageName::Asr => 3,
            StageName::LlmAsrCorrection => 4,
            StageName::Llm => 5,
        }
    }

    pub fn from_index(index: u32) -> Option<Self> {
        Self::ORDER.into_iter().find(|s| s.index() == index)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StageName::AudioPreprocess => "audio_preprocess",
            StageName::Vad => "vad",
            StageName::Asr => "asr",
            StageName::LlmAsrCorrection => "llm_asr_correction",
            StageName::Llm => "llm",
        }
    }

    pub fn next(self) -> Option<Self> {
        Self::from_index(self.index() + 1)
    }

    pub fn previous(self) -> Option<Self> {
        if self.index() == 1 {
            None
        } else {
            Self::from_index(self.index() - 1)
        }
    }

    /// The final stage in the pipeline.
    pub fn terminal() -> Self {
        StageName::Llm
    }

    /// Stages strictly after `self`, in order.
    pub fn downstream_of(self) -> impl Iterator<Item = StageName> {
        Self::ORDER.into_iter().filter(move |s| *s > self)
    }
}

impl fmt::Display for StageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for StageName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "audio_preprocess" => Ok(StageName::AudioPreprocess),
            "vad" => Ok(StageName::Vad),
            "asr" => Ok(StageName::Asr),
            "llm_asr_correction" => Ok(StageName::LlmAsrCorrection),
            "llm" => Ok(StageName::Llm),
            other => Err(format!("unknown stage name: {other}")),
        }
    }
}
