// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Concurrency-class keys for the Concurrency Tracker (C4) and the two LLM
//! profile slots stages route through.

use serde::{Deserialize, Serialize};

/// A process-wide bounded-concurrency class. Grounded on the original
/// `ServiceType = Literal["asr", "llm_fast", "llm_power"]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceClass {
    Asr,
    LlmFast,
    LlmPower,
}

impl ServiceClass {
    pub const ALL: [ServiceClass; 3] = [ServiceClass::Asr, ServiceClass::LlmFast, ServiceClass::LlmPower];

    pub fn as_str(self) -> &'static str {
        match self {
            ServiceClass::Asr => "asr",
            ServiceClass::LlmFast => "llm_fast",
            ServiceClass::LlmPower => "llm_power",
        }
    }
}

impl std::fmt::Display for ServiceClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which LLM profile slot a stage's calls route through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LlmProfile {
    Fast,
    Power,
}

impl LlmProfile {
    pub fn service_class(self) -> ServiceClass {
        match self {
            LlmProfile::Fast => ServiceClass::LlmFast,
            LlmProfile::Power => ServiceClass::LlmPower,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LlmProfile::Fast => "fast",
            LlmProfile::Power => "power",
        }
    }
}

impl std::fmt::Display for LlmProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
