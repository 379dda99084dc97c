// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! A materialised subtitle artifact. The export stage itself (rendering
//! SRT/VTT/ASS/JSON) is out of scope per SPEC_FULL.md §1; this entity and
//! its repository (C3) still need to exist so the data model and the
//! `SubtitleExport` repository contract named in §4.3 are complete.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubtitleFormat {
    Srt,
    Vtt,
    Ass,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentMode {
    Both,
    PrimaryOnly,
    SecondaryOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubtitleSource {
    Auto,
    Edited,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubtitleExport {
    pub id: Uuid,
    pub format: SubtitleFormat,
    pub content_mode: ContentMode,
    pub config: Value,
    pub storage_key: String,
    pub source: SubtitleSource,
    pub created_at: DateTime<Utc>,
}
