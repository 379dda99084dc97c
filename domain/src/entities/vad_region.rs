// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! A coarse speech region detected by the VAD provider.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VadRegion {
    pub region_id: u32,
    pub start: f64,
    pub end: f64,
}

impl VadRegion {
    pub fn new(region_id: u32, start: f64, end: f64) -> Self {
        Self { region_id, start, end }
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}
