// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Task Queue port consumed by the Task Queue Consumer (C9). Deliberately
//! minimal — push and a blocking-with-timeout pop — so both an in-process
//! channel and a real broker can implement it identically.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::SubflowResult;
use crate::value_objects::QueueTask;

#[async_trait]
pub trait TaskQueue: Send + Sync {
    async fn push(&self, task: QueueTask) -> SubflowResult<()>;

    /// Waits up to `timeout` for a task; `None` on timeout, not an error.
    async fn pop(&self, timeout: Duration) -> SubflowResult<Option<QueueTask>>;
}
