// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Concurrency Tracker (C4): a process-wide registry of bounded permits per
//! [`ServiceClass`], grounded on the reference `GlobalResourceManager`'s
//! acquire/release/snapshot shape but backed by `tokio::sync::Semaphore`
//! rather than a hand-rolled counter + condvar.

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::error::SubflowResult;
use crate::value_objects::ServiceClass;

/// A held slot against a service class. Dropping it releases the slot; the
/// concrete implementation wraps a `tokio::sync::OwnedSemaphorePermit` so
/// release is guaranteed on every exit path, including cancellation.
pub trait ConcurrencyPermit: Send {}

#[async_trait]
pub trait ConcurrencyTracker: Send + Sync {
    /// Replaces the configured maxima for the given classes; unspecified
    /// classes are left untouched.
    async fn update_maxima(&self, maxima: BTreeMap<ServiceClass, usize>) -> SubflowResult<()>;

    /// Blocks until a slot is available, then returns a permit that must be
    /// held for the duration of the external call.
    async fn acquire(&self, service: ServiceClass) -> SubflowResult<Box<dyn ConcurrencyPermit>>;

    /// `(active, max)` for the given class, read as a consistent pair.
    async fn snapshot(&self, service: ServiceClass) -> SubflowResult<(usize, usize)>;
}
