//! In-process [`TaskQueue`] backed by a `tokio::sync::Mutex<VecDeque>` plus
//! a `Notify`, for the single-binary `worker` entrypoint. A broker-backed
//! implementation (e.g. Redis lists) would satisfy the same port without
//! the consumer loop (C9) changing at all.

use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{Mutex, Notify};

use subflow_domain::error::SubflowResult;
use subflow_domain::ports::TaskQueue;
use subflow_domain::value_objects::QueueTask;

pub struct InMemoryTaskQueue {
    queue: Mutex<VecDeque<QueueTask>>,
    notify: Notify,
}

impl InMemoryTaskQueue {
    pub fn new() -> Self {
        Self { queue: Mutex::new(VecDeque::new()), notify: Notify::new() }
    }
}

impl Default for InMemoryTaskQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TaskQueue for InMemoryTaskQueue {
    async fn push(&self, task: QueueTask) -> SubflowResult<()> {
        self.queue.lock().await.push_back(task);
        self.notify.notify_one();
        Ok(())
    }

    async fn pop(&self, timeout: Duration) -> SubflowResult<Option<QueueTask>> {
        if let Some(task) = self.queue.lock().await.pop_front() {
            return Ok(Some(task));
        }
        let notified = self.notify.notified();
        tokio::select! {
            _ = notified => Ok(self.queue.lock().await.pop_front()),
            _ = tokio::time::sleep(timeout) => Ok(None),
        }
    }
}
