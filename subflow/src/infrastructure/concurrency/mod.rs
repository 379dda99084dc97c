//! Concurrency Tracker (C4): one [`tokio::sync::Semaphore`] per
//! [`ServiceClass`], grounded on the reference `GlobalResourceManager`'s
//! acquire/release/snapshot shape (one semaphore per resource class,
//! `parking_lot::Mutex`-guarded maxima, RAII permits).

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use subflow_domain::error::{SubflowError, SubflowResult};
use subflow_domain::ports::{ConcurrencyPermit, ConcurrencyTracker};
use subflow_domain::value_objects::ServiceClass;

struct ClassState {
    semaphore: Arc<Semaphore>,
    max: usize,
}

pub struct SemaphoreConcurrencyTracker {
    classes: Mutex<BTreeMap<ServiceClass, ClassState>>,
}

impl SemaphoreConcurrencyTracker {
    pub fn new(maxima: BTreeMap<ServiceClass, usize>) -> Self {
        let classes = maxima
            .into_iter()
            .map(|(class, max)| (class, ClassState { semaphore: Arc::new(Semaphore::new(max)), max }))
            .collect();
        Self { classes: Mutex::new(classes) }
    }

    fn semaphore_for(&self, service: ServiceClass) -> Arc<Semaphore> {
        let mut classes = self.classes.lock();
        classes
            .entry(service)
            .or_insert_with(|| ClassState {
                semaphore: Arc::new(Semaphore::new(1)),
                max: 1,
            })
            .semaphore
            .clone()
    }
}

struct OwnedPermit(#[allow(dead_code)] OwnedSemaphorePermit);

impl ConcurrencyPermit for OwnedPermit {}

#[async_trait]
impl ConcurrencyTracker for SemaphoreConcurrencyTracker {
    async fn update_maxima(&self, maxima: BTreeMap<ServiceClass, usize>) -> SubflowResult<()> {
        let mut classes = self.classes.lock();
        for (class, max) in maxima {
            classes.insert(class, ClassState { semaphore: Arc::new(Semaphore::new(max)), max });
        }
        Ok(())
    }

    async fn acquire(&self, service: ServiceClass) -> SubflowResult<Box<dyn ConcurrencyPermit>> {
        let semaphore = self.semaphore_for(service);
        let permit = semaphore.acquire_owned().await.map_err(|e| SubflowError::configuration(e.to_string()))?;
        Ok(Box::new(OwnedPermit(permit)))
    }

    async fn snapshot(&self, service: ServiceClass) -> SubflowResult<(usize, usize)> {
        let classes = self.classes.lock();
        match classes.get(&service) {
            Some(state) => {
                let active = state.max.saturating_sub(state.semaphore.available_permits());
                Ok((active, state.max))
            }
            None => Ok((0, 0)),
        }
    }
}
