//! Concrete adapters behind the domain crate's ports and repository traits.

pub mod artifacts;
pub mod blob_store;
pub mod concurrency;
pub mod health_monitor;
pub mod progress;
pub mod project_store;
pub mod providers;
pub mod repositories;
pub mod task_queue;
