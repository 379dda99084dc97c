//! Project Store (C8): a short-TTL cache of project state for the API
//! layer, advisory only — authoritative state always lives in the
//! repositories (C3). Entries older than the configured TTL are treated as
//! absent and lazily swept on access.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use parking_lot::Mutex;

use subflow_domain::entities::Project;
use subflow_domain::error::SubflowResult;
use subflow_domain::ports::ProjectStore;
use subflow_domain::value_objects::ProjectId;

struct Entry {
    project: Project,
    expires_at: Instant,
}

pub struct InMemoryProjectStore {
    ttl: Duration,
    entries: Mutex<BTreeMap<ProjectId, Entry>>,
}

impl InMemoryProjectStore {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, entries: Mutex::new(BTreeMap::new()) }
    }
}

#[async_trait]
impl ProjectStore for InMemoryProjectStore {
    async fn get(&self, project_id: ProjectId) -> SubflowResult<Option<Project>> {
        let mut entries = self.entries.lock();
        match entries.get(&project_id) {
            Some(entry) if entry.expires_at > Instant::now() => Ok(Some(entry.project.clone())),
            Some(_) => {
                entries.remove(&project_id);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn save(&self, project: &Project) -> SubflowResult<()> {
        let mut project = project.clone();
        project.touch();
        let mut entries = self.entries.lock();
        entries.insert(
            project.id,
            Entry {
                expires_at: Instant::now() + self.ttl,
                project,
            },
        );
        Ok(())
    }

    async fn delete(&self, project_id: ProjectId) -> SubflowResult<()> {
        self.entries.lock().remove(&project_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project() -> Project {
        Project::new("demo", "file:///tmp/demo.mp4", "zh")
    }

    #[tokio::test]
    async fn save_then_get_round_trips() {
        let store = InMemoryProjectStore::new(Duration::from_secs(60));
        let project = project();
        store.save(&project).await.unwrap();

        let fetched = store.get(project.id).await.unwrap().unwrap();
        assert_eq!(fetched.id, project.id);
    }

    #[tokio::test]
    async fn save_touches_updated_at() {
        let store = InMemoryProjectStore::new(Duration::from_secs(60));
        let mut project = project();
        let original = project.updated_at;
        tokio::time::sleep(Duration::from_millis(5)).await;
        project.name = "renamed".to_string();
        store.save(&project).await.unwrap();

        let fetched = store.get(project.id).await.unwrap().unwrap();
        assert!(fetched.updated_at > original);
    }

    #[tokio::test]
    async fn expired_entries_are_treated_as_absent() {
        let store = InMemoryProjectStore::new(Duration::from_millis(1));
        let project = project();
        store.save(&project).await.unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert!(store.get(project.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_removes_the_cached_entry() {
        let store = InMemoryProjectStore::new(Duration::from_secs(60));
        let project = project();
        store.save(&project).await.unwrap();
        store.delete(project.id).await.unwrap();

        assert!(store.get(project.id).await.unwrap().is_none());
    }
}
