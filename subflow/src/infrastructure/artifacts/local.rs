//! Local-filesystem [`ArtifactStore`] (§4.1): keys map to
//! `{base}/projects/{pid}/{sanitized_stage}/{sanitized_name}`.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use subflow_domain::error::{SubflowError, SubflowResult};
use subflow_domain::ports::ArtifactStore;
use subflow_domain::value_objects::ProjectId;

use super::sanitize_segment;

pub struct LocalArtifactStore {
    base: PathBuf,
}

impl LocalArtifactStore {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    fn project_dir(&self, project_id: ProjectId) -> PathBuf {
        self.base.join("projects").join(project_id.to_string())
    }

    fn path_for(&self, project_id: ProjectId, stage: &str, name: &str) -> PathBuf {
        self.project_dir(project_id).join(sanitize_segment(stage)).join(sanitize_segment(name))
    }
}

#[async_trait]
impl ArtifactStore for LocalArtifactStore {
    async fn save(&self, project_id: ProjectId, stage: &str, name: &str, bytes: Vec<u8>) -> SubflowResult<String> {
        let path = self.path_for(project_id, stage, name);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| SubflowError::artifact_store(e.to_string()))?;
        }
        tokio::fs::write(&path, bytes).await.map_err(|e| SubflowError::artifact_store(e.to_string()))?;
        Ok(path.to_string_lossy().into_owned())
    }

    async fn load(&self, project_id: ProjectId, stage: &str, name: &str) -> SubflowResult<Vec<u8>> {
        let path = self.path_for(project_id, stage, name);
        tokio::fs::read(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SubflowError::artifact_not_found(project_id.to_string(), stage, name)
            } else {
                SubflowError::artifact_store(e.to_string())
            }
        })
    }

    async fn list(&self, project_id: ProjectId, stage: Option<&str>) -> SubflowResult<Vec<String>> {
        let root = match stage {
            Some(stage) => self.project_dir(project_id).join(sanitize_segment(stage)),
            None => self.project_dir(project_id),
        };
        let mut out = Vec::new();
        collect_files(&root, &mut out).await.map_err(|e| SubflowError::artifact_store(e.to_string()))?;
        Ok(out)
    }

    async fn list_project_ids(&self) -> SubflowResult<Vec<ProjectId>> {
        let projects_dir = self.base.join("projects");
        let mut entries = match tokio::fs::read_dir(&projects_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(SubflowError::artifact_store(e.to_string())),
        };

        let mut ids = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(|e| SubflowError::artifact_store(e.to_string()))? {
            if let Some(name) = entry.file_name().to_str() {
                if let Ok(id) = name.parse() {
                    ids.push(id);
                }
            }
        }
        Ok(ids)
    }

    async fn delete_project(&self, project_id: ProjectId) -> SubflowResult<u64> {
        let dir = self.project_dir(project_id);
        let count = count_files(&dir).await;
        match tokio::fs::remove_dir_all(&dir).await {
            Ok(()) => Ok(count),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(0),
            Err(e) => Err(SubflowError::artifact_store(e.to_string())),
        }
    }
}

async fn count_files(root: &Path) -> u64 {
    let mut names = Vec::new();
    let _ = collect_files(root, &mut names).await;
    names.len() as u64
}

fn collect_files<'a>(root: &'a Path, out: &'a mut Vec<String>) -> std::pin::Pin<Box<dyn std::future::Future<Output = std::io::Result<()>> + Send + 'a>> {
    Box::pin(async move {
        let mut entries = match tokio::fs::read_dir(root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e),
        };

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if entry.file_type().await?.is_dir() {
                collect_files(&path, out).await?;
            } else {
                out.push(path.to_string_lossy().into_owned());
            }
        }
        Ok(())
    })
}
