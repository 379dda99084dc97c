//! Blob Store (C2): content-addressed media storage with reference
//! counting and a derived-blob cache, layered on [`BlobRepository`] plus a
//! `{base}/blobs/{hash[0:2]}/{hash[2:4]}/{hash}` on-disk layout.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::Value;
use tracing::warn;

use subflow_domain::entities::{Blob, DerivedBlob, FileType, ProjectFile};
use subflow_domain::error::{SubflowError, SubflowResult};
use subflow_domain::repositories::BlobRepository;
use subflow_domain::value_objects::{BlobHash, ProjectId};

pub struct BlobStore {
    base: PathBuf,
    repo: Arc<dyn BlobRepository>,
}

impl BlobStore {
    pub fn new(base: impl Into<PathBuf>, repo: Arc<dyn BlobRepository>) -> Self {
        Self { base: base.into(), repo }
    }

    pub fn path_for(&self, hash: &BlobHash) -> PathBuf {
        let (shard_a, shard_b) = hash.shard();
        self.base.join("blobs").join(shard_a).join(shard_b).join(hash.as_str())
    }

    /// Moves `source` into the content-addressed layout if it is not
    /// already present, then records/updates the (project, file_type)
    /// association. Metadata failures never corrupt the on-disk blob: the
    /// file is moved first, and a best-effort path is returned even if the
    /// subsequent bookkeeping errors (§4.2's failure-isolation note).
    pub async fn ingest_file(
        &self,
        project_id: ProjectId,
        file_type: FileType,
        source: &Path,
        mime: &str,
    ) -> SubflowResult<BlobHash> {
        let source_owned = source.to_path_buf();
        let hash = tokio::task::spawn_blocking(move || BlobHash::of_file(&source_owned))
            .await
            .map_err(|e| SubflowError::blob_store(e.to_string()))?
            .map_err(|e| SubflowError::blob_store(e.to_string()))?;
        let size = tokio::fs::metadata(source).await.map_err(|e| SubflowError::blob_store(e.to_string()))?.len();
        let dest = self.path_for(&hash);

        if tokio::fs::metadata(&dest).await.is_err() {
            if let Some(parent) = dest.parent() {
                tokio::fs::create_dir_all(parent).await.map_err(|e| SubflowError::blob_store(e.to_string()))?;
            }
            if tokio::fs::rename(source, &dest).await.is_err() {
                tokio::fs::copy(source, &dest).await.map_err(|e| SubflowError::blob_store(e.to_string()))?;
            }
        }

        if let Err(err) = self.record_ingest(project_id, file_type, &hash, size, mime).await {
            warn!(error = %err, "blob metadata write failed after on-disk ingest; blob at {:?} is orphaned until the next GC sweep", dest);
            return Err(err);
        }

        Ok(hash)
    }

    async fn record_ingest(&self, project_id: ProjectId, file_type: FileType, hash: &BlobHash, size: u64, mime: &str) -> SubflowResult<()> {
        let existing = self.repo.get_project_file(project_id, file_type).await?;
        if let Some(existing) = &existing {
            if &existing.blob_hash == hash {
                self.repo.touch_last_accessed(hash).await?;
                return Ok(());
            }
        }

        self.repo.ensure_blob(hash, size, mime).await?;
        self.repo.increment_ref_count(hash).await?;
        if let Some(existing) = existing {
            self.repo.decrement_ref_count(&existing.blob_hash).await?;
        }
        self.repo
            .link_project_file(&ProjectFile {
                project_id,
                file_type,
                blob_hash: hash.clone(),
            })
            .await
    }

    /// Drops every `project_files` row for `project_id` and decrements the
    /// ref count of each blob it pointed to.
    pub async fn release_project_files(&self, project_id: ProjectId) -> SubflowResult<()> {
        for file in self.repo.list_project_files(project_id).await? {
            self.repo.decrement_ref_count(&file.blob_hash).await?;
        }
        Ok(())
    }

    /// Deletes on-disk files and rows for blobs with `ref_count <= 0`,
    /// oldest-accessed first. Returns the hashes removed (or that would be
    /// removed, under `dry_run`).
    pub async fn gc_unreferenced(&self, limit: i64, dry_run: bool) -> SubflowResult<Vec<BlobHash>> {
        let candidates = self.repo.list_unreferenced(limit).await?;
        let mut removed = Vec::with_capacity(candidates.len());
        for blob in candidates {
            if dry_run {
                removed.push(blob.hash);
                continue;
            }
            if !self.still_unreferenced(&blob).await? {
                continue;
            }
            let path = self.path_for(&blob.hash);
            if let Err(e) = tokio::fs::remove_file(&path).await {
                if e.kind() != std::io::ErrorKind::NotFound {
                    warn!(error = %e, hash = %blob.hash, "failed to remove blob file during GC");
                }
            }
            self.repo.delete_blob(&blob.hash).await?;
            removed.push(blob.hash);
        }
        Ok(removed)
    }

    async fn still_unreferenced(&self, blob: &Blob) -> SubflowResult<bool> {
        let current = self.repo.get_blob(&blob.hash).await?;
        Ok(current.map(|b| b.ref_count <= 0).unwrap_or(false))
    }

    pub async fn get_derived(&self, transform: &str, source_hash: &BlobHash, params: &Value) -> SubflowResult<Option<BlobHash>> {
        let params_hash = hash_params(params);
        Ok(self.repo.get_derived_blob(transform, source_hash, &params_hash).await?.map(|d| d.dst_hash))
    }

    pub async fn set_derived(&self, transform: &str, source_hash: &BlobHash, params: &Value, dst_hash: BlobHash) -> SubflowResult<()> {
        let params_hash = hash_params(params);
        self.repo
            .record_derived_blob(&DerivedBlob {
                transform: transform.to_string(),
                source_hash: source_hash.clone(),
                params_hash,
                dst_hash,
            })
            .await
    }
}

/// Canonicalises `params` (sorted object keys, compact separators) before
/// hashing so that semantically identical param sets always produce the
/// same derived-blob cache key.
fn hash_params(params: &Value) -> String {
    let canonical = canonicalize(params);
    let bytes = serde_json::to_vec(&canonical).unwrap_or_default();
    BlobHash::of_bytes(&bytes).as_str().to_string()
}

fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let sorted: std::collections::BTreeMap<String, Value> = map.iter().map(|(k, v)| (k.clone(), canonicalize(v))).collect();
            serde_json::to_value(sorted).unwrap_or(Value::Null)
        }
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        other => other.clone(),
    }
}
