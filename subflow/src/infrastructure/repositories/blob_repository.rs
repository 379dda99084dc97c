//! SQLite-backed [`BlobRepository`].

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, SqlitePool};

use subflow_domain::entities::{Blob, DerivedBlob, FileType, ProjectFile};
use subflow_domain::error::SubflowResult;
use subflow_domain::repositories::BlobRepository;
use subflow_domain::value_objects::{BlobHash, ProjectId};

use super::map_sqlx_err;

pub struct SqliteBlobRepository {
    pool: SqlitePool,
}

impl SqliteBlobRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn parse_file_type(s: &str) -> SubflowResult<FileType> {
    match s {
        "input_video" => Ok(FileType::InputVideo),
        "audio" => Ok(FileType::Audio),
        "vocals" => Ok(FileType::Vocals),
        other => Err(subflow_domain::SubflowError::repository(format!("bad file type {other}"))),
    }
}

fn row_to_blob(row: &sqlx::sqlite::SqliteRow) -> SubflowResult<Blob> {
    let hash: String = row.try_get("hash").map_err(map_sqlx_err)?;
    Ok(Blob {
        hash: BlobHash::from_hex(hash).map_err(subflow_domain::SubflowError::repository)?,
        size: row.try_get::<i64, _>("size").map_err(map_sqlx_err)? as u64,
        mime: row.try_get("mime").map_err(map_sqlx_err)?,
        ref_count: row.try_get("ref_count").map_err(map_sqlx_err)?,
        created_at: row.try_get("created_at").map_err(map_sqlx_err)?,
        last_accessed_at: row.try_get("last_accessed_at").map_err(map_sqlx_err)?,
    })
}

#[async_trait]
impl BlobRepository for SqliteBlobRepository {
    async fn get_blob(&self, hash: &BlobHash) -> SubflowResult<Option<Blob>> {
        let row = sqlx::query("SELECT * FROM file_blobs WHERE hash = ?")
            .bind(hash.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_err)?;

        row.as_ref().map(row_to_blob).transpose()
    }

    async fn ensure_blob(&self, hash: &BlobHash, size: u64, mime: &str) -> SubflowResult<()> {
        let now = Utc::now();
        sqlx::query(
            "INSERT INTO file_blobs (hash, size, mime, ref_count, created_at, last_accessed_at) VALUES (?, ?, ?, 0, ?, ?) \
             ON CONFLICT(hash) DO NOTHING",
        )
        .bind(hash.as_str())
        .bind(size as i64)
        .bind(mime)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(())
    }

    async fn increment_ref_count(&self, hash: &BlobHash) -> SubflowResult<()> {
        sqlx::query("UPDATE file_blobs SET ref_count = ref_count + 1 WHERE hash = ?")
            .bind(hash.as_str())
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_err)?;
        Ok(())
    }

    async fn decrement_ref_count(&self, hash: &BlobHash) -> SubflowResult<()> {
        sqlx::query("UPDATE file_blobs SET ref_count = ref_count - 1 WHERE hash = ?")
            .bind(hash.as_str())
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_err)?;
        Ok(())
    }

    async fn touch_last_accessed(&self, hash: &BlobHash) -> SubflowResult<()> {
        sqlx::query("UPDATE file_blobs SET last_accessed_at = ? WHERE hash = ?")
            .bind(Utc::now())
            .bind(hash.as_str())
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_err)?;
        Ok(())
    }

    async fn list_unreferenced(&self, limit: i64) -> SubflowResult<Vec<Blob>> {
        let rows = sqlx::query("SELECT * FROM file_blobs WHERE ref_count <= 0 ORDER BY last_accessed_at ASC LIMIT ?")
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_err)?;

        rows.iter().map(row_to_blob).collect()
    }

    async fn delete_blob(&self, hash: &BlobHash) -> SubflowResult<()> {
        sqlx::query("DELETE FROM file_blobs WHERE hash = ?")
            .bind(hash.as_str())
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_err)?;
        Ok(())
    }

    async fn link_project_file(&self, link: &ProjectFile) -> SubflowResult<()> {
        sqlx::query(
            "INSERT INTO project_files (project_id, file_type, blob_hash) VALUES (?, ?, ?) \
             ON CONFLICT(project_id, file_type) DO UPDATE SET blob_hash = excluded.blob_hash",
        )
        .bind(link.project_id.to_string())
        .bind(link.file_type.as_str())
        .bind(link.blob_hash.as_str())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(())
    }

    async fn get_project_file(&self, project_id: ProjectId, file_type: FileType) -> SubflowResult<Option<ProjectFile>> {
        let row = sqlx::query("SELECT * FROM project_files WHERE project_id = ? AND file_type = ?")
            .bind(project_id.to_string())
            .bind(file_type.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_err)?;

        let Some(row) = row else { return Ok(None) };
        let blob_hash: String = row.try_get("blob_hash").map_err(map_sqlx_err)?;
        Ok(Some(ProjectFile {
            project_id,
            file_type,
            blob_hash: BlobHash::from_hex(blob_hash).map_err(subflow_domain::SubflowError::repository)?,
        }))
    }

    async fn list_project_files(&self, project_id: ProjectId) -> SubflowResult<Vec<ProjectFile>> {
        let rows = sqlx::query("SELECT * FROM project_files WHERE project_id = ?")
            .bind(project_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_err)?;

        rows.iter()
            .map(|row| {
                let file_type: String = row.try_get("file_type").map_err(map_sqlx_err)?;
                let blob_hash: String = row.try_get("blob_hash").map_err(map_sqlx_err)?;
                Ok(ProjectFile {
                    project_id,
                    file_type: parse_file_type(&file_type)?,
                    blob_hash: BlobHash::from_hex(blob_hash).map_err(subflow_domain::SubflowError::repository)?,
                })
            })
            .collect()
    }

    async fn record_derived_blob(&self, derived: &DerivedBlob) -> SubflowResult<()> {
        sqlx::query(
            "INSERT INTO derived_blobs (transform, source_hash, params_hash, dst_hash) VALUES (?, ?, ?, ?) \
             ON CONFLICT(transform, source_hash, params_hash) DO UPDATE SET dst_hash = excluded.dst_hash",
        )
        .bind(&derived.transform)
        .bind(derived.source_hash.as_str())
        .bind(&derived.params_hash)
        .bind(derived.dst_hash.as_str())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(())
    }

    async fn get_derived_blob(&self, transform: &str, source_hash: &BlobHash, params_hash: &str) -> SubflowResult<Option<DerivedBlob>> {
        let row = sqlx::query("SELECT * FROM derived_blobs WHERE transform = ? AND source_hash = ? AND params_hash = ?")
            .bind(transform)
            .bind(source_hash.as_str())
            .bind(params_hash)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_err)?;

        let Some(row) = row else { return Ok(None) };
        let dst_hash: String = row.try_get("dst_hash").map_err(map_sqlx_err)?;
        Ok(Some(DerivedBlob {
            transform: transform.to_string(),
            source_hash: source_hash.clone(),
            params_hash: params_hash.to_string(),
            dst_hash: BlobHash::from_hex(dst_hash).map_err(subflow_domain::SubflowError::repository)?,
        }))
    }
}
