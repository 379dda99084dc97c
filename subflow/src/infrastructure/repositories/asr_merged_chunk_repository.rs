//! SQLite-backed [`AsrMergedChunkRepository`].

use std::collections::BTreeSet;

use async_trait::async_trait;
use sqlx::{Row, SqlitePool};

use subflow_domain::entities::AsrMergedChunk;
use subflow_domain::error::SubflowResult;
use subflow_domain::repositories::AsrMergedChunkRepository;
use subflow_domain::value_objects::ProjectId;

use super::map_sqlx_err;

pub struct SqliteAsrMergedChunkRepository {
    pool: SqlitePool,
}

impl SqliteAsrMergedChunkRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AsrMergedChunkRepository for SqliteAsrMergedChunkRepository {
    async fn bulk_upsert(&self, project_id: ProjectId, chunks: Vec<AsrMergedChunk>) -> SubflowResult<()> {
        let regions: BTreeSet<u32> = chunks.iter().map(|c| c.region_id).collect();

        let mut tx = self.pool.begin().await.map_err(map_sqlx_err)?;
        for region_id in &regions {
            sqlx::query("DELETE FROM asr_merged_chunks WHERE project_id = ? AND region_id = ?")
                .bind(project_id.to_string())
                .bind(*region_id as i64)
                .execute(&mut *tx)
                .await
                .map_err(map_sqlx_err)?;
        }

        for chunk in chunks {
            let segment_ids =
                serde_json::to_string(&chunk.segment_ids).map_err(|e| subflow_domain::SubflowError::repository(e.to_string()))?;
            sqlx::query(
                "INSERT INTO asr_merged_chunks (project_id, region_id, chunk_id, start_s, end_s, segment_ids, merged_text) \
                 VALUES (?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(project_id.to_string())
            .bind(chunk.region_id as i64)
            .bind(chunk.chunk_id as i64)
            .bind(chunk.start)
            .bind(chunk.end)
            .bind(segment_ids)
            .bind(chunk.merged_text)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_err)?;
        }

        tx.commit().await.map_err(map_sqlx_err)?;
        Ok(())
    }

    async fn get_by_project(&self, project_id: ProjectId) -> SubflowResult<Vec<AsrMergedChunk>> {
        let rows = sqlx::query("SELECT * FROM asr_merged_chunks WHERE project_id = ? ORDER BY region_id ASC, chunk_id ASC")
            .bind(project_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_err)?;

        rows.iter()
            .map(|row| {
                let segment_ids: String = row.try_get("segment_ids").map_err(map_sqlx_err)?;
                Ok(AsrMergedChunk {
                    region_id: row.try_get::<i64, _>("region_id").map_err(map_sqlx_err)? as u32,
                    chunk_id: row.try_get::<i64, _>("chunk_id").map_err(map_sqlx_err)? as u32,
                    start: row.try_get("start_s").map_err(map_sqlx_err)?,
                    end: row.try_get("end_s").map_err(map_sqlx_err)?,
                    segment_ids: serde_json::from_str(&segment_ids).map_err(|e| subflow_domain::SubflowError::repository(e.to_string()))?,
                    merged_text: row.try_get("merged_text").map_err(map_sqlx_err)?,
                })
            })
            .collect()
    }

    async fn delete_by_project(&self, project_id: ProjectId) -> SubflowResult<u64> {
        let result = sqlx::query("DELETE FROM asr_merged_chunks WHERE project_id = ?")
            .bind(project_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_err)?;
        Ok(result.rows_affected())
    }
}
