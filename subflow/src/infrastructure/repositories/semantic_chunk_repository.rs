//! SQLite-backed [`SemanticChunkRepository`].

use async_trait::async_trait;
use sqlx::{Row, SqlitePool};

use subflow_domain::entities::{SemanticChunk, TranslationChunk};
use subflow_domain::error::SubflowResult;
use subflow_domain::repositories::SemanticChunkRepository;
use subflow_domain::value_objects::ProjectId;

use super::map_sqlx_err;

pub struct SqliteSemanticChunkRepository {
    pool: SqlitePool,
}

impl SqliteSemanticChunkRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SemanticChunkRepository for SqliteSemanticChunkRepository {
    async fn bulk_insert(&self, project_id: ProjectId, chunks: Vec<SemanticChunk>) -> SubflowResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_err)?;

        sqlx::query("DELETE FROM semantic_chunks WHERE project_id = ?")
            .bind(project_id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_err)?;

        for chunk in chunks {
            let asr_segment_ids =
                serde_json::to_string(&chunk.asr_segment_ids).map_err(|e| subflow_domain::SubflowError::repository(e.to_string()))?;

            let parent_id: i64 = sqlx::query(
                "INSERT INTO semantic_chunks (project_id, chunk_index, source_text, translation, asr_segment_ids) \
                 VALUES (?, ?, ?, ?, ?) RETURNING id",
            )
            .bind(project_id.to_string())
            .bind(chunk.chunk_index as i64)
            .bind(&chunk.source_text)
            .bind(&chunk.translation)
            .bind(asr_segment_ids)
            .fetch_one(&mut *tx)
            .await
            .map_err(map_sqlx_err)?
            .try_get("id")
            .map_err(map_sqlx_err)?;

            for (ordinal, tc) in chunk.translation_chunks.into_iter().enumerate() {
                let segment_ids = serde_json::to_string(&tc.segment_ids).map_err(|e| subflow_domain::SubflowError::repository(e.to_string()))?;
                sqlx::query(
                    "INSERT INTO translation_chunks (semantic_chunk_id, ordinal, text, segment_ids) VALUES (?, ?, ?, ?)",
                )
                .bind(parent_id)
                .bind(ordinal as i64)
                .bind(tc.text)
                .bind(segment_ids)
                .execute(&mut *tx)
                .await
                .map_err(map_sqlx_err)?;
            }
        }

        tx.commit().await.map_err(map_sqlx_err)?;
        Ok(())
    }

    async fn get_by_project(&self, project_id: ProjectId) -> SubflowResult<Vec<SemanticChunk>> {
        let parent_rows = sqlx::query("SELECT * FROM semantic_chunks WHERE project_id = ? ORDER BY chunk_index ASC")
            .bind(project_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_err)?;

        let mut chunks = Vec::with_capacity(parent_rows.len());
        for row in &parent_rows {
            let id: i64 = row.try_get("id").map_err(map_sqlx_err)?;
            let asr_segment_ids: String = row.try_get("asr_segment_ids").map_err(map_sqlx_err)?;

            let child_rows = sqlx::query("SELECT * FROM translation_chunks WHERE semantic_chunk_id = ? ORDER BY ordinal ASC")
                .bind(id)
                .fetch_all(&self.pool)
                .await
                .map_err(map_sqlx_err)?;

            let mut translation_chunks = Vec::with_capacity(child_rows.len());
            for child in &child_rows {
                let segment_ids: String = child.try_get("segment_ids").map_err(map_sqlx_err)?;
                translation_chunks.push(TranslationChunk {
                    text: child.try_get("text").map_err(map_sqlx_err)?,
                    segment_ids: serde_json::from_str(&segment_ids).map_err(|e| subflow_domain::SubflowError::repository(e.to_string()))?,
                });
            }

            chunks.push(SemanticChunk {
                chunk_index: row.try_get::<i64, _>("chunk_index").map_err(map_sqlx_err)? as u32,
                source_text: row.try_get("source_text").map_err(map_sqlx_err)?,
                translation: row.try_get("translation").map_err(map_sqlx_err)?,
                asr_segment_ids: serde_json::from_str(&asr_segment_ids).map_err(|e| subflow_domain::SubflowError::repository(e.to_string()))?,
                translation_chunks,
            });
        }

        Ok(chunks)
    }

    async fn delete_by_project(&self, project_id: ProjectId) -> SubflowResult<u64> {
        let result = sqlx::query("DELETE FROM semantic_chunks WHERE project_id = ?")
            .bind(project_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_err)?;
        Ok(result.rows_affected())
    }
}
