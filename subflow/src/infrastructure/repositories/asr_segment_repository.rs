//! SQLite-backed [`AsrSegmentRepository`].

use std::collections::BTreeMap;

use async_trait::async_trait;
use sqlx::{Row, SqlitePool};

use subflow_domain::entities::AsrSegment;
use subflow_domain::error::SubflowResult;
use subflow_domain::repositories::AsrSegmentRepository;
use subflow_domain::value_objects::ProjectId;

use super::map_sqlx_err;

pub struct SqliteAsrSegmentRepository {
    pool: SqlitePool,
}

impl SqliteAsrSegmentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn row_to_segment(row: &sqlx::sqlite::SqliteRow) -> SubflowResult<AsrSegment> {
    Ok(AsrSegment {
        id: row.try_get::<i64, _>("segment_id").map_err(map_sqlx_err)? as u32,
        start: row.try_get("start_s").map_err(map_sqlx_err)?,
        end: row.try_get("end_s").map_err(map_sqlx_err)?,
        text: row.try_get("text").map_err(map_sqlx_err)?,
        corrected_text: row.try_get("corrected_text").map_err(map_sqlx_err)?,
        language: row.try_get("language").map_err(map_sqlx_err)?,
    })
}

#[async_trait]
impl AsrSegmentRepository for SqliteAsrSegmentRepository {
    async fn bulk_insert(&self, project_id: ProjectId, segments: Vec<AsrSegment>) -> SubflowResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_err)?;
        for seg in segments {
            sqlx::query(
                "INSERT INTO asr_segments (project_id, segment_id, start_s, end_s, text, corrected_text, language) \
                 VALUES (?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(project_id.to_string())
            .bind(seg.id as i64)
            .bind(seg.start)
            .bind(seg.end)
            .bind(&seg.text)
            .bind(&seg.corrected_text)
            .bind(&seg.language)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_err)?;
        }
        tx.commit().await.map_err(map_sqlx_err)?;
        Ok(())
    }

    async fn get_by_project(&self, project_id: ProjectId) -> SubflowResult<Vec<AsrSegment>> {
        let rows = sqlx::query("SELECT * FROM asr_segments WHERE project_id = ? ORDER BY start_s ASC")
            .bind(project_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_err)?;

        rows.iter().map(row_to_segment).collect()
    }

    async fn get_corrected_map(&self, project_id: ProjectId) -> SubflowResult<BTreeMap<u32, String>> {
        let rows = sqlx::query("SELECT segment_id, corrected_text FROM asr_segments WHERE project_id = ? AND corrected_text IS NOT NULL")
            .bind(project_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_err)?;

        rows.iter()
            .map(|row| {
                let id = row.try_get::<i64, _>("segment_id").map_err(map_sqlx_err)? as u32;
                let text: String = row.try_get("corrected_text").map_err(map_sqlx_err)?;
                Ok((id, text))
            })
            .collect()
    }

    async fn update_corrected_texts(&self, project_id: ProjectId, corrections: BTreeMap<u32, String>) -> SubflowResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_err)?;
        for (segment_id, text) in corrections {
            sqlx::query("UPDATE asr_segments SET corrected_text = ? WHERE project_id = ? AND segment_id = ?")
                .bind(text)
                .bind(project_id.to_string())
                .bind(segment_id as i64)
                .execute(&mut *tx)
                .await
                .map_err(map_sqlx_err)?;
        }
        tx.commit().await.map_err(map_sqlx_err)?;
        Ok(())
    }

    async fn clear_corrected_texts(&self, project_id: ProjectId) -> SubflowResult<()> {
        sqlx::query("UPDATE asr_segments SET corrected_text = NULL WHERE project_id = ?")
            .bind(project_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_err)?;
        Ok(())
    }

    async fn get_by_time_range(&self, project_id: ProjectId, start: f64, end: f64) -> SubflowResult<Vec<AsrSegment>> {
        let rows = sqlx::query(
            "SELECT * FROM asr_segments WHERE project_id = ? AND start_s < ? AND end_s > ? ORDER BY start_s ASC",
        )
        .bind(project_id.to_string())
        .bind(end)
        .bind(start)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        rows.iter().map(row_to_segment).collect()
    }

    async fn delete_by_project(&self, project_id: ProjectId) -> SubflowResult<u64> {
        let result = sqlx::query("DELETE FROM asr_segments WHERE project_id = ?")
            .bind(project_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_err)?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::repositories::schema;
    use subflow_domain::entities::Project;
    use subflow_domain::repositories::ProjectRepository;

    async fn pool_with_project() -> (SqlitePool, ProjectId) {
        let pool = schema::initialize_database("sqlite::memory:").await.expect("init");
        let project = Project::new("demo", "file:///tmp/demo.mp4", "zh");
        super::super::SqliteProjectRepository::new(pool.clone()).create(&project).await.unwrap();
        (pool, project.id)
    }

    #[tokio::test]
    async fn update_corrected_texts_then_get_corrected_map() {
        let (pool, project_id) = pool_with_project().await;
        let repo = SqliteAsrSegmentRepository::new(pool);
        repo.bulk_insert(project_id, vec![AsrSegment::new(0, 0.0, 1.0, "hallo")]).await.unwrap();

        let mut corrections = BTreeMap::new();
        corrections.insert(0, "hello".to_string());
        repo.update_corrected_texts(project_id, corrections).await.unwrap();

        let map = repo.get_corrected_map(project_id).await.unwrap();
        assert_eq!(map.get(&0), Some(&"hello".to_string()));
    }

    #[tokio::test]
    async fn clear_corrected_texts_empties_the_map() {
        let (pool, project_id) = pool_with_project().await;
        let repo = SqliteAsrSegmentRepository::new(pool);
        repo.bulk_insert(project_id, vec![AsrSegment::new(0, 0.0, 1.0, "hallo")]).await.unwrap();
        let mut corrections = BTreeMap::new();
        corrections.insert(0, "hello".to_string());
        repo.update_corrected_texts(project_id, corrections).await.unwrap();

        repo.clear_corrected_texts(project_id).await.unwrap();
        assert!(repo.get_corrected_map(project_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn get_by_time_range_filters_overlap() {
        let (pool, project_id) = pool_with_project().await;
        let repo = SqliteAsrSegmentRepository::new(pool);
        repo.bulk_insert(
            project_id,
            vec![AsrSegment::new(0, 0.0, 5.0, "a"), AsrSegment::new(1, 10.0, 15.0, "b")],
        )
        .await
        .unwrap();

        let segs = repo.get_by_time_range(project_id, 4.0, 11.0).await.unwrap();
        assert_eq!(segs.len(), 2);
    }
}
