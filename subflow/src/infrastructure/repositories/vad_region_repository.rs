//! SQLite-backed [`VadRegionRepository`].

use async_trait::async_trait;
use sqlx::{Row, SqlitePool};

use subflow_domain::entities::VadRegion;
use subflow_domain::error::SubflowResult;
use subflow_domain::repositories::VadRegionRepository;
use subflow_domain::value_objects::ProjectId;

use super::map_sqlx_err;

pub struct SqliteVadRegionRepository {
    pool: SqlitePool,
}

impl SqliteVadRegionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VadRegionRepository for SqliteVadRegionRepository {
    async fn bulk_insert(&self, project_id: ProjectId, regions: Vec<VadRegion>) -> SubflowResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_err)?;
        for region in regions {
            sqlx::query("INSERT INTO vad_regions (project_id, region_id, start_s, end_s) VALUES (?, ?, ?, ?)")
                .bind(project_id.to_string())
                .bind(region.region_id as i64)
                .bind(region.start)
                .bind(region.end)
                .execute(&mut *tx)
                .await
                .map_err(map_sqlx_err)?;
        }
        tx.commit().await.map_err(map_sqlx_err)?;
        Ok(())
    }

    async fn get_by_project(&self, project_id: ProjectId) -> SubflowResult<Vec<VadRegion>> {
        let rows = sqlx::query("SELECT region_id, start_s, end_s FROM vad_regions WHERE project_id = ? ORDER BY start_s ASC")
            .bind(project_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_err)?;

        rows.iter()
            .map(|row| {
                Ok(VadRegion::new(
                    row.try_get::<i64, _>("region_id").map_err(map_sqlx_err)? as u32,
                    row.try_get("start_s").map_err(map_sqlx_err)?,
                    row.try_get("end_s").map_err(map_sqlx_err)?,
                ))
            })
            .collect()
    }

    async fn delete_by_project(&self, project_id: ProjectId) -> SubflowResult<u64> {
        let result = sqlx::query("DELETE FROM vad_regions WHERE project_id = ?")
            .bind(project_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_err)?;
        Ok(result.rows_affected())
    }
}
