//! SQLite-backed [`GlobalContextRepository`].

use async_trait::async_trait;
use sqlx::{Row, SqlitePool};

use subflow_domain::entities::GlobalContext;
use subflow_domain::error::SubflowResult;
use subflow_domain::repositories::GlobalContextRepository;
use subflow_domain::value_objects::ProjectId;

use super::map_sqlx_err;

pub struct SqliteGlobalContextRepository {
    pool: SqlitePool,
}

impl SqliteGlobalContextRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GlobalContextRepository for SqliteGlobalContextRepository {
    async fn save(&self, project_id: ProjectId, context: &GlobalContext) -> SubflowResult<()> {
        let glossary = serde_json::to_string(&context.glossary).map_err(|e| subflow_domain::SubflowError::repository(e.to_string()))?;
        let notes = serde_json::to_string(&context.translation_notes).map_err(|e| subflow_domain::SubflowError::repository(e.to_string()))?;

        sqlx::query(
            "INSERT INTO global_contexts (project_id, topic, domain, style, glossary, translation_notes) \
             VALUES (?, ?, ?, ?, ?, ?) \
             ON CONFLICT(project_id) DO UPDATE SET topic = excluded.topic, domain = excluded.domain, \
             style = excluded.style, glossary = excluded.glossary, translation_notes = excluded.translation_notes",
        )
        .bind(project_id.to_string())
        .bind(&context.topic)
        .bind(&context.domain)
        .bind(&context.style)
        .bind(glossary)
        .bind(notes)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(())
    }

    async fn get(&self, project_id: ProjectId) -> SubflowResult<Option<GlobalContext>> {
        let row = sqlx::query("SELECT * FROM global_contexts WHERE project_id = ?")
            .bind(project_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_err)?;

        let Some(row) = row else { return Ok(None) };
        let glossary: String = row.try_get("glossary").map_err(map_sqlx_err)?;
        let notes: String = row.try_get("translation_notes").map_err(map_sqlx_err)?;

        Ok(Some(GlobalContext {
            topic: row.try_get("topic").map_err(map_sqlx_err)?,
            domain: row.try_get("domain").map_err(map_sqlx_err)?,
            style: row.try_get("style").map_err(map_sqlx_err)?,
            glossary: serde_json::from_str(&glossary).map_err(|e| subflow_domain::SubflowError::repository(e.to_string()))?,
            translation_notes: serde_json::from_str(&notes).map_err(|e| subflow_domain::SubflowError::repository(e.to_string()))?,
        }))
    }

    async fn delete(&self, project_id: ProjectId) -> SubflowResult<()> {
        sqlx::query("DELETE FROM global_contexts WHERE project_id = ?")
            .bind(project_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_err)?;
        Ok(())
    }
}
