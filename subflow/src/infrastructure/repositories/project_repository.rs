//! SQLite-backed [`ProjectRepository`].
//!
//! `Project.stage_runs` is stored in a child table, so every read that
//! returns a full `Project` issues a second query to hydrate it via
//! [`super::stage_run_repository::row_to_stage_run`].

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};

use subflow_domain::entities::Project;
use subflow_domain::entities::StageArtifacts;
use subflow_domain::error::SubflowResult;
use subflow_domain::repositories::ProjectRepository;
use subflow_domain::value_objects::{ProjectId, ProjectStatus};

use super::map_sqlx_err;
use super::stage_run_repository::row_to_stage_run;

pub struct SqliteProjectRepository {
    pool: SqlitePool,
}

impl SqliteProjectRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn hydrate_stage_runs(&self, project: &mut Project) -> SubflowResult<()> {
        let rows = sqlx::query("SELECT * FROM stage_runs WHERE project_id = ?")
            .bind(project.id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_err)?;

        project.stage_runs = rows.iter().map(row_to_stage_run).collect::<SubflowResult<Vec<_>>>()?;
        Ok(())
    }

    async fn row_to_project(&self, row: &sqlx::sqlite::SqliteRow) -> SubflowResult<Project> {
        let media_files: String = row.try_get("media_files").map_err(map_sqlx_err)?;
        let status: String = row.try_get("status").map_err(map_sqlx_err)?;
        let artifacts: String = row.try_get("artifacts").map_err(map_sqlx_err)?;
        let errors: String = row.try_get("errors").map_err(map_sqlx_err)?;
        let id: String = row.try_get("id").map_err(map_sqlx_err)?;

        let mut project = Project {
            id: id.parse().map_err(|_| subflow_domain::SubflowError::repository(format!("bad project id {id}")))?,
            name: row.try_get("name").map_err(map_sqlx_err)?,
            media_url: row.try_get("media_url").map_err(map_sqlx_err)?,
            media_files: serde_json::from_str(&media_files).map_err(|e| subflow_domain::SubflowError::repository(e.to_string()))?,
            source_language: row.try_get("source_language").map_err(map_sqlx_err)?,
            target_language: row.try_get("target_language").map_err(map_sqlx_err)?,
            auto_workflow: row.try_get::<i64, _>("auto_workflow").map_err(map_sqlx_err)? != 0,
            status: parse_status(&status)?,
            current_stage: row.try_get::<i64, _>("current_stage").map_err(map_sqlx_err)? as u32,
            artifacts: serde_json::from_str::<BTreeMap<String, StageArtifacts>>(&artifacts)
                .map_err(|e| subflow_domain::SubflowError::repository(e.to_string()))?,
            stage_runs: Vec::new(),
            errors: serde_json::from_str(&errors).map_err(|e| subflow_domain::SubflowError::repository(e.to_string()))?,
            created_at: row.try_get::<DateTime<Utc>, _>("created_at").map_err(map_sqlx_err)?,
            updated_at: row.try_get::<DateTime<Utc>, _>("updated_at").map_err(map_sqlx_err)?,
        };

        self.hydrate_stage_runs(&mut project).await?;
        Ok(project)
    }
}

fn parse_status(status: &str) -> SubflowResult<ProjectStatus> {
    match status {
        "pending" => Ok(ProjectStatus::Pending),
        "processing" => Ok(ProjectStatus::Processing),
        "paused" => Ok(ProjectStatus::Paused),
        "completed" => Ok(ProjectStatus::Completed),
        "failed" => Ok(ProjectStatus::Failed),
        other => Err(subflow_domain::SubflowError::repository(format!("bad project status {other}"))),
    }
}

#[async_trait]
impl ProjectRepository for SqliteProjectRepository {
    async fn create(&self, project: &Project) -> SubflowResult<()> {
        let media_files = serde_json::to_string(&project.media_files).map_err(|e| subflow_domain::SubflowError::repository(e.to_string()))?;
        let artifacts = serde_json::to_string(&project.artifacts).map_err(|e| subflow_domain::SubflowError::repository(e.to_string()))?;
        let errors = serde_json::to_string(&project.errors).map_err(|e| subflow_domain::SubflowError::repository(e.to_string()))?;

        sqlx::query(
            "INSERT INTO projects (id, name, media_url, media_files, source_language, target_language, auto_workflow, \
             status, current_stage, artifacts, errors, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(project.id.to_string())
        .bind(&project.name)
        .bind(&project.media_url)
        .bind(media_files)
        .bind(&project.source_language)
        .bind(&project.target_language)
        .bind(project.auto_workflow as i64)
        .bind(project.status.as_str())
        .bind(project.current_stage as i64)
        .bind(artifacts)
        .bind(errors)
        .bind(project.created_at)
        .bind(project.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(())
    }

    async fn get(&self, id: ProjectId) -> SubflowResult<Option<Project>> {
        let row = sqlx::query("SELECT * FROM projects WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_err)?;

        match row {
            Some(row) => Ok(Some(self.row_to_project(&row).await?)),
            None => Ok(None),
        }
    }

    async fn update(&self, project: &Project) -> SubflowResult<()> {
        let media_files = serde_json::to_string(&project.media_files).map_err(|e| subflow_domain::SubflowError::repository(e.to_string()))?;
        let artifacts = serde_json::to_string(&project.artifacts).map_err(|e| subflow_domain::SubflowError::repository(e.to_string()))?;
        let errors = serde_json::to_string(&project.errors).map_err(|e| subflow_domain::SubflowError::repository(e.to_string()))?;

        sqlx::query(
            "UPDATE projects SET name = ?, media_url = ?, media_files = ?, source_language = ?, target_language = ?, \
             auto_workflow = ?, status = ?, current_stage = ?, artifacts = ?, errors = ?, updated_at = ? WHERE id = ?",
        )
        .bind(&project.name)
        .bind(&project.media_url)
        .bind(media_files)
        .bind(&project.source_language)
        .bind(&project.target_language)
        .bind(project.auto_workflow as i64)
        .bind(project.status.as_str())
        .bind(project.current_stage as i64)
        .bind(artifacts)
        .bind(errors)
        .bind(project.updated_at)
        .bind(project.id.to_string())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(())
    }

    async fn update_status(
        &self,
        id: ProjectId,
        status: ProjectStatus,
        current_stage: Option<u32>,
        error_message: Option<String>,
    ) -> SubflowResult<()> {
        let now = Utc::now();
        if let Some(stage) = current_stage {
            sqlx::query("UPDATE projects SET status = ?, current_stage = ?, updated_at = ? WHERE id = ?")
                .bind(status.as_str())
                .bind(stage as i64)
                .bind(now)
                .bind(id.to_string())
                .execute(&self.pool)
                .await
                .map_err(map_sqlx_err)?;
        } else {
            sqlx::query("UPDATE projects SET status = ?, updated_at = ? WHERE id = ?")
                .bind(status.as_str())
                .bind(now)
                .bind(id.to_string())
                .execute(&self.pool)
                .await
                .map_err(map_sqlx_err)?;
        }

        if let Some(message) = error_message {
            let project = self.get(id).await?;
            if let Some(mut project) = project {
                project.append_error(message);
                let errors = serde_json::to_string(&project.errors).map_err(|e| subflow_domain::SubflowError::repository(e.to_string()))?;
                sqlx::query("UPDATE projects SET errors = ? WHERE id = ?")
                    .bind(errors)
                    .bind(id.to_string())
                    .execute(&self.pool)
                    .await
                    .map_err(map_sqlx_err)?;
            }
        }

        Ok(())
    }

    async fn update_media_files(&self, id: ProjectId, media_files: BTreeMap<String, String>) -> SubflowResult<()> {
        let media_files = serde_json::to_string(&media_files).map_err(|e| subflow_domain::SubflowError::repository(e.to_string()))?;
        sqlx::query("UPDATE projects SET media_files = ?, updated_at = ? WHERE id = ?")
            .bind(media_files)
            .bind(Utc::now())
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_err)?;
        Ok(())
    }

    async fn set_stage_artifacts(&self, id: ProjectId, stage: &str, artifacts: StageArtifacts) -> SubflowResult<()> {
        let project = self.get(id).await?;
        let Some(mut project) = project else {
            return Err(subflow_domain::SubflowError::repository(format!("project {id} not found")));
        };
        project.artifacts.insert(stage.to_string(), artifacts);
        let artifacts_json = serde_json::to_string(&project.artifacts).map_err(|e| subflow_domain::SubflowError::repository(e.to_string()))?;

        sqlx::query("UPDATE projects SET artifacts = ?, updated_at = ? WHERE id = ?")
            .bind(artifacts_json)
            .bind(Utc::now())
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_err)?;

        Ok(())
    }

    async fn list(&self, limit: i64, offset: i64) -> SubflowResult<Vec<Project>> {
        let rows = sqlx::query("SELECT * FROM projects ORDER BY created_at DESC LIMIT ? OFFSET ?")
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_err)?;

        let mut projects = Vec::with_capacity(rows.len());
        for row in &rows {
            projects.push(self.row_to_project(row).await?);
        }
        Ok(projects)
    }

    async fn list_all_ids(&self) -> SubflowResult<Vec<ProjectId>> {
        let rows = sqlx::query("SELECT id FROM projects")
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_err)?;

        rows.iter()
            .map(|row| {
                let id: String = row.try_get("id").map_err(map_sqlx_err)?;
                id.parse().map_err(|_| subflow_domain::SubflowError::repository(format!("bad project id {id}")))
            })
            .collect()
    }

    async fn find_stale_processing(&self, max_age_minutes: i64, limit: i64) -> SubflowResult<Vec<Project>> {
        let cutoff = Utc::now() - chrono::Duration::minutes(max_age_minutes);
        let rows = sqlx::query("SELECT * FROM projects WHERE status = 'processing' AND updated_at < ? ORDER BY updated_at ASC LIMIT ?")
            .bind(cutoff)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_err)?;

        let mut projects = Vec::with_capacity(rows.len());
        for row in &rows {
            projects.push(self.row_to_project(row).await?);
        }
        Ok(projects)
    }

    async fn delete(&self, id: ProjectId) -> SubflowResult<()> {
        sqlx::query("DELETE FROM projects WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_err)?;
        Ok(())
    }
}
