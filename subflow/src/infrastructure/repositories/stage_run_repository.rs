//! SQLite-backed [`StageRunRepository`].

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};

use subflow_domain::entities::{StageMetrics, StageRun};
use subflow_domain::error::{ErrorCode, SubflowResult};
use subflow_domain::repositories::StageRunRepository;
use subflow_domain::value_objects::{ProjectId, StageName, StageRunStatus};

use super::map_sqlx_err;

pub struct SqliteStageRunRepository {
    pool: SqlitePool,
}

impl SqliteStageRunRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

/// Shared by `project_repository` to hydrate `Project.stage_runs`.
pub(crate) fn row_to_stage_run(row: &sqlx::sqlite::SqliteRow) -> SubflowResult<StageRun> {
    let stage: String = row.try_get("stage").map_err(map_sqlx_err)?;
    let status: String = row.try_get("status").map_err(map_sqlx_err)?;
    let input_artifacts: String = row.try_get("input_artifacts").map_err(map_sqlx_err)?;
    let output_artifacts: String = row.try_get("output_artifacts").map_err(map_sqlx_err)?;
    let metrics: String = row.try_get("metrics").map_err(map_sqlx_err)?;
    let error_code: Option<String> = row.try_get("error_code").map_err(map_sqlx_err)?;

    Ok(StageRun {
        stage: stage.parse().map_err(|_| subflow_domain::SubflowError::repository(format!("bad stage name {stage}")))?,
        status: status
            .parse()
            .map_err(|_| subflow_domain::SubflowError::repository(format!("bad stage status {status}")))?,
        started_at: row.try_get::<Option<DateTime<Utc>>, _>("started_at").map_err(map_sqlx_err)?,
        completed_at: row.try_get::<Option<DateTime<Utc>>, _>("completed_at").map_err(map_sqlx_err)?,
        progress: row.try_get::<i64, _>("progress").map_err(map_sqlx_err)? as u8,
        progress_message: row.try_get::<Option<String>, _>("progress_message").map_err(map_sqlx_err)?.unwrap_or_default(),
        metrics: serde_json::from_str(&metrics).map_err(|e| subflow_domain::SubflowError::repository(e.to_string()))?,
        error_code: error_code.and_then(|c| parse_error_code(&c)),
        error_message: row.try_get("error_message").map_err(map_sqlx_err)?,
        input_artifacts: serde_json::from_str(&input_artifacts).map_err(|e| subflow_domain::SubflowError::repository(e.to_string()))?,
        output_artifacts: serde_json::from_str(&output_artifacts)
            .map_err(|e| subflow_domain::SubflowError::repository(e.to_string()))?,
    })
}

fn parse_error_code(code: &str) -> Option<ErrorCode> {
    match code {
        "UNKNOWN" => Some(ErrorCode::Unknown),
        "INVALID_MEDIA" => Some(ErrorCode::InvalidMedia),
        "AUDIO_PREPROCESS_FAILED" => Some(ErrorCode::AudioPreprocessFailed),
        "VAD_FAILED" => Some(ErrorCode::VadFailed),
        "ASR_FAILED" => Some(ErrorCode::AsrFailed),
        "LLM_FAILED" => Some(ErrorCode::LlmFailed),
        "LLM_TIMEOUT" => Some(ErrorCode::LlmTimeout),
        "EXPORT_FAILED" => Some(ErrorCode::ExportFailed),
        "PROVIDER_FAILED" => Some(ErrorCode::ProviderFailed),
        "CONFIGURATION_ERROR" => Some(ErrorCode::ConfigurationError),
        "CANCELLED" => Some(ErrorCode::Cancelled),
        _ => None,
    }
}

fn error_code_str(code: ErrorCode) -> String {
    code.to_string()
}

#[async_trait]
impl StageRunRepository for SqliteStageRunRepository {
    async fn get(&self, project_id: ProjectId, stage: StageName) -> SubflowResult<Option<StageRun>> {
        let row = sqlx::query("SELECT * FROM stage_runs WHERE project_id = ? AND stage = ?")
            .bind(project_id.to_string())
            .bind(stage.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_err)?;

        row.as_ref().map(row_to_stage_run).transpose()
    }

    async fn list_by_project(&self, project_id: ProjectId) -> SubflowResult<Vec<StageRun>> {
        let rows = sqlx::query("SELECT * FROM stage_runs WHERE project_id = ?")
            .bind(project_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_err)?;

        rows.iter().map(row_to_stage_run).collect()
    }

    async fn mark_running(&self, project_id: ProjectId, stage: StageName) -> SubflowResult<StageRun> {
        let now = Utc::now();
        sqlx::query(
            "INSERT INTO stage_runs (project_id, stage, status, started_at, progress, progress_message, metrics, \
             input_artifacts, output_artifacts) VALUES (?, ?, 'running', ?, 0, '', '{}', '{}', '{}') \
             ON CONFLICT(project_id, stage) DO UPDATE SET status = 'running', started_at = excluded.started_at, \
             completed_at = NULL, progress = 0, progress_message = '', error_code = NULL, error_message = NULL",
        )
        .bind(project_id.to_string())
        .bind(stage.as_str())
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        self.get(project_id, stage)
            .await?
            .ok_or_else(|| subflow_domain::SubflowError::repository("stage_run vanished after mark_running"))
    }

    async fn mark_completed(
        &self,
        project_id: ProjectId,
        stage: StageName,
        output_artifacts: BTreeMap<String, String>,
    ) -> SubflowResult<StageRun> {
        let now = Utc::now();
        let artifacts_json = serde_json::to_string(&output_artifacts).map_err(|e| subflow_domain::SubflowError::repository(e.to_string()))?;

        sqlx::query(
            "UPDATE stage_runs SET status = 'completed', completed_at = ?, progress = 100, output_artifacts = ? \
             WHERE project_id = ? AND stage = ?",
        )
        .bind(now)
        .bind(artifacts_json)
        .bind(project_id.to_string())
        .bind(stage.as_str())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        self.get(project_id, stage)
            .await?
            .ok_or_else(|| subflow_domain::SubflowError::repository("stage_run missing on mark_completed"))
    }

    async fn mark_failed(
        &self,
        project_id: ProjectId,
        stage: StageName,
        error_code: ErrorCode,
        error_message: String,
    ) -> SubflowResult<StageRun> {
        let now = Utc::now();
        sqlx::query(
            "UPDATE stage_runs SET status = 'failed', completed_at = ?, error_code = ?, error_message = ? \
             WHERE project_id = ? AND stage = ?",
        )
        .bind(now)
        .bind(error_code_str(error_code))
        .bind(error_message)
        .bind(project_id.to_string())
        .bind(stage.as_str())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        self.get(project_id, stage)
            .await?
            .ok_or_else(|| subflow_domain::SubflowError::repository("stage_run missing on mark_failed"))
    }

    async fn reset_to_pending(&self, project_id: ProjectId, stage: StageName) -> SubflowResult<StageRun> {
        sqlx::query(
            "INSERT INTO stage_runs (project_id, stage, status, progress, progress_message, metrics, \
             input_artifacts, output_artifacts) VALUES (?, ?, 'pending', 0, '', '{}', '{}', '{}') \
             ON CONFLICT(project_id, stage) DO UPDATE SET status = 'pending', started_at = NULL, completed_at = NULL, \
             progress = 0, progress_message = '', metrics = '{}', error_code = NULL, error_message = NULL, \
             output_artifacts = '{}'",
        )
        .bind(project_id.to_string())
        .bind(stage.as_str())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        self.get(project_id, stage)
            .await?
            .ok_or_else(|| subflow_domain::SubflowError::repository("stage_run vanished after reset_to_pending"))
    }

    async fn set_progress(
        &self,
        project_id: ProjectId,
        stage: StageName,
        progress: u8,
        message: String,
        metrics: Option<StageMetrics>,
    ) -> SubflowResult<()> {
        if let Some(new_metrics) = metrics {
            let mut current = self
                .get(project_id, stage)
                .await?
                .map(|r| r.metrics)
                .unwrap_or_default();
            current.merge(new_metrics);
            let metrics_json = serde_json::to_string(&current).map_err(|e| subflow_domain::SubflowError::repository(e.to_string()))?;

            sqlx::query("UPDATE stage_runs SET progress = ?, progress_message = ?, metrics = ? WHERE project_id = ? AND stage = ?")
                .bind(progress as i64)
                .bind(message)
                .bind(metrics_json)
                .bind(project_id.to_string())
                .bind(stage.as_str())
                .execute(&self.pool)
                .await
                .map_err(map_sqlx_err)?;
        } else {
            sqlx::query("UPDATE stage_runs SET progress = ?, progress_message = ? WHERE project_id = ? AND stage = ?")
                .bind(progress as i64)
                .bind(message)
                .bind(project_id.to_string())
                .bind(stage.as_str())
                .execute(&self.pool)
                .await
                .map_err(map_sqlx_err)?;
        }

        Ok(())
    }
}
