//! SQLite-backed [`SubtitleExportRepository`].

use async_trait::async_trait;
use sqlx::{Row, SqlitePool};

use subflow_domain::entities::{ContentMode, SubtitleExport, SubtitleFormat, SubtitleSource};
use subflow_domain::error::SubflowResult;
use subflow_domain::repositories::SubtitleExportRepository;
use subflow_domain::value_objects::ProjectId;

use super::map_sqlx_err;

pub struct SqliteSubtitleExportRepository {
    pool: SqlitePool,
}

impl SqliteSubtitleExportRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn format_str(format: SubtitleFormat) -> &'static str {
    match format {
        SubtitleFormat::Srt => "srt",
        SubtitleFormat::Vtt => "vtt",
        SubtitleFormat::Ass => "ass",
        SubtitleFormat::Json => "json",
    }
}

fn parse_format(s: &str) -> SubflowResult<SubtitleFormat> {
    match s {
        "srt" => Ok(SubtitleFormat::Srt),
        "vtt" => Ok(SubtitleFormat::Vtt),
        "ass" => Ok(SubtitleFormat::Ass),
        "json" => Ok(SubtitleFormat::Json),
        other => Err(subflow_domain::SubflowError::repository(format!("bad subtitle format {other}"))),
    }
}

fn content_mode_str(mode: ContentMode) -> &'static str {
    match mode {
        ContentMode::Both => "both",
        ContentMode::PrimaryOnly => "primary_only",
        ContentMode::SecondaryOnly => "secondary_only",
    }
}

fn parse_content_mode(s: &str) -> SubflowResult<ContentMode> {
    match s {
        "both" => Ok(ContentMode::Both),
        "primary_only" => Ok(ContentMode::PrimaryOnly),
        "secondary_only" => Ok(ContentMode::SecondaryOnly),
        other => Err(subflow_domain::SubflowError::repository(format!("bad content mode {other}"))),
    }
}

fn source_str(source: SubtitleSource) -> &'static str {
    match source {
        SubtitleSource::Auto => "auto",
        SubtitleSource::Edited => "edited",
    }
}

fn parse_source(s: &str) -> SubflowResult<SubtitleSource> {
    match s {
        "auto" => Ok(SubtitleSource::Auto),
        "edited" => Ok(SubtitleSource::Edited),
        other => Err(subflow_domain::SubflowError::repository(format!("bad subtitle source {other}"))),
    }
}

fn row_to_export(row: &sqlx::sqlite::SqliteRow) -> SubflowResult<SubtitleExport> {
    let id: String = row.try_get("id").map_err(map_sqlx_err)?;
    let format: String = row.try_get("format").map_err(map_sqlx_err)?;
    let content_mode: String = row.try_get("content_mode").map_err(map_sqlx_err)?;
    let config: String = row.try_get("config").map_err(map_sqlx_err)?;
    let source: String = row.try_get("source").map_err(map_sqlx_err)?;

    Ok(SubtitleExport {
        id: id.parse().map_err(|_| subflow_domain::SubflowError::repository(format!("bad export id {id}")))?,
        format: parse_format(&format)?,
        content_mode: parse_content_mode(&content_mode)?,
        config: serde_json::from_str(&config).map_err(|e| subflow_domain::SubflowError::repository(e.to_string()))?,
        storage_key: row.try_get("storage_key").map_err(map_sqlx_err)?,
        source: parse_source(&source)?,
        created_at: row.try_get("created_at").map_err(map_sqlx_err)?,
    })
}

#[async_trait]
impl SubtitleExportRepository for SqliteSubtitleExportRepository {
    async fn create(&self, project_id: ProjectId, export: &SubtitleExport) -> SubflowResult<()> {
        let config = serde_json::to_string(&export.config).map_err(|e| subflow_domain::SubflowError::repository(e.to_string()))?;

        sqlx::query(
            "INSERT INTO subtitle_exports (id, project_id, format, content_mode, config, storage_key, source, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(export.id.to_string())
        .bind(project_id.to_string())
        .bind(format_str(export.format))
        .bind(content_mode_str(export.content_mode))
        .bind(config)
        .bind(&export.storage_key)
        .bind(source_str(export.source))
        .bind(export.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(())
    }

    async fn get(&self, project_id: ProjectId, export_id: uuid::Uuid) -> SubflowResult<Option<SubtitleExport>> {
        let row = sqlx::query("SELECT * FROM subtitle_exports WHERE project_id = ? AND id = ?")
            .bind(project_id.to_string())
            .bind(export_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_err)?;

        row.as_ref().map(row_to_export).transpose()
    }

    async fn list_by_project(&self, project_id: ProjectId) -> SubflowResult<Vec<SubtitleExport>> {
        let rows = sqlx::query("SELECT * FROM subtitle_exports WHERE project_id = ? ORDER BY created_at DESC")
            .bind(project_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_err)?;

        rows.iter().map(row_to_export).collect()
    }
}
