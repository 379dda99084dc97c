//! SQLite-backed implementations of the domain repository traits (C3).
//!
//! Every repository takes a shared `SqlitePool` and maps rows by hand with
//! `sqlx::query`/`query_as` rather than the `query!` compile-time macros,
//! since the latter need a live `DATABASE_URL` at build time.

pub mod schema;

mod asr_merged_chunk_repository;
mod asr_segment_repository;
mod blob_repository;
mod global_context_repository;
mod project_repository;
mod semantic_chunk_repository;
mod stage_run_repository;
mod subtitle_export_repository;
mod vad_region_repository;

pub use asr_merged_chunk_repository::SqliteAsrMergedChunkRepository;
pub use asr_segment_repository::SqliteAsrSegmentRepository;
pub use blob_repository::SqliteBlobRepository;
pub use global_context_repository::SqliteGlobalContextRepository;
pub use project_repository::SqliteProjectRepository;
pub use semantic_chunk_repository::SqliteSemanticChunkRepository;
pub use stage_run_repository::SqliteStageRunRepository;
pub use subtitle_export_repository::SqliteSubtitleExportRepository;
pub use vad_region_repository::SqliteVadRegionRepository;

/// Maps a `sqlx::Error` onto the workspace error taxonomy.
pub(crate) fn map_sqlx_err(err: sqlx::Error) -> subflow_domain::SubflowError {
    subflow_domain::SubflowError::repository(err.to_string())
}
