//! Composition root (C12): wires [`config::Settings`] into the concrete
//! adapters behind every domain port/repository, then assembles the
//! [`orchestrator::Orchestrator`] and [`queue::QueueConsumer`]. `main.rs`
//! calls [`bootstrap`] once per process and dispatches on the CLI command.

pub mod config;
pub mod error;
pub mod infrastructure;
pub mod orchestrator;
pub mod queue;
pub mod stages;

use std::sync::Arc;
use std::time::Duration;

use sqlx::SqlitePool;
use tracing::info;

use subflow_domain::ports::{ArtifactStore, AsrProvider, AudioProvider, ConcurrencyTracker, LlmHealthMonitor, LlmProvider, ProjectStore, TaskQueue, VadProvider};
use subflow_domain::repositories::{
    AsrMergedChunkRepository, AsrSegmentRepository, BlobRepository, GlobalContextRepository, ProjectRepository, SemanticChunkRepository,
    StageRunRepository, VadRegionRepository,
};

use config::{ArtifactStoreBackend, Settings};
use error::ConfigResult;
use infrastructure::artifacts::{LocalArtifactStore, S3ArtifactStore};
use infrastructure::blob_store::BlobStore;
use infrastructure::concurrency::SemaphoreConcurrencyTracker;
use infrastructure::health_monitor::LlmHealthMonitorImpl;
use infrastructure::project_store::InMemoryProjectStore;
use infrastructure::providers::{build_llm_provider, ExternalVadProvider, FfmpegAudioProvider, HttpAsrProvider};
use infrastructure::repositories::{
    schema, SqliteAsrMergedChunkRepository, SqliteAsrSegmentRepository, SqliteBlobRepository, SqliteGlobalContextRepository,
    SqliteProjectRepository, SqliteSemanticChunkRepository, SqliteStageRunRepository, SqliteVadRegionRepository,
};
use infrastructure::task_queue::InMemoryTaskQueue;
use orchestrator::Orchestrator;
use queue::QueueConsumer;
use stages::StageDeps;

/// Every constructed component a CLI command might need. Not every field
/// is read by every subcommand; `db_migrate` only needs `db_pool`,
/// `worker` needs the whole thing.
pub struct AppContext {
    pub settings: Arc<Settings>,
    pub db_pool: SqlitePool,
    pub project_repo: Arc<dyn ProjectRepository>,
    pub stage_run_repo: Arc<dyn StageRunRepository>,
    pub artifact_store: Arc<dyn ArtifactStore>,
    pub blob_store: Arc<BlobStore>,
    pub project_store: Arc<dyn ProjectStore>,
    pub stage_deps: Arc<StageDeps>,
    pub orchestrator: Arc<Orchestrator>,
    pub queue: Arc<dyn TaskQueue>,
    pub queue_consumer: Arc<QueueConsumer>,
}

/// Builds an [`AppContext`] from loaded settings: opens the database pool,
/// runs pending migrations' schema (idempotent `CREATE TABLE IF NOT
/// EXISTS`), and constructs every adapter named in SPEC_FULL.md's ambient
/// stack plus the five stage providers.
pub async fn bootstrap(settings: Settings) -> anyhow::Result<AppContext> {
    let settings = Arc::new(settings);

    let db_pool = schema::initialize_database(&settings.database_url).await?;
    schema::ensure_schema(&db_pool).await?;

    let project_repo: Arc<dyn ProjectRepository> = Arc::new(SqliteProjectRepository::new(db_pool.clone()));
    let stage_run_repo: Arc<dyn StageRunRepository> = Arc::new(SqliteStageRunRepository::new(db_pool.clone()));
    let vad_region_repo: Arc<dyn VadRegionRepository> = Arc::new(SqliteVadRegionRepository::new(db_pool.clone()));
    let asr_segment_repo: Arc<dyn AsrSegmentRepository> = Arc::new(SqliteAsrSegmentRepository::new(db_pool.clone()));
    let asr_merged_chunk_repo: Arc<dyn AsrMergedChunkRepository> = Arc::new(SqliteAsrMergedChunkRepository::new(db_pool.clone()));
    let semantic_chunk_repo: Arc<dyn SemanticChunkRepository> = Arc::new(SqliteSemanticChunkRepository::new(db_pool.clone()));
    let global_context_repo: Arc<dyn GlobalContextRepository> = Arc::new(SqliteGlobalContextRepository::new(db_pool.clone()));
    let blob_repo: Arc<dyn BlobRepository> = Arc::new(SqliteBlobRepository::new(db_pool.clone()));

    let artifact_store: Arc<dyn ArtifactStore> = build_artifact_store(&settings).await?;
    let blob_store = Arc::new(BlobStore::new(settings.data_dir.join("blobs"), blob_repo));
    let concurrency: Arc<dyn ConcurrencyTracker> = Arc::new(SemaphoreConcurrencyTracker::new(settings.concurrency_maxima()));
    let health_monitor: Arc<dyn LlmHealthMonitor> = Arc::new(LlmHealthMonitorImpl::new(settings.redis_url.as_deref()));
    let project_store: Arc<dyn ProjectStore> = Arc::new(InMemoryProjectStore::new(Duration::from_secs(settings.project_cache_ttl_s)));

    let llm_fast = build_llm_profile(&settings, "fast")?;
    let llm_power = build_llm_profile(&settings, "power")?;

    let audio_provider: Arc<dyn AudioProvider> = Arc::new(FfmpegAudioProvider::new("ffmpeg", "demucs", "htdemucs", false));
    let vad_provider: Arc<dyn VadProvider> = Arc::new(ExternalVadProvider::new(settings.models_dir.join("vad").to_string_lossy().to_string(), settings.vad.threshold));
    let asr_provider: Arc<dyn AsrProvider> = Arc::new(HttpAsrProvider::new(settings.asr.base_url.clone(), settings.asr.language.clone(), 600));

    let stage_deps = Arc::new(StageDeps {
        settings: settings.clone(),
        artifact_store: artifact_store.clone(),
        blob_store: blob_store.clone(),
        concurrency,
        health_monitor,
        llm_fast,
        llm_power,
        audio_provider,
        vad_provider,
        asr_provider,
        vad_region_repo: vad_region_repo.clone(),
        asr_segment_repo: asr_segment_repo.clone(),
        asr_merged_chunk_repo: asr_merged_chunk_repo.clone(),
        semantic_chunk_repo: semantic_chunk_repo.clone(),
        global_context_repo: global_context_repo.clone(),
    });

    let orchestrator = Arc::new(Orchestrator {
        deps: stage_deps.clone(),
        project_repo: project_repo.clone(),
        stage_run_repo: stage_run_repo.clone(),
        vad_region_repo,
        asr_segment_repo,
        asr_merged_chunk_repo,
        semantic_chunk_repo,
        global_context_repo,
    });

    let queue: Arc<dyn TaskQueue> = Arc::new(InMemoryTaskQueue::new());
    let queue_consumer = Arc::new(QueueConsumer {
        orchestrator: orchestrator.clone(),
        project_repo: project_repo.clone(),
        queue: queue.clone(),
    });

    Ok(AppContext {
        settings,
        db_pool,
        project_repo,
        stage_run_repo,
        artifact_store,
        blob_store,
        project_store,
        stage_deps,
        orchestrator,
        queue,
        queue_consumer,
    })
}

async fn build_artifact_store(settings: &Settings) -> anyhow::Result<Arc<dyn ArtifactStore>> {
    match &settings.artifact_store {
        ArtifactStoreBackend::Local { root } => Ok(Arc::new(LocalArtifactStore::new(root.clone()))),
        ArtifactStoreBackend::S3 { bucket, prefix, region, endpoint } => {
            let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest()).region(aws_sdk_s3::config::Region::new(region.clone()));
            if let Some(endpoint) = endpoint {
                loader = loader.endpoint_url(endpoint.clone());
            }
            let aws_config = loader.load().await;
            let client = aws_sdk_s3::Client::new(&aws_config);
            Ok(Arc::new(S3ArtifactStore::new(client, bucket.clone(), prefix.clone())))
        }
    }
}

/// Builds the `Arc<dyn LlmProvider>` for a routing profile, or `None` when
/// its API key env var is unset — the LLM-backed stages degrade gracefully
/// rather than fail at startup (see `stages::StageDeps`'s doc comment).
fn build_llm_profile(settings: &Settings, profile_name: &str) -> ConfigResult<Option<Arc<dyn LlmProvider>>> {
    let profile = settings.llm_profile(profile_name)?;
    match settings.llm_api_key(profile) {
        Ok(api_key) => Ok(Some(build_llm_provider(profile, api_key)?)),
        Err(_) => {
            info!(profile = profile_name, env = %profile.api_key_env, "no API key configured, LLM-backed stages will degrade");
            Ok(None)
        }
    }
}

/// Deletes blob-store entries with no referencing project row, capped at
/// `limit` deletions (`None` = unbounded). Used by the `gc_blobs` command.
pub async fn gc_blobs(ctx: &AppContext, limit: Option<u64>, dry_run: bool) -> anyhow::Result<Vec<String>> {
    let removed = ctx.blob_store.gc_unreferenced(limit.map(|l| l as i64).unwrap_or(i64::MAX), dry_run).await?;
    Ok(removed.into_iter().map(|hash| hash.as_str().to_string()).collect())
}

/// Deletes artifact-store entries whose project id no longer exists in
/// the project repository. Used by the `cleanup_orphan_artifacts` command.
pub async fn cleanup_orphan_artifacts(ctx: &AppContext, dry_run: bool) -> anyhow::Result<Vec<String>> {
    let known_ids: std::collections::BTreeSet<_> = ctx.project_repo.list_all_ids().await?.into_iter().collect();
    let stored_ids = ctx.artifact_store.list_project_ids().await?;
    let mut removed = Vec::new();
    for project_id in stored_ids {
        if known_ids.contains(&project_id) {
            continue;
        }
        removed.push(project_id.to_string());
        if !dry_run {
            ctx.artifact_store.delete_project(project_id).await?;
        }
    }
    Ok(removed)
}
