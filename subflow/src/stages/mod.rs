//! Stage Runners (C6): one module per pipeline stage, each exposing a
//! `run` function invoked by the orchestrator (C7) and a `hydrate`
//! function that reconstructs the stage's contribution to [`StageContext`]
//! from storage on a cold-start resume, per SPEC_FULL.md §4.6 and §4.8.

pub mod asr;
pub mod audio_preprocess;
pub mod llm;
pub mod llm_asr_correction;
pub mod vad;

use std::path::PathBuf;
use std::sync::Arc;

use subflow_domain::entities::{AsrMergedChunk, AsrSegment, GlobalContext, SemanticChunk, VadRegion};
use subflow_domain::ports::{ArtifactStore, AsrProvider, AudioProvider, ConcurrencyTracker, LlmHealthMonitor, LlmProvider, VadProvider};
use subflow_domain::repositories::{AsrMergedChunkRepository, AsrSegmentRepository, GlobalContextRepository, SemanticChunkRepository, VadRegionRepository};

use crate::config::Settings;
use crate::infrastructure::blob_store::BlobStore;

/// Wiring shared by every stage runner. Constructed once at process start
/// (see `crate::bootstrap`) and handed to each stage by
/// reference, never cloned per-call.
pub struct StageDeps {
    pub settings: Arc<Settings>,
    pub artifact_store: Arc<dyn ArtifactStore>,
    pub blob_store: Arc<BlobStore>,
    pub concurrency: Arc<dyn ConcurrencyTracker>,
    pub health_monitor: Arc<dyn LlmHealthMonitor>,
    /// `None` when the profile's API key env var is unset at startup — the
    /// `llm` and `llm_asr_correction` stages fall back to non-LLM behaviour
    /// rather than fail, per SPEC_FULL.md §4.7's "no API key configured"
    /// fallback (extended here to both LLM-backed stages, not only Pass B).
    pub llm_fast: Option<Arc<dyn LlmProvider>>,
    pub llm_power: Option<Arc<dyn LlmProvider>>,
    pub audio_provider: Arc<dyn AudioProvider>,
    pub vad_provider: Arc<dyn VadProvider>,
    pub asr_provider: Arc<dyn AsrProvider>,
    pub vad_region_repo: Arc<dyn VadRegionRepository>,
    pub asr_segment_repo: Arc<dyn AsrSegmentRepository>,
    pub asr_merged_chunk_repo: Arc<dyn AsrMergedChunkRepository>,
    pub semantic_chunk_repo: Arc<dyn SemanticChunkRepository>,
    pub global_context_repo: Arc<dyn GlobalContextRepository>,
}

impl StageDeps {
    /// The LLM profile wired for a given stage-routing key ("fast"/"power"),
    /// or `None` if that profile has no API key configured.
    pub fn llm_for_profile(&self, profile: &str) -> Option<Arc<dyn LlmProvider>> {
        match profile {
            "power" => self.llm_power.clone(),
            _ => self.llm_fast.clone(),
        }
    }
}

/// In-memory accumulation of everything downstream stages need, rebuilt
/// either by the current run's own stage runners or by hydration from
/// storage when a later stage starts cold (§4.8's "Hydration" algorithm).
#[derive(Debug, Clone, Default)]
pub struct StageContext {
    pub vocals_audio_path: Option<PathBuf>,
    pub vad_regions: Vec<VadRegion>,
    pub asr_segments: Vec<AsrSegment>,
    pub merged_chunks: Vec<AsrMergedChunk>,
    pub global_context: Option<GlobalContext>,
    pub semantic_chunks: Vec<SemanticChunk>,
}
