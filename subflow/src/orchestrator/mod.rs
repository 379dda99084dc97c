//! Pipeline Orchestrator (C7): the per-project state machine that drives
//! the five stage runners in order, reconstructing state from storage on
//! every invocation rather than trusting in-process memory. Grounded on
//! `pipeline/orchestrator.py`'s `run_stage`/`retry_stage`.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use subflow_domain::entities::{Project, StageRun};
use subflow_domain::error::{ErrorCode, SubflowError, SubflowResult};
use subflow_domain::repositories::{AsrMergedChunkRepository, AsrSegmentRepository, GlobalContextRepository, ProjectRepository, SemanticChunkRepository, StageRunRepository, VadRegionRepository};
use subflow_domain::value_objects::{ProjectStatus, StageName};

use crate::infrastructure::progress::StageProgressReporter;
use crate::stages::{StageContext, StageDeps};

/// Repositories the orchestrator itself drives directly (stage runners own
/// their feature-specific repos through [`StageDeps`]; these are the ones
/// needed for status bookkeeping and retry's delete-and-reset sweep).
pub struct Orchestrator {
    pub deps: Arc<StageDeps>,
    pub project_repo: Arc<dyn ProjectRepository>,
    pub stage_run_repo: Arc<dyn StageRunRepository>,
    pub vad_region_repo: Arc<dyn VadRegionRepository>,
    pub asr_segment_repo: Arc<dyn AsrSegmentRepository>,
    pub asr_merged_chunk_repo: Arc<dyn AsrMergedChunkRepository>,
    pub semantic_chunk_repo: Arc<dyn SemanticChunkRepository>,
    pub global_context_repo: Arc<dyn GlobalContextRepository>,
}

impl Orchestrator {
    /// Runs every stage from `project.current_stage + 1` through
    /// `target_stage`, returning the updated project and the in-memory
    /// context accumulated along the way.
    pub async fn run_stage(&self, mut project: Project, target_stage: StageName, cancel: &CancellationToken) -> SubflowResult<(Project, StageContext)> {
        let mut ctx = StageContext::default();

        if project.current_stage >= target_stage.index() {
            self.hydrate(&project, target_stage, &mut ctx).await?;
            return Ok((project, ctx));
        }

        if let Some(last_completed) = StageName::from_index(project.current_stage) {
            self.hydrate(&project, last_completed, &mut ctx).await?;
        }

        project.status = ProjectStatus::Processing;
        self.project_repo.update(&project).await?;

        let start_index = project.current_stage + 1;
        for index in start_index..=target_stage.index() {
            let stage = StageName::from_index(index).ok_or_else(|| SubflowError::configuration(format!("no stage at index {index}")))?;

            if cancel.is_cancelled() {
                self.stage_run_repo.mark_failed(project.id, stage, ErrorCode::Cancelled, "cancelled".to_string()).await?;
                project.status = ProjectStatus::Paused;
                self.project_repo.update(&project).await?;
                return Err(SubflowError::Cancellation);
            }

            let run = self.stage_run_repo.mark_running(project.id, stage).await?;
            upsert_stage_run(&mut project, run);

            let reporter = StageProgressReporter::new(self.stage_run_repo.clone(), project.id, stage);
            let result = self.invoke(stage, &project, &mut ctx, &reporter, cancel).await;

            match result {
                Ok(artifacts) => {
                    let run = self.stage_run_repo.mark_completed(project.id, stage, artifacts.clone()).await?;
                    upsert_stage_run(&mut project, run);
                    project.set_artifacts(stage, artifacts.clone());
                    self.project_repo.set_stage_artifacts(project.id, stage.as_str(), artifacts).await?;
                    project.current_stage = index;
                    self.project_repo.update(&project).await?;
                }
                Err(err) => {
                    let code = err.error_code();
                    self.stage_run_repo.mark_failed(project.id, stage, code, err.to_string()).await?;
                    project.status = ProjectStatus::Failed;
                    project.append_error(err.to_string());
                    self.project_repo.update(&project).await?;
                    return Err(err);
                }
            }
        }

        if project.current_stage >= StageName::ORDER.last().expect("StageName::ORDER is non-empty").index() {
            project.status = ProjectStatus::Completed;
            self.project_repo.update(&project).await?;
        }

        Ok((project, ctx))
    }

    /// Rewinds `project` to just before `stage`, discarding everything that
    /// stage (and every stage downstream of it) owns, then re-runs up to
    /// `project.current_stage`'s prior terminal target (or `stage` itself
    /// if it was never reached).
    pub async fn retry_stage(&self, mut project: Project, stage: StageName, cancel: &CancellationToken) -> SubflowResult<(Project, StageContext)> {
        let rewind_to = stage.index().saturating_sub(1);
        if project.current_stage < rewind_to {
            return Err(SubflowError::configuration(format!(
                "cannot retry stage {stage} for project {}: current_stage {} has not yet reached {rewind_to}",
                project.id, project.current_stage
            )));
        }

        let target = StageName::from_index(project.current_stage.max(stage.index())).unwrap_or(stage);

        if matches!(stage, StageName::Vad) {
            self.vad_region_repo.delete_by_project(project.id).await?;
        }
        if matches!(stage, StageName::Asr) {
            self.asr_segment_repo.delete_by_project(project.id).await?;
            self.asr_merged_chunk_repo.delete_by_project(project.id).await?;
        }
        if matches!(stage, StageName::LlmAsrCorrection | StageName::Llm) {
            self.asr_segment_repo.clear_corrected_texts(project.id).await?;
        }
        if matches!(stage, StageName::Llm) {
            self.semantic_chunk_repo.delete_by_project(project.id).await?;
            self.global_context_repo.delete(project.id).await?;
        }

        project.current_stage = rewind_to;
        self.stage_run_repo.reset_to_pending(project.id, stage).await?;
        for downstream in stage.downstream_of() {
            self.stage_run_repo.reset_to_pending(project.id, downstream).await?;
        }
        self.project_repo.update(&project).await?;

        self.run_stage(project, target, cancel).await
    }

    async fn invoke(
        &self,
        stage: StageName,
        project: &Project,
        ctx: &mut StageContext,
        reporter: &dyn subflow_domain::ports::ProgressReporter,
        cancel: &CancellationToken,
    ) -> SubflowResult<subflow_domain::entities::StageArtifacts> {
        match stage {
            StageName::AudioPreprocess => crate::stages::audio_preprocess::run(&self.deps, project, ctx, reporter, cancel).await,
            StageName::Vad => crate::stages::vad::run(&self.deps, project, ctx, reporter, cancel).await,
            StageName::Asr => crate::stages::asr::run(&self.deps, project, ctx, reporter, cancel).await,
            StageName::LlmAsrCorrection => crate::stages::llm_asr_correction::run(&self.deps, project, ctx, reporter, cancel).await,
            StageName::Llm => crate::stages::llm::run(&self.deps, project, ctx, reporter, cancel).await,
        }
    }

    /// Rebuilds `ctx` from storage for every stage up to and including
    /// `up_to`, without invoking any stage runner or provider. Idempotent
    /// and side-effect free, per §4.8's hydration algorithm.
    async fn hydrate(&self, project: &Project, up_to: StageName, ctx: &mut StageContext) -> SubflowResult<()> {
        if up_to.index() >= StageName::AudioPreprocess.index() && project.has_completed(StageName::AudioPreprocess) {
            crate::stages::audio_preprocess::hydrate(&self.deps, project, ctx).await?;
        }
        if up_to.index() >= StageName::Vad.index() && project.has_completed(StageName::Vad) {
            crate::stages::vad::hydrate(&self.deps, project, ctx).await?;
        }
        if up_to.index() >= StageName::Asr.index() && project.has_completed(StageName::Asr) {
            crate::stages::asr::hydrate(&self.deps, project, ctx).await?;
        }
        if up_to.index() >= StageName::Llm.index() && project.has_completed(StageName::Llm) {
            crate::stages::llm::hydrate(&self.deps, project, ctx).await?;
        }
        Ok(())
    }
}

fn upsert_stage_run(project: &mut Project, run: StageRun) {
    if let Some(existing) = project.stage_run_mut(run.stage) {
        *existing = run;
    } else {
        project.stage_runs.push(run);
    }
}
