//! Stage 2: voice-activity detection on the separated vocals track.
//! Grounded on `pipeline/stages/vad.py`.

use tokio_util::sync::CancellationToken;

use subflow_domain::entities::StageArtifacts;
use subflow_domain::entities::{Project, VadRegion};
use subflow_domain::error::{SubflowError, SubflowResult};
use subflow_domain::ports::{ArtifactStoreExt, ProgressReporter};
use subflow_domain::services::vad_frame_probs::encode_vad_frame_probs;
use subflow_domain::value_objects::StageName;

use super::{StageContext, StageDeps};

const FRAME_PROBS_ARTIFACT: &str = "vad_frame_probs.bin";

pub async fn run(
    deps: &StageDeps,
    project: &Project,
    ctx: &mut StageContext,
    reporter: &dyn ProgressReporter,
    cancel: &CancellationToken,
) -> SubflowResult<StageArtifacts> {
    let vocals_path = ctx
        .vocals_audio_path
        .as_ref()
        .ok_or_else(|| SubflowError::stage_execution(StageName::Vad, project.id.to_string(), "missing vocals audio path from stage 1", subflow_domain::error::ErrorCode::VadFailed))?;

    reporter.report(10, "running voice-activity detection").await?;
    let (raw_regions, frame_probs) = deps.vad_provider.detect(vocals_path, cancel).await?;

    deps.vad_region_repo.delete_by_project(project.id).await?;
    let regions: Vec<VadRegion> = raw_regions
        .into_iter()
        .enumerate()
        .map(|(i, (start, end))| VadRegion::new(i as u32, start, end))
        .collect();
    deps.vad_region_repo.bulk_insert(project.id, regions.clone()).await?;
    ctx.vad_regions = regions;

    let mut artifacts = StageArtifacts::new();
    if let Some(probs) = frame_probs {
        let encoded = encode_vad_frame_probs(&probs.probs, probs.frame_hop_s);
        let identifier = deps.artifact_store.save(project.id, StageName::Vad.as_str(), FRAME_PROBS_ARTIFACT, encoded).await?;
        artifacts.insert(FRAME_PROBS_ARTIFACT.to_string(), identifier);
    }

    reporter.finish(&format!("detected {} speech regions", ctx.vad_regions.len())).await?;
    Ok(artifacts)
}

/// Reloads regions from the repository; frame-probability data is only
/// consumed by operator tooling, not by downstream stages, so it is not
/// re-decoded here.
pub async fn hydrate(deps: &StageDeps, project: &Project, ctx: &mut StageContext) -> SubflowResult<()> {
    ctx.vad_regions = deps.vad_region_repo.get_by_project(project.id).await?;
    Ok(())
}
