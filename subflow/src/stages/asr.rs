//! Stage 3: per-region speech recognition, reassembled into a contiguous
//! segment list plus merged correction-context windows. Grounded on
//! `pipeline/stages/asr.py`.

use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use subflow_domain::entities::StageArtifacts;
use subflow_domain::entities::{AsrMergedChunk, AsrSegment, Project};
use subflow_domain::error::{SubflowError, SubflowResult};
use subflow_domain::ports::{ArtifactStoreExt, ProgressReporter};
use subflow_domain::value_objects::{ServiceClass, StageName};

use super::{StageContext, StageDeps};

const TRANSCRIPT_ARTIFACT: &str = "transcript.txt";
const MAX_MERGED_SEGMENTS: usize = 20;
const MAX_MERGED_DURATION_S: f64 = 60.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct TranscriptArtifact {
    text: String,
}

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
        .ok_or_else(|| SubflowError::stage_execution(StageName::Asr, project.id.to_string(), "missing vocals audio path", subflow_domain::error::ErrorCode::AsrFailed))?
        .clone();

    if ctx.vad_regions.is_empty() {
        super::vad::hydrate(deps, project, ctx).await?;
    }
    let total = ctx.vad_regions.len();
    reporter.report(5, &format!("transcribing {total} regions")).await?;

    let concurrency = deps.concurrency.clone();
    let provider = deps.asr_provider.clone();
    let path = vocals_path.clone();

    let results: Vec<SubflowResult<(u32, f64, f64, subflow_domain::ports::AsrProviderSegment)>> = stream::iter(ctx.vad_regions.clone())
        .map(|region| {
            let concurrency = concurrency.clone();
            let provider = provider.clone();
            let path = path.clone();
            let cancel = cancel.clone();
            async move {
                let _permit = concurrency.acquire(ServiceClass::Asr).await?;
                let segment = provider.transcribe_segment(&path, region.start, region.end, &cancel).await?;
                Ok((region.region_id, region.start, region.end, segment))
            }
        })
        .buffer_unordered(total.max(1))
        .collect()
        .await;

    let mut ordered = Vec::with_capacity(results.len());
    for result in results {
        ordered.push(result?);
    }
    ordered.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

    let segments: Vec<AsrSegment> = ordered
        .into_iter()
        .enumerate()
        .map(|(id, (_, start, end, provider_segment))| {
            let mut segment = AsrSegment::new(id as u32, start, end, provider_segment.text);
            segment.language = provider_segment.language;
            segment
        })
        .collect();

    deps.asr_segment_repo.delete_by_project(project.id).await?;
    deps.asr_segment_repo.bulk_insert(project.id, segments.clone()).await?;
    ctx.asr_segments = segments;

    let merged = build_merged_chunks(&ctx.asr_segments);
    deps.asr_merged_chunk_repo.delete_by_project(project.id).await?;
    deps.asr_merged_chunk_repo.bulk_upsert(project.id, merged.clone()).await?;
    ctx.merged_chunks = merged;

    let transcript = TranscriptArtifact {
        text: ctx.asr_segments.iter().map(|s| s.text.as_str()).collect::<Vec<_>>().join(" "),
    };
    let identifier = deps.artifact_store.save_json(project.id, StageName::Asr.as_str(), TRANSCRIPT_ARTIFACT, &transcript).await?;

    reporter.finish(&format!("transcribed {} segments", ctx.asr_segments.len())).await?;

    let mut artifacts = StageArtifacts::new();
    artifacts.insert(TRANSCRIPT_ARTIFACT.to_string(), identifier);
    Ok(artifacts)
}

/// Groups consecutive segments into merge windows bounded by count or
/// duration (§4.6.3), splitting on overflow. `region_id` on the resulting
/// chunk is the merge window's own enumeration index rather than a VAD
/// region id — a single window may span several original VAD regions once
/// their one-segment-per-region transcriptions are concatenated.
fn build_merged_chunks(segments: &[AsrSegment]) -> Vec<AsrMergedChunk> {
    let mut chunks = Vec::new();
    let mut current_ids: Vec<u32> = Vec::new();
    let mut current_start = 0.0;
    let mut window_index = 0u32;

    for segment in segments {
        let would_overflow_count = current_ids.len() >= MAX_MERGED_SEGMENTS;
        let would_overflow_duration = !current_ids.is_empty() && (segment.end - current_start) > MAX_MERGED_DURATION_S;

        if (would_overflow_count || would_overflow_duration) && !current_ids.is_empty() {
            chunks.push(finish_chunk(window_index, current_start, segments, &current_ids));
            window_index += 1;
            current_ids = Vec::new();
        }

        if current_ids.is_empty() {
            current_start = segment.start;
        }
        current_ids.push(segment.id);
    }

    if !current_ids.is_empty() {
        chunks.push(finish_chunk(window_index, current_start, segments, &current_ids));
    }
    chunks
}

fn finish_chunk(window_index: u32, start: f64, segments: &[AsrSegment], ids: &[u32]) -> AsrMergedChunk {
    let end = ids.iter().filter_map(|id| segments.iter().find(|s| s.id == *id)).map(|s| s.end).fold(start, f64::max);
    let merged_text = ids
        .iter()
        .filter_map(|id| segments.iter().find(|s| s.id == *id))
        .map(|s| s.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    AsrMergedChunk {
        region_id: window_index,
        chunk_id: 0,
        start,
        end,
        segment_ids: ids.to_vec(),
        merged_text,
    }
}

pub async fn hydrate(deps: &StageDeps, project: &Project, ctx: &mut StageContext) -> SubflowResult<()> {
    if ctx.vad_regions.is_empty() {
        super::vad::hydrate(deps, project, ctx).await?;
    }
    ctx.asr_segments = deps.asr_segment_repo.get_by_project(project.id).await?;
    ctx.merged_chunks = deps.asr_merged_chunk_repo.get_by_project(project.id).await?;
    Ok(())
}
