//! Stage 4: per-merged-chunk LLM correction of ASR segments. Compares the
//! "full recognition" (merged chunk text) against the "segmented
//! recognition" (the segments it covers) and applies only the corrections
//! the model returns. Grounded on `pipeline/stages/llm_asr_correction.py`.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use futures::stream::{self, StreamExt};
use tokio_util::sync::CancellationToken;

use subflow_domain::entities::StageArtifacts;
use subflow_domain::entities::{AsrMergedChunk, Project, StageMetrics};
use subflow_domain::error::SubflowResult;
use subflow_domain::ports::{LlmMessage, LlmProvider, ProgressReporter};
use subflow_domain::services::llm_json_parser::parse_id_text_array_partial;
use subflow_domain::value_objects::{LlmProfile, ServiceClass};

use super::{StageContext, StageDeps};

pub async fn run(
    deps: &StageDeps,
    project: &Project,
    ctx: &mut StageContext,
    reporter: &dyn ProgressReporter,
    cancel: &CancellationToken,
) -> SubflowResult<StageArtifacts> {
    if ctx.merged_chunks.is_empty() {
        super::asr::hydrate(deps, project, ctx).await?;
    }

    let profile_name = deps.settings.llm_stage.llm_asr_correction.clone();
    let profile = if profile_name == "power" { LlmProfile::Power } else { LlmProfile::Fast };
    let service_class = profile.service_class();
    let Some(provider) = deps.llm_for_profile(&profile_name) else {
        reporter.finish("no LLM provider configured, skipping ASR correction").await?;
        return Ok(StageArtifacts::new());
    };

    let total = ctx.merged_chunks.len();
    reporter.report(0, &format!("correcting {total} merged chunks")).await?;

    let start = Instant::now();
    let results: Vec<SubflowResult<BTreeMap<u32, String>>> = stream::iter(ctx.merged_chunks.clone())
        .map(|chunk| correct_chunk(deps, provider.clone(), service_class, profile, chunk, cancel))
        .buffer_unordered(total.max(1))
        .collect()
        .await;

    let mut corrections: BTreeMap<u32, String> = BTreeMap::new();
    let mut processed = 0u64;
    for result in results {
        corrections.extend(result?);
        processed += 1;
        let (active, max) = deps.concurrency.snapshot(service_class).await?;
        reporter
            .report_metrics(StageMetrics {
                items_processed: Some(processed),
                items_total: Some(total as u64),
                active_tasks: Some(active as u32),
                max_concurrent: Some(max as u32),
                ..Default::default()
            })
            .await?;
    }

    if !corrections.is_empty() {
        deps.asr_segment_repo.update_corrected_texts(project.id, corrections.clone()).await?;
        for segment in ctx.asr_segments.iter_mut() {
            if let Some(text) = corrections.get(&segment.id) {
                segment.corrected_text = Some(text.clone());
            }
        }
    }

    let elapsed = start.elapsed().as_secs_f64().max(0.001);
    reporter
        .report_metrics(StageMetrics {
            items_per_second: Some(total as f64 / elapsed),
            ..Default::default()
        })
        .await?;
    reporter.finish(&format!("corrected {} of {} segments", corrections.len(), ctx.asr_segments.len())).await?;

    Ok(StageArtifacts::new())
}

async fn correct_chunk(
    deps: &StageDeps,
    provider: Arc<dyn LlmProvider>,
    service_class: ServiceClass,
    profile: LlmProfile,
    chunk: AsrMergedChunk,
    cancel: &CancellationToken,
) -> SubflowResult<BTreeMap<u32, String>> {
    let _permit = deps.concurrency.acquire(service_class).await?;

    let segmented = chunk
        .segment_ids
        .iter()
        .map(|id| format!("{{\"id\": {id}}}"))
        .collect::<Vec<_>>()
        .join(", ");
    let system = LlmMessage::system(
        "Compare the full recognition against the segmented recognition for the same audio window. \
         Return a JSON array of only the segments that need correction, as [{\"id\": <int>, \"text\": \"<corrected text>\"}]. \
         If no segment needs correction, return [].",
    );
    let user = LlmMessage::user(format!(
        "Full recognition:\n{}\n\nSegmented recognition (ids {}):\n{}",
        chunk.merged_text, segmented, chunk.merged_text
    ));

    let started = Instant::now();
    let result = provider.complete(&[system, user], cancel).await;
    let latency_ms = started.elapsed().as_millis() as u64;

    match &result {
        Ok(_) => deps.health_monitor.report_success(profile, provider.provider_name(), provider.model_name(), latency_ms).await,
        Err(e) => deps.health_monitor.report_error(profile, provider.provider_name(), provider.model_name(), latency_ms, &e.to_string()).await,
    }

    let raw = result?;
    let parsed = parse_id_text_array_partial(&raw).unwrap_or_default();

    let valid_ids: std::collections::BTreeSet<u32> = chunk.segment_ids.iter().copied().collect();
    Ok(parsed
        .into_iter()
        .filter_map(|(id, text)| {
            let id = u32::try_from(id).ok()?;
            valid_ids.contains(&id).then_some((id, text))
        })
        .collect())
}
