//! Stage 5 (C11 LLM Core): Pass A builds a project-wide [`GlobalContext`]
//! from a sampled transcript; Pass B walks the corrected ASR segments with a
//! growable sliding window, asking the model for a translation plus the
//! segment-level split of that translation for each window. Grounded on
//! `pipeline/stages/llm_core.py`.

use std::time::Instant;

use serde::Deserialize;
use tokio_util::sync::CancellationToken;

use subflow_domain::entities::StageArtifacts;
use subflow_domain::entities::{AsrSegment, GlobalContext, Project, SemanticChunk, StageMetrics, TranslationChunk};
use subflow_domain::error::{ErrorCode, SubflowError, SubflowResult};
use subflow_domain::ports::{LlmMessage, ProgressReporter};
use subflow_domain::services::json_repair::parse_json_safe;
use subflow_domain::services::tokenizer::{truncate_to_tokens, TruncationStrategy};
use subflow_domain::value_objects::{LlmProfile, StageName};

use super::{StageContext, StageDeps};

const GLOBAL_CONTEXT_TOKEN_BUDGET: usize = 6000;
const GLOBAL_CONTEXT_RETRIES: u32 = 3;
const MIN_WINDOW: usize = 6;
const MAX_WINDOW: usize = 15;

pub async fn run(
    deps: &StageDeps,
    project: &Project,
    ctx: &mut StageContext,
    reporter: &dyn ProgressReporter,
    cancel: &CancellationToken,
) -> SubflowResult<StageArtifacts> {
    if ctx.asr_segments.is_empty() {
        super::asr::hydrate(deps, project, ctx).await?;
    }

    reporter.report(0, "building global context").await?;
    let global_context = run_pass_a(deps, project, ctx, cancel).await?;
    deps.global_context_repo.save(project.id, &global_context).await?;
    ctx.global_context = Some(global_context.clone());

    reporter.report(30, "chunking and translating").await?;
    let semantic_chunks = run_pass_b(deps, project, ctx, &global_context, reporter, cancel).await?;
    deps.semantic_chunk_repo.delete_by_project(project.id).await?;
    deps.semantic_chunk_repo.bulk_insert(project.id, semantic_chunks.clone()).await?;
    ctx.semantic_chunks = semantic_chunks;

    reporter.finish(&format!("translated {} semantic chunks", ctx.semantic_chunks.len())).await?;
    Ok(StageArtifacts::new())
}

pub async fn hydrate(deps: &StageDeps, project: &Project, ctx: &mut StageContext) -> SubflowResult<()> {
    if ctx.asr_segments.is_empty() {
        super::asr::hydrate(deps, project, ctx).await?;
    }
    ctx.global_context = deps.global_context_repo.get(project.id).await?;
    ctx.semantic_chunks = deps.semantic_chunk_repo.get_by_project(project.id).await?;
    Ok(())
}

#[derive(Debug, Deserialize)]
struct GlobalContextResponse {
    #[serde(default)]
    topic: Option<String>,
    #[serde(default)]
    domain: Option<String>,
    #[serde(default)]
    style: Option<String>,
    #[serde(default)]
    glossary: Option<std::collections::BTreeMap<String, String>>,
    #[serde(default)]
    translation_notes: Option<Vec<String>>,
}

async fn run_pass_a(deps: &StageDeps, project: &Project, ctx: &StageContext, cancel: &CancellationToken) -> SubflowResult<GlobalContext> {
    let profile_name = deps.settings.llm_stage.global_understanding.clone();
    let Some(provider) = deps.llm_for_profile(&profile_name) else {
        return Ok(GlobalContext::unknown());
    };
    let profile = if profile_name == "power" { LlmProfile::Power } else { LlmProfile::Fast };
    let service_class = profile.service_class();

    let full_text: String = ctx.asr_segments.iter().map(|s| s.effective_text()).collect::<Vec<_>>().join(" ");
    let sampled = truncate_to_tokens(&full_text, GLOBAL_CONTEXT_TOKEN_BUDGET, TruncationStrategy::Sample);

    let system = LlmMessage::system(
        "Read this transcript and summarize it as JSON: \
         {\"topic\": str, \"domain\": str, \"style\": str, \"glossary\": {term: translation}, \"translation_notes\": [str]}. \
         Respond with only the JSON object.",
    );

    let mut last_error = String::new();
    for attempt in 0..GLOBAL_CONTEXT_RETRIES {
        let _permit = deps.concurrency.acquire(service_class).await?;
        let user = if attempt == 0 {
            LlmMessage::user(format!("Transcript:\n{sampled}"))
        } else {
            LlmMessage::user(format!("Transcript:\n{sampled}\n\nYour previous reply failed to parse as the requested JSON ({last_error}). Reply with only the JSON object."))
        };

        let started = Instant::now();
        let result = provider.complete(&[system.clone(), user], cancel).await;
        let latency_ms = started.elapsed().as_millis() as u64;
        match &result {
            Ok(_) => deps.health_monitor.report_success(profile, provider.provider_name(), provider.model_name(), latency_ms).await,
            Err(e) => deps.health_monitor.report_error(profile, provider.provider_name(), provider.model_name(), latency_ms, &e.to_string()).await,
        }

        let raw = match result {
            Ok(text) => text,
            Err(e) => {
                last_error = e.to_string();
                continue;
            }
        };

        match parse_json_safe(&raw).and_then(|v| serde_json::from_value::<GlobalContextResponse>(v).ok()) {
            Some(parsed) => {
                let fallback = GlobalContext::unknown();
                return Ok(GlobalContext {
                    topic: parsed.topic.unwrap_or(fallback.topic),
                    domain: parsed.domain.unwrap_or(fallback.domain),
                    style: parsed.style.unwrap_or(fallback.style),
                    glossary: parsed.glossary.unwrap_or_default(),
                    translation_notes: parsed.translation_notes.unwrap_or_default(),
                });
            }
            None => last_error = "response was not valid JSON for the requested shape".to_string(),
        }
    }

    Ok(GlobalContext::unknown())
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PassBResponse {
    NeedMoreContext { need_more_context: NeedMoreContext },
    Translation(TranslationResponse),
}

#[derive(Debug, Deserialize)]
struct NeedMoreContext {
    #[serde(default)]
    #[allow(dead_code)]
    reason: String,
    #[serde(default)]
    additional_segments: usize,
}

#[derive(Debug, Deserialize)]
struct TranslationResponse {
    translation: String,
    translation_chunks: Vec<RawTranslationChunk>,
}

#[derive(Debug, Deserialize)]
struct RawTranslationChunk {
    text: String,
    /// Ids relative to the window's first segment, normalized to absolute
    /// ids before being placed on a [`TranslationChunk`].
    segment_ids: Vec<u32>,
}

async fn run_pass_b(
    deps: &StageDeps,
    project: &Project,
    ctx: &StageContext,
    global_context: &GlobalContext,
    reporter: &dyn ProgressReporter,
    cancel: &CancellationToken,
) -> SubflowResult<Vec<SemanticChunk>> {
    let profile_name = deps.settings.llm_stage.semantic_chunking.clone();
    let Some(provider) = deps.llm_for_profile(&profile_name) else {
        return Ok(fallback_chunks(project, &ctx.asr_segments));
    };
    let profile = if profile_name == "power" { LlmProfile::Power } else { LlmProfile::Fast };
    let service_class = profile.service_class();

    let segments = &ctx.asr_segments;
    let total = segments.len();
    let mut chunks = Vec::new();
    let mut cursor = 0usize;
    let mut window = MIN_WINDOW;

    while cursor < total {
        let window_segments: Vec<&AsrSegment> = segments.iter().skip(cursor).take(window).collect();
        if window_segments.is_empty() {
            break;
        }

        let _permit = deps.concurrency.acquire(service_class).await?;
        let (system, user) = pass_b_prompt(global_context, &window_segments, window >= MAX_WINDOW);

        let started = Instant::now();
        let result = provider.complete(&[system, user], cancel).await;
        let latency_ms = started.elapsed().as_millis() as u64;
        match &result {
            Ok(_) => deps.health_monitor.report_success(profile, provider.provider_name(), provider.model_name(), latency_ms).await,
            Err(e) => deps.health_monitor.report_error(profile, provider.provider_name(), provider.model_name(), latency_ms, &e.to_string()).await,
        }
        let raw = result?;

        let parsed: Option<PassBResponse> = parse_json_safe(&raw).and_then(|v| serde_json::from_value(v).ok());
        match parsed {
            Some(PassBResponse::NeedMoreContext { need_more_context }) if window < MAX_WINDOW => {
                let grow = need_more_context.additional_segments.max(1);
                window = (window + grow).min(MAX_WINDOW);
                continue;
            }
            Some(PassBResponse::Translation(t)) => {
                let window_ids: Vec<u32> = window_segments.iter().map(|s| s.id).collect();
                let translation_chunks = normalize_translation_chunks(&t.translation_chunks, &window_ids);

                let source_text = window_segments.iter().map(|s| s.effective_text()).collect::<Vec<_>>().join(" ");
                let covered = translation_chunks.iter().flat_map(|tc| tc.segment_ids.iter().copied()).max();

                let chunk = SemanticChunk {
                    chunk_index: chunks.len() as u32,
                    source_text,
                    translation: t.translation,
                    asr_segment_ids: window_ids.clone(),
                    translation_chunks,
                };

                if !chunk.translation_chunks_partition_segments() {
                    return Err(SubflowError::stage_execution(
                        StageName::Llm,
                        project.id.to_string(),
                        "model's translation_chunks did not partition the requested window's segments",
                        ErrorCode::LlmFailed,
                    ));
                }

                let advance = covered.map(|c| (c + 1) as usize).unwrap_or(cursor + window).max(cursor + 1);
                chunks.push(chunk);
                cursor = advance;
                window = MIN_WINDOW;

                reporter
                    .report_metrics(StageMetrics {
                        items_processed: Some(cursor as u64),
                        items_total: Some(total as u64),
                        ..Default::default()
                    })
                    .await?;
            }
            _ if window < MAX_WINDOW => {
                // Unparseable or an unescalatable need_more_context: grow once before giving up.
                window = MAX_WINDOW;
            }
            _ => {
                return Err(SubflowError::stage_execution(
                    StageName::Llm,
                    project.id.to_string(),
                    "model would not produce a translation even at the maximum context window",
                    ErrorCode::LlmFailed,
                ));
            }
        }
    }

    Ok(chunks)
}

fn pass_b_prompt(global_context: &GlobalContext, window: &[&AsrSegment], at_cap: bool) -> (LlmMessage, LlmMessage) {
    let mut system_text = format!(
        "Translate the given ASR segments as a coherent unit, respecting topic \"{}\", domain \"{}\", style \"{}\". \
         Reply as JSON: {{\"translation\": str, \"translation_chunks\": [{{\"text\": str, \"segment_ids\": [int]}}]}}. \
         segment_ids are 0-based, relative to the first segment shown below. Every shown segment id must appear in \
         exactly one translation_chunks entry. If you need more of the surrounding transcript to translate well, \
         reply instead with {{\"need_more_context\": {{\"reason\": str, \"additional_segments\": int}}}}.",
        global_context.topic, global_context.domain, global_context.style
    );
    if at_cap {
        system_text.push_str(" You already have the maximum context available; you must reply with a translation now, not need_more_context.");
    }

    let body = window
        .iter()
        .enumerate()
        .map(|(i, s)| format!("{{\"id\": {i}, \"text\": \"{}\"}}", s.effective_text().replace('"', "\\\"")))
        .collect::<Vec<_>>()
        .join(", ");

    (LlmMessage::system(system_text), LlmMessage::user(format!("Segments: [{body}]")))
}

fn normalize_translation_chunks(raw: &[RawTranslationChunk], window_ids: &[u32]) -> Vec<TranslationChunk> {
    raw.iter()
        .map(|tc| {
            let segment_ids = tc.segment_ids.iter().filter_map(|relative| window_ids.get(*relative as usize)).copied().collect();
            TranslationChunk { text: tc.text.clone(), segment_ids }
        })
        .collect()
}

fn fallback_chunks(project: &Project, segments: &[AsrSegment]) -> Vec<SemanticChunk> {
    segments
        .iter()
        .filter(|s| !s.effective_text().trim().is_empty())
        .enumerate()
        .map(|(i, s)| SemanticChunk {
            chunk_index: i as u32,
            source_text: s.effective_text().to_string(),
            translation: format!("[{}] {}", project.target_language, s.effective_text()),
            asr_segment_ids: vec![s.id],
            translation_chunks: vec![TranslationChunk {
                text: format!("[{}] {}", project.target_language, s.effective_text()),
                segment_ids: vec![s.id],
            }],
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(id: u32, text: &str) -> AsrSegment {
        AsrSegment::new(id, id as f64, id as f64 + 1.0, text)
    }

    #[test]
    fn normalize_translation_chunks_maps_relative_to_absolute_ids() {
        let window_ids = vec![5, 6, 7];
        let raw = vec![RawTranslationChunk { text: "a".to_string(), segment_ids: vec![0, 1] }, RawTranslationChunk { text: "b".to_string(), segment_ids: vec![2] }];
        let normalized = normalize_translation_chunks(&raw, &window_ids);
        assert_eq!(normalized[0].segment_ids, vec![5, 6]);
        assert_eq!(normalized[1].segment_ids, vec![7]);
    }

    #[test]
    fn fallback_chunks_skip_blank_segments_and_tag_target_language() {
        let project = Project::new("p", "m", "es");
        let segments = vec![seg(0, "hello"), seg(1, "   "), seg(2, "world")];
        let chunks = fallback_chunks(&project, &segments);
        assert_eq!(chunks.len(), 2);
        assert!(chunks[0].translation.starts_with("[es]"));
        assert_eq!(chunks[1].asr_segment_ids, vec![2]);
    }

    #[test]
    fn fallback_chunk_translation_chunks_satisfy_partition_invariant() {
        let project = Project::new("p", "m", "fr");
        let segments = vec![seg(0, "one"), seg(1, "two")];
        for chunk in fallback_chunks(&project, &segments) {
            assert!(chunk.translation_chunks_partition_segments());
        }
    }
}
