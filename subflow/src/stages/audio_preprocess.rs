//! Stage 1: resolve the source media, extract 16 kHz mono audio, optionally
//! separate vocals (derived-blob cached), and ingest every artifact into
//! the Blob Store. Grounded on `pipeline/stages/audio_preprocess.py`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio_util::sync::CancellationToken;

use subflow_domain::entities::StageArtifacts;
use subflow_domain::entities::{FileType, Project};
use subflow_domain::error::{SubflowError, SubflowResult};
use subflow_domain::ports::{ArtifactStoreExt, ProgressReporter};
use subflow_domain::value_objects::StageName;

use super::{StageContext, StageDeps};

const ARTIFACT_NAME: &str = "stage1.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Stage1Artifact {
    input_video_hash: String,
    audio_hash: String,
    vocals_hash: String,
}

pub async fn run(
    deps: &StageDeps,
    project: &Project,
    ctx: &mut StageContext,
    reporter: &dyn ProgressReporter,
    cancel: &CancellationToken,
) -> SubflowResult<StageArtifacts> {
    reporter.report(0, "resolving source media").await?;
    let source_path = resolve_source(&deps.settings.data_dir, project.id.to_string(), &project.media_url).await?;

    let input_video_hash = deps
        .blob_store
        .ingest_file(project.id, FileType::InputVideo, &source_path, "video/mp4")
        .await?;

    reporter.report(20, "extracting audio").await?;
    let max_duration_s = if deps.settings.audio.max_duration_s > 0.0 {
        Some(deps.settings.audio.max_duration_s)
    } else {
        None
    };
    let audio_path = deps.audio_provider.extract_audio(&source_path, max_duration_s, cancel).await?;
    let audio_hash = deps.blob_store.ingest_file(project.id, FileType::Audio, &audio_path, "audio/wav").await?;

    reporter.report(50, "separating vocals").await?;
    let params = json!({
        "normalize": true,
        "target_db": deps.settings.audio.normalize_target_db,
    });
    let vocals_hash = match deps.blob_store.get_derived("demucs_vocals", &audio_hash, &params).await? {
        Some(cached) => cached,
        None => {
            let vocals_path = deps.audio_provider.separate_vocals(&audio_path, cancel).await?;
            let normalized_path = deps
                .audio_provider
                .normalize_audio(&vocals_path, deps.settings.audio.normalize_target_db, cancel)
                .await?;
            let hash = deps.blob_store.ingest_file(project.id, FileType::Vocals, &normalized_path, "audio/wav").await?;
            deps.blob_store.set_derived("demucs_vocals", &audio_hash, &params, hash.clone()).await?;
            hash
        }
    };
    ctx.vocals_audio_path = Some(deps.blob_store.path_for(&vocals_hash));

    let artifact = Stage1Artifact {
        input_video_hash: input_video_hash.to_string(),
        audio_hash: audio_hash.to_string(),
        vocals_hash: vocals_hash.to_string(),
    };
    let identifier = deps.artifact_store.save_json(project.id, StageName::AudioPreprocess.as_str(), ARTIFACT_NAME, &artifact).await?;

    reporter.finish("audio preprocessing complete").await?;

    let mut artifacts = StageArtifacts::new();
    artifacts.insert(ARTIFACT_NAME.to_string(), identifier);
    Ok(artifacts)
}

/// Reconstructs `ctx.vocals_audio_path` from the persisted `stage1.json`
/// without re-running any provider call, per §4.8's hydration algorithm.
pub async fn hydrate(deps: &StageDeps, project: &Project, ctx: &mut StageContext) -> SubflowResult<()> {
    let artifact: Stage1Artifact = deps.artifact_store.load_json(project.id, StageName::AudioPreprocess.as_str(), ARTIFACT_NAME).await?;
    let hash = subflow_domain::value_objects::BlobHash::from_hex(artifact.vocals_hash)
        .map_err(|e| SubflowError::artifact_store(format!("malformed vocals_hash in stage1.json: {e}")))?;
    ctx.vocals_audio_path = Some(deps.blob_store.path_for(&hash));
    Ok(())
}

/// Resolves `media_url` to a local path usable by the audio provider: an
/// existing local filesystem path, a `file://` URI, or an `http(s)://` URL
/// streamed to `{data_dir}/projects/{project_id}/source`. Any other scheme
/// is a configuration error, since the set of supported schemes is fixed
/// at deploy time, not a runtime capability negotiation.
async fn resolve_source(data_dir: &Path, project_id: String, media_url: &str) -> SubflowResult<PathBuf> {
    if let Some(rest) = media_url.strip_prefix("file://") {
        return Ok(PathBuf::from(rest));
    }
    if media_url.starts_with("http://") || media_url.starts_with("https://") {
        return download_to_disk(data_dir, &project_id, media_url).await;
    }
    if !media_url.contains("://") {
        return Ok(PathBuf::from(media_url));
    }
    Err(SubflowError::configuration(format!("unsupported media_url scheme: {media_url}")))
}

async fn download_to_disk(data_dir: &Path, project_id: &str, url: &str) -> SubflowResult<PathBuf> {
    use futures::StreamExt;
    use tokio::io::AsyncWriteExt;

    let dir = data_dir.join("projects").join(project_id);
    tokio::fs::create_dir_all(&dir).await.map_err(|e| SubflowError::stage_execution(
        StageName::AudioPreprocess,
        project_id,
        e.to_string(),
        subflow_domain::error::ErrorCode::AudioPreprocessFailed,
    ))?;
    let dest = dir.join("source");

    let response = reqwest::get(url).await.map_err(|e| {
        SubflowError::stage_execution(StageName::AudioPreprocess, project_id, format!("download failed: {e}"), subflow_domain::error::ErrorCode::AudioPreprocessFailed)
    })?;
    let mut file = tokio::fs::File::create(&dest).await.map_err(|e| {
        SubflowError::stage_execution(StageName::AudioPreprocess, project_id, e.to_string(), subflow_domain::error::ErrorCode::AudioPreprocessFailed)
    })?;

    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let bytes = chunk.map_err(|e| {
            SubflowError::stage_execution(StageName::AudioPreprocess, project_id, format!("download interrupted: {e}"), subflow_domain::error::ErrorCode::AudioPreprocessFailed)
        })?;
        file.write_all(&bytes).await.map_err(|e| {
            SubflowError::stage_execution(StageName::AudioPreprocess, project_id, e.to_string(), subflow_domain::error::ErrorCode::AudioPreprocessFailed)
        })?;
    }
    Ok(dest)
}
