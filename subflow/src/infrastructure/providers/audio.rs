//! Subprocess-backed [`AudioProvider`], grounded on `providers/audio/ffmpeg_provider.py`:
//! `ffmpeg` for extraction/normalisation, `demucs` for vocal separation.
//! Algorithm internals (filter graphs, model weights) are out of this
//! specification's scope (§1); this adapter's contract is the subprocess
//! invocation shape, not the DSP itself.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;

use subflow_domain::error::{SubflowError, SubflowResult};
use subflow_domain::ports::AudioProvider;

pub struct FfmpegAudioProvider {
    ffmpeg_bin: String,
    demucs_bin: String,
    demucs_model: String,
    skip_demucs: bool,
}

impl FfmpegAudioProvider {
    pub fn new(ffmpeg_bin: impl Into<String>, demucs_bin: impl Into<String>, demucs_model: impl Into<String>, skip_demucs: bool) -> Self {
        Self {
            ffmpeg_bin: ffmpeg_bin.into(),
            demucs_bin: demucs_bin.into(),
            demucs_model: demucs_model.into(),
            skip_demucs,
        }
    }

    async fn run(&self, cancel: &CancellationToken, mut command: Command) -> SubflowResult<()> {
        let child = command.spawn().map_err(|e| SubflowError::provider("audio", e.to_string()))?;
        let status = tokio::select! {
            status = child.wait_with_output() => status.map_err(|e| SubflowError::provider("audio", e.to_string()))?,
            _ = cancel.cancelled() => return Err(SubflowError::Cancellation),
        };

        if !status.status.success() {
            return Err(SubflowError::provider(
                "audio",
                format!("subprocess exited with {}: {}", status.status, String::from_utf8_lossy(&status.stderr)),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl AudioProvider for FfmpegAudioProvider {
    async fn extract_audio(&self, source_path: &Path, max_duration_s: Option<f64>, cancel: &CancellationToken) -> SubflowResult<PathBuf> {
        let out = source_path.with_extension("16k.wav");
        let mut cmd = Command::new(&self.ffmpeg_bin);
        cmd.arg("-y").arg("-i").arg(source_path);
        if let Some(max_s) = max_duration_s {
            cmd.arg("-t").arg(max_s.to_string());
        }
        cmd.args(["-ac", "1", "-ar", "16000"]).arg(&out);
        self.run(cancel, cmd).await?;
        Ok(out)
    }

    async fn separate_vocals(&self, audio_path: &Path, cancel: &CancellationToken) -> SubflowResult<PathBuf> {
        if self.skip_demucs {
            return Ok(audio_path.to_path_buf());
        }
        let out_dir = audio_path.with_extension("vocals_dir");
        let mut cmd = Command::new(&self.demucs_bin);
        cmd.args(["-n", &self.demucs_model, "--two-stems", "vocals", "-o"]).arg(&out_dir).arg(audio_path);
        self.run(cancel, cmd).await?;
        Ok(out_dir.join(&self.demucs_model).join("vocals.wav"))
    }

    async fn normalize_audio(&self, audio_path: &Path, target_db: f64, cancel: &CancellationToken) -> SubflowResult<PathBuf> {
        let out = audio_path.with_extension("normalized.wav");
        let mut cmd = Command::new(&self.ffmpeg_bin);
        cmd.arg("-y").arg("-i").arg(audio_path).arg("-af").arg(format!("loudnorm=I={target_db}")).arg(&out);
        self.run(cancel, cmd).await?;
        Ok(out)
    }

    async fn close(&self) -> SubflowResult<()> {
        Ok(())
    }
}
