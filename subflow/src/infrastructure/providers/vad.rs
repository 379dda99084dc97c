//! External-process [`VadProvider`], grounded on `providers/vad/base.py`.
//! The detection model itself (Silero, WebRTC, or similar) is outside this
//! specification's scope (§1); this adapter's contract is invoking a
//! configured executable and parsing its JSON result, not the model.

use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;

use subflow_domain::error::{SubflowError, SubflowResult};
use subflow_domain::ports::{VadFrameProbs, VadProvider};

pub struct ExternalVadProvider {
    model_path: String,
    threshold: f32,
}

impl ExternalVadProvider {
    pub fn new(model_path: impl Into<String>, threshold: f32) -> Self {
        Self { model_path: model_path.into(), threshold }
    }
}

#[derive(Deserialize)]
struct VadOutput {
    regions: Vec<(f64, f64)>,
    #[serde(default)]
    frame_hop_s: Option<f64>,
    #[serde(default)]
    probs: Option<Vec<f32>>,
}

#[async_trait]
impl VadProvider for ExternalVadProvider {
    async fn detect(&self, audio_path: &Path, cancel: &CancellationToken) -> SubflowResult<(Vec<(f64, f64)>, Option<VadFrameProbs>)> {
        let mut cmd = Command::new(&self.model_path);
        cmd.arg(audio_path).arg("--threshold").arg(self.threshold.to_string());

        let child = cmd.spawn().map_err(|e| SubflowError::provider("vad", e.to_string()))?;
        let output = tokio::select! {
            output = child.wait_with_output() => output.map_err(|e| SubflowError::provider("vad", e.to_string()))?,
            _ = cancel.cancelled() => return Err(SubflowError::Cancellation),
        };

        if !output.status.success() {
            return Err(SubflowError::provider(
                "vad",
                format!("subprocess exited with {}: {}", output.status, String::from_utf8_lossy(&output.stderr)),
            ));
        }

        let parsed: VadOutput =
            serde_json::from_slice(&output.stdout).map_err(|e| SubflowError::provider("vad", format!("malformed output: {e}")))?;

        let probs = match (parsed.frame_hop_s, parsed.probs) {
            (Some(frame_hop_s), Some(probs)) => Some(VadFrameProbs { frame_hop_s, probs }),
            _ => None,
        };
        Ok((parsed.regions, probs))
    }

    async fn close(&self) -> SubflowResult<()> {
        Ok(())
    }
}
