//! HTTP-backed [`AsrProvider`], grounded on `providers/asr/http_provider.py`:
//! a multipart upload to a configured transcription endpoint (e.g. a
//! faster-whisper server). The recognition model itself is outside this
//! specification's scope (§1); this adapter's contract is the request
//! shape and bounded concurrency at the call site, not the model.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use tokio::fs;
use tokio_util::sync::CancellationToken;

use subflow_domain::error::{SubflowError, SubflowResult};
use subflow_domain::ports::{AsrProvider, AsrProviderSegment};

pub struct HttpAsrProvider {
    client: Client,
    base_url: String,
    language: Option<String>,
}

impl HttpAsrProvider {
    pub fn new(base_url: String, language: Option<String>, timeout_s: u64) -> Self {
        let client = Client::builder().timeout(Duration::from_secs(timeout_s)).build().unwrap_or_default();
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            language,
        }
    }

    async fn post(&self, path: &str, form: Form, cancel: &CancellationToken) -> SubflowResult<TranscriptionResponse> {
        let request = self.client.post(format!("{}/{path}", self.base_url)).multipart(form).send();

        let response = tokio::select! {
            result = request => result.map_err(|e| SubflowError::provider("asr", e.to_string()))?,
            _ = cancel.cancelled() => return Err(SubflowError::Cancellation),
        };

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(SubflowError::provider("asr", format!("HTTP {status}: {text}")));
        }

        response.json::<TranscriptionResponse>().await.map_err(|e| SubflowError::provider("asr", e.to_string()))
    }

    async fn upload_form(&self, audio_path: &Path) -> SubflowResult<Form> {
        let bytes = fs::read(audio_path).await.map_err(|e| SubflowError::provider("asr", e.to_string()))?;
        let file_name = audio_path.file_name().and_then(|n| n.to_str()).unwrap_or("audio.wav").to_string();
        let part = Part::bytes(bytes).file_name(file_name).mime_str("audio/wav").map_err(|e| SubflowError::provider("asr", e.to_string()))?;

        let mut form = Form::new().part("file", part);
        if let Some(language) = &self.language {
            form = form.text("language", language.clone());
        }
        Ok(form)
    }
}

#[async_trait]
impl AsrProvider for HttpAsrProvider {
    async fn transcribe(&self, audio_path: &Path, cancel: &CancellationToken) -> SubflowResult<Vec<AsrProviderSegment>> {
        let form = self.upload_form(audio_path).await?;
        let response = self.post("transcribe", form, cancel).await?;
        Ok(response.segments.into_iter().map(Into::into).collect())
    }

    async fn transcribe_segment(&self, audio_path: &Path, start: f64, end: f64, cancel: &CancellationToken) -> SubflowResult<AsrProviderSegment> {
        let form = self.upload_form(audio_path).await?.text("start", start.to_string()).text("end", end.to_string());
        let response = self.post("transcribe_segment", form, cancel).await?;
        response
            .segments
            .into_iter()
            .next()
            .map(Into::into)
            .ok_or_else(|| SubflowError::provider("asr", "empty segments array for single-region transcription"))
    }

    async fn close(&self) -> SubflowResult<()> {
        Ok(())
    }
}

#[derive(Deserialize)]
struct TranscriptionResponse {
    segments: Vec<SegmentDto>,
}

#[derive(Deserialize)]
struct SegmentDto {
    text: String,
    start: f64,
    end: f64,
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    confidence: Option<f64>,
}

impl From<SegmentDto> for AsrProviderSegment {
    fn from(dto: SegmentDto) -> Self {
        Self {
            text: dto.text,
            start: dto.start,
            end: dto.end,
            language: dto.language,
            confidence: dto.confidence,
        }
    }
}
