//! Provider adapters behind the domain crate's provider ports (§6, §9).
//!
//! The original system dispatches on a `provider_type` string read by a
//! duck-typed `registry.py` factory; per §9's REDESIGN FLAGS this is
//! replaced by [`crate::config::LlmProviderKind`] (a tagged enum) plus
//! [`build_llm_provider`], a factory returning `Arc<dyn LlmProvider>`.
//! Audio/VAD/ASR adapters are thin: their concrete compute bodies
//! (ffmpeg/demucs subprocesses, a VAD model, an ASR HTTP API) are outside
//! this specification's core (§1's Out-of-scope), so they are wired to
//! real subprocess/HTTP calls where that wiring is itself the contract,
//! and fail fast with a provider error where the compute step is opaque.

pub mod asr;
pub mod audio;
pub mod json_extract;
pub mod llm;
pub mod vad;

pub use asr::HttpAsrProvider;
pub use audio::FfmpegAudioProvider;
pub use llm::OpenAiCompatLlmProvider;
pub use vad::ExternalVadProvider;

use std::sync::Arc;

use subflow_domain::error::SubflowResult;
use subflow_domain::ports::LlmProvider;

use crate::config::{LlmProfileConfig, LlmProviderKind};

/// Builds the concrete [`LlmProvider`] for a configured profile. Unknown
/// kinds never reach this match arm — `LlmProviderKind` is deserialized
/// from a closed set, so a bad config value fails at `Settings::load`
/// rather than here.
pub fn build_llm_provider(config: &LlmProfileConfig, api_key: String) -> SubflowResult<Arc<dyn LlmProvider>> {
    match config.provider {
        LlmProviderKind::Openai | LlmProviderKind::OpenaiCompat => Ok(Arc::new(OpenAiCompatLlmProvider::new(
            config.base_url.clone().unwrap_or_else(|| "https://api.openai.com/v1".to_string()),
            config.model.clone(),
            api_key,
            config.timeout_s,
        ))),
        LlmProviderKind::Anthropic => Ok(Arc::new(OpenAiCompatLlmProvider::new(
            config.base_url.clone().unwrap_or_else(|| "https://api.anthropic.com/v1".to_string()),
            config.model.clone(),
            api_key,
            config.timeout_s,
        ))),
        LlmProviderKind::Gemini => Ok(Arc::new(OpenAiCompatLlmProvider::new(
            config
                .base_url
                .clone()
                .unwrap_or_else(|| "https://generativelanguage.googleapis.com/v1beta/openai".to_string()),
            config.model.clone(),
            api_key,
            config.timeout_s,
        ))),
    }
}
