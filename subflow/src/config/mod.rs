//! # Runtime Configuration
//!
//! [`Settings`] is the env/file-driven configuration for the `subflow`
//! binary: data directories, the database, the artifact-store backend,
//! provider credentials, and concurrency maxima. It is distinct from
//! `subflow_bootstrap::config::AppConfig`, which only holds what the CLI
//! layer needs before `Settings` can be constructed (verbosity, an
//! optional config file path).
//!
//! Loaded with the `config` crate: defaults, then an optional TOML file,
//! then `SUBFLOW_`-prefixed environment variables, in that order.

use crate::error::{ConfigError, ConfigResult};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Artifact store backend selection (§4.1).
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "backend", rename_all = "snake_case")]
pub enum ArtifactStoreBackend {
    Local { root: PathBuf },
    S3 {
        bucket: String,
        prefix: String,
        region: String,
        endpoint: Option<String>,
    },
}

/// Which concrete vendor a profile talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LlmProviderKind {
    Openai,
    OpenaiCompat,
    Anthropic,
    Gemini,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmProfileConfig {
    pub provider: LlmProviderKind,
    pub model: String,
    pub api_key_env: String,
    pub base_url: Option<String>,
    #[serde(default = "default_llm_timeout_s")]
    pub timeout_s: u64,
}

fn default_llm_timeout_s() -> u64 {
    120
}

/// Which profile (fast / power) handles each LLM-backed stage.
#[derive(Debug, Clone, Deserialize)]
pub struct LlmStageRouting {
    #[serde(default = "default_asr_correction_profile")]
    pub llm_asr_correction: String,
    #[serde(default = "default_translation_profile")]
    pub global_understanding: String,
    #[serde(default = "default_translation_profile")]
    pub semantic_chunking: String,
}

fn default_asr_correction_profile() -> String {
    "fast".to_string()
}

fn default_translation_profile() -> String {
    "power".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmLimits {
    #[serde(default = "default_max_asr_segments")]
    pub max_asr_segments: usize,
}

fn default_max_asr_segments() -> usize {
    20
}

impl Default for LlmLimits {
    fn default() -> Self {
        Self {
            max_asr_segments: default_max_asr_segments(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AudioSettings {
    #[serde(default = "default_max_duration_s")]
    pub max_duration_s: f64,
    #[serde(default = "default_target_db")]
    pub normalize_target_db: f64,
}

fn default_max_duration_s() -> f64 {
    3600.0
}

fn default_target_db() -> f64 {
    -20.0
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            max_duration_s: default_max_duration_s(),
            normalize_target_db: default_target_db(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct VadSettings {
    #[serde(default = "default_vad_threshold")]
    pub threshold: f32,
    #[serde(default = "default_min_speech_ms")]
    pub min_speech_ms: u32,
}

fn default_vad_threshold() -> f32 {
    0.5
}

fn default_min_speech_ms() -> u32 {
    250
}

impl Default for VadSettings {
    fn default() -> Self {
        Self {
            threshold: default_vad_threshold(),
            min_speech_ms: default_min_speech_ms(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AsrSettings {
    pub model: String,
    #[serde(default = "default_asr_language")]
    pub language: Option<String>,
    #[serde(default = "default_asr_base_url")]
    pub base_url: String,
}

fn default_asr_language() -> Option<String> {
    None
}

fn default_asr_base_url() -> String {
    "http://localhost:9000".to_string()
}

/// Per-`ServiceClass` concurrency ceilings (§4.4, §5).
#[derive(Debug, Clone, Deserialize)]
pub struct ConcurrencySettings {
    #[serde(default = "default_asr_concurrency")]
    pub asr: usize,
    #[serde(default = "default_llm_fast_concurrency")]
    pub llm_fast: usize,
    #[serde(default = "default_llm_power_concurrency")]
    pub llm_power: usize,
}

fn default_asr_concurrency() -> usize {
    2
}

fn default_llm_fast_concurrency() -> usize {
    8
}

fn default_llm_power_concurrency() -> usize {
    4
}

impl Default for ConcurrencySettings {
    fn default() -> Self {
        Self {
            asr: default_asr_concurrency(),
            llm_fast: default_llm_fast_concurrency(),
            llm_power: default_llm_power_concurrency(),
        }
    }
}

/// Top-level application configuration, loaded once at process start.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub data_dir: PathBuf,
    pub models_dir: PathBuf,
    pub log_dir: PathBuf,

    pub database_url: String,

    #[serde(default)]
    pub queue_url: Option<String>,

    pub artifact_store: ArtifactStoreBackend,

    #[serde(default)]
    pub audio: AudioSettings,
    #[serde(default)]
    pub vad: VadSettings,
    pub asr: AsrSettings,

    pub llm_fast: LlmProfileConfig,
    pub llm_power: LlmProfileConfig,
    #[serde(default = "default_llm_stage_routing")]
    pub llm_stage: LlmStageRouting,
    #[serde(default)]
    pub llm_limits: LlmLimits,

    #[serde(default)]
    pub concurrency: ConcurrencySettings,

    #[serde(default)]
    pub redis_url: Option<String>,
    #[serde(default = "default_project_cache_ttl_s")]
    pub project_cache_ttl_s: u64,
}

fn default_llm_stage_routing() -> LlmStageRouting {
    LlmStageRouting {
        llm_asr_correction: default_asr_correction_profile(),
        global_understanding: default_translation_profile(),
        semantic_chunking: default_translation_profile(),
    }
}

fn default_project_cache_ttl_s() -> u64 {
    300
}

impl Settings {
    /// Loads configuration from (in increasing precedence order) a
    /// built-in default layer, an optional TOML file, and `SUBFLOW_`
    /// environment variables (double-underscore separated, e.g.
    /// `SUBFLOW_CONCURRENCY__ASR=4`).
    pub fn load(config_path: Option<&Path>) -> ConfigResult<Self> {
        let mut builder = config::Config::builder().add_source(config::File::from_str(DEFAULTS_TOML, config::FileFormat::Toml));

        if let Some(path) = config_path {
            builder = builder.add_source(config::File::from(path));
        }

        builder = builder.add_source(config::Environment::with_prefix("SUBFLOW").separator("__").try_parsing(true));

        let config = builder.build().map_err(ConfigError::load)?;
        config.try_deserialize().map_err(ConfigError::load)
    }

    /// Resolves an LLM profile config by its routing key ("fast" or
    /// "power").
    pub fn llm_profile(&self, name: &str) -> ConfigResult<&LlmProfileConfig> {
        match name {
            "fast" => Ok(&self.llm_fast),
            "power" => Ok(&self.llm_power),
            other => Err(ConfigError::unknown_profile(other)),
        }
    }

    /// Reads the resolved API key for a profile from its configured env var.
    pub fn llm_api_key(&self, profile: &LlmProfileConfig) -> ConfigResult<String> {
        std::env::var(&profile.api_key_env).map_err(|_| ConfigError::missing_env_var(profile.api_key_env.clone()))
    }

    /// Service-class-keyed concurrency maxima, as the tracker wants them.
    pub fn concurrency_maxima(&self) -> BTreeMap<subflow_domain::value_objects::ServiceClass, usize> {
        use subflow_domain::value_objects::ServiceClass;
        let mut map = BTreeMap::new();
        map.insert(ServiceClass::Asr, self.concurrency.asr);
        map.insert(ServiceClass::LlmFast, self.concurrency.llm_fast);
        map.insert(ServiceClass::LlmPower, self.concurrency.llm_power);
        map
    }
}

const DEFAULTS_TOML: &str = r#"
data_dir = "./data"
models_dir = "./models"
log_dir = "./logs"
database_url = "sqlite://./data/subflow.db"

[artifact_store]
backend = "local"
root = "./data/artifacts"

[asr]
model = "base"

[llm_fast]
provider = "openai_compat"
model = "gpt-4o-mini"
api_key_env = "SUBFLOW_LLM_FAST_API_KEY"

[llm_power]
provider = "openai_compat"
model = "gpt-4o"
api_key_env = "SUBFLOW_LLM_POWER_API_KEY"
"#;
