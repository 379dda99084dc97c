//! Re-exports of the workspace error taxonomy, plus thin subflow-crate
//! conveniences layered on top of it.

pub use subflow_domain::{ErrorCode, SubflowError, SubflowResult};

/// Alias used at the configuration-loading boundary; configuration failures
/// are always `SubflowError::Configuration`.
pub type ConfigResult<T> = SubflowResult<T>;

/// Configuration-specific constructors, kept separate from the main
/// [`SubflowError`] impl so config-loading call sites read naturally.
pub struct ConfigError;

impl ConfigError {
    pub fn load(message: impl Into<String>) -> SubflowError {
        SubflowError::configuration(format!("failed to load configuration: {}", message.into()))
    }

    pub fn unknown_profile(name: impl Into<String>) -> SubflowError {
        SubflowError::configuration(format!("unknown LLM profile: {}", name.into()))
    }

    pub fn missing_env_var(name: impl Into<String>) -> SubflowError {
        SubflowError::configuration(format!("missing required environment variable: {}", name.into()))
    }
}
