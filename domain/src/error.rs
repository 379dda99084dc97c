// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # SubFlow Error Taxonomy
//!
//! One error type for the whole workspace, carried as `Result<T, SubflowError>`
//! from every domain port and every stage runner. Each variant maps to a
//! stable `error_code` surfaced on `StageRun.error_code` and, ultimately, to
//! the client.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable, client-facing error codes. Names and membership follow the
/// original system's `ErrorCode` enum, extended with the cancellation and
/// repository-adjacent codes this layer needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    Unknown,
    InvalidMedia,
    AudioPreprocessFailed,
    VadFailed,
    AsrFailed,
    LlmFailed,
    LlmTimeout,
    ExportFailed,
    ProviderFailed,
    ConfigurationError,
    Cancelled,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::Unknown => "UNKNOWN",
            ErrorCode::InvalidMedia => "INVALID_MEDIA",
            ErrorCode::AudioPreprocessFailed => "AUDIO_PREPROCESS_FAILED",
            ErrorCode::VadFailed => "VAD_FAILED",
            ErrorCode::AsrFailed => "ASR_FAILED",
            ErrorCode::LlmFailed => "LLM_FAILED",
            ErrorCode::LlmTimeout => "LLM_TIMEOUT",
            ErrorCode::ExportFailed => "EXPORT_FAILED",
            ErrorCode::ProviderFailed => "PROVIDER_FAILED",
            ErrorCode::ConfigurationError => "CONFIGURATION_ERROR",
            ErrorCode::Cancelled => "CANCELLED",
        };
        f.write_str(s)
    }
}

impl StageName {
    /// The error code a failure of this stage should be tagged with.
    pub fn default_error_code(self) -> ErrorCode {
        match self {
            StageName::AudioPreprocess => ErrorCode::AudioPreprocessFailed,
            StageName::Vad => ErrorCode::VadFailed,
            StageName::Asr => ErrorCode::AsrFailed,
            StageName::LlmAsrCorrection | StageName::Llm => ErrorCode::LlmFailed,
        }
    }
}

use crate::value_objects::StageName;

/// The SubFlow error taxonomy (see SPEC_FULL.md §7).
#[derive(thiserror::Error, Debug, Clone)]
pub enum SubflowError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("provider '{provider}' failed{}: {message}", code.map(|c| format!(" [{c}]")).unwrap_or_default())]
    Provider {
        provider: String,
        message: String,
        code: Option<ErrorCode>,
    },

    #[error("retryable llm error from '{provider}' (rate_limited={rate_limited}): {message}")]
    RetryableLlm {
        provider: String,
        message: String,
        rate_limited: bool,
    },

    #[error("artifact not found: project={project_id} stage={stage} name={name}")]
    ArtifactNotFound {
        project_id: String,
        stage: String,
        name: String,
    },

    #[error("stage '{stage}' failed for project {project_id} [{error_code}]: {message}")]
    StageExecution {
        stage: StageName,
        project_id: String,
        message: String,
        error_code: ErrorCode,
    },

    #[error("operation cancelled")]
    Cancellation,

    #[error("repository error: {0}")]
    Repository(String),

    #[error("artifact store error: {0}")]
    ArtifactStore(String),

    #[error("blob store error: {0}")]
    BlobStore(String),
}

impl SubflowError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
            code: Some(ErrorCode::ProviderFailed),
        }
    }

    pub fn retryable_llm(
        provider: impl Into<String>,
        message: impl Into<String>,
        rate_limited: bool,
    ) -> Self {
        Self::RetryableLlm {
            provider: provider.into(),
            message: message.into(),
            rate_limited,
        }
    }

    pub fn artifact_not_found(
        project_id: impl Into<String>,
        stage: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self::ArtifactNotFound {
            project_id: project_id.into(),
            stage: stage.into(),
            name: name.into(),
        }
    }

    pub fn stage_execution(
        stage: StageName,
        project_id: impl Into<String>,
        message: impl Into<String>,
        error_code: ErrorCode,
    ) -> Self {
        Self::StageExecution {
            stage,
            project_id: project_id.into(),
            message: message.into(),
            error_code,
        }
    }

    pub fn repository(message: impl Into<String>) -> Self {
        Self::Repository(message.into())
    }

    pub fn artifact_store(message: impl Into<String>) -> Self {
        Self::ArtifactStore(message.into())
    }

    pub fn blob_store(message: impl Into<String>) -> Self {
        Self::BlobStore(message.into())
    }

    /// The stable client-facing code for this error.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            SubflowError::Configuration(_) => ErrorCode::ConfigurationError,
            SubflowError::Provider { code, .. } => code.unwrap_or(ErrorCode::ProviderFailed),
            SubflowError::RetryableLlm { .. } => ErrorCode::LlmFailed,
            SubflowError::ArtifactNotFound { .. } => ErrorCode::Unknown,
            SubflowError::StageExecution { error_code, .. } => *error_code,
            SubflowError::Cancellation => ErrorCode::Cancelled,
            SubflowError::Repository(_) => ErrorCode::Unknown,
            SubflowError::ArtifactStore(_) => ErrorCode::Unknown,
            SubflowError::BlobStore(_) => ErrorCode::Unknown,
        }
    }

    /// Whether a caller may retry this exact operation without operator
    /// intervention. `RetryableLlm` is already handled inside the provider's
    /// own retry wrapper; by the time it escapes that wrapper it has been
    /// exhausted and should not be retried again by the orchestrator.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            SubflowError::RetryableLlm {
                rate_limited: true,
                ..
            }
        )
    }
}

pub type SubflowResult<T> = Result<T, SubflowError>;
