// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! LLM completion, grounded on `providers/llm/base.py`'s `Message`,
//! `LLMUsage`, `LLMCompletionResult`, and `LLMProvider` ABC. Retry/backoff
//! classification (`RetryableLLMError`, rate-limit wait bounds) is a
//! concrete policy in `subflow`, built around
//! [`crate::error::SubflowError::retryable_llm`].

use async_trait::async_trait;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::error::SubflowResult;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlmMessage {
    pub role: String,
    pub content: String,
}

impl LlmMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: "system".to_string(), content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: "user".to_string(), content: content.into() }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LlmUsage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
}

#[derive(Debug, Clone)]
pub struct LlmCompletionResult {
    pub text: String,
    pub usage: LlmUsage,
}

#[async_trait]
pub trait LlmProvider: Send + Sync {
    fn provider_name(&self) -> &str;

    fn model_name(&self) -> &str;

    async fn complete(&self, messages: &[LlmMessage], cancel: &CancellationToken) -> SubflowResult<String>;

    async fn complete_with_usage(
        &self,
        messages: &[LlmMessage],
        cancel: &CancellationToken,
    ) -> SubflowResult<LlmCompletionResult>;

    /// Requests a JSON-shaped response (via a response-format hint or tool
    /// call, provider-dependent); the caller still runs the response
    /// through the defensive JSON parser in `services::llm_json`.
    async fn complete_json(&self, messages: &[LlmMessage], cancel: &CancellationToken) -> SubflowResult<Value>;

    async fn close(&self) -> SubflowResult<()>;
}
