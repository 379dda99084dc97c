//! OpenAI-compatible chat-completions [`LlmProvider`], grounded on
//! `providers/llm/openai_compat.py`'s request/response shape. Used for the
//! `openai`, `openai_compat`, `anthropic`, and `gemini` profile kinds,
//! which all expose an OpenAI-compatible `/chat/completions` endpoint in
//! the original's deployment.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use subflow_domain::error::{SubflowError, SubflowResult};
use subflow_domain::ports::{LlmCompletionResult, LlmMessage, LlmProvider, LlmUsage};

use super::json_extract::extract_json;

pub struct OpenAiCompatLlmProvider {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl OpenAiCompatLlmProvider {
    pub fn new(base_url: String, model: String, api_key: String, timeout_s: u64) -> Self {
        let client = Client::builder().timeout(Duration::from_secs(timeout_s)).build().unwrap_or_default();
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            api_key,
        }
    }

    async fn chat(&self, messages: &[LlmMessage], json_mode: bool, cancel: &CancellationToken) -> SubflowResult<ChatResponse> {
        let body = ChatRequest {
            model: &self.model,
            messages: messages.iter().map(|m| ChatMessage { role: &m.role, content: &m.content }).collect(),
            response_format: json_mode.then_some(ResponseFormat { format_type: "json_object" }),
        };

        let request = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send();

        let response = tokio::select! {
            result = request => result.map_err(|e| classify_reqwest_error(&self.model, e))?,
            _ = cancel.cancelled() => return Err(SubflowError::Cancellation),
        };

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let rate_limited = status.as_u16() == 429;
            return Err(if status.is_server_error() || rate_limited {
                SubflowError::retryable_llm(self.provider_name(), format!("HTTP {status}: {text}"), rate_limited)
            } else {
                SubflowError::provider(self.provider_name(), format!("HTTP {status}: {text}"))
            });
        }

        response.json::<ChatResponse>().await.map_err(|e| SubflowError::provider(self.provider_name(), e.to_string()))
    }
}

#[async_trait]
impl LlmProvider for OpenAiCompatLlmProvider {
    fn provider_name(&self) -> &str {
        "openai_compat"
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    async fn complete(&self, messages: &[LlmMessage], cancel: &CancellationToken) -> SubflowResult<String> {
        Ok(self.complete_with_usage(messages, cancel).await?.text)
    }

    async fn complete_with_usage(&self, messages: &[LlmMessage], cancel: &CancellationToken) -> SubflowResult<LlmCompletionResult> {
        let response = self.chat(messages, false, cancel).await?;
        let text = response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| SubflowError::provider(self.provider_name(), "empty choices array"))?;

        Ok(LlmCompletionResult {
            text,
            usage: response.usage.map(Into::into).unwrap_or_default(),
        })
    }

    async fn complete_json(&self, messages: &[LlmMessage], cancel: &CancellationToken) -> SubflowResult<Value> {
        let response = self.chat(messages, true, cancel).await?;
        let text = response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| SubflowError::provider(self.provider_name(), "empty choices array"))?;

        extract_json(&text).map_err(|e| SubflowError::provider(self.provider_name(), e))
    }

    async fn close(&self) -> SubflowResult<()> {
        Ok(())
    }
}

fn classify_reqwest_error(provider: &str, err: reqwest::Error) -> SubflowError {
    if err.is_timeout() || err.is_connect() {
        SubflowError::retryable_llm(provider, err.to_string(), false)
    } else {
        SubflowError::provider(provider, err.to_string())
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<UsageDto>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: String,
}

#[derive(Deserialize)]
struct UsageDto {
    prompt_tokens: u64,
    completion_tokens: u64,
    total_tokens: u64,
}

impl From<UsageDto> for LlmUsage {
    fn from(dto: UsageDto) -> Self {
        Self {
            prompt_tokens: dto.prompt_tokens,
            completion_tokens: dto.completion_tokens,
            total_tokens: dto.total_tokens,
        }
    }
}
