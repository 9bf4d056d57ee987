//! Text-completion backends.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::OpenAiConfig;

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("failed to reach completion API: {0}")]
    Network(#[from] reqwest::Error),
    #[error("completion API error ({status}): {message}")]
    Api { status: u16, message: String },
    #[error("malformed completion response: {0}")]
    MalformedResponse(String),
    #[error("completion API returned no text")]
    EmptyCompletion,
}

/// An opaque prompt-in, text-out completion function.
#[async_trait]
pub trait TextCompletion: Send + Sync {
    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<String, CompletionError>;
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// OpenAI Chat Completions backend.
/// Also works with OpenAI-compatible APIs via `api_url`.
pub struct OpenAiCompletion {
    client: Client,
    config: OpenAiConfig,
}

impl OpenAiCompletion {
    pub fn new(config: OpenAiConfig, client: Client) -> Self {
        log::info!(
            "OpenAI completion backend initialized with model: {}",
            config.model
        );
        Self { client, config }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1/chat/completions",
            self.config.api_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl TextCompletion for OpenAiCompletion {
    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<String, CompletionError> {
        let request = ChatCompletionRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.config.temperature,
            max_tokens,
        };

        log::debug!(
            "Sending completion request ({} prompt chars, max_tokens {})",
            prompt.len(),
            max_tokens
        );

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&error_text)
                .map(|body| body.error.message)
                .unwrap_or(error_text);
            return Err(CompletionError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        let completion: ChatCompletionResponse = serde_json::from_str(&body)
            .map_err(|e| CompletionError::MalformedResponse(e.to_string()))?;

        let text = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| CompletionError::MalformedResponse("no choices".to_string()))?;

        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(CompletionError::EmptyCompletion);
        }
        Ok(trimmed.to_string())
    }
}
