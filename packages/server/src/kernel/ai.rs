//! Completion service client.
//!
//! Talks to an OpenAI-compatible chat-completions endpoint; the base URL is
//! configurable so Gemini's compatibility layer (the default) or any other
//! provider can sit behind it. Two calls are supported: plain chat completion
//! (query condensation) and schema-constrained structured output
//! (classification).

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use super::traits::BaseCompletions;

/// Per-request timeout; a timed-out call surfaces as a network failure and
/// is mapped to the calling stage's "unavailable" error.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Result type for completion client operations.
pub type CompletionsResult<T> = std::result::Result<T, CompletionsError>;

/// Completion client errors. The calling stage maps these onto the pipeline
/// taxonomy (condensation vs. classification fail differently upstream).
#[derive(Debug, Error)]
pub enum CompletionsError {
    /// Connection failed or timed out
    #[error("network error: {0}")]
    Network(String),

    /// Non-2xx response from the completion service
    #[error("API error: {0}")]
    Api(String),

    /// Response body was not in the expected envelope
    #[error("parse error: {0}")]
    Parse(String),
}

/// Chat message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Role: "system" or "user"
    pub role: String,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Plain chat completion request.
#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
}

/// Structured output request with JSON schema.
#[derive(Debug, Serialize)]
pub struct StructuredRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub response_format: ResponseFormat,
}

impl StructuredRequest {
    pub fn new(
        model: impl Into<String>,
        system: impl Into<String>,
        user: impl Into<String>,
        schema_name: impl Into<String>,
        schema: serde_json::Value,
    ) -> Self {
        Self {
            model: model.into(),
            messages: vec![Message::system(system), Message::user(user)],
            response_format: ResponseFormat {
                format_type: "json_schema".to_string(),
                json_schema: JsonSchemaFormat {
                    name: schema_name.into(),
                    strict: true,
                    schema,
                },
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ResponseFormat {
    #[serde(rename = "type")]
    pub format_type: String,
    pub json_schema: JsonSchemaFormat,
}

#[derive(Debug, Serialize)]
pub struct JsonSchemaFormat {
    pub name: String,
    pub strict: bool,
    pub schema: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct ChatResponseRaw {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Debug, Deserialize)]
struct ChatMessageResponse {
    content: String,
}

/// OpenAI-compatible completion client.
#[derive(Clone)]
pub struct OpenAIClient {
    http_client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl OpenAIClient {
    /// Create a new client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: "https://api.openai.com/v1".to_string(),
        }
    }

    /// Set a custom base URL (Gemini compatibility layer, proxies, etc.).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    async fn chat_completions<R: Serialize>(&self, request: &R) -> CompletionsResult<String> {
        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .timeout(REQUEST_TIMEOUT)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "completion request failed");
                CompletionsError::Network(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = %status, error = %error_text, "completion API error");
            return Err(CompletionsError::Api(format!("{}: {}", status, error_text)));
        }

        let chat_response: ChatResponseRaw = response
            .json()
            .await
            .map_err(|e| CompletionsError::Parse(e.to_string()))?;

        chat_response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| CompletionsError::Api("no choices in completion response".into()))
    }
}

#[async_trait]
impl BaseCompletions for OpenAIClient {
    async fn complete(&self, model: &str, system: &str, user: &str) -> CompletionsResult<String> {
        let start = std::time::Instant::now();
        let request = ChatRequest {
            model: model.to_string(),
            messages: vec![Message::system(system), Message::user(user)],
        };

        let content = self.chat_completions(&request).await?;

        debug!(
            model = model,
            duration_ms = start.elapsed().as_millis(),
            response_length = content.len(),
            "chat completion"
        );
        Ok(content)
    }

    async fn complete_structured(
        &self,
        model: &str,
        system: &str,
        user: &str,
        schema_name: &str,
        schema: serde_json::Value,
    ) -> CompletionsResult<String> {
        let start = std::time::Instant::now();
        let request = StructuredRequest::new(model, system, user, schema_name, schema);

        let content = self.chat_completions(&request).await?;

        debug!(
            model = model,
            duration_ms = start.elapsed().as_millis(),
            response_length = content.len(),
            "structured completion"
        );
        Ok(content)
    }
}
