//! Inference backend: one multimodal request, one raw text reply.
//!
//! The seam is the [`VisionBackend`] trait so the orchestrator and its tests
//! never depend on a live endpoint. The production implementation,
//! [`OpenAiCompatBackend`], speaks the OpenAI chat-completions wire format,
//! which DashScope (and most vision-model hosts) expose in compatible mode.
//!
//! ## Message layout
//!
//! A single user turn with two content parts, image first:
//! 1. `image_url` — the page PNG as a base64 data-URL
//! 2. `text` — the task instruction
//!
//! No system message, no history: each invocation is one self-contained
//! turn. Sampling is deterministic (temperature 0) and nothing is retried —
//! a single backend failure is a single pipeline failure by contract.

use crate::config::ServiceConfig;
use crate::error::ExtractError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Sampling parameters for a single completion request.
#[derive(Debug, Clone, Copy)]
pub struct CompletionOptions {
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Interface to a vision-capable inference backend.
#[async_trait]
pub trait VisionBackend: Send + Sync {
    /// Submit one image + instruction turn and return the raw reply text.
    async fn complete(
        &self,
        image_data_url: &str,
        instruction: &str,
        options: CompletionOptions,
    ) -> Result<String, ExtractError>;
}

// ── Wire types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: Vec<ContentPart<'a>>,
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart<'a> {
    ImageUrl { image_url: ImageUrl<'a> },
    Text { text: &'a str },
}

#[derive(Serialize)]
struct ImageUrl<'a> {
    url: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

// ── Production backend ───────────────────────────────────────────────────

/// Backend speaking the OpenAI-compatible chat-completions protocol.
pub struct OpenAiCompatBackend {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl OpenAiCompatBackend {
    /// Build a backend from the service configuration.
    ///
    /// The credential and endpoint come in here and nowhere else — the
    /// backend never reads process environment or global state.
    pub fn new(config: &ServiceConfig) -> Result<Self, ExtractError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.api_timeout_secs))
            .build()
            .map_err(|e| ExtractError::Internal(format!("HTTP client build failed: {e}")))?;

        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        })
    }
}

#[async_trait]
impl VisionBackend for OpenAiCompatBackend {
    async fn complete(
        &self,
        image_data_url: &str,
        instruction: &str,
        options: CompletionOptions,
    ) -> Result<String, ExtractError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: vec![
                    ContentPart::ImageUrl {
                        image_url: ImageUrl {
                            url: image_data_url,
                        },
                    },
                    ContentPart::Text { text: instruction },
                ],
            }],
            temperature: options.temperature,
            max_tokens: options.max_tokens,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ExtractError::InferenceFailure {
                detail: format!("request failed: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("backend returned {status}: {body}");
            return Err(ExtractError::InferenceFailure {
                detail: format!("HTTP {status}: {body}"),
            });
        }

        let parsed: ChatResponse =
            response
                .json()
                .await
                .map_err(|e| ExtractError::InferenceFailure {
                    detail: format!("malformed response body: {e}"),
                })?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or(ExtractError::EmptyReply)?;

        debug!("backend reply: {} chars", content.len());
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServiceConfig;

    #[test]
    fn request_body_wire_format() {
        let request = ChatRequest {
            model: "qwen-vl-max",
            messages: vec![ChatMessage {
                role: "user",
                content: vec![
                    ContentPart::ImageUrl {
                        image_url: ImageUrl {
                            url: "data:image/png;base64,AAAA",
                        },
                    },
                    ContentPart::Text { text: "extract" },
                ],
            }],
            temperature: 0.0,
            max_tokens: 200,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "qwen-vl-max");
        assert_eq!(json["temperature"], 0.0);
        assert_eq!(json["max_tokens"], 200);
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"][0]["type"], "image_url");
        assert_eq!(
            json["messages"][0]["content"][0]["image_url"]["url"],
            "data:image/png;base64,AAAA"
        );
        assert_eq!(json["messages"][0]["content"][1]["type"], "text");
        assert_eq!(json["messages"][0]["content"][1]["text"], "extract");
    }

    #[test]
    fn response_body_parses() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"{\"weight\": 2.35}"}}]}"#;
        let parsed: ChatResponse = serde_json::from_str(body).unwrap();
        assert_eq!(
            parsed.choices[0].message.content.as_deref(),
            Some("{\"weight\": 2.35}")
        );
    }

    #[test]
    fn endpoint_joins_without_double_slash() {
        let config = ServiceConfig::builder()
            .api_key("sk-test")
            .base_url("https://example.com/v1/")
            .build()
            .unwrap();
        let backend = OpenAiCompatBackend::new(&config).unwrap();
        assert_eq!(backend.endpoint, "https://example.com/v1/chat/completions");
    }
}
