//! Completion client. The single point of entry for calls to the external
//! completion service; no other module talks to the network.
//!
//! Each call is exactly one attempt. The customization engine treats any
//! failure as a per-section fallback trigger, so retrying here would only
//! hide the branch the engine is built around.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::config::Config;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("completion service returned empty content")]
    EmptyContent,
}

/// One generated completion plus the service's usage accounting.
#[derive(Debug, Clone)]
pub struct Completion {
    pub text: String,
    pub usage: Usage,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

/// Seam for the completion dependency so the customization engine can be
/// driven by a scripted client in tests.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, prompt: &str, system: &str) -> Result<Completion, TransportError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<ApiUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiUsage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Client for an OpenAI-compatible chat completion endpoint.
#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl OpenAiClient {
    pub fn new(api_key: String, config: &Config) -> Result<Self, TransportError> {
        let client = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self {
            client,
            base_url: config.openai_base_url.trim_end_matches('/').to_string(),
            api_key,
            model: config.openai_model.clone(),
            max_tokens: config.ai_max_tokens,
            temperature: config.ai_temperature,
        })
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(&self, prompt: &str, system: &str) -> Result<Completion, TransportError> {
        let request_body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = error_message_from_body(&body).unwrap_or(body);
            return Err(TransportError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: ChatResponse = response.json().await?;
        let usage = parsed
            .usage
            .map(|u| Usage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
            })
            .unwrap_or_default();

        let text = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|t| !t.trim().is_empty())
            .ok_or(TransportError::EmptyContent)?;

        debug!(
            prompt_tokens = usage.prompt_tokens,
            completion_tokens = usage.completion_tokens,
            "completion call succeeded"
        );

        Ok(Completion { text, usage })
    }
}

fn error_message_from_body(body: &str) -> Option<String> {
    serde_json::from_str::<ApiError>(body)
        .ok()
        .map(|e| e.error.message)
}

/// Strips ```lang ... ``` or ``` ... ``` code fences models sometimes wrap
/// their output in.
pub fn strip_code_fences(text: &str) -> &str {
    let text = text.trim();
    let Some(stripped) = text.strip_prefix("```") else {
        return text;
    };
    let stripped = match stripped.find('\n') {
        Some(i) => &stripped[i + 1..],
        None => stripped.trim_start(),
    };
    stripped
        .strip_suffix("```")
        .map(str::trim)
        .unwrap_or_else(|| stripped.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_code_fences_with_language_tag() {
        let input = "```text\n- bullet one\n- bullet two\n```";
        assert_eq!(strip_code_fences(input), "- bullet one\n- bullet two");
    }

    #[test]
    fn test_strip_code_fences_without_tag() {
        let input = "```\n- bullet one\n```";
        assert_eq!(strip_code_fences(input), "- bullet one");
    }

    #[test]
    fn test_strip_code_fences_no_fences() {
        let input = "- bullet one\n- bullet two";
        assert_eq!(strip_code_fences(input), "- bullet one\n- bullet two");
    }

    #[test]
    fn test_chat_response_parses_content_and_usage() {
        let body = r#"{
            "choices": [{"message": {"role": "assistant", "content": "rewritten text"}}],
            "usage": {"prompt_tokens": 120, "completion_tokens": 40, "total_tokens": 160}
        }"#;
        let parsed: ChatResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.choices[0].message.content.as_deref(), Some("rewritten text"));
        let usage = parsed.usage.unwrap();
        assert_eq!(usage.prompt_tokens, 120);
        assert_eq!(usage.completion_tokens, 40);
    }

    #[test]
    fn test_chat_response_tolerates_missing_usage() {
        let body = r#"{"choices": [{"message": {"content": "ok"}}]}"#;
        let parsed: ChatResponse = serde_json::from_str(body).unwrap();
        assert!(parsed.usage.is_none());
    }

    #[test]
    fn test_error_message_extraction() {
        let body = r#"{"error": {"message": "Incorrect API key provided", "type": "invalid_request_error"}}"#;
        assert_eq!(
            error_message_from_body(body).as_deref(),
            Some("Incorrect API key provided")
        );
        assert!(error_message_from_body("not json").is_none());
    }

    #[test]
    fn test_chat_request_serialization() {
        let request = ChatRequest {
            model: "gpt-4o-mini",
            messages: vec![
                ChatMessage { role: "system", content: "system prompt" },
                ChatMessage { role: "user", content: "user prompt" },
            ],
            max_tokens: 1000,
            temperature: 0.7,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "gpt-4o-mini");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "user prompt");
        assert_eq!(json["max_tokens"], 1000);
    }
}
