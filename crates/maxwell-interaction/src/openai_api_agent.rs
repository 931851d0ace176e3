//! OpenAIApiAgent - Chat Completions API implementation.
//!
//! Wire shape: the system prompt is prepended to the message list as a
//! `system` role message. DeepSeek exposes the same wire contract, so the
//! same agent serves it with a different base URL and provider label.

use async_trait::async_trait;
use maxwell_core::agent::{ChatTurn, CompletionBackend};
use maxwell_core::{MaxwellError, Result};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

const OPENAI_BASE_URL: &str = "https://api.openai.com/v1/chat/completions";
const DEEPSEEK_BASE_URL: &str = "https://api.deepseek.com/chat/completions";

/// Completion backend for OpenAI-compatible chat completion APIs.
#[derive(Clone)]
pub struct OpenAIApiAgent {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    provider_label: &'static str,
}

impl OpenAIApiAgent {
    /// Creates a new agent against the OpenAI endpoint.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            base_url: OPENAI_BASE_URL.to_string(),
            provider_label: "openai",
        }
    }

    /// Creates an agent against the DeepSeek endpoint, which speaks the
    /// same wire format.
    pub fn deepseek(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            base_url: DEEPSEEK_BASE_URL.to_string(),
            provider_label: "deepseek",
        }
    }

    async fn send_request(&self, body: &ChatCompletionRequest) -> Result<String> {
        let response = self
            .client
            .post(&self.base_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|err| {
                MaxwellError::transport(self.provider_label, format!("request failed: {err}"))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            return Err(map_http_error(self.provider_label, status, body_text));
        }

        let parsed: ChatCompletionResponse = response.json().await.map_err(|err| {
            MaxwellError::transport(
                self.provider_label,
                format!("failed to parse response: {err}"),
            )
        })?;

        extract_text_response(self.provider_label, parsed)
    }
}

#[async_trait]
impl CompletionBackend for OpenAIApiAgent {
    fn provider(&self) -> &str {
        self.provider_label
    }

    async fn complete(
        &self,
        turns: &[ChatTurn],
        system_prompt: &str,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String> {
        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: build_messages(system_prompt, turns),
            temperature,
            max_tokens,
        };

        self.send_request(&request).await
    }
}

/// Prepends the system prompt as a system-role message.
fn build_messages(system_prompt: &str, turns: &[ChatTurn]) -> Vec<WireMessage> {
    let mut messages = Vec::with_capacity(turns.len() + 1);
    messages.push(WireMessage {
        role: "system",
        content: system_prompt.to_string(),
    });
    for turn in turns {
        messages.push(WireMessage {
            role: turn.role.as_str(),
            content: turn.content.clone(),
        });
    }
    messages
}

#[derive(Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<WireMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct WireMessage {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
    #[allow(dead_code)]
    r#type: Option<String>,
    #[allow(dead_code)]
    code: Option<String>,
}

fn extract_text_response(provider: &str, response: ChatCompletionResponse) -> Result<String> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| MaxwellError::transport(provider, "API returned no content in the response"))
}

fn map_http_error(provider: &str, status: StatusCode, body: String) -> MaxwellError {
    let message = serde_json::from_str::<ErrorResponse>(&body)
        .map(|wrapper| wrapper.error.message)
        .unwrap_or(body);
    MaxwellError::transport(provider, format!("HTTP {}: {}", status.as_u16(), message))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_message_prepended() {
        let messages = build_messages("be helpful", &[ChatTurn::user("hi")]);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, "system");
        assert_eq!(messages[0].content, "be helpful");
        assert_eq!(messages[1].role, "user");
    }

    #[test]
    fn test_deepseek_uses_same_wire_shape() {
        let agent = OpenAIApiAgent::deepseek("key", "deepseek-chat");
        assert_eq!(agent.provider(), "deepseek");
        assert_eq!(agent.base_url, DEEPSEEK_BASE_URL);
    }

    #[test]
    fn test_response_extraction() {
        let json = r#"{"choices":[{"message":{"content":"hello"}}]}"#;
        let parsed: ChatCompletionResponse = serde_json::from_str(json).unwrap();
        assert_eq!(extract_text_response("openai", parsed).unwrap(), "hello");

        let empty: ChatCompletionResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(extract_text_response("openai", empty).is_err());
    }
}
