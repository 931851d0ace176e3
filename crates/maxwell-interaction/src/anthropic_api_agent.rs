//! AnthropicApiAgent - Direct REST API implementation for Claude models.
//!
//! Wire shape: the system prompt travels in a top-level `system` field and
//! the turn list must strictly alternate user/assistant, so adjacent
//! same-role turns from the history are merged before sending.

use async_trait::async_trait;
use maxwell_core::agent::{ChatTurn, CompletionBackend};
use maxwell_core::{MaxwellError, Result};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

const BASE_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Completion backend that talks to the Anthropic HTTP API.
#[derive(Clone)]
pub struct AnthropicApiAgent {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl AnthropicApiAgent {
    /// Creates a new agent with the provided API key and model.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            base_url: BASE_URL.to_string(),
        }
    }

    async fn send_request(&self, body: &CreateMessageRequest) -> Result<String> {
        let response = self
            .client
            .post(&self.base_url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|err| {
                MaxwellError::transport("anthropic", format!("request failed: {err}"))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            return Err(map_http_error(status, body_text));
        }

        let parsed: CreateMessageResponse = response.json().await.map_err(|err| {
            MaxwellError::transport("anthropic", format!("failed to parse response: {err}"))
        })?;

        extract_text_response(parsed)
    }
}

#[async_trait]
impl CompletionBackend for AnthropicApiAgent {
    fn provider(&self) -> &str {
        "anthropic"
    }

    async fn complete(
        &self,
        turns: &[ChatTurn],
        system_prompt: &str,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String> {
        let request = CreateMessageRequest {
            model: self.model.clone(),
            messages: merge_adjacent_turns(turns),
            max_tokens,
            temperature,
            system: system_prompt.to_string(),
        };

        self.send_request(&request).await
    }
}

/// Collapses adjacent same-role turns into single messages so the request
/// satisfies the API's alternation requirement.
fn merge_adjacent_turns(turns: &[ChatTurn]) -> Vec<WireMessage> {
    let mut merged: Vec<WireMessage> = Vec::new();
    for turn in turns {
        match merged.last_mut() {
            Some(last) if last.role == turn.role.as_str() => {
                last.content.push('\n');
                last.content.push_str(&turn.content);
            }
            _ => merged.push(WireMessage {
                role: turn.role.as_str(),
                content: turn.content.clone(),
            }),
        }
    }
    merged
}

#[derive(Serialize)]
struct CreateMessageRequest {
    model: String,
    messages: Vec<WireMessage>,
    max_tokens: u32,
    temperature: f32,
    system: String,
}

#[derive(Serialize)]
struct WireMessage {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct CreateMessageResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
#[serde(tag = "type")]
enum ContentBlock {
    #[serde(rename = "text")]
    Text { text: String },
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[allow(dead_code)]
    r#type: String,
    message: String,
}

fn extract_text_response(response: CreateMessageResponse) -> Result<String> {
    response
        .content
        .into_iter()
        .find_map(|block| match block {
            ContentBlock::Text { text } => Some(text),
        })
        .ok_or_else(|| {
            MaxwellError::transport("anthropic", "API returned no text in the response content")
        })
}

fn map_http_error(status: StatusCode, body: String) -> MaxwellError {
    let message = serde_json::from_str::<ErrorResponse>(&body)
        .map(|wrapper| wrapper.error.message)
        .unwrap_or(body);
    MaxwellError::transport("anthropic", format!("HTTP {}: {}", status.as_u16(), message))
}
