//! The completion capability every provider implements.
//!
//! The conversation loop is agnostic to how a provider shapes its request
//! payload (top-level system field vs. prepended system message); it only
//! relies on this trait's normalized contract: turns in, text out, failures
//! as [`MaxwellError::Transport`](crate::MaxwellError::Transport).

use async_trait::async_trait;

use crate::error::Result;

/// The role of one turn as sent over the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnRole {
    User,
    Assistant,
}

impl TurnRole {
    /// The wire name shared by all supported providers.
    pub fn as_str(&self) -> &'static str {
        match self {
            TurnRole::User => "user",
            TurnRole::Assistant => "assistant",
        }
    }
}

/// One chat turn in a completion request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTurn {
    pub role: TurnRole,
    pub content: String,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Assistant,
            content: content.into(),
        }
    }
}

/// A blocking-per-call completion capability.
///
/// Implementations marshal the turns and system prompt into their provider's
/// wire shape, perform exactly one HTTP round-trip (no retries), and return
/// the response text. Any failure surfaces as an error rather than a panic
/// or an opaque value.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Short provider label used in error messages and key reporting.
    fn provider(&self) -> &str;

    /// Requests one completion for the given history.
    async fn complete(
        &self,
        turns: &[ChatTurn],
        system_prompt: &str,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String>;
}
