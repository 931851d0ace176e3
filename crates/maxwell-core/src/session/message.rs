//! Conversation message types.

use chrono::Local;
use serde::{Deserialize, Serialize};

/// Represents the role of a message in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    /// Message typed by the user.
    User,
    /// Message from the primary model.
    Assistant,
    /// Tool results and other system notices, injected back into the
    /// conversation as a distinguished pseudo-participant.
    System,
    /// Raw interpreter-model output (kept for the record, never sent back
    /// to the primary model).
    Tool,
    /// A caught failure, recorded so the next turn can react to it.
    Error,
}

/// A single entry in a conversation history.
///
/// The history is append-only during a session and may be persisted and
/// reloaded wholesale to resume a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationMessage {
    /// The role of the message sender.
    pub role: MessageRole,
    /// The content of the message.
    pub content: String,
    /// Timestamp when the message was created (`YYYY-MM-DD HH:MM:SS`).
    pub timestamp: String,
}

impl ConversationMessage {
    /// Creates a message stamped with the current local time.
    pub fn now(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}
