//! Session state: the conversation history and its projection into
//! provider-facing chat turns.

use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::agent::{ChatTurn, TurnRole};
use crate::session::message::{ConversationMessage, MessageRole};

/// One conversation session: an append-only message history plus the model
/// key it was last driven by.
///
/// The working directory and auto-continuation settings are runtime state
/// owned by the controller, not part of the persisted session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Session identifier, also used as the persistence file stem.
    pub id: String,
    /// Key of the active model in the registry.
    pub model_key: String,
    /// Ordered conversation history.
    pub messages: Vec<ConversationMessage>,
}

impl Session {
    /// Creates an empty session with a timestamp-derived identifier.
    pub fn new(model_key: impl Into<String>) -> Self {
        Self {
            id: format!("conversation_{}", Local::now().format("%Y%m%d_%H%M%S")),
            model_key: model_key.into(),
            messages: Vec::new(),
        }
    }

    /// Appends a message stamped with the current time and returns it.
    pub fn push(&mut self, role: MessageRole, content: impl Into<String>) -> &ConversationMessage {
        self.messages.push(ConversationMessage::now(role, content));
        self.messages.last().expect("just pushed")
    }

    /// Projects the history into provider-facing chat turns.
    ///
    /// User entries map to user turns, assistant entries to assistant turns,
    /// and system entries (tool results) to user turns carrying a `SYSTEM:`
    /// prefix so the primary model can tell them apart. Raw interpreter
    /// output and error entries stay in the record but are not replayed.
    pub fn to_turns(&self) -> Vec<ChatTurn> {
        self.messages
            .iter()
            .filter_map(|msg| match msg.role {
                MessageRole::User => Some(ChatTurn {
                    role: TurnRole::User,
                    content: msg.content.clone(),
                }),
                MessageRole::Assistant => Some(ChatTurn {
                    role: TurnRole::Assistant,
                    content: msg.content.clone(),
                }),
                MessageRole::System => Some(ChatTurn {
                    role: TurnRole::User,
                    content: format!("SYSTEM: {}", msg.content),
                }),
                MessageRole::Tool | MessageRole::Error => None,
            })
            .collect()
    }

    /// First user message, shortened, for session listings.
    pub fn preview(&self) -> String {
        let first = self
            .messages
            .iter()
            .find(|m| m.role == MessageRole::User)
            .map(|m| m.content.as_str())
            .unwrap_or("No content");
        if first.chars().count() > 50 {
            let cut: String = first.chars().take(50).collect();
            format!("{cut}...")
        } else {
            first.to_string()
        }
    }
}

/// Auto-continuation policy: how many consecutive tool round-trips may run
/// without a human checkpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoContinue {
    /// Whether unattended round-trips are permitted at all.
    pub enabled: bool,
    /// Maximum consecutive round-trips before a checkpoint.
    pub max_rounds: u32,
}

impl Default for AutoContinue {
    fn default() -> Self {
        Self {
            enabled: true,
            max_rounds: 3,
        }
    }
}

/// The conversation loop's state machine.
///
/// The controller suspends only while awaiting human input
/// (`AwaitingUserInput`, `AwaitingHumanCheckpoint`) or a completion
/// response; every other transition is driven synchronously.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoopState {
    /// Blocked on the next line from the user.
    AwaitingUserInput,
    /// A completion call to the primary model is due.
    AwaitingModelResponse,
    /// The last model reply carried the trigger tag; a tool round-trip is
    /// due, subject to the auto-continuation policy.
    ToolInvocationPending,
    /// Auto-continuation is exhausted or disabled; blocked on a human
    /// interjection before the tool round-trip proceeds.
    AwaitingHumanCheckpoint,
    /// The session is over.
    Ended,
}
