//! Conversation sessions: messages, history, and loop state.

pub mod message;
pub mod model;

pub use message::{ConversationMessage, MessageRole};
pub use model::{AutoContinue, LoopState, Session};
