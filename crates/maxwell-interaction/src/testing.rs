//! Scripted completion backend for unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use maxwell_core::agent::{ChatTurn, CompletionBackend};
use maxwell_core::{MaxwellError, Result};

/// One recorded `complete` call, for asserting on what a component sent.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub turns: Vec<ChatTurn>,
    pub system_prompt: String,
    pub temperature: f32,
}

/// Backend that replays a scripted queue of replies and records every call.
/// An exhausted queue is a test bug and panics.
pub struct MockBackend {
    replies: Mutex<VecDeque<Result<String>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockBackend {
    pub fn with_replies<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: Mutex::new(replies.into_iter().map(|r| Ok(r.into())).collect()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Backend whose next reply is a transport error.
    pub fn failing(message: &str) -> Self {
        Self {
            replies: Mutex::new(VecDeque::from([Err(MaxwellError::transport(
                "mock", message,
            ))])),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionBackend for MockBackend {
    fn provider(&self) -> &str {
        "mock"
    }

    async fn complete(
        &self,
        turns: &[ChatTurn],
        system_prompt: &str,
        temperature: f32,
        _max_tokens: u32,
    ) -> Result<String> {
        self.calls.lock().unwrap().push(RecordedCall {
            turns: turns.to_vec(),
            system_prompt: system_prompt.to_string(),
            temperature,
        });
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .expect("MockBackend reply queue exhausted")
    }
}
