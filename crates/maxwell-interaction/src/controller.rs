//! The conversation loop: an explicit state machine over user input, primary
//! completions, tool round-trips, and human checkpoints.
//!
//! Auto-continuation bounds how many consecutive tool round-trips may run
//! unattended. When the budget runs out (or auto is off) the loop parks in
//! [`LoopState::AwaitingHumanCheckpoint`] until the user waves it through,
//! optionally interjecting a message that rides along with the tool result.

use std::sync::Arc;

use maxwell_core::agent::CompletionBackend;
use maxwell_core::session::{
    AutoContinue, ConversationMessage, LoopState, MessageRole, Session,
};

use crate::executor::CommandExecutor;
use crate::interpreter::{contains_trigger, ToolMediator, ToolOutcome, NO_COMMANDS_RESULT};
use crate::prompts::{END_SUMMARY_MESSAGE_PROMPT, PRIMARY_SYSTEM_PROMPT};

/// Drives one session: owns the history, the loop state, the round counter,
/// and the auto-continuation policy.
///
/// All completion failures are absorbed into error-kind history entries;
/// the loop itself never fails, it just returns control to the user.
pub struct SessionController {
    session: Session,
    state: LoopState,
    auto: AutoContinue,
    rounds_used: u32,
    /// The trigger-tagged message a pending tool round will interpret.
    pending_tool_text: Option<String>,
    /// Checkpoint interjection to append after the next tool result.
    pending_interjection: Option<String>,
    /// Set by a checkpoint release so the next gate check lets one tool
    /// round through even when auto is disabled.
    checkpoint_cleared: bool,
    primary: Arc<dyn CompletionBackend>,
    mediator: ToolMediator,
    executor: CommandExecutor,
    max_tokens: u32,
}

impl SessionController {
    pub fn new(
        session: Session,
        primary: Arc<dyn CompletionBackend>,
        mediator: ToolMediator,
        executor: CommandExecutor,
        auto: AutoContinue,
        max_tokens: u32,
    ) -> Self {
        Self {
            session,
            state: LoopState::AwaitingUserInput,
            auto,
            rounds_used: 0,
            pending_tool_text: None,
            pending_interjection: None,
            checkpoint_cleared: false,
            primary,
            mediator,
            executor,
            max_tokens,
        }
    }

    pub fn state(&self) -> &LoopState {
        &self.state
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn auto(&self) -> AutoContinue {
        self.auto
    }

    pub fn set_auto(&mut self, auto: AutoContinue) {
        self.auto = auto;
    }

    pub fn rounds_used(&self) -> u32 {
        self.rounds_used
    }

    pub fn executor(&self) -> &CommandExecutor {
        &self.executor
    }

    pub fn executor_mut(&mut self) -> &mut CommandExecutor {
        &mut self.executor
    }

    /// Swaps the primary model mid-session (the `/switch` directive).
    pub fn set_primary(&mut self, backend: Arc<dyn CompletionBackend>, model_key: &str) {
        self.primary = backend;
        self.session.model_key = model_key.to_string();
    }

    /// Accepts the next line of user input.
    ///
    /// Trigger-tagged input goes straight to a tool round-trip; anything
    /// else is queued for the primary model.
    pub fn submit_user_input(&mut self, text: &str) {
        self.session.push(MessageRole::User, text);
        self.rounds_used = 0;
        if contains_trigger(text) {
            self.pending_tool_text = Some(text.to_string());
            self.state = LoopState::ToolInvocationPending;
        } else {
            self.state = LoopState::AwaitingModelResponse;
        }
    }

    /// Releases a checkpoint: resets the round budget and lets the parked
    /// tool round proceed. A non-empty interjection is delivered to the
    /// model right after the tool result.
    pub fn submit_checkpoint(&mut self, interjection: &str) {
        if self.state != LoopState::AwaitingHumanCheckpoint {
            return;
        }
        self.rounds_used = 0;
        self.checkpoint_cleared = true;
        let trimmed = interjection.trim();
        if !trimmed.is_empty() {
            self.pending_interjection = Some(trimmed.to_string());
        }
        self.state = LoopState::ToolInvocationPending;
    }

    pub fn end(&mut self) {
        self.state = LoopState::Ended;
    }

    /// Drives the loop one step and returns the history entries it appended.
    ///
    /// In a blocked state (awaiting user input, a checkpoint, or after the
    /// session ended) this is a no-op returning an empty delta.
    pub async fn advance(&mut self) -> Vec<ConversationMessage> {
        let start = self.session.messages.len();
        match self.state {
            LoopState::AwaitingModelResponse => self.step_model_response().await,
            LoopState::ToolInvocationPending => self.step_tool_invocation().await,
            LoopState::AwaitingUserInput
            | LoopState::AwaitingHumanCheckpoint
            | LoopState::Ended => {}
        }
        self.session.messages[start..].to_vec()
    }

    async fn step_model_response(&mut self) {
        let turns = self.session.to_turns();
        match self
            .primary
            .complete(&turns, PRIMARY_SYSTEM_PROMPT, 0.0, self.max_tokens)
            .await
        {
            Ok(reply) => {
                let has_trigger = contains_trigger(&reply);
                self.session.push(MessageRole::Assistant, &reply);
                if has_trigger {
                    self.pending_tool_text = Some(reply);
                    self.state = LoopState::ToolInvocationPending;
                } else {
                    self.return_to_user();
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "primary completion failed");
                self.session.push(MessageRole::Error, err.to_string());
                self.return_to_user();
            }
        }
    }

    async fn step_tool_invocation(&mut self) {
        // Checkpoint gate: a fresh release always gets one round through.
        if !std::mem::take(&mut self.checkpoint_cleared)
            && (!self.auto.enabled || self.rounds_used >= self.auto.max_rounds)
        {
            self.state = LoopState::AwaitingHumanCheckpoint;
            return;
        }

        let text = self
            .pending_tool_text
            .take()
            .or_else(|| self.session.messages.last().map(|m| m.content.clone()))
            .unwrap_or_default();

        let invocation = match self.mediator.run(&mut self.executor, &text).await {
            Ok(invocation) => invocation,
            Err(err) => {
                tracing::warn!(error = %err, "interpreter completion failed");
                self.session.push(MessageRole::Error, err.to_string());
                self.return_to_user();
                return;
            }
        };

        self.session.push(MessageRole::Tool, &invocation.raw_output);
        match invocation.outcome {
            ToolOutcome::NoCommands => {
                // Not a real round: the budget is not consumed.
                self.session.push(MessageRole::System, NO_COMMANDS_RESULT);
                self.deliver_interjection();
                self.state = LoopState::AwaitingModelResponse;
            }
            ToolOutcome::Results(results) => {
                self.session.push(MessageRole::System, results);
                self.rounds_used += 1;
                self.deliver_interjection();
                self.state = LoopState::AwaitingModelResponse;
            }
            ToolOutcome::Pass(results) => {
                self.session.push(MessageRole::System, results);
                self.deliver_interjection();
                self.return_to_user();
            }
        }
    }

    fn deliver_interjection(&mut self) {
        if let Some(interjection) = self.pending_interjection.take() {
            self.session.push(MessageRole::User, interjection);
        }
    }

    fn return_to_user(&mut self) {
        self.rounds_used = 0;
        self.pending_interjection = None;
        self.state = LoopState::AwaitingUserInput;
    }

    /// One summarization completion over the whole history, appended as the
    /// closing assistant entry (the `/qs` directive).
    pub async fn summarize_for_quit(&mut self) -> maxwell_core::Result<String> {
        let mut turns = self.session.to_turns();
        turns.push(maxwell_core::agent::ChatTurn::user(
            END_SUMMARY_MESSAGE_PROMPT,
        ));
        let summary = self
            .primary
            .complete(&turns, PRIMARY_SYSTEM_PROMPT, 0.0, self.max_tokens)
            .await?;
        self.session.push(MessageRole::Assistant, &summary);
        Ok(summary)
    }
}
