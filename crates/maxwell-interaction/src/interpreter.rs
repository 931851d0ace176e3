//! Tool-invocation mediator: trigger detection, the interpreter completion,
//! and dispatch of whatever commands come back.
//!
//! The interpreter call is the one place output is machine-parsed, so it
//! always runs at temperature 0.

use std::sync::Arc;

use maxwell_core::agent::{ChatTurn, CompletionBackend};
use maxwell_core::command::extract_commands;
use maxwell_core::Result;

use crate::executor::{CommandExecutor, ExecutionOutcome};
use crate::prompts::{INTERPRETER_SYSTEM_PROMPT, TOOL_TAG};

/// What a tool round-trip produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolOutcome {
    /// The interpreter's reply contained no parseable commands.
    NoCommands,
    /// A `pass` appeared in the batch: control returns to the user. Results
    /// from commands dispatched before the pass are carried along.
    Pass(String),
    /// Joined result strings, one line per dispatched command.
    Results(String),
}

/// The full record of one tool round-trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInvocation {
    /// Verbatim interpreter output, kept for the session record.
    pub raw_output: String,
    pub outcome: ToolOutcome,
}

/// Result line recorded when a `pass` ends the batch.
pub const PASS_RESULT: &str = "Pass control back to user";

/// Result line recorded when the interpreter emits no commands.
pub const NO_COMMANDS_RESULT: &str = "No valid commands found in response.";

/// Whether a message requests a tool round-trip.
pub fn contains_trigger(text: &str) -> bool {
    text.contains(TOOL_TAG)
}

/// The instruction text handed to the interpreter: everything after the
/// first trigger tag, or the whole message when nothing follows the tag.
pub fn instruction_payload(text: &str) -> &str {
    match text.split_once(TOOL_TAG) {
        Some((_, rest)) if !rest.trim().is_empty() => rest.trim(),
        _ => text.trim(),
    }
}

/// Runs the interpreter model over trigger-tagged messages and dispatches
/// the resulting commands in parse order.
pub struct ToolMediator {
    interpreter: Arc<dyn CompletionBackend>,
    max_tokens: u32,
}

impl ToolMediator {
    pub fn new(interpreter: Arc<dyn CompletionBackend>, max_tokens: u32) -> Self {
        Self {
            interpreter,
            max_tokens,
        }
    }

    /// One full round-trip: interpreter completion, parse, dispatch.
    ///
    /// Only the completion call itself can fail; every dispatch problem is
    /// already a result string inside the outcome.
    pub async fn run(
        &self,
        executor: &mut CommandExecutor,
        message: &str,
    ) -> Result<ToolInvocation> {
        let payload = instruction_payload(message);
        let turns = [ChatTurn::user(payload)];
        let raw_output = self
            .interpreter
            .complete(&turns, INTERPRETER_SYSTEM_PROMPT, 0.0, self.max_tokens)
            .await?;

        let commands = extract_commands(&raw_output);
        if commands.is_empty() {
            tracing::debug!("interpreter reply contained no commands");
            return Ok(ToolInvocation {
                raw_output,
                outcome: ToolOutcome::NoCommands,
            });
        }

        let mut results = Vec::with_capacity(commands.len());
        let mut passed = false;
        for command in &commands {
            match executor.execute(command).await {
                ExecutionOutcome::Output(result) => results.push(result),
                ExecutionOutcome::Pass => {
                    results.push(PASS_RESULT.to_string());
                    passed = true;
                }
            }
        }

        let joined = results.join("\n");
        let outcome = if passed {
            ToolOutcome::Pass(joined)
        } else {
            ToolOutcome::Results(joined)
        };
        Ok(ToolInvocation { raw_output, outcome })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockBackend;
    use maxwell_infrastructure::{CalendarStore, FileWorkspace, NoteLog};
    use tempfile::TempDir;

    fn executor(temp: &TempDir) -> CommandExecutor {
        CommandExecutor::new(
            FileWorkspace::new(temp.path()),
            CalendarStore::open(temp.path().join("cal.txt")),
            NoteLog::new(temp.path().join("notes.txt")),
            Arc::new(MockBackend::with_replies(["summary"])),
            2048,
        )
    }

    #[test]
    fn test_trigger_detection() {
        assert!(contains_trigger("@tool list my files"));
        assert!(contains_trigger("I will now use @tool to check the time"));
        assert!(!contains_trigger("no trigger here"));
    }

    #[test]
    fn test_instruction_payload_takes_remainder() {
        assert_eq!(
            instruction_payload("@tool write hello to f.txt"),
            "write hello to f.txt"
        );
        assert_eq!(
            instruction_payload("Sure. @tool read notes.txt please"),
            "read notes.txt please"
        );
        // Nothing after the tag: fall back to the whole message.
        assert_eq!(
            instruction_payload("please run the @tool"),
            "please run the @tool"
        );
    }

    #[tokio::test]
    async fn test_run_dispatches_in_order_and_joins_results() {
        let temp = TempDir::new().unwrap();
        let mut ex = executor(&temp);
        let interpreter = Arc::new(MockBackend::with_replies([concat!(
            "<command name=\"write\">\n",
            "    <arg name=\"text\">hello</arg>\n",
            "    <arg name=\"filename\">f.txt</arg>\n",
            "</command>\n",
            "<command name=\"read\">\n",
            "    <arg name=\"filename\">f.txt</arg>\n",
            "</command>",
        )]));
        let mediator = ToolMediator::new(interpreter.clone(), 2048);

        let invocation = mediator
            .run(&mut ex, "@tool write hello to f.txt then read it")
            .await
            .unwrap();
        assert_eq!(
            invocation.outcome,
            ToolOutcome::Results("Wrote to 'f.txt'\nhello".to_string())
        );

        // The interpreter call is deterministic and carries the payload.
        let calls = interpreter.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].temperature, 0.0);
        assert_eq!(calls[0].turns[0].content, "write hello to f.txt then read it");
    }

    #[tokio::test]
    async fn test_run_with_no_commands() {
        let temp = TempDir::new().unwrap();
        let mut ex = executor(&temp);
        let interpreter = Arc::new(MockBackend::with_replies([
            "I could not determine a command for that.",
        ]));
        let mediator = ToolMediator::new(interpreter, 2048);

        let invocation = mediator.run(&mut ex, "@tool do something vague").await.unwrap();
        assert_eq!(invocation.outcome, ToolOutcome::NoCommands);
        assert_eq!(invocation.raw_output, "I could not determine a command for that.");
    }

    #[tokio::test]
    async fn test_pass_makes_batch_terminal() {
        let temp = TempDir::new().unwrap();
        let mut ex = executor(&temp);
        let interpreter = Arc::new(MockBackend::with_replies([
            "<command name=\"pass\">\n</command>",
        ]));
        let mediator = ToolMediator::new(interpreter, 2048);

        let invocation = mediator
            .run(&mut ex, "For example, this uses \"@tool\" to call the assistant.")
            .await
            .unwrap();
        assert_eq!(invocation.outcome, ToolOutcome::Pass(PASS_RESULT.to_string()));
    }

    #[tokio::test]
    async fn test_interpreter_failure_propagates() {
        let temp = TempDir::new().unwrap();
        let mut ex = executor(&temp);
        let mediator = ToolMediator::new(Arc::new(MockBackend::failing("boom")), 2048);
        assert!(mediator.run(&mut ex, "@tool anything").await.is_err());
    }
}
