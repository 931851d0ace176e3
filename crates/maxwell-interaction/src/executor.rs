//! Command dispatch against the side-effect backends.
//!
//! Every failure mode here (unknown name, bad arity, malformed dates,
//! missing files, I/O errors) becomes a result *string*, never an error:
//! the string goes back into the conversation so the driving model can
//! react to it. One failing command never aborts the rest of a batch.

use std::sync::Arc;

use chrono::{Local, NaiveDate, NaiveTime};
use maxwell_core::agent::{ChatTurn, CompletionBackend};
use maxwell_core::command::{Command, CommandKind};
use maxwell_infrastructure::{CalendarStore, FileWorkspace, NoteLog};

use crate::prompts::{summarize_request, SUMMARIZE_SYSTEM_PROMPT};

/// The result of dispatching one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionOutcome {
    /// A normal result string to feed back into the conversation.
    Output(String),
    /// The interpreter explicitly declined to act; the loop returns control
    /// to the user instead of continuing.
    Pass,
}

/// Executes parsed commands against the file, calendar, and note backends.
///
/// Dispatch is sequential and order-preserving; there is no batching,
/// rollback, or interleaving.
pub struct CommandExecutor {
    workspace: FileWorkspace,
    calendar: CalendarStore,
    notes: NoteLog,
    summarizer: Arc<dyn CompletionBackend>,
    max_tokens: u32,
}

impl CommandExecutor {
    pub fn new(
        workspace: FileWorkspace,
        calendar: CalendarStore,
        notes: NoteLog,
        summarizer: Arc<dyn CompletionBackend>,
        max_tokens: u32,
    ) -> Self {
        Self {
            workspace,
            calendar,
            notes,
            summarizer,
            max_tokens,
        }
    }

    /// The workspace, for the `/cd` directive and status reporting.
    pub fn workspace(&self) -> &FileWorkspace {
        &self.workspace
    }

    pub fn workspace_mut(&mut self) -> &mut FileWorkspace {
        &mut self.workspace
    }

    /// Dispatches one command.
    pub async fn execute(&mut self, command: &Command) -> ExecutionOutcome {
        let Some(kind) = command.kind() else {
            return ExecutionOutcome::Output(format!("Unknown command: {}", command.name));
        };

        let arity = kind.arity();
        if !arity.accepts(command.args.len()) {
            return ExecutionOutcome::Output(format!(
                "Invalid arguments for '{}': expected {} argument(s), given {}: {:?}",
                command.name,
                arity,
                command.args.len(),
                command.args
            ));
        }

        tracing::debug!(command = %command, "dispatching");
        let args = &command.args;
        let output = match kind {
            CommandKind::Write => self.write(&args[0], &args[1], false),
            CommandKind::Overwrite => self.write(&args[0], &args[1], true),
            CommandKind::Read => self.read(&args[0]),
            CommandKind::Summarize => self.summarize(&args[0]).await,
            CommandKind::Ls => self.list(args.first().map(String::as_str)),
            CommandKind::Mkdir => self.mkdir(&args[0]),
            CommandKind::Cd => self.cd(&args[0]),
            CommandKind::Time => Local::now().format("%B %d, %Y %I:%M %p").to_string(),
            CommandKind::Say => args[0].clone(),
            CommandKind::LogNote => self.log_note(&args[0]),
            CommandKind::CalendarAdd => self.calendar_add(&args[0], &args[1], &args[2], &args[3]),
            CommandKind::CalendarGet => self.calendar_get(&args[0]),
            CommandKind::CalendarDelete => self.calendar_delete(&args[0], &args[1]),
            CommandKind::Pass => return ExecutionOutcome::Pass,
        };
        ExecutionOutcome::Output(output)
    }

    fn write(&self, text: &str, name: &str, overwrite: bool) -> String {
        if text.is_empty() || name.is_empty() {
            return "Error: text and filename must not be empty".to_string();
        }
        let result = if overwrite {
            self.workspace.overwrite_file(name, text)
        } else {
            self.workspace.append_file(name, text)
        };
        match result {
            Ok(()) if overwrite => format!("Overwrote '{name}'"),
            Ok(()) => format!("Wrote to '{name}'"),
            Err(e) => format!("Error: {e}"),
        }
    }

    fn read(&self, name: &str) -> String {
        match self.workspace.read_file(name) {
            Ok(content) => content,
            Err(e) if e.is_not_found() => format!("'{name}' not found"),
            Err(e) => format!("Error reading '{name}': {e}"),
        }
    }

    async fn summarize(&self, name: &str) -> String {
        let content = match self.workspace.read_file(name) {
            Ok(content) => content,
            Err(e) if e.is_not_found() => return format!("'{name}' not found"),
            Err(e) => return format!("Error reading '{name}': {e}"),
        };
        let turns = [ChatTurn::user(summarize_request(&content))];
        match self
            .summarizer
            .complete(&turns, SUMMARIZE_SYSTEM_PROMPT, 0.0, self.max_tokens)
            .await
        {
            Ok(summary) => summary,
            Err(e) => format!("Error summarizing '{name}': {e}"),
        }
    }

    fn list(&self, directory: Option<&str>) -> String {
        match self.workspace.list_directory(directory) {
            Ok(entries) => entries.join("\n"),
            Err(e) if e.is_not_found() => {
                let path = match directory {
                    Some(dir) if !dir.is_empty() => self.workspace.resolve(dir),
                    _ => self.workspace.working_dir().to_path_buf(),
                };
                format!("No files in '{}'", path.display())
            }
            Err(e) => format!("Error listing directory: {e}"),
        }
    }

    fn mkdir(&self, directory: &str) -> String {
        match self.workspace.make_directory(directory) {
            Ok(true) => format!("Created directory '{directory}'"),
            Ok(false) => format!("Directory '{directory}' already exists"),
            Err(e) => format!("Error creating directory '{directory}': {e}"),
        }
    }

    fn cd(&mut self, directory: &str) -> String {
        match self.workspace.change_directory(directory) {
            Ok(listing) => {
                let files = if listing.files.is_empty() {
                    "Files: None".to_string()
                } else {
                    format!("Files:\n{}", listing.files.join("\n"))
                };
                let dirs = if listing.dirs.is_empty() {
                    "Directories: None".to_string()
                } else {
                    format!("Directories:\n{}", listing.dirs.join("\n"))
                };
                format!(
                    "Changed directory to '{}'\n{files}\n{dirs}",
                    self.workspace.working_dir().display()
                )
            }
            Err(e) if e.is_not_found() => format!("Error: Directory '{directory}' does not exist"),
            Err(e) => format!("Error changing directory to '{directory}': {e}"),
        }
    }

    fn log_note(&self, note: &str) -> String {
        match self.notes.append(note) {
            Ok(entry_num) => format!("Logged as Entry {entry_num}"),
            Err(e) => format!("Error logging note: {e}"),
        }
    }

    fn calendar_add(&mut self, date: &str, event: &str, start: &str, stop: &str) -> String {
        let (Some(date), Some(start), Some(stop)) =
            (parse_date(date), parse_time(start), parse_time(stop))
        else {
            return "Invalid format. Use YYYY-MM-DD for date and HH:MM for times".to_string();
        };
        if start >= stop {
            return "Stop time must be after start time".to_string();
        }
        match self.calendar.add_event(date, event, start, stop) {
            Ok(()) => format!(
                "Added event '{event}' on {date} from {} to {}",
                start.format("%H:%M"),
                stop.format("%H:%M")
            ),
            Err(e) => format!("Error adding event: {e}"),
        }
    }

    fn calendar_get(&self, date: &str) -> String {
        let Some(date) = parse_date(date) else {
            return "Invalid date format. Use YYYY-MM-DD".to_string();
        };
        let events = self.calendar.events_for(date);
        if events.is_empty() {
            return format!("No events for {date}");
        }
        let formatted: Vec<String> = events
            .iter()
            .map(|e| {
                format!(
                    "{}-{}: {}",
                    e.start.format("%H:%M"),
                    e.stop.format("%H:%M"),
                    e.description
                )
            })
            .collect();
        format!("Events for {date}:\n{}", formatted.join("\n"))
    }

    fn calendar_delete(&mut self, date: &str, event: &str) -> String {
        let Some(date) = parse_date(date) else {
            return "Invalid date format. Use YYYY-MM-DD".to_string();
        };
        if !self.calendar.has_events(date) {
            return format!("No events found for {date}");
        }
        match self.calendar.delete_events(date, event) {
            Ok(0) => format!("Event '{event}' not found on {date}"),
            Ok(_) => format!("Deleted event '{event}' from {date}"),
            Err(e) => format!("Error deleting event: {e}"),
        }
    }
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

fn parse_time(s: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(s.trim(), "%H:%M").ok()
}
