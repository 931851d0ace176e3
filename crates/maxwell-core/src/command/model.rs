//! Command types for the tool mini-language.
//!
//! A [`Command`] is the parsed form of one `<command>` block emitted by the
//! interpreter model. [`CommandKind`] is the closed set of commands the
//! dispatcher understands, each with a declared arity.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single parsed command: a name and its positional arguments.
///
/// Argument attribute names from the wire format are not retained; only the
/// positional order of payloads is meaningful.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    /// Command name, lowercased by the parser.
    pub name: String,
    /// Positional argument payloads, surrounding whitespace trimmed.
    pub args: Vec<String>,
}

impl Command {
    /// Creates a command, normalizing the name to lowercase.
    pub fn new(name: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            name: name.into().to_lowercase(),
            args,
        }
    }

    /// Resolves the command name against the closed set of known kinds.
    pub fn kind(&self) -> Option<CommandKind> {
        CommandKind::from_name(&self.name)
    }

    /// Re-serializes this command into the wire grammar.
    ///
    /// Parsing the output yields the same `(name, args)` pair back, provided
    /// no argument payload itself contains a recognized tag form.
    pub fn to_wire(&self) -> String {
        let mut out = format!("<command name=\"{}\">", self.name);
        for (i, arg) in self.args.iter().enumerate() {
            out.push_str(&format!("\n    <arg name=\"arg{}\">{}</arg>", i + 1, arg));
        }
        out.push_str("\n</command>");
        out
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, self.args.join(", "))
    }
}

/// The number of arguments a command accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Exactly `n` arguments.
    Exact(usize),
    /// Between `min` and `max` arguments, inclusive.
    Range(usize, usize),
}

impl Arity {
    /// Returns true when `given` is an acceptable argument count.
    pub fn accepts(&self, given: usize) -> bool {
        match *self {
            Arity::Exact(n) => given == n,
            Arity::Range(min, max) => (min..=max).contains(&given),
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Arity::Exact(n) => write!(f, "exactly {n}"),
            Arity::Range(min, max) => write!(f, "{min} to {max}"),
        }
    }
}

/// The closed set of commands the dispatcher understands.
///
/// Using an enum rather than a name-keyed function table gives compile-time
/// exhaustiveness checking in the executor; an unrecognized name surfaces as
/// an "Unknown command" result string, not a missing table entry at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommandKind {
    /// Append text to a file, creating parent directories as needed.
    Write,
    /// Truncate-then-write a file, creating parent directories as needed.
    Overwrite,
    /// Read a file's contents.
    Read,
    /// Summarize a file's contents via a completion call.
    Summarize,
    /// List a directory (defaults to the working directory).
    Ls,
    /// Create a directory and its parents.
    Mkdir,
    /// Change the working directory and list its contents.
    Cd,
    /// Report the current local time.
    Time,
    /// Echo a message verbatim (no side effect).
    Say,
    /// Append a numbered, timestamped entry to the note log.
    LogNote,
    /// Add a calendar event.
    CalendarAdd,
    /// List calendar events for a date.
    CalendarGet,
    /// Delete calendar events matching a description on a date.
    CalendarDelete,
    /// Return control to the user without acting.
    Pass,
}

impl CommandKind {
    /// Looks up a kind by wire name, case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "write" => Some(Self::Write),
            "overwrite" => Some(Self::Overwrite),
            "read" => Some(Self::Read),
            "summarize" => Some(Self::Summarize),
            "ls" => Some(Self::Ls),
            "mkdir" => Some(Self::Mkdir),
            "cd" => Some(Self::Cd),
            "time" => Some(Self::Time),
            "say" => Some(Self::Say),
            "log_note" => Some(Self::LogNote),
            "calendar_add" => Some(Self::CalendarAdd),
            "calendar_get" => Some(Self::CalendarGet),
            "calendar_delete" => Some(Self::CalendarDelete),
            "pass" => Some(Self::Pass),
            _ => None,
        }
    }

    /// The wire name of this kind.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Write => "write",
            Self::Overwrite => "overwrite",
            Self::Read => "read",
            Self::Summarize => "summarize",
            Self::Ls => "ls",
            Self::Mkdir => "mkdir",
            Self::Cd => "cd",
            Self::Time => "time",
            Self::Say => "say",
            Self::LogNote => "log_note",
            Self::CalendarAdd => "calendar_add",
            Self::CalendarGet => "calendar_get",
            Self::CalendarDelete => "calendar_delete",
            Self::Pass => "pass",
        }
    }

    /// The argument count this kind accepts.
    pub fn arity(&self) -> Arity {
        match self {
            Self::Write | Self::Overwrite | Self::CalendarDelete => Arity::Exact(2),
            Self::Read | Self::Summarize | Self::Mkdir | Self::Cd | Self::Say | Self::LogNote
            | Self::CalendarGet => Arity::Exact(1),
            Self::Ls => Arity::Range(0, 1),
            Self::Time | Self::Pass => Arity::Exact(0),
            Self::CalendarAdd => Arity::Exact(4),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_is_case_insensitive() {
        assert_eq!(CommandKind::from_name("WRITE"), Some(CommandKind::Write));
        assert_eq!(
            CommandKind::from_name("Calendar_Add"),
            Some(CommandKind::CalendarAdd)
        );
        assert_eq!(CommandKind::from_name("frobnicate"), None);
    }

    #[test]
    fn test_arity_accepts() {
        assert!(CommandKind::Ls.arity().accepts(0));
        assert!(CommandKind::Ls.arity().accepts(1));
        assert!(!CommandKind::Ls.arity().accepts(2));
        assert!(CommandKind::CalendarAdd.arity().accepts(4));
        assert!(!CommandKind::CalendarAdd.arity().accepts(3));
        assert!(CommandKind::Pass.arity().accepts(0));
    }

    #[test]
    fn test_command_name_normalized() {
        let cmd = Command::new("Read", vec!["notes.txt".to_string()]);
        assert_eq!(cmd.name, "read");
        assert_eq!(cmd.kind(), Some(CommandKind::Read));
    }
}
