//! Append-only numbered note log.
//!
//! One line per entry:
//!
//! ```text
//! N: Month DD, YYYY HH:MM:SS - text
//! ```
//!
//! The sequence number is the last entry's number plus one, read back from
//! the file at write time, so the log stays monotonically numbered across
//! process restarts. Single-writer; there is no deletion.

use std::path::PathBuf;

use chrono::Local;
use maxwell_core::Result;

/// Numbered, timestamped note log backed by a flat file.
#[derive(Debug, Clone)]
pub struct NoteLog {
    path: PathBuf,
}

impl NoteLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Appends one note line and returns its sequence number.
    pub fn append(&self, note: &str) -> Result<u64> {
        use std::io::Write;

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let entry_num = self.next_entry_number()?;
        let entry = format!(
            "{}: {} - {}\n",
            entry_num,
            Local::now().format("%B %d, %Y %H:%M:%S"),
            note
        );

        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(entry.as_bytes())?;

        Ok(entry_num)
    }

    /// Last entry's leading number plus one, defaulting to 1 for a new or
    /// unparseable log.
    fn next_entry_number(&self) -> Result<u64> {
        if !self.path.exists() {
            return Ok(1);
        }
        let content = std::fs::read_to_string(&self.path)?;
        let last = content
            .lines()
            .rev()
            .find(|line| !line.trim().is_empty())
            .and_then(|line| line.split(':').next())
            .and_then(|n| n.trim().parse::<u64>().ok());
        Ok(last.map(|n| n + 1).unwrap_or(1))
    }
}
