//! On-disk session persistence.
//!
//! One pretty-printed JSON file per conversation under the sessions
//! directory, listable with enough metadata to offer resume-at-startup.

use std::path::PathBuf;

use maxwell_core::session::Session;
use maxwell_core::{MaxwellError, Result};

/// Summary of a stored session for the startup picker.
#[derive(Debug, Clone)]
pub struct SessionSummary {
    pub id: String,
    pub model_key: String,
    pub preview: String,
}

/// File-backed session repository.
pub struct FileSessionStore {
    dir: PathBuf,
}

impl FileSessionStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Persists the full session, creating the directory if needed.
    pub fn save(&self, session: &Session) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(format!("{}.json", session.id));
        let json = serde_json::to_string_pretty(session)?;
        std::fs::write(&path, json)?;
        Ok(path)
    }

    /// Loads a session by identifier.
    pub fn load(&self, id: &str) -> Result<Session> {
        let path = self.dir.join(format!("{id}.json"));
        if !path.exists() {
            return Err(MaxwellError::not_found("session", id));
        }
        let content = std::fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Lists stored sessions, oldest first by identifier.
    ///
    /// Unreadable files are skipped; a corrupt session should not block
    /// starting a new one.
    pub fn list(&self) -> Result<Vec<SessionSummary>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }
        let mut summaries = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Ok(content) = std::fs::read_to_string(&path) else {
                continue;
            };
            match serde_json::from_str::<Session>(&content) {
                Ok(session) => summaries.push(SessionSummary {
                    id: session.id.clone(),
                    model_key: session.model_key.clone(),
                    preview: session.preview(),
                }),
                Err(err) => {
                    tracing::warn!(path = %path.display(), %err, "skipping unreadable session");
                }
            }
        }
        summaries.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(summaries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maxwell_core::session::MessageRole;
    use tempfile::TempDir;

    #[test]
    fn test_save_and_load_round_trip() {
        let temp = TempDir::new().unwrap();
        let store = FileSessionStore::new(temp.path().join("sessions"));

        let mut session = Session::new("1");
        session.push(MessageRole::User, "hello");
        session.push(MessageRole::Assistant, "hi there");

        store.save(&session).unwrap();
        let loaded = store.load(&session.id).unwrap();
        assert_eq!(loaded.messages, session.messages);
        assert_eq!(loaded.model_key, "1");
    }

    #[test]
    fn test_load_missing_session() {
        let temp = TempDir::new().unwrap();
        let store = FileSessionStore::new(temp.path());
        assert!(store.load("nope").unwrap_err().is_not_found());
    }

    #[test]
    fn test_list_skips_corrupt_files() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("sessions");
        let store = FileSessionStore::new(&dir);

        let mut session = Session::new("2");
        session.push(MessageRole::User, "preview me");
        store.save(&session).unwrap();
        std::fs::write(dir.join("broken.json"), "{ not json").unwrap();

        let listing = store.list().unwrap();
        assert_eq!(listing.len(), 1);
        assert_eq!(listing[0].preview, "preview me");
        assert_eq!(listing[0].model_key, "2");
    }

    #[test]
    fn test_list_empty_when_dir_missing() {
        let temp = TempDir::new().unwrap();
        let store = FileSessionStore::new(temp.path().join("never_created"));
        assert!(store.list().unwrap().is_empty());
    }
}
