//! Secret configuration file storage.
//!
//! Provides loading of provider credentials from `~/.config/maxwell/secret.json`.

use std::path::PathBuf;

use maxwell_core::config::SecretConfig;
use maxwell_core::{MaxwellError, Result};

use crate::paths::MaxwellPaths;

/// Storage for the secret configuration file (`secret.json`).
///
/// Responsibilities:
/// - Load secret.json and parse it into the [`SecretConfig`] model
/// - Report missing or invalid files as errors
///
/// Does NOT write or modify secret files; runtime key changes made through
/// the `/key` directive stay in memory for the session.
///
/// # Security Note
///
/// The file is plaintext JSON; [`MaxwellPaths::ensure_secret_file`] creates
/// it with 600 permissions.
pub struct SecretStorage {
    path: PathBuf,
}

impl SecretStorage {
    /// Creates a storage pointing at the default path.
    pub fn new() -> Result<Self> {
        Ok(Self {
            path: MaxwellPaths::secret_file()?,
        })
    }

    /// Creates a storage with a custom path (for testing).
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Loads the secret configuration from the JSON file.
    pub fn load(&self) -> Result<SecretConfig> {
        if !self.path.exists() {
            return Err(MaxwellError::not_found(
                "secret file",
                self.path.display().to_string(),
            ));
        }

        let content = std::fs::read_to_string(&self.path)?;
        let config = serde_json::from_str(&content)?;

        Ok(config)
    }

    /// Returns the path to the secret file.
    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_nonexistent_file() {
        let temp_dir = TempDir::new().unwrap();
        let storage = SecretStorage::with_path(temp_dir.path().join("secret.json"));

        let result = storage.load();
        assert!(matches!(result, Err(MaxwellError::NotFound { .. })));
    }

    #[test]
    fn test_load_valid_json() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("secret.json");

        let json_content = r#"{
            "anthropic": {
                "api_key": "test-key-123",
                "model_name": "claude-3-5-sonnet-latest"
            }
        }"#;
        fs::write(&file_path, json_content).unwrap();

        let storage = SecretStorage::with_path(file_path);
        let config = storage.load().unwrap();

        assert_eq!(config.key_for("anthropic"), Some("test-key-123"));
        assert_eq!(config.key_for("openai"), None);
    }

    #[test]
    fn test_load_invalid_json() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("secret.json");
        fs::write(&file_path, r#"{ invalid json"#).unwrap();

        let storage = SecretStorage::with_path(file_path);
        let result = storage.load();

        assert!(matches!(
            result,
            Err(MaxwellError::Serialization { .. })
        ));
    }
}
