//! Unified path management for maxwell configuration and data files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/maxwell/           # Config directory
//! ├── config.toml              # Application configuration
//! ├── secret.json              # API keys
//! ├── calendar_events.txt      # Flat-file calendar store
//! ├── sessions/                # Persisted conversation histories
//! └── logs/                    # Numbered note logs
//! ```

use std::path::PathBuf;

use maxwell_core::config::{ProviderSecret, SecretConfig};
use maxwell_core::{MaxwellError, Result};

/// Unified path management for maxwell.
pub struct MaxwellPaths;

impl MaxwellPaths {
    /// Returns the maxwell configuration directory (e.g. `~/.config/maxwell/`).
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("maxwell"))
            .ok_or_else(|| MaxwellError::config("Cannot find home directory"))
    }

    /// Returns the path to the main configuration file.
    pub fn config_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Returns the path to the secrets file.
    pub fn secret_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("secret.json"))
    }

    /// Returns the path to the flat-file calendar store.
    pub fn calendar_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("calendar_events.txt"))
    }

    /// Returns the path to the sessions directory.
    pub fn sessions_dir() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("sessions"))
    }

    /// Returns the path to the note-log directory.
    pub fn logs_dir() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("logs"))
    }

    /// Ensures the secret file exists, creating it with a template if absent.
    ///
    /// The file is created with permissions 600 (user read/write only) on
    /// Unix systems.
    pub fn ensure_secret_file() -> Result<PathBuf> {
        let secret_path = Self::secret_file()?;

        if secret_path.exists() {
            return Ok(secret_path);
        }

        if let Some(parent) = secret_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let template = SecretConfig {
            anthropic: Some(ProviderSecret {
                api_key: String::new(),
                model_name: Some("claude-3-5-sonnet-latest".to_string()),
            }),
            openai: Some(ProviderSecret {
                api_key: String::new(),
                model_name: Some("gpt-4o".to_string()),
            }),
            deepseek: Some(ProviderSecret {
                api_key: String::new(),
                model_name: Some("deepseek-chat".to_string()),
            }),
        };

        let template_json = serde_json::to_string_pretty(&template)?;
        std::fs::write(&secret_path, template_json)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(&secret_path, permissions)?;
        }

        Ok(secret_path)
    }
}
