//! Application configuration file storage.

use std::path::PathBuf;

use maxwell_core::config::Config;
use maxwell_core::Result;

use crate::paths::MaxwellPaths;

/// Storage for `config.toml`.
///
/// A missing file yields the default configuration; an unreadable or
/// malformed file is a startup error rather than silently ignored.
pub struct ConfigStorage {
    path: PathBuf,
}

impl ConfigStorage {
    /// Creates a storage pointing at the default path.
    pub fn new() -> Result<Self> {
        Ok(Self {
            path: MaxwellPaths::config_file()?,
        })
    }

    /// Creates a storage with a custom path (for testing).
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Loads the configuration, falling back to defaults when the file is
    /// absent.
    pub fn load(&self) -> Result<Config> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "no config file, using defaults");
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(&self.path)?;
        let config = toml::from_str(&content)?;
        Ok(config)
    }
}
