//! Application and secret configuration models.
//!
//! `config.toml` tunes the loop (default model, auto-continuation,
//! max tokens); `secret.json` carries per-provider credentials. Storage for
//! both lives in the infrastructure crate.

use serde::{Deserialize, Serialize};

use crate::session::AutoContinue;

/// Application configuration loaded from `config.toml`.
///
/// Every field has a default so a missing file means default behavior, not
/// an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Registry key of the model that drives the conversation.
    #[serde(default = "default_model_key")]
    pub default_model: String,
    /// Registry key of the model used for command interpretation and file
    /// summarization. A fast, cheap model is appropriate here.
    #[serde(default = "default_interpreter_key")]
    pub interpreter_model: String,
    /// Auto-continuation policy applied at session start.
    #[serde(default)]
    pub auto: AutoContinue,
    /// Token budget per completion call.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

fn default_model_key() -> String {
    "1".to_string()
}

fn default_interpreter_key() -> String {
    "4".to_string()
}

fn default_max_tokens() -> u32 {
    2048
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_model: default_model_key(),
            interpreter_model: default_interpreter_key(),
            auto: AutoContinue::default(),
            max_tokens: default_max_tokens(),
        }
    }
}

/// Per-provider credential entry in `secret.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSecret {
    pub api_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,
}

/// Secret configuration file contents (`secret.json`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SecretConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anthropic: Option<ProviderSecret>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub openai: Option<ProviderSecret>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deepseek: Option<ProviderSecret>,
}

impl SecretConfig {
    /// Returns the stored key for a provider label, if any.
    pub fn key_for(&self, provider: &str) -> Option<&str> {
        let entry = match provider {
            "anthropic" => self.anthropic.as_ref(),
            "openai" => self.openai.as_ref(),
            "deepseek" => self.deepseek.as_ref(),
            _ => None,
        };
        entry
            .map(|e| e.api_key.as_str())
            .filter(|k| !k.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults_from_empty_toml() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.default_model, "1");
        assert!(config.auto.enabled);
        assert_eq!(config.auto.max_rounds, 3);
        assert_eq!(config.max_tokens, 2048);
    }

    #[test]
    fn test_config_partial_override() {
        let config: Config = toml::from_str(
            r#"
default_model = "3"

[auto]
enabled = false
max_rounds = 5
"#,
        )
        .unwrap();
        assert_eq!(config.default_model, "3");
        assert!(!config.auto.enabled);
        assert_eq!(config.auto.max_rounds, 5);
    }

    #[test]
    fn test_secret_key_for_skips_empty_keys() {
        let secrets = SecretConfig {
            anthropic: Some(ProviderSecret {
                api_key: String::new(),
                model_name: None,
            }),
            openai: Some(ProviderSecret {
                api_key: "sk-test".to_string(),
                model_name: None,
            }),
            deepseek: None,
        };
        assert_eq!(secrets.key_for("anthropic"), None);
        assert_eq!(secrets.key_for("openai"), Some("sk-test"));
        assert_eq!(secrets.key_for("deepseek"), None);
    }
}
