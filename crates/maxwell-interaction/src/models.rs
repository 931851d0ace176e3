//! Supported model registry and backend construction.
//!
//! Models are selected by a short numbered key (the `/switch` directive
//! lists the table). Keys are stable across sessions; the persisted session
//! records the key it was driven by.

use std::sync::Arc;

use maxwell_core::agent::CompletionBackend;
use maxwell_core::config::SecretConfig;
use maxwell_core::{MaxwellError, Result};

use crate::anthropic_api_agent::AnthropicApiAgent;
use crate::openai_api_agent::OpenAIApiAgent;

/// Wire-reachable completion providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Anthropic,
    OpenAI,
    DeepSeek,
}

impl Provider {
    pub const ALL: [Provider; 3] = [Provider::Anthropic, Provider::OpenAI, Provider::DeepSeek];

    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Anthropic => "anthropic",
            Provider::OpenAI => "openai",
            Provider::DeepSeek => "deepseek",
        }
    }

    pub fn from_str(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "anthropic" => Some(Provider::Anthropic),
            "openai" => Some(Provider::OpenAI),
            "deepseek" => Some(Provider::DeepSeek),
            _ => None,
        }
    }

    /// Environment variable consulted when secret.json has no key.
    pub fn env_var(&self) -> &'static str {
        match self {
            Provider::Anthropic => "ANTHROPIC_API_KEY",
            Provider::OpenAI => "OPENAI_API_KEY",
            Provider::DeepSeek => "DEEPSEEK_API_KEY",
        }
    }
}

/// One entry in the numbered model table.
#[derive(Debug, Clone, Copy)]
pub struct ModelSpec {
    pub key: &'static str,
    pub name: &'static str,
    pub provider: Provider,
}

/// The numbered model table.
pub fn supported_models() -> &'static [ModelSpec] {
    const MODELS: &[ModelSpec] = &[
        ModelSpec {
            key: "1",
            name: "claude-3-5-sonnet-latest",
            provider: Provider::Anthropic,
        },
        ModelSpec {
            key: "2",
            name: "claude-3-opus-latest",
            provider: Provider::Anthropic,
        },
        ModelSpec {
            key: "3",
            name: "claude-3-5-haiku-latest",
            provider: Provider::Anthropic,
        },
        ModelSpec {
            key: "4",
            name: "gpt-4o-mini",
            provider: Provider::OpenAI,
        },
        ModelSpec {
            key: "5",
            name: "gpt-4o",
            provider: Provider::OpenAI,
        },
        ModelSpec {
            key: "6",
            name: "deepseek-chat",
            provider: Provider::DeepSeek,
        },
        ModelSpec {
            key: "7",
            name: "deepseek-reasoner",
            provider: Provider::DeepSeek,
        },
    ];
    MODELS
}

/// Looks up a model by table key.
pub fn find_model(key: &str) -> Option<&'static ModelSpec> {
    supported_models().iter().find(|m| m.key == key)
}

/// Builds completion backends from the model table and the credential set.
///
/// Credentials start from secret.json with environment-variable fallback;
/// the `/key` directive mutates them in memory for the rest of the session.
pub struct BackendFactory {
    keys: [(Provider, Option<String>); 3],
}

impl BackendFactory {
    /// Seeds credentials from the secret config, falling back to the
    /// provider's environment variable.
    pub fn from_secrets(secrets: &SecretConfig) -> Self {
        let keys = Provider::ALL.map(|provider| {
            let key = secrets
                .key_for(provider.as_str())
                .map(str::to_string)
                .or_else(|| std::env::var(provider.env_var()).ok().filter(|k| !k.is_empty()));
            (provider, key)
        });
        Self { keys }
    }

    /// Sets or clears a provider key for the rest of the session.
    pub fn set_key(&mut self, provider: Provider, key: Option<String>) {
        for entry in &mut self.keys {
            if entry.0 == provider {
                entry.1 = key.filter(|k| !k.is_empty());
                return;
            }
        }
    }

    /// Whether a key is currently held for the provider.
    pub fn has_key(&self, provider: Provider) -> bool {
        self.keys
            .iter()
            .any(|(p, k)| *p == provider && k.is_some())
    }

    /// Builds a backend for the given model table key.
    pub fn build(&self, model_key: &str) -> Result<Arc<dyn CompletionBackend>> {
        let spec = find_model(model_key)
            .ok_or_else(|| MaxwellError::config(format!("Invalid model key: {model_key}")))?;
        let api_key = self
            .keys
            .iter()
            .find(|(p, _)| *p == spec.provider)
            .and_then(|(_, k)| k.clone())
            .ok_or_else(|| {
                MaxwellError::config(format!("Missing {} API key", spec.provider.as_str()))
            })?;

        let backend: Arc<dyn CompletionBackend> = match spec.provider {
            Provider::Anthropic => Arc::new(AnthropicApiAgent::new(api_key, spec.name)),
            Provider::OpenAI => Arc::new(OpenAIApiAgent::new(api_key, spec.name)),
            Provider::DeepSeek => Arc::new(OpenAIApiAgent::deepseek(api_key, spec.name)),
        };
        Ok(backend)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_model() {
        assert_eq!(find_model("1").unwrap().provider, Provider::Anthropic);
        assert_eq!(find_model("6").unwrap().name, "deepseek-chat");
        assert!(find_model("99").is_none());
    }

    #[test]
    fn test_build_requires_key() {
        let mut factory = BackendFactory {
            keys: Provider::ALL.map(|p| (p, None)),
        };
        let err = factory.build("1").err().unwrap();
        assert!(err.to_string().contains("Missing anthropic API key"));

        factory.set_key(Provider::Anthropic, Some("sk-test".to_string()));
        let backend = factory.build("1").unwrap();
        assert_eq!(backend.provider(), "anthropic");
    }

    #[test]
    fn test_build_unknown_key_is_config_error() {
        let factory = BackendFactory {
            keys: Provider::ALL.map(|p| (p, Some("k".to_string()))),
        };
        assert!(factory.build("42").is_err());
    }

    #[test]
    fn test_set_key_clears_empty() {
        let mut factory = BackendFactory {
            keys: Provider::ALL.map(|p| (p, Some("k".to_string()))),
        };
        factory.set_key(Provider::OpenAI, Some(String::new()));
        assert!(!factory.has_key(Provider::OpenAI));
        assert!(factory.has_key(Provider::Anthropic));
    }
}
