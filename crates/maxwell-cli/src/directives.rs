//! Slash directives: session controls handled entirely outside the model
//! loop. Directive lines never enter the conversation history.

/// Directive names, in the order `/help` lists them. Also feeds the
/// readline completer.
pub const DIRECTIVE_NAMES: &[&str] = &[
    "/q", "/qs", "/switch", "/auto", "/key", "/cd", "/copy", "/help",
];

pub const HELP_TEXT: &str = "\
Directives:
  /q                     quit without saving
  /qs                    summarize the conversation, save it, and quit
  /switch [key]          list models, or switch the active model
  /auto [on|off|max N]   show or change auto-continuation
  /key [provider] [key]  report stored credentials, or set one for this session
  /cd <dir>              change the tool working directory
  /copy                  print the conversation as plain text
  /help                  show this message

Anything else is sent to the model. Prefix a request with @tool to have it
interpreted as a command.";

/// Argument to `/auto`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoSetting {
    /// No argument: report the current policy.
    Show,
    On,
    Off,
    Max(u32),
}

/// A parsed slash directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlashDirective {
    Quit,
    QuitWithSummary,
    Switch(Option<String>),
    Auto(AutoSetting),
    Key {
        provider: Option<String>,
        value: Option<String>,
    },
    Cd(String),
    Copy,
    Help,
    /// A recognized directive with arguments that did not parse.
    Malformed { usage: &'static str },
    /// An unrecognized directive name.
    Unknown(String),
}

impl SlashDirective {
    /// Parses a line as a directive. `None` means the line is ordinary
    /// input for the model.
    pub fn parse(line: &str) -> Option<Self> {
        let trimmed = line.trim();
        if !trimmed.starts_with('/') {
            return None;
        }
        let mut parts = trimmed.split_whitespace();
        let name = parts.next().unwrap_or_default();

        let directive = match name {
            "/q" => Self::Quit,
            "/qs" => Self::QuitWithSummary,
            "/switch" => Self::Switch(parts.next().map(str::to_string)),
            "/auto" => match parts.next() {
                None => Self::Auto(AutoSetting::Show),
                Some("on") => Self::Auto(AutoSetting::On),
                Some("off") => Self::Auto(AutoSetting::Off),
                Some("max") => match parts.next().and_then(|n| n.parse().ok()) {
                    Some(n) => Self::Auto(AutoSetting::Max(n)),
                    None => Self::Malformed {
                        usage: "/auto max <N>",
                    },
                },
                Some(_) => Self::Malformed {
                    usage: "/auto [on|off|max N]",
                },
            },
            "/key" => Self::Key {
                provider: parts.next().map(str::to_string),
                value: parts.next().map(str::to_string),
            },
            "/cd" => match parts.next() {
                Some(dir) => Self::Cd(dir.to_string()),
                None => Self::Malformed { usage: "/cd <dir>" },
            },
            "/copy" => Self::Copy,
            "/help" => Self::Help,
            other => Self::Unknown(other.to_string()),
        };
        Some(directive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_slash_lines_are_not_directives() {
        assert_eq!(SlashDirective::parse("hello there"), None);
        assert_eq!(SlashDirective::parse("@tool list files"), None);
        assert_eq!(SlashDirective::parse(""), None);
    }

    #[test]
    fn test_quit_variants() {
        assert_eq!(SlashDirective::parse("/q"), Some(SlashDirective::Quit));
        assert_eq!(
            SlashDirective::parse("/qs"),
            Some(SlashDirective::QuitWithSummary)
        );
    }

    #[test]
    fn test_switch_with_and_without_key() {
        assert_eq!(
            SlashDirective::parse("/switch"),
            Some(SlashDirective::Switch(None))
        );
        assert_eq!(
            SlashDirective::parse("/switch 4"),
            Some(SlashDirective::Switch(Some("4".to_string())))
        );
    }

    #[test]
    fn test_auto_settings() {
        assert_eq!(
            SlashDirective::parse("/auto"),
            Some(SlashDirective::Auto(AutoSetting::Show))
        );
        assert_eq!(
            SlashDirective::parse("/auto off"),
            Some(SlashDirective::Auto(AutoSetting::Off))
        );
        assert_eq!(
            SlashDirective::parse("/auto max 5"),
            Some(SlashDirective::Auto(AutoSetting::Max(5)))
        );
        assert_eq!(
            SlashDirective::parse("/auto max lots"),
            Some(SlashDirective::Malformed {
                usage: "/auto max <N>"
            })
        );
    }

    #[test]
    fn test_key_forms() {
        assert_eq!(
            SlashDirective::parse("/key"),
            Some(SlashDirective::Key {
                provider: None,
                value: None
            })
        );
        assert_eq!(
            SlashDirective::parse("/key anthropic sk-test"),
            Some(SlashDirective::Key {
                provider: Some("anthropic".to_string()),
                value: Some("sk-test".to_string())
            })
        );
    }

    #[test]
    fn test_cd_requires_argument() {
        assert_eq!(
            SlashDirective::parse("/cd notes"),
            Some(SlashDirective::Cd("notes".to_string()))
        );
        assert_eq!(
            SlashDirective::parse("/cd"),
            Some(SlashDirective::Malformed { usage: "/cd <dir>" })
        );
    }

    #[test]
    fn test_unknown_directive_keeps_name() {
        assert_eq!(
            SlashDirective::parse("/frob"),
            Some(SlashDirective::Unknown("/frob".to_string()))
        );
    }
}
