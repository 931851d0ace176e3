//! The maxwell terminal REPL: rustyline input with directive completion,
//! colored conversation output, and session resume.

use std::borrow::Cow::{self, Borrowed, Owned};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context as _, Result};
use clap::Parser;
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};
use tracing_subscriber::EnvFilter;

use maxwell_core::session::{ConversationMessage, LoopState, MessageRole, Session};
use maxwell_infrastructure::{
    CalendarStore, ConfigStorage, FileSessionStore, FileWorkspace, MaxwellPaths, NoteLog,
    SecretStorage,
};
use maxwell_interaction::{
    supported_models, BackendFactory, CommandExecutor, Provider, SessionController, ToolMediator,
};

mod directives;

use directives::{AutoSetting, SlashDirective, DIRECTIVE_NAMES, HELP_TEXT};

#[derive(Parser)]
#[command(name = "maxwell")]
#[command(about = "Terminal chat assistant with a natural-language tool protocol", long_about = None)]
struct Cli {
    /// Model table key to start with (see /switch)
    #[arg(short, long)]
    model: Option<String>,

    /// Working directory for file commands (defaults to the current directory)
    #[arg(short, long)]
    workspace: Option<PathBuf>,

    /// Resume a saved session by identifier
    #[arg(short, long)]
    resume: Option<String>,

    /// List saved sessions and exit
    #[arg(long)]
    list_sessions: bool,
}

/// Readline helper: completion and hints for slash directives, directive
/// lines highlighted.
#[derive(Clone)]
struct CliHelper {
    directives: Vec<String>,
}

impl CliHelper {
    fn new() -> Self {
        Self {
            directives: DIRECTIVE_NAMES.iter().map(|d| d.to_string()).collect(),
        }
    }
}

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];

        if line.starts_with('/') {
            let candidates: Vec<Pair> = self
                .directives
                .iter()
                .filter(|d| d.starts_with(line))
                .map(|d| Pair {
                    display: d.clone(),
                    replacement: d.clone(),
                })
                .collect();
            Ok((0, candidates))
        } else {
            Ok((0, vec![]))
        }
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];

        if line.starts_with('/') && !line.contains(' ') {
            self.directives
                .iter()
                .find(|d| d.starts_with(line) && d.len() > line.len())
                .map(|d| d[line.len()..].to_string())
        } else {
            None
        }
    }
}

impl Validator for CliHelper {}

enum DirectiveOutcome {
    Continue,
    Quit,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = ConfigStorage::new()?.load()?;
    MaxwellPaths::ensure_secret_file()?;
    let secrets = SecretStorage::new()?.load()?;
    let mut factory = BackendFactory::from_secrets(&secrets);
    let store = FileSessionStore::new(MaxwellPaths::sessions_dir()?);

    if cli.list_sessions {
        let sessions = store.list()?;
        if sessions.is_empty() {
            println!("No saved sessions.");
        }
        for summary in sessions {
            println!(
                "{}  [model {}]  {}",
                summary.id.bright_cyan(),
                summary.model_key,
                summary.preview
            );
        }
        return Ok(());
    }

    let session = match &cli.resume {
        Some(id) => store
            .load(id)
            .with_context(|| format!("cannot resume session '{id}'"))?,
        None => Session::new(cli.model.as_deref().unwrap_or(&config.default_model)),
    };
    let model_key = cli
        .model
        .clone()
        .unwrap_or_else(|| session.model_key.clone());

    let primary = factory
        .build(&model_key)
        .context("cannot build the primary model backend")?;
    let interpreter = match factory.build(&config.interpreter_model) {
        Ok(backend) => backend,
        Err(err) => {
            println!(
                "{}",
                format!("Interpreter model unavailable ({err}); using the primary model.")
                    .yellow()
            );
            Arc::clone(&primary)
        }
    };

    let working_dir = match cli.workspace {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };
    let executor = CommandExecutor::new(
        FileWorkspace::new(working_dir),
        CalendarStore::open(MaxwellPaths::calendar_file()?),
        NoteLog::new(MaxwellPaths::logs_dir()?.join("notes.txt")),
        Arc::clone(&interpreter),
        config.max_tokens,
    );
    let mediator = ToolMediator::new(interpreter, config.max_tokens);
    let mut controller = SessionController::new(
        session,
        primary,
        mediator,
        executor,
        config.auto,
        config.max_tokens,
    );

    let mut rl = Editor::new()?;
    rl.set_helper(Some(CliHelper::new()));

    println!("{}", "=== maxwell ===".bright_magenta().bold());
    println!(
        "{}",
        format!(
            "Model {} | prefix a request with @tool to run commands | /help for directives",
            model_key
        )
        .bright_black()
    );
    if cli.resume.is_none() {
        if let Ok(saved) = store.list() {
            if !saved.is_empty() {
                println!(
                    "{}",
                    format!(
                        "{} saved session(s); --list-sessions to browse, --resume <id> to continue one.",
                        saved.len()
                    )
                    .bright_black()
                );
            }
        }
    }
    println!();

    loop {
        match controller.state().clone() {
            LoopState::AwaitingUserInput => {
                let line = match rl.readline(">> ") {
                    Ok(line) => line,
                    Err(rustyline::error::ReadlineError::Interrupted) => {
                        println!("{}", "CTRL-C. Use /q to quit.".yellow());
                        continue;
                    }
                    Err(rustyline::error::ReadlineError::Eof) => break,
                    Err(err) => {
                        eprintln!("{}", format!("Input error: {err}").red());
                        break;
                    }
                };
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(&line);

                match SlashDirective::parse(trimmed) {
                    Some(directive) => {
                        match handle_directive(directive, &mut controller, &mut factory, &store)
                            .await
                        {
                            DirectiveOutcome::Quit => break,
                            DirectiveOutcome::Continue => {}
                        }
                    }
                    None => controller.submit_user_input(trimmed),
                }
            }
            LoopState::AwaitingHumanCheckpoint => {
                println!(
                    "{}",
                    "Auto-continuation paused. Press enter to continue, or add a message."
                        .yellow()
                );
                match rl.readline("Break message: ") {
                    Ok(line) => controller.submit_checkpoint(&line),
                    Err(rustyline::error::ReadlineError::Interrupted)
                    | Err(rustyline::error::ReadlineError::Eof) => break,
                    Err(err) => {
                        eprintln!("{}", format!("Input error: {err}").red());
                        break;
                    }
                }
            }
            LoopState::AwaitingModelResponse | LoopState::ToolInvocationPending => {
                for message in controller.advance().await {
                    print_message(&message);
                }
            }
            LoopState::Ended => break,
        }
    }

    println!("{}", "Goodbye!".bright_green());
    Ok(())
}

async fn handle_directive(
    directive: SlashDirective,
    controller: &mut SessionController,
    factory: &mut BackendFactory,
    store: &FileSessionStore,
) -> DirectiveOutcome {
    match directive {
        SlashDirective::Quit => {
            controller.end();
            DirectiveOutcome::Quit
        }
        SlashDirective::QuitWithSummary => {
            match controller.summarize_for_quit().await {
                Ok(summary) => {
                    for line in summary.lines() {
                        println!("{}", line.bright_blue());
                    }
                }
                Err(err) => eprintln!("{}", format!("Summary failed: {err}").red()),
            }
            match store.save(controller.session()) {
                Ok(path) => println!(
                    "{}",
                    format!("Session saved to {}", path.display()).bright_green()
                ),
                Err(err) => eprintln!("{}", format!("Save failed: {err}").red()),
            }
            controller.end();
            DirectiveOutcome::Quit
        }
        SlashDirective::Switch(None) => {
            let active = controller.session().model_key.clone();
            println!("Available models:");
            for spec in supported_models() {
                let marker = if spec.key == active { "*" } else { " " };
                println!(
                    " {marker} {}: {} ({})",
                    spec.key.bright_cyan(),
                    spec.name,
                    spec.provider.as_str()
                );
            }
            DirectiveOutcome::Continue
        }
        SlashDirective::Switch(Some(key)) => {
            match factory.build(&key) {
                Ok(backend) => {
                    controller.set_primary(backend, &key);
                    println!("{}", format!("Switched to model {key}").bright_green());
                }
                Err(err) => eprintln!("{}", format!("Cannot switch: {err}").red()),
            }
            DirectiveOutcome::Continue
        }
        SlashDirective::Auto(setting) => {
            let mut auto = controller.auto();
            match setting {
                AutoSetting::Show => {}
                AutoSetting::On => auto.enabled = true,
                AutoSetting::Off => auto.enabled = false,
                AutoSetting::Max(n) => auto.max_rounds = n,
            }
            controller.set_auto(auto);
            let state = if auto.enabled { "on" } else { "off" };
            println!(
                "Auto-continuation: {state}, max {} round(s) ({} used)",
                auto.max_rounds,
                controller.rounds_used()
            );
            DirectiveOutcome::Continue
        }
        SlashDirective::Key { provider, value } => {
            match provider {
                None => {
                    for provider in Provider::ALL {
                        let status = if factory.has_key(provider) {
                            "set".bright_green()
                        } else {
                            "missing".red()
                        };
                        println!("  {}: {status}", provider.as_str());
                    }
                }
                Some(name) => match Provider::from_str(&name) {
                    Some(provider) => match value {
                        Some(key) => {
                            factory.set_key(provider, Some(key));
                            println!(
                                "{}",
                                format!(
                                    "Key for {} set for this session; /switch to rebuild the model.",
                                    provider.as_str()
                                )
                                .bright_green()
                            );
                        }
                        None => {
                            let status = if factory.has_key(provider) { "set" } else { "missing" };
                            println!("  {}: {status}", provider.as_str());
                        }
                    },
                    None => eprintln!("{}", format!("Unknown provider: {name}").red()),
                },
            }
            DirectiveOutcome::Continue
        }
        SlashDirective::Cd(dir) => {
            match controller.executor_mut().workspace_mut().change_directory(&dir) {
                Ok(_) => {
                    let current = controller.executor().workspace().working_dir();
                    println!(
                        "{}",
                        format!("Working directory: {}", current.display()).bright_green()
                    );
                }
                Err(err) => eprintln!("{}", format!("Cannot change directory: {err}").red()),
            }
            DirectiveOutcome::Continue
        }
        SlashDirective::Copy => {
            for message in &controller.session().messages {
                println!("{}: {}", role_label(message.role), message.content);
            }
            DirectiveOutcome::Continue
        }
        SlashDirective::Help => {
            println!("{HELP_TEXT}");
            DirectiveOutcome::Continue
        }
        SlashDirective::Malformed { usage } => {
            eprintln!("{}", format!("Usage: {usage}").yellow());
            DirectiveOutcome::Continue
        }
        SlashDirective::Unknown(name) => {
            eprintln!(
                "{}",
                format!("Unknown directive {name}; /help lists directives.").yellow()
            );
            DirectiveOutcome::Continue
        }
    }
}

fn role_label(role: MessageRole) -> &'static str {
    match role {
        MessageRole::User => "User",
        MessageRole::Assistant => "Assistant",
        MessageRole::System => "System",
        MessageRole::Tool => "Tool",
        MessageRole::Error => "Error",
    }
}

/// Prints one new history entry. User entries are skipped: the user already
/// typed them at the prompt.
fn print_message(message: &ConversationMessage) {
    match message.role {
        MessageRole::User => {}
        MessageRole::Assistant => {
            for line in message.content.lines() {
                println!("{}", line.bright_blue());
            }
        }
        MessageRole::System => {
            for line in message.content.lines() {
                println!("{}", format!("SYSTEM: {line}").yellow());
            }
        }
        MessageRole::Tool => {
            for line in message.content.lines() {
                println!("{}", line.bright_black());
            }
        }
        MessageRole::Error => {
            eprintln!("{}", message.content.red());
        }
    }
}
