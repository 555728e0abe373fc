use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, warn};

mod commands;
mod config;
mod embed;
mod hooks;
mod input;
mod logging;
mod project;
mod settings;
mod state;
mod transcript;
mod webhook;

use config::Config;
use hooks::HookKind;
use input::HookInput;
use project::Project;
use webhook::HttpTransport;

#[derive(Debug, Parser)]
#[command(
    name = "claude-discord",
    about = "Discord webhook notifications for Claude Code",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Configure the webhook for this project and install the hooks.
    /// Arguments fall back to $ARGUMENTS when none are given.
    Setup {
        /// WEBHOOK_URL [AUTH_TOKEN] [THREAD_ID]
        #[arg(num_args = 0..=3)]
        args: Vec<String>,
    },
    /// Enable notifications, optionally posting into a thread.
    Start {
        /// [THREAD_ID]
        #[arg(num_args = 0..=1)]
        args: Vec<String>,
    },
    /// Disable notifications.
    Stop,
    /// Show the integration state for this project.
    Status,
    /// Delete the integration and strip its hooks from settings.json.
    Remove,
    /// Merge the hook bindings into a settings file.
    MergeSettings {
        /// Defaults to .claude/settings.json in this project
        settings_file: Option<PathBuf>,
    },
    /// Print one value from the state file.
    Get {
        key: String,
        #[arg(default_value = "")]
        default: String,
    },
    /// Entry point invoked by Claude Code; reads the event JSON on stdin.
    Hook {
        #[arg(value_enum)]
        kind: HookKind,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Command::Hook { kind } => run_hook(kind),
        command => {
            logging::init_command_logging();
            let stdout = io::stdout();
            let mut out = stdout.lock();
            match run_command(command, &mut out) {
                Ok(()) => ExitCode::SUCCESS,
                Err(e) => {
                    let _ = writeln!(out, "{} {:#}", commands::ERROR, e);
                    ExitCode::FAILURE
                }
            }
        }
    }
}

fn run_command(command: Command, out: &mut dyn Write) -> Result<()> {
    let project = Project::current()?;

    match command {
        Command::Setup { args } => {
            let config = config::load()?;
            commands::setup::run(&project, &config, &commands::resolve_args(args), out)
        }
        Command::Start { args } => commands::start::run(&project, &commands::resolve_args(args), out),
        Command::Stop => commands::stop::run(&project, out),
        Command::Status => {
            let config = config::load()?;
            commands::status::run(&project, &config, out)
        }
        Command::Remove => commands::remove::run(&project, out),
        Command::MergeSettings { settings_file } => {
            let config = config::load()?;
            commands::merge::run(&project, &config, settings_file.as_deref(), out)
        }
        Command::Get { key, default } => commands::state::get(&project, &key, &default, out),
        Command::Hook { kind } => bail!("{} is run by Claude Code, not as a command", kind.cli_name()),
    }
}

/// Hooks always exit 0 so Claude Code is never blocked by a notification.
fn run_hook(kind: HookKind) -> ExitCode {
    let (config, config_error) = match config::load() {
        Ok(c) => (c, None),
        Err(e) => (Config::default(), Some(e)),
    };
    logging::init_hook_logging(&config.log_file);
    if let Some(e) = config_error {
        warn!("ignoring invalid config {}: {:#}", config::config_path().display(), e);
    }

    let mut raw = String::new();
    if let Err(e) = io::stdin().read_to_string(&mut raw) {
        warn!("failed to read hook input: {}", e);
        raw.clear();
    }
    let input = HookInput::parse(&raw);

    let project = match Project::current() {
        Ok(p) => p,
        Err(e) => {
            error!("{:#}", e);
            Project::new(".")
        }
    };

    let outcome = hooks::run_hook(kind, &input, &project, &config, &HttpTransport::new());
    tracing::debug!("{} hook finished: {:?}", kind.cli_name(), outcome);
    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hook_is_not_a_command() {
        let mut out = Vec::new();
        let err = run_command(
            Command::Hook {
                kind: HookKind::PostToolUse,
            },
            &mut out,
        )
        .unwrap_err();
        assert!(err.to_string().contains("post-tool-use"));
        assert!(out.is_empty());
    }

    #[test]
    fn test_cli_parses_hook_kinds() {
        let cli = Cli::try_parse_from(["claude-discord", "hook", "attention-needed"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Hook {
                kind: HookKind::AttentionNeeded
            }
        ));
        assert!(Cli::try_parse_from(["claude-discord", "hook", "bogus"]).is_err());
    }
}
