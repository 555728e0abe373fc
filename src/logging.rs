use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{fmt, EnvFilter};

/// Log filter override, e.g. `CLAUDE_DISCORD_LOG=debug`
pub const LOG_ENV: &str = "CLAUDE_DISCORD_LOG";

fn filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default))
}

/// Hooks append to the notification log. The host shows hook stderr to the
/// user, so if the log cannot be opened, log lines are dropped.
pub fn init_hook_logging(log_file: &Path) {
    if let Some(parent) = log_file.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    let writer = match OpenOptions::new().create(true).append(true).open(log_file) {
        Ok(file) => BoxMakeWriter::new(Mutex::new(file)),
        Err(_) => BoxMakeWriter::new(std::io::sink),
    };

    let _ = fmt()
        .with_env_filter(filter("info"))
        .with_writer(writer)
        .with_ansi(false)
        .with_target(false)
        .try_init();
}

/// Commands print their own output; tracing only surfaces warnings on stderr.
pub fn init_command_logging() {
    let _ = fmt()
        .with_env_filter(filter("warn"))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
