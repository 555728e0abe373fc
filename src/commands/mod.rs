//! User-invoked commands. Each writes its report to `out` and returns an
//! error for anything that should exit non-zero.

pub mod merge;
pub mod remove;
pub mod setup;
pub mod start;
pub mod state;
pub mod status;
pub mod stop;

use std::io::{self, Write};

/// Slash commands pass their arguments in this variable as one string
pub const ARGUMENTS_ENV: &str = "ARGUMENTS";

pub const SUCCESS: &str = "✅";
pub const ERROR: &str = "❌";
pub const INFO: &str = "ℹ️";
pub const WARNING: &str = "⚠️";
pub const ACTIVE: &str = "🟢";
pub const INACTIVE: &str = "🔴";
pub const THREAD: &str = "🧵";
pub const CHANNEL: &str = "📢";
pub const AUTH: &str = "🔐";
pub const SETTINGS: &str = "🔧";

pub const AVAILABLE_COMMANDS: [&str; 5] = [
    "claude-discord setup WEBHOOK_URL [AUTH_TOKEN] [THREAD_ID] - Setup Discord integration",
    "claude-discord start [THREAD_ID] - Enable notifications",
    "claude-discord stop - Disable notifications",
    "claude-discord status - Check current status",
    "claude-discord remove - Remove integration",
];

/// Positional arguments from argv, or from `$ARGUMENTS` when argv has none.
pub fn resolve_args(argv: Vec<String>) -> Vec<String> {
    if !argv.is_empty() {
        return argv;
    }
    std::env::var(ARGUMENTS_ENV)
        .map(|s| split_arguments(&s))
        .unwrap_or_default()
}

fn split_arguments(raw: &str) -> Vec<String> {
    raw.split_whitespace().map(String::from).collect()
}

pub(crate) fn header(out: &mut dyn Write, title: &str) -> io::Result<()> {
    writeln!(out, "{} {}", SETTINGS, title)?;
    writeln!(out, "{}", "=".repeat(title.chars().count() + 2))
}

pub(crate) fn status_line(
    out: &mut dyn Write,
    label: &str,
    value: &str,
    emoji: &str,
) -> io::Result<()> {
    if emoji.is_empty() {
        writeln!(out, "{}: {}", label, value)
    } else {
        writeln!(out, "{}: {} {}", label, emoji, value)
    }
}

pub(crate) fn success(out: &mut dyn Write, message: &str) -> io::Result<()> {
    writeln!(out, "{} {}", SUCCESS, message)
}

pub(crate) fn info(out: &mut dyn Write, message: &str) -> io::Result<()> {
    writeln!(out, "{} {}", INFO, message)
}

pub(crate) fn warning(out: &mut dyn Write, message: &str) -> io::Result<()> {
    writeln!(out, "{} {}", WARNING, message)
}

pub(crate) fn command_list(out: &mut dyn Write, prefix: &str) -> io::Result<()> {
    for command in AVAILABLE_COMMANDS {
        writeln!(out, "{}{}", prefix, command)?;
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::project::Project;
    use std::fs;
    use tempfile::TempDir;

    pub const WEBHOOK: &str = "https://discord.com/api/webhooks/123456/tok_EN-1";

    pub fn project() -> (TempDir, Project) {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("demo-app");
        fs::create_dir_all(&root).unwrap();
        (temp, Project::new(root))
    }

    pub fn output(buf: Vec<u8>) -> String {
        String::from_utf8(buf).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_args_prefers_argv() {
        let argv = vec!["a".to_string(), "b".to_string()];
        assert_eq!(resolve_args(argv.clone()), argv);
    }

    #[test]
    fn test_split_arguments() {
        assert_eq!(
            split_arguments("  https://x/y  token\t42 \n"),
            vec!["https://x/y", "token", "42"]
        );
        assert!(split_arguments("   ").is_empty());
    }

    #[test]
    fn test_header_underline_matches_title() {
        let mut buf = Vec::new();
        header(&mut buf, "Status").unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.ends_with("========\n"));
    }
}
