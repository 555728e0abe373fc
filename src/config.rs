use anyhow::{anyhow, bail, Context, Result};
use glob::Pattern;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILENAME: &str = "config.yaml";
const APP_DIR: &str = "claude-discord";
const LOG_FILENAME: &str = "discord-notifications.log";

/// Overrides the config file location
pub const CONFIG_ENV: &str = "CLAUDE_DISCORD_CONFIG";

/// Tools that trigger a post-tool-use notification unless configured otherwise
const DEFAULT_NOTIFY_TOOLS: [&str; 5] = ["Write", "Edit", "MultiEdit", "Bash", "TodoWrite"];

/// Raw configuration structure (as parsed from YAML)
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigRaw {
    /// Glob patterns of tool names worth a post-tool-use notification
    notify_tools: Option<Vec<String>>,
    /// Where hooks append their log lines
    log_file: Option<String>,
    /// Command written into settings.json hook bindings
    hook_command: Option<String>,
}

/// Resolved configuration (defaults applied, patterns compiled)
#[derive(Debug)]
pub struct Config {
    pub notify_tools: Vec<Pattern>,
    pub log_file: PathBuf,
    pub hook_command: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            notify_tools: DEFAULT_NOTIFY_TOOLS
                .iter()
                .filter_map(|t| Pattern::new(t).ok())
                .collect(),
            log_file: default_log_file(),
            hook_command: None,
        }
    }
}

impl Config {
    /// Whether a PostToolUse for `tool_name` should be posted.
    pub fn should_notify(&self, tool_name: &str) -> bool {
        self.notify_tools.iter().any(|p| p.matches(tool_name))
    }

    /// Command prefix for hook bindings: the configured one (used verbatim
    /// as shell text), else this executable, quoted for the shell.
    pub fn hook_command(&self) -> Result<String> {
        if let Some(cmd) = &self.hook_command {
            return Ok(cmd.clone());
        }
        let exe = std::env::current_exe().context("Failed to locate current executable")?;
        quote_executable(&exe)
    }
}

/// Quote a path for `sh -c`. Paths made of safe characters come back unchanged.
pub fn quote_executable(path: &Path) -> Result<String> {
    let raw = path.to_string_lossy();
    shlex::try_quote(&raw)
        .map(|quoted| quoted.into_owned())
        .map_err(|e| anyhow!("Cannot quote executable path {}: {}", path.display(), e))
}

fn home_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

fn default_log_file() -> PathBuf {
    home_dir().join(".claude").join(LOG_FILENAME)
}

fn expand_home(raw: &str) -> PathBuf {
    match raw.strip_prefix("~/") {
        Some(rest) => home_dir().join(rest),
        None => PathBuf::from(raw),
    }
}

/// Get the expected path for the config file: `$CLAUDE_DISCORD_CONFIG`,
/// else `$XDG_CONFIG_HOME/claude-discord/config.yaml`.
pub fn config_path() -> PathBuf {
    if let Ok(path) = std::env::var(CONFIG_ENV) {
        if !path.is_empty() {
            return expand_home(&path);
        }
    }

    let xdg_config = std::env::var("XDG_CONFIG_HOME")
        .ok()
        .filter(|p| !p.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| home_dir().join(".config"));

    xdg_config.join(APP_DIR).join(CONFIG_FILENAME)
}

/// Loads the config from its default location. A missing file means defaults.
pub fn load() -> Result<Config> {
    let path = config_path();
    if !path.exists() {
        return Ok(Config::default());
    }
    load_config(&path)
}

/// Loads and validates a config file.
pub fn load_config(config_path: &Path) -> Result<Config> {
    let content = fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config: {}", config_path.display()))?;

    // An empty YAML document parses as null
    let parsed: ConfigRaw = if content.trim().is_empty() {
        ConfigRaw::default()
    } else {
        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", config_path.display()))?
    };

    let mut config = Config::default();

    if let Some(tools) = parsed.notify_tools {
        let mut patterns = Vec::with_capacity(tools.len());
        for tool in &tools {
            if tool.is_empty() {
                bail!(
                    "Invalid config at {}: empty pattern in 'notify_tools'",
                    config_path.display()
                );
            }
            let pattern = Pattern::new(tool).with_context(|| {
                format!(
                    "Invalid config at {}: bad pattern '{}' in 'notify_tools'",
                    config_path.display(),
                    tool
                )
            })?;
            patterns.push(pattern);
        }
        config.notify_tools = patterns;
    }

    if let Some(log_file) = parsed.log_file {
        if log_file.is_empty() {
            bail!("Invalid config at {}: empty 'log_file'", config_path.display());
        }
        config.log_file = expand_home(&log_file);
    }

    if let Some(cmd) = parsed.hook_command {
        if cmd.trim().is_empty() {
            bail!(
                "Invalid config at {}: empty 'hook_command'",
                config_path.display()
            );
        }
        config.hook_command = Some(cmd);
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_config(temp: &TempDir, content: &str) -> PathBuf {
        let path = temp.path().join(CONFIG_FILENAME);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_default_notify_tools() {
        let config = Config::default();
        for tool in DEFAULT_NOTIFY_TOOLS {
            assert!(config.should_notify(tool), "{tool} should notify");
        }
        assert!(!config.should_notify("Read"));
        assert!(!config.should_notify("Grep"));
        assert!(config.log_file.ends_with(".claude/discord-notifications.log"));
    }

    #[test]
    fn test_load_config_with_patterns() {
        let temp = TempDir::new().unwrap();
        let path = write_config(
            &temp,
            r#"
notify_tools:
  - Bash
  - "mcp__*"
log_file: /var/log/discord.log
hook_command: /opt/bin/claude-discord
"#,
        );

        let config = load_config(&path).unwrap();
        assert!(config.should_notify("Bash"));
        assert!(config.should_notify("mcp__github__create_issue"));
        assert!(!config.should_notify("Write"));
        assert_eq!(config.log_file, PathBuf::from("/var/log/discord.log"));
        assert_eq!(config.hook_command().unwrap(), "/opt/bin/claude-discord");
    }

    #[test]
    fn test_load_config_empty_file_is_default() {
        let temp = TempDir::new().unwrap();
        let path = write_config(&temp, "");
        let config = load_config(&path).unwrap();
        assert!(config.should_notify("Edit"));
        assert!(config.hook_command.is_none());
    }

    #[test]
    fn test_load_config_bad_pattern_fails() {
        let temp = TempDir::new().unwrap();
        let path = write_config(&temp, "notify_tools:\n  - \"[unclosed\"\n");
        assert!(load_config(&path).is_err());
    }

    #[test]
    fn test_load_config_empty_values_fail() {
        let temp = TempDir::new().unwrap();
        let path = write_config(&temp, "notify_tools:\n  - \"\"\n");
        assert!(load_config(&path).is_err());

        let path = write_config(&temp, "hook_command: \"  \"\n");
        assert!(load_config(&path).is_err());
    }

    #[test]
    fn test_load_config_unknown_key_fails() {
        let temp = TempDir::new().unwrap();
        let path = write_config(&temp, "webhook: https://example.com\n");
        assert!(load_config(&path).is_err());
    }

    #[test]
    fn test_quote_executable() {
        assert_eq!(
            quote_executable(Path::new("/usr/local/bin/claude-discord")).unwrap(),
            "/usr/local/bin/claude-discord"
        );
        assert_eq!(
            quote_executable(Path::new("/Users/Jane Doe/.cargo/bin/claude-discord")).unwrap(),
            "'/Users/Jane Doe/.cargo/bin/claude-discord'"
        );
    }

    #[test]
    fn test_configured_hook_command_is_verbatim() {
        let config = Config {
            hook_command: Some("/opt/bin/notify --quiet".to_string()),
            ..Config::default()
        };
        assert_eq!(config.hook_command().unwrap(), "/opt/bin/notify --quiet");
    }

    #[test]
    fn test_expand_home() {
        assert_eq!(expand_home("/abs/path"), PathBuf::from("/abs/path"));
        assert!(expand_home("~/logs/x.log").ends_with("logs/x.log"));
        assert!(!expand_home("~/logs/x.log").starts_with("~"));
    }
}
