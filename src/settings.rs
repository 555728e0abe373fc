//! Hook bindings in the host's `.claude/settings.json`.
//!
//! The settings document belongs to the user; only the three Discord
//! bindings are ever written or removed, everything else round-trips.

use crate::hooks::HookKind;
use crate::project::atomic_write;
use anyhow::{bail, Context, Result};
use serde_json::{json, Map, Value};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Substring identifying commands installed by this integration.
const DISCORD_MARKER: &str = "discord";

/// Load a settings document. Missing, malformed, or non-object files load as `{}`.
pub fn load_settings(path: &Path) -> Map<String, Value> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(_) => return Map::new(),
    };
    match serde_json::from_str::<Value>(&content) {
        Ok(Value::Object(map)) => map,
        Ok(_) => {
            warn!("{} is not a JSON object, treating as empty", path.display());
            Map::new()
        }
        Err(e) => {
            warn!("ignoring malformed settings {}: {}", path.display(), e);
            Map::new()
        }
    }
}

pub fn save_settings(path: &Path, settings: &Map<String, Value>) -> Result<()> {
    let json = serde_json::to_string_pretty(settings).context("Failed to serialize settings")?;
    atomic_write(path, json.as_bytes())
        .with_context(|| format!("Failed to write {}", path.display()))
}

/// Binding for one event: `[{"matcher": "", "hooks": [{"type": "command", "command": ...}]}]`
fn binding_for(kind: HookKind, hook_command: &str) -> Value {
    json!([{
        "matcher": "",
        "hooks": [{
            "type": "command",
            "command": format!("{} hook {}", hook_command, kind.cli_name()),
        }]
    }])
}

/// Replace the three Discord event keys under `hooks`, leaving all other
/// keys alone. Applying it twice yields the same document.
pub fn merge_hooks(settings: &mut Map<String, Value>, hook_command: &str) -> Result<()> {
    let hooks = settings
        .entry("hooks")
        .or_insert_with(|| Value::Object(Map::new()));
    let Some(hooks) = hooks.as_object_mut() else {
        bail!("settings hooks field must be a JSON object; refusing to overwrite");
    };

    for kind in HookKind::ALL {
        hooks.insert(
            kind.settings_key().to_string(),
            binding_for(kind, hook_command),
        );
    }
    Ok(())
}

/// Strip Discord hook commands from the three event keys. Entries left with
/// no hooks are dropped, and so are keys left with no entries.
/// Returns true if anything was removed.
pub fn strip_hooks(settings: &mut Map<String, Value>) -> bool {
    let Some(hooks) = settings.get_mut("hooks").and_then(Value::as_object_mut) else {
        return false;
    };

    let mut changed = false;
    for kind in HookKind::ALL {
        let key = kind.settings_key();
        let Some(entries) = hooks.get(key).and_then(Value::as_array) else {
            continue;
        };

        let kept: Vec<Value> = entries
            .iter()
            .filter_map(|entry| {
                let inner = entry.get("hooks").and_then(Value::as_array)?;
                let remaining: Vec<Value> = inner
                    .iter()
                    .filter(|h| !is_discord_hook(h, kind))
                    .cloned()
                    .collect();
                if remaining.is_empty() {
                    return None;
                }
                let mut entry = entry.clone();
                entry["hooks"] = Value::Array(remaining);
                Some(entry)
            })
            .collect();

        if kept != *entries {
            changed = true;
        }
        if kept.is_empty() {
            hooks.remove(key);
        } else {
            hooks.insert(key.to_string(), Value::Array(kept));
        }
    }
    changed
}

/// A command we installed ends in `hook <kind>` whatever `hook_command` was.
/// Older installs are recognised by the marker substring.
fn is_discord_hook(hook: &Value, kind: HookKind) -> bool {
    let Some(cmd) = hook.get("command").and_then(Value::as_str) else {
        return false;
    };
    if cmd.to_lowercase().contains(DISCORD_MARKER) {
        return true;
    }
    let tokens: Vec<&str> = cmd.split_whitespace().collect();
    matches!(tokens.as_slice(), [.., _, "hook", name] if *name == kind.cli_name())
}

/// True if every Discord event key carries a Discord command.
pub fn has_discord_hooks(settings: &Map<String, Value>) -> bool {
    let Some(hooks) = settings.get("hooks").and_then(Value::as_object) else {
        return false;
    };
    HookKind::ALL.iter().all(|kind| {
        hooks
            .get(kind.settings_key())
            .and_then(Value::as_array)
            .is_some_and(|entries| {
                entries.iter().any(|entry| {
                    entry
                        .get("hooks")
                        .and_then(Value::as_array)
                        .is_some_and(|inner| inner.iter().any(|h| is_discord_hook(h, *kind)))
                })
            })
    })
}

/// Load, merge, and save in one step.
pub fn merge_hooks_file(path: &Path, hook_command: &str) -> Result<()> {
    let mut settings = load_settings(path);
    merge_hooks(&mut settings, hook_command)?;
    save_settings(path, &settings)?;
    debug!("merged discord hooks into {}", path.display());
    Ok(())
}

/// Copy the settings file next to itself with the given suffix appended.
/// Returns the backup path, or None if there was nothing to back up.
pub fn backup_settings(path: &Path, suffix: &str) -> Result<Option<PathBuf>> {
    if !path.exists() {
        return Ok(None);
    }
    let mut name = path.as_os_str().to_os_string();
    name.push(suffix);
    let backup = PathBuf::from(name);
    std::fs::copy(path, &backup).with_context(|| {
        format!(
            "Failed to back up {} to {}",
            path.display(),
            backup.display()
        )
    })?;
    Ok(Some(backup))
}
