use super::{header, info, status_line, success, warning, ACTIVE, ERROR, INACTIVE, SUCCESS};
use crate::project::Project;
use crate::settings;
use crate::state::{mask_webhook_url, IntegrationState};
use anyhow::{Context, Result};
use std::io::Write;
use tracing::info as log_info;

fn backup_suffix() -> String {
    format!(".backup-{}", chrono::Local::now().format("%Y%m%d-%H%M%S"))
}

/// Delete the state file and strip the Discord hooks from settings.json,
/// after backing the settings up.
pub fn run(project: &Project, out: &mut dyn Write) -> Result<()> {
    let project_name = project.name();

    if !project.has_state() {
        info(out, "No Discord integration found in this project")?;
        writeln!(out)?;
        writeln!(out, "Current project: {}", project_name)?;
        writeln!(out, "Status: Not configured")?;
        writeln!(out)?;
        writeln!(out, "To set up Discord integration:")?;
        writeln!(
            out,
            "• claude-discord setup WEBHOOK_URL - Configure Discord integration"
        )?;
        return Ok(());
    }

    header(
        out,
        &format!("Discord Integration Removal for {}", project_name),
    )?;
    writeln!(out)?;

    let state = IntegrationState::load(&project.state_path());
    let settings_path = project.settings_path();
    let settings_exist = settings_path.exists();

    writeln!(out, "📊 Current Configuration:")?;
    writeln!(
        out,
        "  Project: {}",
        if state.project_name.is_empty() {
            "unknown"
        } else {
            state.project_name.as_str()
        }
    )?;
    if state.active {
        status_line(out, "  Status", "Active", ACTIVE)?;
    } else {
        status_line(out, "  Status", "Disabled", INACTIVE)?;
    }
    writeln!(out, "  Webhook: {}", mask_webhook_url(&state.webhook_url))?;
    if settings_exist {
        status_line(out, "  Hooks", "Configured", SUCCESS)?;
    } else {
        status_line(out, "  Hooks", "Not configured", ERROR)?;
    }
    writeln!(out)?;

    warning(
        out,
        "This will remove Discord integration from this project:",
    )?;
    writeln!(out, "  • Delete .claude/discord-state.json")?;
    writeln!(out, "  • Remove Discord hooks from .claude/settings.json")?;
    writeln!(out, "  • Preserve other hooks and settings")?;
    writeln!(out)?;

    if let Some(backup) = settings::backup_settings(&settings_path, &backup_suffix())? {
        success(out, &format!("Backup created: {}", backup.display()))?;
    }

    std::fs::remove_file(project.state_path()).with_context(|| {
        format!(
            "Failed to remove {}",
            project.state_path().display()
        )
    })?;
    success(out, "Removed discord-state.json")?;
    log_info!("removed {}", project.state_path().display());

    if settings_exist {
        let mut doc = settings::load_settings(&settings_path);
        if settings::strip_hooks(&mut doc) {
            settings::save_settings(&settings_path, &doc)?;
            success(out, "Discord hooks removed from settings.json")?;
        } else {
            info(out, "No Discord hooks found in settings.json")?;
        }
    } else {
        info(out, "No settings.json file found")?;
    }

    writeln!(out)?;
    writeln!(out, "{}", "=".repeat(50))?;
    success(out, "Discord integration removal completed!")?;
    writeln!(out, "{}", "=".repeat(50))?;
    writeln!(out)?;
    writeln!(out, "📁 What was preserved:")?;
    writeln!(out, "  • Other hooks in .claude/settings.json")?;
    if settings_exist {
        writeln!(out, "  • Backup of settings.json")?;
    }
    writeln!(out)?;
    writeln!(out, "🔄 To re-enable Discord integration:")?;
    writeln!(out, "  • claude-discord setup WEBHOOK_URL - Reconfigure")?;
    Ok(())
}
