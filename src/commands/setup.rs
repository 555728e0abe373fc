use super::{
    command_list, header, status_line, success, CHANNEL, ERROR, INACTIVE, SUCCESS, THREAD,
};
use crate::config::Config;
use crate::project::Project;
use crate::settings;
use crate::state::{mask_webhook_url, validate_webhook_url, IntegrationState};
use anyhow::{bail, Result};
use std::io::Write;
use tracing::info;

const BACKUP_SUFFIX: &str = ".backup";

fn usage(out: &mut dyn Write) -> std::io::Result<()> {
    writeln!(out, "Usage:")?;
    writeln!(out, "  claude-discord setup WEBHOOK_URL [AUTH_TOKEN] [THREAD_ID]")?;
    writeln!(out)?;
    writeln!(out, "Examples:")?;
    writeln!(
        out,
        "  claude-discord setup https://discord.com/api/webhooks/ID/TOKEN"
    )?;
    writeln!(out, "  claude-discord setup WEBHOOK_URL auth_token")?;
    writeln!(out, "  claude-discord setup WEBHOOK_URL auth_token thread_id")
}

/// Write a fresh, inactive state and bind the hooks in settings.json.
pub fn run(project: &Project, config: &Config, args: &[String], out: &mut dyn Write) -> Result<()> {
    let Some(webhook_url) = args.first() else {
        usage(out)?;
        bail!("Please provide your Discord webhook URL as an argument");
    };
    let auth_token = args.get(1).cloned();
    let thread_id = args.get(2).cloned();

    if !validate_webhook_url(webhook_url) {
        writeln!(out, "URL must start with: https://discord.com/api/webhooks/")?;
        bail!("Invalid webhook URL format");
    }

    let project_name = project.name();
    let settings_path = project.settings_path();
    let settings_existed = settings_path.exists();
    let hook_command = config.hook_command()?;

    // Merge in memory first so a refused merge leaves nothing behind
    let mut doc = settings::load_settings(&settings_path);
    settings::merge_hooks(&mut doc, &hook_command)?;

    project.ensure_claude_dir()?;
    header(out, &format!("Discord Integration Setup for {}", project_name))?;
    writeln!(out)?;

    let state = IntegrationState::new(webhook_url, &project_name, auth_token, thread_id);
    state.save(&project.state_path())?;
    info!("wrote {}", project.state_path().display());

    if settings_existed {
        writeln!(
            out,
            "Existing .claude/settings.json found - merging Discord hooks..."
        )?;
        if settings::backup_settings(&settings_path, BACKUP_SUFFIX)?.is_some() {
            writeln!(out, "📁 Backup saved as .claude/settings.json{}", BACKUP_SUFFIX)?;
        }
        settings::save_settings(&settings_path, &doc)?;
        success(out, "Discord hooks merged with existing configuration")?;
    } else {
        writeln!(out, "Creating new .claude/settings.json...")?;
        settings::save_settings(&settings_path, &doc)?;
        success(out, "New .claude/settings.json created")?;
    }

    writeln!(out)?;
    success(out, "Discord integration setup complete!")?;
    writeln!(out)?;

    writeln!(out, "📊 Configuration Summary:")?;
    writeln!(out, "  Project: {}", project_name)?;
    writeln!(out, "  Webhook: {}", mask_webhook_url(webhook_url))?;
    if state.has_auth() {
        status_line(out, "  Auth", "Configured", SUCCESS)?;
    } else {
        status_line(out, "  Auth", "Not configured", ERROR)?;
    }
    match state.thread() {
        Some(thread) => status_line(out, "  Thread", thread, THREAD)?,
        None => status_line(out, "  Thread", "Channel mode", CHANNEL)?,
    }
    status_line(
        out,
        "  Status",
        "Disabled (run claude-discord start to enable)",
        INACTIVE,
    )?;

    writeln!(out)?;
    writeln!(out, "🎯 Next Steps:")?;
    writeln!(out, "  1. claude-discord start - Enable Discord notifications")?;
    writeln!(
        out,
        "  2. Start working - notifications will be sent automatically!"
    )?;
    writeln!(out)?;
    writeln!(out, "💡 Commands Available:")?;
    command_list(out, "  ")?;
    writeln!(out)?;
    writeln!(out, "🪝 Hook command: {}", hook_command)?;
    Ok(())
}
