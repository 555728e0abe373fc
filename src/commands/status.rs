use super::{
    command_list, header, info, status_line, ACTIVE, AUTH, CHANNEL, ERROR, INACTIVE, SUCCESS,
    THREAD,
};
use crate::config::Config;
use crate::project::Project;
use crate::settings;
use crate::state::{mask_webhook_url, IntegrationState};
use anyhow::Result;
use std::io::Write;

/// Report the integration state. Never fails for an unconfigured project.
pub fn run(project: &Project, config: &Config, out: &mut dyn Write) -> Result<()> {
    let project_name = project.name();

    if project.has_state() {
        let state = IntegrationState::load(&project.state_path());

        header(out, &format!("Discord Status for {}", project_name))?;
        writeln!(out)?;

        let recorded_name = if state.project_name.is_empty() {
            "unknown"
        } else {
            state.project_name.as_str()
        };
        writeln!(out, "Project: {}", recorded_name)?;

        if state.active && state.webhook_is_url_shaped() {
            status_line(out, "Status", "Active", ACTIVE)?;
        } else if state.active {
            status_line(out, "Status", "Active but no valid webhook URL", ERROR)?;
        } else {
            status_line(out, "Status", "Disabled", INACTIVE)?;
        }

        match state.thread() {
            Some(thread) => status_line(out, "Target", &format!("Thread ({})", thread), THREAD)?,
            None => status_line(out, "Target", "Channel", CHANNEL)?,
        }

        if state.has_auth() {
            status_line(out, "Auth", "Configured", AUTH)?;
        } else {
            status_line(out, "Auth", "Not configured", ERROR)?;
        }

        if !state.webhook_url.is_empty() {
            writeln!(out, "Webhook: {}", mask_webhook_url(&state.webhook_url))?;
        }
        writeln!(out)?;

        let hooked = settings::has_discord_hooks(&settings::load_settings(&project.settings_path()));
        if hooked {
            status_line(out, "Hooks configured", "Yes", SUCCESS)?;
        } else {
            status_line(out, "Hooks configured", "No", ERROR)?;
        }
        if let Ok(cmd) = config.hook_command() {
            writeln!(out, "Hook command: {}", cmd)?;
        }
    } else {
        info(
            out,
            &format!("No Discord integration configured for {}", project_name),
        )?;
        writeln!(out)?;
        writeln!(out, "To get started:")?;
        writeln!(
            out,
            "• claude-discord setup YOUR_WEBHOOK_URL - Setup Discord integration"
        )?;
    }

    writeln!(out)?;
    writeln!(out, "**Available Commands:**")?;
    command_list(out, "- ")?;
    Ok(())
}
