use super::success;
use crate::project::Project;
use crate::state::IntegrationState;
use anyhow::{bail, Result};
use std::io::Write;

/// Load the state for a command that needs an existing integration.
pub(crate) fn require_state(project: &Project) -> Result<IntegrationState> {
    if !project.has_state() {
        bail!("Discord not configured for this project (run: claude-discord setup WEBHOOK_URL)");
    }
    let state = IntegrationState::load(&project.state_path());
    if state.is_empty() {
        bail!("Failed to load Discord configuration");
    }
    Ok(state)
}

/// Enable notifications, optionally switching to a thread.
pub fn run(project: &Project, args: &[String], out: &mut dyn Write) -> Result<()> {
    project.ensure_claude_dir()?;
    let mut state = require_state(project)?;

    if !state.webhook_is_url_shaped() {
        bail!("No valid webhook URL configured (run: claude-discord setup WEBHOOK_URL)");
    }

    state.active = true;
    if let Some(thread_id) = args.first().filter(|t| !t.is_empty()) {
        state.thread_id = Some(thread_id.clone());
    }
    state.save(&project.state_path())?;

    match state.thread() {
        Some(thread) => success(
            out,
            &format!("Discord notifications enabled for thread: {}", thread),
        )?,
        None => success(out, "Discord notifications enabled for channel")?,
    }

    writeln!(out)?;
    writeln!(
        out,
        "Discord notifications are now active for project: **{}**",
        project.name()
    )?;
    writeln!(out)?;
    writeln!(out, "**Usage:**")?;
    writeln!(out, "- `claude-discord start` - Post to main channel")?;
    writeln!(out, "- `claude-discord start THREAD_ID` - Post to specific thread")?;
    writeln!(out)?;
    writeln!(out, "**Other commands:**")?;
    writeln!(out, "- `claude-discord stop` - Disable notifications")?;
    writeln!(out, "- `claude-discord status` - Check current state")?;
    writeln!(out, "- `claude-discord setup` - Reconfigure Discord integration")?;
    writeln!(out, "- `claude-discord remove` - Remove integration")?;
    Ok(())
}
