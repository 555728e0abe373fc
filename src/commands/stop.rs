use super::start::require_state;
use super::{status_line, success, CHANNEL, THREAD};
use crate::project::Project;
use anyhow::Result;
use std::io::Write;

/// Disable notifications, keeping the rest of the configuration.
pub fn run(project: &Project, out: &mut dyn Write) -> Result<()> {
    let mut state = require_state(project)?;

    state.active = false;
    state.save(&project.state_path())?;

    success(
        out,
        &format!(
            "Discord notifications disabled for project: {}",
            project.name()
        ),
    )?;
    writeln!(out)?;
    writeln!(out, "Discord notifications are now **disabled**")?;
    writeln!(out)?;

    match state.thread() {
        Some(thread) => status_line(
            out,
            "Previous target",
            &format!("Thread ({})", thread),
            THREAD,
        )?,
        None => status_line(out, "Previous target", "Channel", CHANNEL)?,
    }

    writeln!(out)?;
    writeln!(out, "**To re-enable notifications:**")?;
    writeln!(out, "- `claude-discord start` - Enable for channel")?;
    writeln!(out, "- `claude-discord start THREAD_ID` - Enable for specific thread")?;
    writeln!(out)?;
    writeln!(out, "**Other commands:**")?;
    writeln!(out, "- `claude-discord status` - Check current state")?;
    writeln!(out, "- `claude-discord setup` - Reconfigure Discord integration")?;
    writeln!(out, "- `claude-discord remove` - Remove integration completely")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{output, project, WEBHOOK};
    use super::*;
    use crate::state::IntegrationState;
    use std::fs;

    #[test]
    fn test_stop_deactivates_and_keeps_config() {
        let (_temp, project) = project();
        fs::create_dir_all(project.claude_dir()).unwrap();
        fs::write(
            project.state_path(),
            format!(r#"{{"active":true,"webhook_url":"{WEBHOOK}","thread_id":"8","auth_token":"t"}}"#),
        )
        .unwrap();
        let mut out = Vec::new();

        run(&project, &mut out).unwrap();

        let state = IntegrationState::load(&project.state_path());
        assert!(!state.active);
        assert_eq!(state.webhook_url, WEBHOOK);
        assert_eq!(state.thread(), Some("8"));
        assert!(state.has_auth());
        assert!(output(out).contains("Thread (8)"));
    }

    #[test]
    fn test_stop_twice_is_idempotent() {
        let (_temp, project) = project();
        fs::create_dir_all(project.claude_dir()).unwrap();
        fs::write(
            project.state_path(),
            format!(r#"{{"active":true,"webhook_url":"{WEBHOOK}"}}"#),
        )
        .unwrap();

        run(&project, &mut Vec::new()).unwrap();
        let first = fs::read_to_string(project.state_path()).unwrap();
        run(&project, &mut Vec::new()).unwrap();
        assert_eq!(fs::read_to_string(project.state_path()).unwrap(), first);
    }

    #[test]
    fn test_stop_without_setup_fails() {
        let (_temp, project) = project();
        assert!(run(&project, &mut Vec::new()).is_err());
    }
}
