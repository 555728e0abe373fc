//! Claude Code hook entry points: read state, build an embed, post it once.
//!
//! Hooks never fail the host. Every path through [`run_hook`] ends in an
//! outcome that is logged, and the process exits zero.

use crate::config::Config;
use crate::embed::{self, NotificationPayload};
use crate::input::HookInput;
use crate::project::Project;
use crate::state::IntegrationState;
use crate::transcript;
use crate::webhook::{deliver, Delivery, WebhookTransport};
use clap::ValueEnum;
use tracing::{debug, error, info, warn};

/// The lifecycle events this integration binds to
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum HookKind {
    /// Claude finished responding (`Stop`)
    SessionComplete,
    /// Claude is waiting on the user (`Notification`)
    AttentionNeeded,
    /// A tool call finished (`PostToolUse`)
    PostToolUse,
}

impl HookKind {
    pub const ALL: [HookKind; 3] = [
        HookKind::SessionComplete,
        HookKind::AttentionNeeded,
        HookKind::PostToolUse,
    ];

    /// Event key in `settings.json`
    pub fn settings_key(self) -> &'static str {
        match self {
            HookKind::SessionComplete => "Stop",
            HookKind::AttentionNeeded => "Notification",
            HookKind::PostToolUse => "PostToolUse",
        }
    }

    /// Argument accepted by `claude-discord hook`
    pub fn cli_name(self) -> &'static str {
        match self {
            HookKind::SessionComplete => "session-complete",
            HookKind::AttentionNeeded => "attention-needed",
            HookKind::PostToolUse => "post-tool-use",
        }
    }

    fn label(self) -> &'static str {
        match self {
            HookKind::SessionComplete => "Session complete",
            HookKind::AttentionNeeded => "Input needed",
            HookKind::PostToolUse => "Work progress",
        }
    }
}

/// How a hook invocation ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookOutcome {
    /// No state file in the project
    NotConfigured,
    /// State exists but `active` is false
    Disabled,
    /// Active, but the webhook URL is empty or not a URL
    Misconfigured,
    /// Nothing worth posting for this event
    Skipped,
    Delivered(Delivery),
}

/// Run one hook against the project named by the event's `cwd`, or
/// `default_project` when the event has none.
pub fn run_hook(
    kind: HookKind,
    input: &HookInput,
    default_project: &Project,
    config: &Config,
    transport: &dyn WebhookTransport,
) -> HookOutcome {
    let project = match input.cwd.as_deref().filter(|c| !c.is_empty()) {
        Some(cwd) => Project::new(cwd),
        None => default_project.clone(),
    };
    let short_session = input.short_session();
    debug!(
        "{} hook: event={:?} session={}",
        kind.cli_name(),
        input.hook_event_name,
        short_session
    );

    if !project.has_state() {
        debug!("no discord state in {}", project.root().display());
        return HookOutcome::NotConfigured;
    }

    let state = IntegrationState::load(&project.state_path());
    if !state.active {
        debug!("discord notifications disabled for {}", project.name());
        return HookOutcome::Disabled;
    }

    let Some(url) = state.delivery_url() else {
        error!(
            "No valid webhook URL configured in {}",
            project.state_path().display()
        );
        return HookOutcome::Misconfigured;
    };

    let Some(payload) = build_payload(kind, input, config) else {
        return HookOutcome::Skipped;
    };

    let delivery = deliver(
        transport,
        &url,
        &payload,
        kind.label(),
        &state.target_label(),
        &short_session,
    );
    HookOutcome::Delivered(delivery)
}

fn build_payload(kind: HookKind, input: &HookInput, config: &Config) -> Option<NotificationPayload> {
    match kind {
        HookKind::SessionComplete => {
            // Claude is already continuing because of a Stop hook
            if input.stop_hook_active {
                debug!("stop hook already active, skipping");
                return None;
            }
            let path = input.transcript_path.as_deref().unwrap_or_default();
            let summary = transcript::summarize(path).unwrap_or_else(|e| {
                warn!("transcript parsing error: {:#}", e);
                transcript::SessionSummary::default()
            });
            debug!(
                "transcript {}: task={:?} tools={:?} files={:?}",
                path, summary.user_task, summary.tool_counts, summary.files_modified
            );
            Some(embed::session_complete(input, &summary))
        }
        HookKind::AttentionNeeded => Some(embed::attention_needed(input)),
        HookKind::PostToolUse => {
            let tool = input
                .tool_name
                .as_deref()
                .filter(|t| !t.is_empty())
                .unwrap_or("unknown");
            if config.should_notify(tool) {
                Some(embed::post_tool_use(tool, input))
            } else {
                info!("Tool used: {} - Session: {}", tool, input.short_session());
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::webhook::testing::RecordingTransport;
    use std::fs;
    use tempfile::TempDir;

    const WEBHOOK: &str = "https://discord.com/api/webhooks/1/abc";

    fn project_with_state(state: &str) -> (TempDir, Project) {
        let temp = TempDir::new().unwrap();
        let project = Project::new(temp.path());
        fs::create_dir_all(project.claude_dir()).unwrap();
        fs::write(project.state_path(), state).unwrap();
        (temp, project)
    }

    fn run(kind: HookKind, raw: &str, project: &Project, transport: &RecordingTransport) -> HookOutcome {
        run_hook(kind, &HookInput::parse(raw), project, &Config::default(), transport)
    }

    #[test]
    fn test_active_state_posts_session_prefix() {
        let (_temp, project) =
            project_with_state(&format!(r#"{{"active":true,"webhook_url":"{WEBHOOK}"}}"#));
        let transport = RecordingTransport::responding(204);

        let outcome = run(
            HookKind::AttentionNeeded,
            r#"{"session_id":"abcdef1234"}"#,
            &project,
            &transport,
        );

        assert_eq!(outcome, HookOutcome::Delivered(Delivery::Sent));
        let requests = transport.requests.borrow();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].0.as_str(), WEBHOOK);
        assert_eq!(requests[0].1.field("Session ID"), Some("abcdef12"));
    }

    #[test]
    fn test_inactive_state_suppresses_every_hook() {
        let (_temp, project) =
            project_with_state(&format!(r#"{{"active":false,"webhook_url":"{WEBHOOK}"}}"#));
        let transport = RecordingTransport::responding(204);

        for kind in HookKind::ALL {
            let outcome = run(
                kind,
                r#"{"session_id":"abcdef1234","tool_name":"Bash","message":"hi"}"#,
                &project,
                &transport,
            );
            assert_eq!(outcome, HookOutcome::Disabled);
        }
        assert_eq!(transport.count(), 0);
    }

    #[test]
    fn test_missing_and_malformed_state() {
        let temp = TempDir::new().unwrap();
        let transport = RecordingTransport::responding(204);
        let bare = Project::new(temp.path());
        assert_eq!(
            run(HookKind::SessionComplete, "{}", &bare, &transport),
            HookOutcome::NotConfigured
        );

        let (_t, broken) = project_with_state("{ not json");
        assert_eq!(
            run(HookKind::SessionComplete, "{}", &broken, &transport),
            HookOutcome::Disabled
        );
        assert_eq!(transport.count(), 0);
    }

    #[test]
    fn test_active_without_url_is_treated_as_disabled() {
        let transport = RecordingTransport::responding(204);
        for state in [
            r#"{"active":true}"#,
            r#"{"active":true,"webhook_url":""}"#,
            r#"{"active":true,"webhook_url":"discord please"}"#,
        ] {
            let (_temp, project) = project_with_state(state);
            assert_eq!(
                run(HookKind::AttentionNeeded, "{}", &project, &transport),
                HookOutcome::Misconfigured
            );
        }
        assert_eq!(transport.count(), 0);
    }

    #[test]
    fn test_thread_id_and_cwd_from_event() {
        let (temp, _project) = project_with_state(&format!(
            r#"{{"active":true,"webhook_url":"{WEBHOOK}","thread_id":"777"}}"#
        ));
        let elsewhere = TempDir::new().unwrap();
        let transport = RecordingTransport::responding(204);

        let raw = format!(
            r#"{{"session_id":"s","cwd":"{}"}}"#,
            temp.path().display()
        );
        let outcome = run(
            HookKind::AttentionNeeded,
            &raw,
            &Project::new(elsewhere.path()),
            &transport,
        );

        assert_eq!(outcome, HookOutcome::Delivered(Delivery::Sent));
        assert_eq!(
            transport.requests.borrow()[0].0.as_str(),
            format!("{WEBHOOK}?thread_id=777")
        );
    }

    #[test]
    fn test_post_tool_use_filters_minor_tools() {
        let (_temp, project) =
            project_with_state(&format!(r#"{{"active":true,"webhook_url":"{WEBHOOK}"}}"#));
        let transport = RecordingTransport::responding(204);

        assert_eq!(
            run(HookKind::PostToolUse, r#"{"tool_name":"Read"}"#, &project, &transport),
            HookOutcome::Skipped
        );
        assert_eq!(
            run(HookKind::PostToolUse, r#"{}"#, &project, &transport),
            HookOutcome::Skipped
        );
        assert_eq!(
            run(
                HookKind::PostToolUse,
                r#"{"tool_name":"Edit","tool_input":{"file_path":"/p/lib.rs"}}"#,
                &project,
                &transport
            ),
            HookOutcome::Delivered(Delivery::Sent)
        );

        let requests = transport.requests.borrow();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].1.embeds[0].description, "📝 Modified lib.rs");
        assert_eq!(requests[0].1.field("Tool"), Some("Edit"));
    }

    #[test]
    fn test_stop_hook_loop_guard() {
        let (_temp, project) =
            project_with_state(&format!(r#"{{"active":true,"webhook_url":"{WEBHOOK}"}}"#));
        let transport = RecordingTransport::responding(204);

        assert_eq!(
            run(
                HookKind::SessionComplete,
                r#"{"stop_hook_active":true}"#,
                &project,
                &transport
            ),
            HookOutcome::Skipped
        );
        assert_eq!(transport.count(), 0);
    }

    #[test]
    fn test_unreachable_webhook_is_not_an_error() {
        let (_temp, project) =
            project_with_state(&format!(r#"{{"active":true,"webhook_url":"{WEBHOOK}"}}"#));
        let transport = RecordingTransport::unreachable();

        let outcome = run(HookKind::SessionComplete, "{}", &project, &transport);
        assert!(matches!(
            outcome,
            HookOutcome::Delivered(Delivery::Failed(_))
        ));
    }

    #[test]
    fn test_kind_names() {
        let keys: Vec<_> = HookKind::ALL.iter().map(|k| k.settings_key()).collect();
        assert_eq!(keys, ["Stop", "Notification", "PostToolUse"]);
        for kind in HookKind::ALL {
            let parsed = HookKind::from_str(kind.cli_name(), false).unwrap();
            assert_eq!(parsed, kind);
        }
    }
}
