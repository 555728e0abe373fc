use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

/// Session id used when the host does not send one
pub const UNKNOWN_SESSION: &str = "unknown";

/// Input JSON from Claude Code hook system.
/// Every field is optional; the hooks must cope with partial payloads.
#[derive(Debug, Default, Deserialize)]
pub struct HookInput {
    pub hook_event_name: Option<String>,
    pub cwd: Option<String>,
    pub session_id: Option<String>,
    pub transcript_path: Option<String>,
    /// Notification text (Notification events)
    pub message: Option<String>,
    /// Notification source title (Notification events)
    pub title: Option<String>,
    /// Tool name (only present for PreToolUse/PostToolUse events)
    pub tool_name: Option<String>,
    pub tool_input: Option<Value>,
    /// Set when Claude is already continuing because of a Stop hook
    #[serde(default)]
    pub stop_hook_active: bool,
}

impl HookInput {
    /// Parse hook input, treating empty or malformed JSON as `{}`.
    pub fn parse(raw: &str) -> Self {
        if raw.trim().is_empty() {
            return Self::default();
        }
        match serde_json::from_str(raw) {
            Ok(input) => input,
            Err(e) => {
                debug!("hook input is not valid JSON ({}), using empty input", e);
                Self::default()
            }
        }
    }

    pub fn session_id(&self) -> &str {
        self.session_id
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(UNKNOWN_SESSION)
    }

    /// First 8 characters of the session id.
    pub fn short_session(&self) -> String {
        self.session_id().chars().take(8).collect()
    }

    /// String field from `tool_input`, if the input is an object carrying it.
    pub fn tool_input_str(&self, key: &str) -> Option<&str> {
        self.tool_input
            .as_ref()
            .and_then(|v| v.get(key))
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_post_tool_use() {
        let input = HookInput::parse(
            r#"{"hook_event_name":"PostToolUse","cwd":"/tmp/p","session_id":"abcdef1234",
                "transcript_path":"/tmp/t.jsonl","tool_name":"Edit",
                "tool_input":{"file_path":"/tmp/p/src/main.rs"}}"#,
        );
        assert_eq!(input.hook_event_name.as_deref(), Some("PostToolUse"));
        assert_eq!(input.short_session(), "abcdef12");
        assert_eq!(input.tool_input_str("file_path"), Some("/tmp/p/src/main.rs"));
        assert_eq!(input.tool_input_str("command"), None);
        assert!(!input.stop_hook_active);
    }

    #[test]
    fn test_parse_empty_and_malformed() {
        for raw in ["", "   \n", "not json", "[1,2,3]"] {
            let input = HookInput::parse(raw);
            assert_eq!(input.session_id(), UNKNOWN_SESSION);
            assert!(input.tool_name.is_none());
        }
    }

    #[test]
    fn test_short_session_is_char_based() {
        let input = HookInput::parse(r#"{"session_id":"ééééééééxyz"}"#);
        assert_eq!(input.short_session(), "éééééééé");

        let short = HookInput::parse(r#"{"session_id":"abc"}"#);
        assert_eq!(short.short_session(), "abc");
    }

    #[test]
    fn test_tool_input_non_object() {
        let input = HookInput::parse(r#"{"tool_name":"Bash","tool_input":"ls"}"#);
        assert_eq!(input.tool_input_str("command"), None);
    }
}
