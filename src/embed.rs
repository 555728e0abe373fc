use crate::input::HookInput;
use crate::transcript::{file_name, SessionSummary, FILE_EDIT_TOOLS};
use serde::Serialize;

const COLOR_GREEN: u32 = 5_763_719;
const COLOR_BLUE: u32 = 3_447_003;
const COLOR_GOLD: u32 = 15_844_367;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Bullet lists in embeds show at most this many items
const MAX_BULLETS: usize = 3;

/// Webhook body (Discord "execute webhook" JSON)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NotificationPayload {
    pub embeds: Vec<Embed>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Embed {
    pub title: String,
    pub description: String,
    pub color: u32,
    pub fields: Vec<EmbedField>,
    pub footer: EmbedFooter,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmbedFooter {
    pub text: String,
}

impl EmbedField {
    fn new(name: &str, value: impl Into<String>, inline: bool) -> Self {
        Self {
            name: name.to_string(),
            value: value.into(),
            inline,
        }
    }
}

impl NotificationPayload {
    fn single(embed: Embed) -> Self {
        Self {
            embeds: vec![embed],
        }
    }
}

#[cfg(test)]
impl NotificationPayload {
    /// Value of the named field in the first embed.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.embeds
            .first()?
            .fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value.as_str())
    }
}

/// Truncate to `max_chars` characters, appending "..." when cut.
pub fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

fn now() -> String {
    chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
}

fn bullets<'a>(items: impl Iterator<Item = &'a str>) -> String {
    let lines: Vec<String> = items
        .take(MAX_BULLETS)
        .map(|item| format!("• {}", item))
        .collect();
    if lines.is_empty() {
        "None".to_string()
    } else {
        lines.join("\n")
    }
}

/// Embed for the Stop event (task finished).
pub fn session_complete(input: &HookInput, summary: &SessionSummary) -> NotificationPayload {
    let mut task = summary.user_task.clone();
    if task.is_none() {
        task = input.tool_name.as_ref().map(|t| format!("Used {} tool", t));
    }
    let description = match task {
        Some(t) => truncate(&t, 150),
        None => "Session completed successfully".to_string(),
    };

    let tool_lines: Vec<String> = summary
        .tool_counts
        .iter()
        .map(|(name, count)| format!("{}x {}", count, name))
        .collect();
    let tools = if tool_lines.is_empty() {
        bullets(input.tool_name.as_deref().into_iter())
    } else {
        bullets(tool_lines.iter().map(String::as_str))
    };

    let fallback_file = input.tool_input_str("file_path").and_then(file_name);
    let files = if summary.files_modified.is_empty() {
        bullets(fallback_file.as_deref().into_iter())
    } else {
        bullets(summary.files_modified.iter().map(String::as_str))
    };

    NotificationPayload::single(Embed {
        title: "✅ Session Complete".to_string(),
        description,
        color: COLOR_GREEN,
        fields: vec![
            EmbedField::new("Session ID", input.short_session(), true),
            EmbedField::new("Timestamp", now(), true),
            EmbedField::new("Tools Used", tools, false),
            EmbedField::new("Files Modified", files, false),
        ],
        footer: EmbedFooter {
            text: "Claude Code - Session Complete".to_string(),
        },
    })
}

/// Embed for the Notification event (Claude is waiting on the user).
pub fn attention_needed(input: &HookInput) -> NotificationPayload {
    let message = input
        .message
        .as_deref()
        .filter(|m| !m.is_empty())
        .unwrap_or("Claude needs your attention");
    let source = input
        .title
        .as_deref()
        .filter(|t| !t.is_empty())
        .unwrap_or("Claude Code");

    NotificationPayload::single(Embed {
        title: "🔔 Input Needed".to_string(),
        description: truncate(message, 200),
        color: COLOR_BLUE,
        fields: vec![
            EmbedField::new("Session ID", input.short_session(), true),
            EmbedField::new("Timestamp", now(), true),
            EmbedField::new("Source", source, true),
        ],
        footer: EmbedFooter {
            text: "Claude Code - Input Required".to_string(),
        },
    })
}

/// One-line description of what a tool call did.
pub fn describe_tool(tool_name: &str, input: &HookInput) -> String {
    let target_file = || {
        input
            .tool_input_str("file_path")
            .and_then(file_name)
            .unwrap_or_else(|| "file".to_string())
    };

    match tool_name {
        t if FILE_EDIT_TOOLS.contains(&t) => format!("📝 Modified {}", target_file()),
        "Bash" => format!(
            "⚡ Executed: {}",
            truncate(input.tool_input_str("command").unwrap_or_default(), 50)
        ),
        "Read" => format!("📖 Read {}", target_file()),
        "TodoWrite" | "TodoRead" => "📋 Updated task list".to_string(),
        "WebFetch" | "WebSearch" => "🌐 Web research".to_string(),
        "Glob" | "Grep" => "🔍 Code search".to_string(),
        other => format!("🔧 Used {}", other),
    }
}

/// Embed for the PostToolUse event (work in progress).
pub fn post_tool_use(tool_name: &str, input: &HookInput) -> NotificationPayload {
    NotificationPayload::single(Embed {
        title: "⚡ Work in Progress".to_string(),
        description: describe_tool(tool_name, input),
        color: COLOR_GOLD,
        fields: vec![
            EmbedField::new("Session ID", input.short_session(), true),
            EmbedField::new("Tool", tool_name, true),
            EmbedField::new("Timestamp", now(), true),
        ],
        footer: EmbedFooter {
            text: "Claude Code - Working...".to_string(),
        },
    })
}
