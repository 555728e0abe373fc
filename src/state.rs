use crate::project::atomic_write;
use anyhow::{Context, Result};
use regex::Regex;
use reqwest::Url;
use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::path::Path;
use std::sync::LazyLock;
use tracing::warn;

static WEBHOOK_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"^https://(?:discord|discordapp)\.com/api/webhooks/\d+/[A-Za-z0-9_-]+$").ok()
});

static WEBHOOK_PREFIX: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"^(https://(?:discord|discordapp)\.com/api/webhooks/\d+)/").ok()
});

/// Persisted Discord integration settings for one project
/// (`.claude/discord-state.json`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IntegrationState {
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub webhook_url: String,
    #[serde(default)]
    pub project_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,
    /// Other writers may store the thread id as a JSON number
    #[serde(
        default,
        deserialize_with = "string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub thread_id: Option<String>,
    /// Keys written by other tools, kept as-is
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl IntegrationState {
    /// Fresh state as written by setup. Notifications start disabled.
    pub fn new(
        webhook_url: impl Into<String>,
        project_name: impl Into<String>,
        auth_token: Option<String>,
        thread_id: Option<String>,
    ) -> Self {
        Self {
            active: false,
            webhook_url: webhook_url.into(),
            project_name: project_name.into(),
            auth_token: auth_token.filter(|s| !s.is_empty()),
            thread_id: thread_id.filter(|s| !s.is_empty()),
            extra: Map::new(),
        }
    }

    /// Load the state file. Missing or malformed files load as the empty state.
    pub fn load(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(_) => return Self::default(),
        };
        match serde_json::from_str(&content) {
            Ok(state) => state,
            Err(e) => {
                warn!("ignoring malformed state file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize state")?;
        atomic_write(path, json.as_bytes())
            .with_context(|| format!("Failed to save state to {}", path.display()))
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn thread(&self) -> Option<&str> {
        self.thread_id.as_deref().filter(|t| !t.is_empty())
    }

    pub fn has_auth(&self) -> bool {
        self.auth_token.as_deref().is_some_and(|t| !t.is_empty())
    }

    /// Human-readable delivery target, e.g. "thread 123" or "channel".
    pub fn target_label(&self) -> String {
        match self.thread() {
            Some(id) => format!("thread {}", id),
            None => "channel".to_string(),
        }
    }

    /// The webhook parses as an absolute http(s) URL.
    pub fn webhook_is_url_shaped(&self) -> bool {
        parse_http_url(&self.webhook_url).is_some()
    }

    /// URL to post to, with the thread id appended when one is set.
    /// None when the webhook is not URL-shaped.
    pub fn delivery_url(&self) -> Option<Url> {
        let mut url = parse_http_url(&self.webhook_url)?;
        if let Some(thread) = self.thread() {
            url.query_pairs_mut().append_pair("thread_id", thread);
        }
        Some(url)
    }

    /// Look up a single key as it appears in the state file.
    pub fn get(&self, key: &str) -> Option<Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map.get(key).cloned(),
            _ => None,
        }
    }
}

fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(de::Error::custom(format!(
            "expected a string or number, got {}",
            other
        ))),
    }
}

fn parse_http_url(raw: &str) -> Option<Url> {
    let url = Url::parse(raw.trim()).ok()?;
    matches!(url.scheme(), "http" | "https").then_some(url)
}

/// True if `url` is a Discord webhook URL (`https://discord.com/api/webhooks/<id>/<token>`).
pub fn validate_webhook_url(url: &str) -> bool {
    WEBHOOK_PATTERN
        .as_ref()
        .is_some_and(|re| re.is_match(url))
}

/// Hide the webhook token for display.
pub fn mask_webhook_url(url: &str) -> String {
    if url.is_empty() {
        return "Not configured".to_string();
    }
    WEBHOOK_PREFIX
        .as_ref()
        .and_then(|re| re.captures(url))
        .and_then(|caps| caps.get(1))
        .map(|m| format!("{}/...", m.as_str()))
        .unwrap_or_else(|| "Invalid URL".to_string())
}
