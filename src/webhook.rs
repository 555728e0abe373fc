use crate::embed::NotificationPayload;
use anyhow::{Context, Result};
use reqwest::blocking::Client;
use reqwest::Url;
use tracing::{error, info};

/// Sends a payload to a webhook URL and reports the HTTP status.
pub trait WebhookTransport {
    fn post(&self, url: &Url, payload: &NotificationPayload) -> Result<u16>;
}

/// Blocking reqwest client with network-default timeouts.
#[derive(Debug, Default)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

impl WebhookTransport for HttpTransport {
    fn post(&self, url: &Url, payload: &NotificationPayload) -> Result<u16> {
        let response = self
            .client
            .post(url.clone())
            .json(payload)
            .send()
            .map_err(reqwest::Error::without_url)
            .with_context(|| format!("request to {} failed", redact(url)))?;
        Ok(response.status().as_u16())
    }
}

/// Result of a single delivery attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    Sent,
    Rejected(u16),
    Failed(String),
}

/// Post once and log the outcome. Never returns an error: a failed
/// notification must not fail the hook.
pub fn deliver(
    transport: &dyn WebhookTransport,
    url: &Url,
    payload: &NotificationPayload,
    label: &str,
    target: &str,
    short_session: &str,
) -> Delivery {
    match transport.post(url, payload) {
        Ok(status) if (200..300).contains(&status) => {
            info!("{} notification sent to {} - Session: {}", label, target, short_session);
            Delivery::Sent
        }
        Ok(status) => {
            error!(
                "{} notification failed (HTTP {}) to {} - Session: {}",
                label, status, target, short_session
            );
            Delivery::Rejected(status)
        }
        Err(e) => {
            error!(
                "{} notification failed ({:#}) to {} - Session: {}",
                label, e, target, short_session
            );
            Delivery::Failed(format!("{:#}", e))
        }
    }
}

/// Webhook URL without its token, for log lines.
fn redact(url: &Url) -> String {
    let mut segments: Vec<&str> = url
        .path_segments()
        .map(|s| s.collect())
        .unwrap_or_default();
    if segments.len() > 1 {
        segments.pop();
        segments.push("...");
    }
    format!(
        "{}://{}/{}",
        url.scheme(),
        url.host_str().unwrap_or_default(),
        segments.join("/")
    )
}
