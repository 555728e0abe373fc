use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use std::collections::{BTreeSet, VecDeque};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Only the tail of the transcript is summarised
const TAIL_LINES: usize = 10;

/// Tools whose `file_path` input counts as a modified file
pub const FILE_EDIT_TOOLS: [&str; 3] = ["Write", "Edit", "MultiEdit"];

/// Represents the message content
#[derive(Debug, Deserialize)]
struct Message {
    content: Option<Value>,
}

/// Represents a transcript line with message
#[derive(Debug, Deserialize)]
struct TranscriptLine {
    #[serde(rename = "type")]
    type_: Option<String>,
    message: Option<Message>,
}

/// What happened at the end of a session, as far as the transcript tail shows
#[derive(Debug, Default, PartialEq)]
pub struct SessionSummary {
    /// Most recent prompt typed by the user
    pub user_task: Option<String>,
    /// Tool name and use count, most used first
    pub tool_counts: Vec<(String, usize)>,
    /// Base names of edited files, sorted and deduplicated
    pub files_modified: Vec<String>,
}

/// Summarise the last lines of a JSONL transcript.
/// A missing file yields an empty summary; unparseable lines are skipped.
pub fn summarize(transcript_path: &str) -> Result<SessionSummary> {
    let path = Path::new(transcript_path);
    if transcript_path.is_empty() || !path.exists() {
        return Ok(SessionSummary::default());
    }

    let file = File::open(path)
        .with_context(|| format!("Failed to open transcript {}", path.display()))?;
    let reader = BufReader::new(file);

    let mut tail: VecDeque<String> = VecDeque::with_capacity(TAIL_LINES);
    for line in reader.lines() {
        let line = line?;
        if tail.len() == TAIL_LINES {
            tail.pop_front();
        }
        tail.push_back(line);
    }

    let mut summary = SessionSummary::default();
    let mut files = BTreeSet::new();

    for line in &tail {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let Ok(entry) = serde_json::from_str::<TranscriptLine>(line) else {
            continue;
        };
        let Some(content) = entry.message.and_then(|m| m.content) else {
            continue;
        };

        match entry.type_.as_deref() {
            Some("user") => {
                if let Some(text) = user_prompt_text(&content) {
                    summary.user_task = Some(text);
                }
            }
            Some("assistant") => {
                for item in content.as_array().into_iter().flatten() {
                    if item.get("type").and_then(Value::as_str) != Some("tool_use") {
                        continue;
                    }
                    let Some(name) = item.get("name").and_then(Value::as_str) else {
                        continue;
                    };
                    bump(&mut summary.tool_counts, name);

                    if FILE_EDIT_TOOLS.contains(&name) {
                        if let Some(file_name) = item
                            .get("input")
                            .and_then(|i| i.get("file_path"))
                            .and_then(Value::as_str)
                            .and_then(file_name)
                        {
                            files.insert(file_name);
                        }
                    }
                }
            }
            _ => {}
        }
    }

    // Stable sort keeps first-seen order among equal counts
    summary.tool_counts.sort_by(|a, b| b.1.cmp(&a.1));
    summary.files_modified = files.into_iter().collect();
    Ok(summary)
}

/// Text of a user prompt. Tool results are also recorded as "user" lines
/// and are not prompts.
fn user_prompt_text(content: &Value) -> Option<String> {
    match content {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Array(items) => {
            if items
                .iter()
                .any(|i| i.get("type").and_then(Value::as_str) == Some("tool_result"))
            {
                return None;
            }
            let text: Vec<&str> = items
                .iter()
                .filter(|i| i.get("type").and_then(Value::as_str) == Some("text"))
                .filter_map(|i| i.get("text").and_then(Value::as_str))
                .collect();
            let joined = text.join("\n");
            (!joined.trim().is_empty()).then_some(joined)
        }
        _ => None,
    }
}

fn bump(counts: &mut Vec<(String, usize)>, name: &str) {
    match counts.iter_mut().find(|(n, _)| n == name) {
        Some((_, count)) => *count += 1,
        None => counts.push((name.to_string(), 1)),
    }
}

/// Last path component of `path`, if any.
pub fn file_name(path: &str) -> Option<String> {
    Path::new(path)
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
}
