use crate::project::Project;
use crate::state::IntegrationState;
use anyhow::Result;
use serde_json::Value;
use std::io::Write;

/// Print one value from the state file for shell scripts: booleans as
/// `true`/`false`, strings bare, `default` when the key is absent.
pub fn get(project: &Project, key: &str, default: &str, out: &mut dyn Write) -> Result<()> {
    let state = IntegrationState::load(&project.state_path());
    let rendered = match state.get(key) {
        Some(Value::String(s)) => s,
        Some(Value::Null) | None => default.to_string(),
        Some(other) => other.to_string(),
    };
    writeln!(out, "{}", rendered)?;
    Ok(())
}
