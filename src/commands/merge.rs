use super::success;
use crate::config::Config;
use crate::project::Project;
use crate::settings;
use anyhow::Result;
use std::io::Write;
use std::path::Path;

/// Merge the Discord hook bindings into `settings_file`, or into the
/// project's settings.json when none is given.
pub fn run(
    project: &Project,
    config: &Config,
    settings_file: Option<&Path>,
    out: &mut dyn Write,
) -> Result<()> {
    let path = match settings_file {
        Some(p) => p.to_path_buf(),
        None => project.settings_path(),
    };
    settings::merge_hooks_file(&path, &config.hook_command()?)?;
    success(out, "Discord hooks merged successfully")?;
    Ok(())
}
