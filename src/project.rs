use anyhow::{Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};

const CLAUDE_DIR: &str = ".claude";
const STATE_FILENAME: &str = "discord-state.json";
const SETTINGS_FILENAME: &str = "settings.json";

/// A project directory that may carry a Discord integration.
#[derive(Debug, Clone)]
pub struct Project {
    root: PathBuf,
}

impl Project {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Project rooted at the process working directory.
    pub fn current() -> Result<Self> {
        let root = std::env::current_dir().context("Failed to determine working directory")?;
        Ok(Self::new(root))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory name of the project root, used as the display name.
    pub fn name(&self) -> String {
        self.root
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "unknown".to_string())
    }

    pub fn claude_dir(&self) -> PathBuf {
        self.root.join(CLAUDE_DIR)
    }

    pub fn state_path(&self) -> PathBuf {
        self.claude_dir().join(STATE_FILENAME)
    }

    pub fn settings_path(&self) -> PathBuf {
        self.claude_dir().join(SETTINGS_FILENAME)
    }

    pub fn has_state(&self) -> bool {
        self.state_path().exists()
    }

    pub fn ensure_claude_dir(&self) -> Result<()> {
        let dir = self.claude_dir();
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create {}", dir.display()))
    }
}

/// Write bytes to `path` through a temp file in the same directory, then
/// rename over the target so readers never see a partial document.
pub fn atomic_write(path: &Path, data: &[u8]) -> Result<()> {
    let parent = path
        .parent()
        .with_context(|| format!("{} has no parent directory", path.display()))?;
    std::fs::create_dir_all(parent)
        .with_context(|| format!("Failed to create {}", parent.display()))?;

    let mut tmp = tempfile::NamedTempFile::new_in(parent)
        .with_context(|| format!("Failed to create temp file in {}", parent.display()))?;
    tmp.write_all(data)
        .with_context(|| format!("Failed to write temp file for {}", path.display()))?;
    tmp.persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("Failed to replace {}", path.display()))?;
    Ok(())
}
