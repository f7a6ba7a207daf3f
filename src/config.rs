use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::domain::Currency;

/// User settings read from a JSON file. Every field is optional in the file;
/// command-line flags override what is loaded here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub currency: Currency,
    /// How many transactions the `recent` command shows
    pub recent_limit: usize,
    /// Notes longer than this are cut in list views
    pub note_preview_len: usize,
    /// Snapshot (JSON) or transactions (CSV) file loaded at start-up
    pub seed: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            currency: Currency::default(),
            recent_limit: 5,
            note_preview_len: 50,
            seed: None,
        }
    }
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let settings: Settings = serde_json::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;

        debug!(path = %path.display(), ?settings, "Loaded settings");
        Ok(settings)
    }
}
