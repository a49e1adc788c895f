use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::store::schema::Preferences;

const PREFERENCES_FILE: &str = "preferences.json";

/// Preferences persisted as pretty JSON under the user's data directory.
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    pub fn new() -> Result<Self> {
        let base_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("typearcade");
        Self::with_base_dir(base_dir)
    }

    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base_dir)
            .with_context(|| format!("creating {}", base_dir.display()))?;
        Ok(Self {
            path: base_dir.join(PREFERENCES_FILE),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Missing, unreadable and corrupt files all yield defaults.
    pub fn load_preferences(&self) -> Preferences {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Preferences::default(),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "failed to read preferences");
                return Preferences::default();
            }
        };
        serde_json::from_str(&content).unwrap_or_else(|e| {
            warn!(path = %self.path.display(), error = %e, "corrupt preferences, using defaults");
            Preferences::default()
        })
    }

    /// Replaces the file atomically: write and sync a sibling temp file, then
    /// rename it over the old one.
    pub fn save_preferences(&self, prefs: &Preferences) -> Result<()> {
        let tmp = self.path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(prefs)?;
        let mut file =
            fs::File::create(&tmp).with_context(|| format!("creating {}", tmp.display()))?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("replacing {}", self.path.display()))?;
        debug!(path = %self.path.display(), "preferences saved");
        Ok(())
    }
}
