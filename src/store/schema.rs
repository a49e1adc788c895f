use serde::{Deserialize, Serialize};

use crate::engine::metrics::BestWpm;

pub const SCHEMA_VERSION: u32 = 1;

fn default_theme() -> String {
    "dark".to_string()
}

/// Process-wide settings that survive restarts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default = "schema_version")]
    pub schema_version: u32,
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default)]
    pub best_wpm: BestWpm,
    #[serde(default)]
    pub disable_backspace_typing: bool,
    #[serde(default)]
    pub disable_backspace_html: bool,
}

fn schema_version() -> u32 {
    SCHEMA_VERSION
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            theme: default_theme(),
            best_wpm: BestWpm::default(),
            disable_backspace_typing: false,
            disable_backspace_html: false,
        }
    }
}
