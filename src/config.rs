use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_content_api_url")]
    pub content_api_url: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub offline: bool,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_race_words")]
    pub race_words: Vec<String>,
    #[serde(default = "default_shooter_words")]
    pub shooter_words: Vec<String>,
}

fn default_content_api_url() -> String {
    "http://127.0.0.1:5000".to_string()
}
fn default_request_timeout_secs() -> u64 {
    10
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_race_words() -> Vec<String> {
    [
        "javascript",
        "python",
        "react",
        "coding",
        "typing",
        "keyboard",
        "computer",
        "program",
        "function",
        "variable",
    ]
    .iter()
    .map(|w| w.to_string())
    .collect()
}
fn default_shooter_words() -> Vec<String> {
    ["bug", "code", "app", "web", "css", "html", "js", "api", "git", "npm"]
        .iter()
        .map(|w| w.to_string())
        .collect()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            content_api_url: default_content_api_url(),
            request_timeout_secs: default_request_timeout_secs(),
            offline: false,
            log_level: default_log_level(),
            race_words: default_race_words(),
            shooter_words: default_shooter_words(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            Self::from_toml(&content)
        } else {
            Ok(Config::default())
        }
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let mut config: Config = toml::from_str(content)?;
        config.validate();
        Ok(config)
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("typearcade")
            .join("config.toml")
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Fill empty word lists from defaults and keep the timeout sane.
    pub fn validate(&mut self) {
        self.race_words = clean_words(&self.race_words);
        if self.race_words.is_empty() {
            self.race_words = default_race_words();
        }
        self.shooter_words = clean_words(&self.shooter_words);
        if self.shooter_words.is_empty() {
            self.shooter_words = default_shooter_words();
        }
        self.request_timeout_secs = self.request_timeout_secs.clamp(1, 120);
    }
}

fn clean_words(words: &[String]) -> Vec<String> {
    words
        .iter()
        .map(|w| w.trim().to_string())
        .filter(|w| !w.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_serde_defaults_from_empty() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.content_api_url, "http://127.0.0.1:5000");
        assert_eq!(config.request_timeout_secs, 10);
        assert!(!config.offline);
        assert_eq!(config.race_words.len(), 10);
        assert!(config.shooter_words.contains(&"npm".to_string()));
    }

    #[test]
    fn test_config_partial_file() {
        let toml_str = r#"
content_api_url = "http://example.test:8080"
offline = true
race_words = ["rust", "cargo"]
"#;
        let config = Config::from_toml(toml_str).unwrap();
        assert_eq!(config.content_api_url, "http://example.test:8080");
        assert!(config.offline);
        assert_eq!(config.race_words, vec!["rust", "cargo"]);
        assert_eq!(config.shooter_words.len(), 10);
    }

    #[test]
    fn test_validate_replaces_blank_word_lists() {
        let config = Config::from_toml("race_words = [\"  \", \"\"]\nshooter_words = []").unwrap();
        assert_eq!(config.race_words, default_race_words());
        assert_eq!(config.shooter_words, default_shooter_words());
    }

    #[test]
    fn test_validate_clamps_timeout() {
        let config = Config::from_toml("request_timeout_secs = 0").unwrap();
        assert_eq!(config.request_timeout_secs, 1);
        let config = Config::from_toml("request_timeout_secs = 9000").unwrap();
        assert_eq!(config.request_timeout(), Duration::from_secs(120));
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let config = Config::default();
        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized = Config::from_toml(&serialized).unwrap();
        assert_eq!(config.content_api_url, deserialized.content_api_url);
        assert_eq!(config.race_words, deserialized.race_words);
    }
}
