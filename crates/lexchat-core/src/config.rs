//! Configuration management for lexchat.
//!
//! Loads configuration from ${LEXCHAT_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::prompts;

/// Returns the default config template with comments.
///
/// This is embedded from default_config.toml at compile time.
fn default_config_template() -> &'static str {
    include_str!("../default_config.toml")
}

pub mod paths {
    //! Path resolution for lexchat configuration and data directories.
    //!
    //! LEXCHAT_HOME resolution order:
    //! 1. LEXCHAT_HOME environment variable (if set)
    //! 2. ~/.config/lexchat (default)
    //! 3. ./.lexchat when no home directory can be determined

    use std::path::PathBuf;

    /// Returns the lexchat home directory.
    pub fn lexchat_home() -> PathBuf {
        if let Ok(home) = std::env::var("LEXCHAT_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir().map_or_else(
            || PathBuf::from(".lexchat"),
            |h| h.join(".config").join("lexchat"),
        )
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        lexchat_home().join("config.toml")
    }

    /// Returns the directory for log files.
    pub fn logs_dir() -> PathBuf {
        lexchat_home().join("logs")
    }
}

/// Document seeding configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    /// Assistant message appended locally once a document session is seeded.
    pub acknowledgment: String,
    /// Title for seeded sessions when the handoff carries no document name.
    pub document_title: String,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            acknowledgment: prompts::SEED_ACKNOWLEDGMENT.to_string(),
            document_title: prompts::SEED_DOCUMENT_TITLE.to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Filter directive (overridden by LEXCHAT_LOG).
    pub level: String,
    /// Log file name under ${LEXCHAT_HOME}/logs. Empty disables file logging.
    pub file: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: "lexchat.log".to_string(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the backend API (including the version prefix).
    pub base_url: String,

    /// Bearer token for the backend (LEXCHAT_API_TOKEN wins when set).
    pub api_token: Option<String>,

    /// Per-request timeout in seconds (0 disables).
    pub request_timeout_secs: u32,

    /// Title sent when a conversation is created implicitly by a first send.
    pub default_title: String,

    /// Number of sessions requested per list call.
    pub page_size: u32,

    #[serde(default)]
    pub seed: SeedConfig,

    #[serde(default)]
    pub log: LogConfig,
}

impl Config {
    const DEFAULT_BASE_URL: &str = "http://localhost:8000/api/v1";
    const DEFAULT_TIMEOUT_SECS: u32 = 120;
    const DEFAULT_TITLE: &str = "New Conversation";
    const DEFAULT_PAGE_SIZE: u32 = 20;
    /// Backend rejects page sizes above this.
    const MAX_PAGE_SIZE: u32 = 100;

    /// Loads configuration from the default config path and applies env overrides.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&paths::config_path())?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Some(url) = non_empty_env("LEXCHAT_BASE_URL") {
            self.base_url = url;
        }
        if let Some(token) = non_empty_env("LEXCHAT_API_TOKEN") {
            self.api_token = Some(token);
        }
    }

    /// Returns the bearer token if one is configured and non-empty.
    pub fn effective_api_token(&self) -> Option<&str> {
        self.api_token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        if self.request_timeout_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(u64::from(self.request_timeout_secs)))
        }
    }

    /// Page size clamped to what the backend accepts.
    pub fn effective_page_size(&self) -> u32 {
        self.page_size.clamp(1, Self::MAX_PAGE_SIZE)
    }

    /// Creates a default config file at the given path.
    /// Returns an error if the file already exists.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }

        Self::write_config(path, default_config_template())
    }

    /// Writes config content to a file, creating parent directories as needed.
    /// Uses atomic write (temp file + rename) to prevent corruption.
    fn write_config(path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let tmp_path = path.with_extension("toml.tmp");
        fs::write(&tmp_path, content)
            .with_context(|| format!("Failed to write config to {}", tmp_path.display()))?;
        fs::rename(&tmp_path, path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                tmp_path.display(),
                path.display()
            )
        })?;

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            api_token: None,
            request_timeout_secs: Self::DEFAULT_TIMEOUT_SECS,
            default_title: Self::DEFAULT_TITLE.to_string(),
            page_size: Self::DEFAULT_PAGE_SIZE,
            seed: SeedConfig::default(),
            log: LogConfig::default(),
        }
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_load_missing_file_returns_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("nonexistent.toml");

        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config.base_url, "http://localhost:8000/api/v1");
        assert_eq!(config.api_token, None);
        assert_eq!(config.page_size, 20);
    }

    #[test]
    fn test_load_partial_config_merges_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");

        fs::write(
            &config_path,
            "base_url = \"https://legal.example.com/api/v1\"\n[seed]\nacknowledgment = \"Got it.\"\n",
        )
        .unwrap();

        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config.base_url, "https://legal.example.com/api/v1");
        assert_eq!(config.seed.acknowledgment, "Got it.");
        assert_eq!(config.seed.document_title, prompts::SEED_DOCUMENT_TITLE);
        assert_eq!(config.default_title, "New Conversation");
    }

    #[test]
    fn test_default_template_parses_to_defaults() {
        let config: Config = toml::from_str(default_config_template()).unwrap();
        let defaults = Config::default();
        assert_eq!(config.base_url, defaults.base_url);
        assert_eq!(config.request_timeout_secs, defaults.request_timeout_secs);
        assert_eq!(config.page_size, defaults.page_size);
    }

    #[test]
    fn test_init_creates_config_with_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("subdir").join("config.toml");

        Config::init(&config_path).unwrap();

        assert!(config_path.exists());
        let contents = fs::read_to_string(&config_path).unwrap();
        assert!(contents.contains("base_url ="));
        assert!(contents.contains("# api_token ="));
    }

    #[test]
    fn test_init_fails_if_exists() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");

        fs::write(&config_path, "").unwrap();

        assert!(Config::init(&config_path).is_err());
    }

    #[test]
    fn test_request_timeout_zero_disables() {
        let config = Config {
            request_timeout_secs: 0,
            ..Default::default()
        };
        assert_eq!(config.request_timeout(), None);
    }

    #[test]
    fn test_blank_token_is_ignored() {
        let config = Config {
            api_token: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(config.effective_api_token(), None);
    }

    #[test]
    fn test_page_size_is_clamped() {
        let config = Config {
            page_size: 500,
            ..Default::default()
        };
        assert_eq!(config.effective_page_size(), 100);
        let config = Config {
            page_size: 0,
            ..Default::default()
        };
        assert_eq!(config.effective_page_size(), 1);
    }
}
