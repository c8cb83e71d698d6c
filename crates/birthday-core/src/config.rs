//! Configuration for the birthday book.

use crate::stats::UPCOMING_WINDOW_DAYS;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookConfig {
    /// Prompt printed before each command
    #[serde(default = "default_prompt")]
    pub prompt: String,

    /// Start with input echo turned on
    #[serde(default)]
    pub echo: bool,

    /// Birthdays at most this many days away count as upcoming
    #[serde(default = "default_upcoming_window")]
    pub upcoming_window_days: i64,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Birthday file loaded at startup when none is given on the command line
    #[serde(default)]
    pub autoload: Option<PathBuf>,
}

fn default_prompt() -> String {
    "> ".to_string()
}

fn default_upcoming_window() -> i64 {
    UPCOMING_WINDOW_DAYS
}

fn default_log_level() -> String {
    "warn".to_string()
}

/// Directory holding the user's configuration.
pub fn default_config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".birthday-book")
}

impl Default for BookConfig {
    fn default() -> Self {
        Self {
            prompt: default_prompt(),
            echo: false,
            upcoming_window_days: default_upcoming_window(),
            log_level: default_log_level(),
            autoload: None,
        }
    }
}

impl BookConfig {
    /// Configuration from `~/.birthday-book/config.yaml`, or defaults.
    pub fn load() -> Self {
        Self::load_or_default(&default_config_dir().join("config.yaml"))
    }

    /// Configuration from `path` if it exists. A file that cannot be read or
    /// parsed is logged and replaced by defaults.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        Self::load_from(path).unwrap_or_else(|e| {
            warn!(path = ?path, "Ignoring config file: {}", e);
            Self::default()
        })
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_yaml::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }
}
