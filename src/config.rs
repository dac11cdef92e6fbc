//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use crate::chat::TimeDisplay;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub display: DisplayConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Slot storage configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the slot files (the chat's origin)
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

fn default_data_dir() -> String {
    dirs::data_local_dir()
        .map(|p| p.join("family-chat").to_string_lossy().to_string())
        .unwrap_or_else(|| "./family_chat_data".to_string())
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

impl StorageConfig {
    /// Data directory with a leading `~/` expanded to the home directory
    pub fn data_path(&self) -> PathBuf {
        match self.data_dir.strip_prefix("~/") {
            Some(rest) => dirs::home_dir()
                .map(|home| home.join(rest))
                .unwrap_or_else(|| PathBuf::from(&self.data_dir)),
            None => PathBuf::from(&self.data_dir),
        }
    }
}

/// Terminal display configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DisplayConfig {
    /// Show message times in UTC instead of local time
    #[serde(default)]
    pub utc: bool,

    /// Clear the screen before each redraw
    #[serde(default = "default_clear_screen")]
    pub clear_screen: bool,
}

fn default_clear_screen() -> bool {
    true
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            utc: false,
            clear_screen: default_clear_screen(),
        }
    }
}

impl DisplayConfig {
    pub fn time_display(&self) -> TimeDisplay {
        if self.utc {
            TimeDisplay::Utc
        } else {
            TimeDisplay::Local
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment.
    ///
    /// Files that exist but fail to load are skipped; their errors are
    /// returned alongside the config so the caller can report them once
    /// logging is set up.
    pub fn load_default() -> (Self, Vec<ConfigError>) {
        let config_paths: Vec<PathBuf> = [
            dirs::config_dir().map(|p| p.join("family-chat").join("config.toml")),
            Some(PathBuf::from("./config.toml")),
        ]
        .into_iter()
        .flatten()
        .collect();

        Self::load_first(&config_paths)
    }

    /// Load the first of `paths` that exists and parses, else defaults
    pub fn load_first(paths: &[PathBuf]) -> (Self, Vec<ConfigError>) {
        let mut errors = Vec::new();

        for path in paths.iter().filter(|p| p.exists()) {
            match Self::load_with_env(path) {
                Ok(config) => {
                    tracing::info!("Loaded config from {:?}", path);
                    return (config, errors);
                }
                Err(e) => errors.push(e),
            }
        }

        tracing::info!("Using default config with environment overrides");
        (Self::from_env(), errors)
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from any key lookup (the environment in practice)
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(data_dir) = lookup("FAMILY_CHAT_DATA_DIR") {
            self.storage.data_dir = data_dir;
        }

        if let Some(utc) = lookup("FAMILY_CHAT_UTC") {
            match utc.to_lowercase().as_str() {
                "1" | "true" | "yes" => self.display.utc = true,
                "0" | "false" | "no" => self.display.utc = false,
                other => tracing::warn!("Ignoring FAMILY_CHAT_UTC={:?}", other),
            }
        }

        if let Some(level) = lookup("FAMILY_CHAT_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("FAMILY_CHAT_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Family Chat Configuration
#
# Environment variables override these settings:
# - FAMILY_CHAT_DATA_DIR
# - FAMILY_CHAT_UTC
# - FAMILY_CHAT_LOG_LEVEL
# - FAMILY_CHAT_LOG_FORMAT

[storage]
# Directory holding the message and username slots.
# Everyone sharing this directory shares the chat.
data_dir = "~/.local/share/family-chat"

[display]
# Show message times in UTC instead of local time
utc = false

# Clear the screen before each redraw
clear_screen = true

[logging]
# Log level: trace, debug, info, warn, error
level = "warn"

# Log format: pretty or json (always written to stderr)
format = "pretty"
"#
    .to_string()
}
