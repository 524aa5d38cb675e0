//! Configuration loading and validation.
//!
//! [`ConfigLoader::load`] reads `config.toml` from the platform configuration
//! directory for `novade-notifications`. A missing or empty file yields the
//! defaults; anything else is parsed as TOML and validated.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::defaults::MAX_EVENT_CAPACITY;
use super::types::NotificationsConfig;
use crate::error::{ConfigError, NotificationsError};

const CONFIG_FILE_NAME: &str = "config.toml";
const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
const VALID_LOG_FORMATS: [&str; 2] = ["text", "json"];

/// Namespace for configuration loading.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads `config.toml` from the application configuration directory.
    pub fn load() -> Result<NotificationsConfig, NotificationsError> {
        let path = Self::config_dir()?.join(CONFIG_FILE_NAME);
        Self::load_from_path(&path)
    }

    /// Loads and validates the configuration at `path`, using defaults when the
    /// file does not exist or is empty.
    pub fn load_from_path(path: &Path) -> Result<NotificationsConfig, NotificationsError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No configuration at {:?}, using defaults", path);
                String::new()
            }
            Err(e) => {
                return Err(ConfigError::ReadError { path: path.to_path_buf(), source: e }.into());
            }
        };
        Ok(Self::from_toml_str(&content)?)
    }

    /// Parses and validates configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<NotificationsConfig, ConfigError> {
        let mut config = if content.trim().is_empty() {
            NotificationsConfig::default()
        } else {
            toml::from_str(content)?
        };
        Self::validate_config(&mut config)?;
        Ok(config)
    }

    /// Normalises log level and format to lower case and rejects unusable values.
    pub fn validate_config(config: &mut NotificationsConfig) -> Result<(), ConfigError> {
        let level = config.logging.level.to_lowercase();
        if !VALID_LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "Invalid log level '{}'. Must be one of: {}",
                config.logging.level,
                VALID_LOG_LEVELS.join(", ")
            )));
        }
        config.logging.level = level;

        let format = config.logging.format.to_lowercase();
        if !VALID_LOG_FORMATS.contains(&format.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "Invalid log format '{}'. Must be one of: {}",
                config.logging.format,
                VALID_LOG_FORMATS.join(", ")
            )));
        }
        config.logging.format = format;

        let capacity = config.overlay.event_capacity;
        if capacity == 0 || capacity > MAX_EVENT_CAPACITY {
            return Err(ConfigError::ValidationError(format!(
                "overlay.event_capacity must be between 1 and {}, got {}",
                MAX_EVENT_CAPACITY, capacity
            )));
        }
        Ok(())
    }

    fn config_dir() -> Result<PathBuf, ConfigError> {
        directories_next::ProjectDirs::from("org", "NovaDE", "novade-notifications")
            .map(|dirs| dirs.config_dir().to_path_buf())
            .ok_or_else(|| ConfigError::DirectoryUnavailable { dir_type: "config".to_string() })
    }
}
