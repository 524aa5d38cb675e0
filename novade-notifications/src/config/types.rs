//! Configuration data structures.
//!
//! All structs reject unknown fields and fall back to the values in
//! [`super::defaults`] for anything the file leaves out.

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use super::defaults;
use crate::overlay::ActivationMode;

/// Configuration settings for the logging subsystem.
///
/// ```
/// use novade_notifications::config::LoggingConfig;
///
/// let config: LoggingConfig = toml::from_str(r#"level = "debug""#).unwrap();
/// assert_eq!(config.level, "debug");
/// assert_eq!(config.format, "text");
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// One of "trace", "debug", "info", "warn", "error" (case-insensitive).
    #[serde(default = "defaults::default_log_level")]
    pub level: String,
    /// Optional log file; rotated daily. `None` disables file logging.
    #[serde(default = "defaults::default_log_file_path")]
    pub file_path: Option<PathBuf>,
    /// "text" or "json".
    #[serde(default = "defaults::default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        defaults::default_logging_config()
    }
}

/// Settings of the notification overlay pipeline.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OverlayConfig {
    /// Delay before processing is enabled while the overlay is hidden.
    #[serde(default = "defaults::default_enable_delay_ms")]
    pub enable_delay_ms: u64,
    /// Activation mode the overlay starts in.
    #[serde(default = "defaults::default_activation_mode")]
    pub activation_mode: ActivationMode,
    /// Capacity of the overlay event broadcast channel.
    #[serde(default = "defaults::default_event_capacity")]
    pub event_capacity: usize,
}

impl OverlayConfig {
    pub fn enable_delay(&self) -> Duration {
        Duration::from_millis(self.enable_delay_ms)
    }
}

impl Default for OverlayConfig {
    fn default() -> Self {
        defaults::default_overlay_config()
    }
}

/// Root configuration (`config.toml`).
#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct NotificationsConfig {
    #[serde(default = "defaults::default_logging_config")]
    pub logging: LoggingConfig,
    #[serde(default = "defaults::default_overlay_config")]
    pub overlay: OverlayConfig,
}
