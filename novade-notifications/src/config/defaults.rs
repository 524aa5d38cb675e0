//! Default configuration values, referenced from `#[serde(default = ...)]`
//! attributes in [`super::types`].

use std::path::PathBuf;

use super::types::{LoggingConfig, OverlayConfig};
use crate::overlay::ActivationMode;

pub(super) fn default_logging_config() -> LoggingConfig {
    LoggingConfig {
        level: default_log_level(),
        file_path: default_log_file_path(),
        format: default_log_format(),
    }
}

pub(super) fn default_log_level() -> String {
    "info".to_string()
}

pub(super) fn default_log_file_path() -> Option<PathBuf> {
    None
}

pub(super) fn default_log_format() -> String {
    "text".to_string()
}

pub(super) fn default_overlay_config() -> OverlayConfig {
    OverlayConfig {
        enable_delay_ms: default_enable_delay_ms(),
        activation_mode: default_activation_mode(),
        event_capacity: default_event_capacity(),
    }
}

/// Delay before processing resumes when activation flips while the overlay is hidden.
pub(super) fn default_enable_delay_ms() -> u64 {
    1000
}

pub(super) fn default_activation_mode() -> ActivationMode {
    ActivationMode::All
}

pub(super) fn default_event_capacity() -> usize {
    64
}

/// Largest accepted `overlay.event_capacity`. The broadcast ring buffer is
/// allocated up front, so this also bounds its memory.
pub const MAX_EVENT_CAPACITY: usize = 4096;
