//! Error types for the NovaDE notification overlay.
//!
//! Two families live here:
//!
//! - [`NotificationsError`] and [`ConfigError`] cover the ambient setup of the
//!   crate (configuration loading, logging initialisation).
//! - [`OverlayError`] is returned by operations on a running
//!   [`NotificationOverlay`](crate::overlay::NotificationOverlay) that address a
//!   specific notification or bucket.
//!
//! Nothing in the posting pipeline itself fails: unroutable notifications are
//! dropped with a diagnostic and duplicate closes are no-ops.

use std::path::PathBuf;
use thiserror::Error;
use uuid::Uuid;

use crate::overlay::types::ProgressState;

/// Crate-level error for setup and infrastructure concerns.
#[derive(Debug, Error)]
pub enum NotificationsError {
    /// Errors related to configuration loading, parsing, or validation.
    #[error("Configuration Error: {0}")]
    Config(#[from] ConfigError),

    /// The global tracing subscriber could not be installed.
    #[error("Logging Initialization Failed: {0}")]
    LoggingInitialization(String),

    /// Filesystem failure while preparing log or config locations.
    #[error("Filesystem Error: {message} (Path: {path:?})")]
    Filesystem {
        message: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Error type for configuration-related operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An error occurred while attempting to read a configuration file.
    #[error("Failed to read configuration file from {path:?}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML or does not match the schema.
    #[error("Failed to parse configuration file: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Parsed values are out of range or otherwise unusable.
    #[error("Configuration validation failed: {0}")]
    ValidationError(String),

    /// The platform configuration directory could not be determined.
    #[error("Could not determine base directory for {dir_type}")]
    DirectoryUnavailable { dir_type: String },
}

/// Errors returned by overlay operations that address a notification or bucket.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OverlayError {
    #[error("Notification with ID '{0}' not found in any bucket.")]
    NotFound(Uuid),

    #[error("Notification with ID '{0}' does not track progress.")]
    NotAProgressNotification(Uuid),

    #[error("Notification with ID '{id}' cannot move from {from:?} to {to:?}.")]
    InvalidProgressTransition {
        id: Uuid,
        from: ProgressState,
        to: ProgressState,
    },

    #[error("Bucket index {index} is out of range (overlay has {count} buckets).")]
    BucketOutOfRange { index: usize, count: usize },
}
