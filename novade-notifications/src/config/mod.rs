//! Configuration management for `novade-notifications`.
//!
//! - [`types`]: [`NotificationsConfig`], [`LoggingConfig`], [`OverlayConfig`].
//! - [`defaults`]: default values used by `serde` when fields are missing.
//! - [`loader`]: [`ConfigLoader`], which locates, parses and validates `config.toml`.
//!
//! ```toml
//! [logging]
//! level = "info"
//! format = "text"
//!
//! [overlay]
//! enable_delay_ms = 1000
//! activation_mode = "all"
//! event_capacity = 64
//! ```

pub mod defaults;
pub mod types;
pub mod loader;

pub use types::{LoggingConfig, NotificationsConfig, OverlayConfig};
pub use loader::ConfigLoader;
