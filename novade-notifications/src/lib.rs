//! # NovaDE Notification Overlay Core (`novade-notifications`)
//!
//! The processing engine behind the NovaDE notification overlay. It is a small,
//! single-threaded, tick-driven pipeline:
//!
//! 1. Callers post notifications; posts are always deferred into a queue.
//! 2. A processing gate, derived from overlay visibility and the global
//!    activation mode, decides whether the queue drains. Closing is immediate,
//!    opening while hidden is delayed.
//! 3. Each tick drains at most one post: the notification receives a display
//!    depth, is routed by kind to the first accepting bucket, and the aggregate
//!    unread count is recomputed and published.
//! 4. Important notifications force the overlay visible; progress notifications
//!    can post their own follow-up notification when they complete.
//!
//! Rendering, animation and persistence are the presentation layer's business.
//!
//! ```rust
//! use std::time::Duration;
//! use novade_notifications::config::OverlayConfig;
//! use novade_notifications::overlay::{Notification, NotificationOverlay};
//!
//! let mut overlay = NotificationOverlay::new(&OverlayConfig::default());
//! overlay.post(Notification::simple("Update downloaded"));
//! assert_eq!(overlay.unread_count(), 0); // nothing happens until a tick
//!
//! overlay.tick(Duration::from_millis(16));
//! assert_eq!(overlay.unread_count(), 1);
//! ```

pub mod error;
pub mod config;
pub mod logging;
pub mod overlay;

pub use error::{ConfigError, NotificationsError, OverlayError};
pub use config::{ConfigLoader, LoggingConfig, NotificationsConfig, OverlayConfig};
pub use logging::{init_logging, init_minimal_logging};
pub use overlay::{
    ActivationMode, Bucket, BucketDefinition, Notification, NotificationKind, NotificationOverlay, OverlayEvent,
    PostHandle, ProgressState, ReadState, Visibility,
};
