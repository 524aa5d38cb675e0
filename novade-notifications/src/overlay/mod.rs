//! Notification overlay pipeline.
//!
//! Posting flows through these pieces in order:
//!
//! - [`queue`]: deferred post queue and the [`PostHandle`] capability.
//! - [`gate`]: the processing gate that decides whether the queue drains.
//! - [`depth`]: display depth allocation (ordering and display-on-top).
//! - [`router`]: kind-to-bucket lookup.
//! - [`bucket`]: ordered, kind-filtered notification collections.
//! - [`controller`]: [`NotificationOverlay`], which owns all of the above and
//!   publishes the unread total and [`OverlayEvent`]s.

pub mod types;
pub mod notification;
pub mod queue;
pub mod gate;
pub mod depth;
pub mod router;
pub mod bucket;
pub mod events;
pub mod controller;

pub use types::{ActivationMode, NotificationKind, ProgressState, ReadState, Visibility};
pub use notification::{Notification, ProgressTracker};
pub use queue::{DeferredQueue, PostHandle};
pub use gate::{GateTransition, ProcessingGate};
pub use depth::DepthAllocator;
pub use router::Router;
pub use bucket::{Bucket, BucketDefinition};
pub use events::OverlayEvent;
pub use controller::NotificationOverlay;
