use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::types::{NotificationKind, Visibility};

/// Events published by a [`NotificationOverlay`](super::NotificationOverlay) to
/// the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "event")]
pub enum OverlayEvent {
    NotificationPosted {
        notification_id: Uuid,
        bucket: usize,
        depth: i64,
    },
    /// No bucket accepts the notification's kind.
    NotificationDropped {
        notification_id: Uuid,
        kind: NotificationKind,
    },
    NotificationClosed {
        notification_id: Uuid,
    },
    VisibilityChanged {
        visibility: Visibility,
    },
    ProcessingChanged {
        enabled: bool,
    },
    UnreadCountChanged {
        unread: usize,
    },
}
