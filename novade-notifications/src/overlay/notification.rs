use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;

use super::queue::PostHandle;
use super::types::{NotificationKind, ProgressState, ReadState};
use crate::error::OverlayError;

pub const DEFAULT_COMPLETION_TEXT: &str = "Task has completed!";

/// Progress bookkeeping carried by [`NotificationKind::Progress`] notifications.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressTracker {
    state: ProgressState,
    progress: f32,
    completion_text: String,
}

impl ProgressTracker {
    fn new() -> Self {
        Self {
            state: ProgressState::Queued,
            progress: 0.0,
            completion_text: DEFAULT_COMPLETION_TEXT.to_string(),
        }
    }

    pub fn state(&self) -> ProgressState {
        self.state
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn completion_text(&self) -> &str {
        &self.completion_text
    }
}

/// A single unit of delivered information.
///
/// Identity, kind and flags are fixed when the notification is built; read state,
/// closed state and progress change over its lifetime. Once posted, a
/// notification is owned by the overlay and addressed by [`Notification::id`].
#[derive(Debug)]
pub struct Notification {
    id: Uuid,
    kind: NotificationKind,
    text: String,
    created_at: DateTime<Utc>,
    important: bool,
    display_on_top: bool,
    read_state: ReadState,
    closed: bool,
    completion_target: Option<PostHandle>,
    progress: Option<ProgressTracker>,
}

impl Notification {
    pub fn new(kind: NotificationKind, text: impl Into<String>) -> Self {
        let progress = kind.supports_completion_target().then(ProgressTracker::new);
        Self {
            id: Uuid::new_v4(),
            kind,
            text: text.into(),
            created_at: Utc::now(),
            important: false,
            display_on_top: false,
            read_state: ReadState::Unread,
            closed: false,
            completion_target: None,
            progress,
        }
    }

    pub fn simple(text: impl Into<String>) -> Self {
        Self::new(NotificationKind::Simple, text)
    }

    pub fn progress(text: impl Into<String>) -> Self {
        Self::new(NotificationKind::Progress, text)
    }

    /// Important notifications force the overlay open when they are processed.
    pub fn with_importance(mut self, important: bool) -> Self {
        self.important = important;
        self
    }

    /// Sort ahead of every regular notification in the owning bucket.
    pub fn with_display_on_top(mut self, display_on_top: bool) -> Self {
        self.display_on_top = display_on_top;
        self
    }

    /// Text of the follow-up notification posted when a progress task completes.
    /// Ignored for kinds without progress.
    pub fn with_completion_text(mut self, text: impl Into<String>) -> Self {
        if let Some(tracker) = self.progress.as_mut() {
            tracker.completion_text = text.into();
        }
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn kind(&self) -> &NotificationKind {
        &self.kind
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn is_important(&self) -> bool {
        self.important
    }

    pub fn displays_on_top(&self) -> bool {
        self.display_on_top
    }

    pub fn read_state(&self) -> ReadState {
        self.read_state
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn counts_as_unread(&self) -> bool {
        !self.closed && self.read_state == ReadState::Unread
    }

    pub fn progress_tracker(&self) -> Option<&ProgressTracker> {
        self.progress.as_ref()
    }

    pub fn has_completion_target(&self) -> bool {
        self.completion_target.is_some()
    }

    /// Returns `true` if this call changed the read state.
    pub fn mark_read(&mut self) -> bool {
        if self.read_state == ReadState::Read {
            return false;
        }
        self.read_state = ReadState::Read;
        true
    }

    /// Closes the notification. Returns `true` only for the call that performed
    /// the transition; later calls are no-ops.
    ///
    /// Closing a progress notification that has not finished cancels it.
    pub fn close(&mut self) -> bool {
        if self.closed {
            return false;
        }
        if let Some(tracker) = self.progress.as_mut() {
            if !tracker.state.is_terminal() {
                tracker.state = ProgressState::Cancelled;
            }
        }
        self.closed = true;
        true
    }

    pub(crate) fn bind_completion_target(&mut self, target: PostHandle) {
        self.completion_target = Some(target);
    }

    pub fn set_progress(&mut self, value: f32) -> Result<(), OverlayError> {
        let id = self.id;
        let tracker = self.progress.as_mut().ok_or(OverlayError::NotAProgressNotification(id))?;
        if !tracker.state.is_terminal() {
            tracker.progress = if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) };
        }
        Ok(())
    }

    /// Advances the progress state machine.
    ///
    /// Reaching [`ProgressState::Completed`] posts the completion notification
    /// through the bound completion target and closes this notification;
    /// [`ProgressState::Cancelled`] just closes it. Returns whether the
    /// notification was closed by this call.
    pub fn set_progress_state(&mut self, next: ProgressState) -> Result<bool, OverlayError> {
        let id = self.id;
        let tracker = self.progress.as_mut().ok_or(OverlayError::NotAProgressNotification(id))?;
        let current = tracker.state;
        if !current.can_transition_to(next) {
            return Err(OverlayError::InvalidProgressTransition { id, from: current, to: next });
        }
        if current == next {
            return Ok(false);
        }
        tracker.state = next;

        match next {
            ProgressState::Completed => {
                tracker.progress = 1.0;
                let completion = self.create_completion_notification();
                match &self.completion_target {
                    Some(target) => target.post(completion),
                    None => debug!("Progress notification {} completed without a completion target", id),
                }
                Ok(self.close())
            }
            ProgressState::Cancelled => Ok(self.close()),
            ProgressState::Queued | ProgressState::Active => Ok(false),
        }
    }

    fn create_completion_notification(&self) -> Notification {
        let text = self
            .progress
            .as_ref()
            .map_or(DEFAULT_COMPLETION_TEXT, |tracker| tracker.completion_text.as_str());
        Notification::new(NotificationKind::ProgressCompletion, text).with_importance(true)
    }
}
