//! The notification overlay controller.
//!
//! [`NotificationOverlay`] ties the pipeline together: posts go into the
//! [`DeferredQueue`], the host loop calls [`NotificationOverlay::tick`] once per
//! frame, and each tick drains at most one post while the [`ProcessingGate`] is
//! open. A drained post gets a depth, a completion target if its kind supports
//! one, and a bucket chosen by the [`Router`]. Unread totals are recomputed
//! explicitly after every mutation and published through a `watch` channel.
//!
//! The controller is single-threaded by design of its API (`&mut self`); other
//! threads reach it only through a [`PostHandle`].

use std::time::Duration;
use tokio::sync::{broadcast, watch};
use tracing::{debug, info, instrument, trace, warn};
use uuid::Uuid;

use super::bucket::{Bucket, BucketDefinition};
use super::depth::DepthAllocator;
use super::events::OverlayEvent;
use super::gate::{GateTransition, ProcessingGate};
use super::notification::Notification;
use super::queue::{DeferredQueue, PostHandle};
use super::router::Router;
use super::types::{ActivationMode, ProgressState, Visibility};
use crate::config::{defaults::MAX_EVENT_CAPACITY, OverlayConfig};
use crate::error::OverlayError;

pub struct NotificationOverlay {
    buckets: Vec<Bucket>,
    router: Router,
    depth: DepthAllocator,
    gate: ProcessingGate,
    queue: DeferredQueue,
    poster: PostHandle,
    visibility: Visibility,
    activation_mode: ActivationMode,
    clock: Duration,
    unread_publisher: watch::Sender<usize>,
    event_publisher: broadcast::Sender<OverlayEvent>,
}

impl NotificationOverlay {
    /// Builds an overlay with the default "Notifications" / "Running Tasks" buckets.
    pub fn new(config: &OverlayConfig) -> Self {
        Self::with_buckets(config, BucketDefinition::default_layout())
    }

    /// Builds an overlay with a caller-defined bucket layout. Routing follows the
    /// order of `definitions`.
    pub fn with_buckets(config: &OverlayConfig, definitions: Vec<BucketDefinition>) -> Self {
        let router = Router::new(&definitions);
        let buckets = definitions.into_iter().map(Bucket::new).collect();
        let queue = DeferredQueue::new();
        let poster = queue.handle();
        let (unread_publisher, _) = watch::channel(0);
        let (event_publisher, _) = broadcast::channel(config.event_capacity.clamp(1, MAX_EVENT_CAPACITY));

        let mut gate = ProcessingGate::new(config.enable_delay());
        gate.initialize(config.activation_mode, Visibility::Hidden);

        debug!(
            "Notification overlay created (activation mode: {:?}, processing: {})",
            config.activation_mode,
            gate.is_open()
        );

        Self {
            buckets,
            router,
            depth: DepthAllocator::new(),
            gate,
            queue,
            poster,
            visibility: Visibility::Hidden,
            activation_mode: config.activation_mode,
            clock: Duration::ZERO,
            unread_publisher,
            event_publisher,
        }
    }

    // --- Ingress ---

    /// Queues `notification`. It is processed on a later tick, never during this call.
    pub fn post(&self, notification: Notification) {
        self.poster.post(notification);
    }

    /// A capability to post into this overlay from elsewhere, including other threads.
    pub fn poster(&self) -> PostHandle {
        self.poster.clone()
    }

    /// Advances the overlay's logical clock by `elapsed`, fires a due gate enable,
    /// and processes at most one queued post if the gate is open.
    ///
    /// Returns `true` if a post was processed.
    pub fn tick(&mut self, elapsed: Duration) -> bool {
        self.clock = self.clock.saturating_add(elapsed);

        if self.gate.poll(self.clock) {
            info!("Notification processing enabled after delay");
            self.publish_event(OverlayEvent::ProcessingChanged { enabled: true });
        }

        if !self.gate.is_open() {
            return false;
        }

        match self.queue.drain_one() {
            Some(notification) => {
                self.process_post(notification);
                true
            }
            None => false,
        }
    }

    fn process_post(&mut self, mut notification: Notification) {
        let depth = self.depth.next_depth(notification.displays_on_top());

        if notification.kind().supports_completion_target() {
            notification.bind_completion_target(self.poster.clone());
        }

        let notification_id = notification.id();
        let important = notification.is_important();

        match self.router.route(notification.kind()) {
            Some(bucket) => {
                debug!(
                    "Notification {} placed in bucket '{}' at depth {}",
                    notification_id,
                    self.buckets[bucket].name(),
                    depth
                );
                self.buckets[bucket].insert(depth, notification);
                self.publish_event(OverlayEvent::NotificationPosted { notification_id, bucket, depth });
            }
            None => {
                warn!(
                    "No bucket accepts notification {} of kind {:?}; dropping it",
                    notification_id,
                    notification.kind()
                );
                let kind = notification.kind().clone();
                self.publish_event(OverlayEvent::NotificationDropped { notification_id, kind });
            }
        }

        if important {
            self.show();
        }

        self.update_counts();
    }

    // --- Visibility and activation ---

    /// Shows the overlay. Returns `true` if it was hidden before.
    pub fn show(&mut self) -> bool {
        self.set_visibility(Visibility::Visible)
    }

    /// Hides the overlay, marking every notification read. Returns `true` if it
    /// was visible before.
    pub fn hide(&mut self) -> bool {
        self.set_visibility(Visibility::Hidden)
    }

    /// Flips visibility. Subject to the same rules as [`Self::show`] and [`Self::hide`].
    pub fn toggle(&mut self) -> bool {
        match self.visibility {
            Visibility::Visible => self.hide(),
            Visibility::Hidden => self.show(),
        }
    }

    /// Changes overlay visibility. Returns `true` if the visibility changed.
    ///
    /// Showing is refused while the activation mode is [`ActivationMode::Disabled`].
    /// Hiding marks every notification read.
    pub fn set_visibility(&mut self, visibility: Visibility) -> bool {
        if visibility == self.visibility {
            return false;
        }
        if visibility == Visibility::Visible && self.activation_mode == ActivationMode::Disabled {
            debug!("Overlay activation is disabled; refusing to show notification overlay");
            return false;
        }

        self.visibility = visibility;
        info!("Notification overlay visibility changed to {:?}", visibility);
        self.publish_event(OverlayEvent::VisibilityChanged { visibility });

        if visibility == Visibility::Hidden {
            self.mark_all_read();
        }

        self.recompute_gate();
        true
    }

    /// Changes the application-wide activation mode. Switching to
    /// [`ActivationMode::Disabled`] hides a visible overlay.
    pub fn set_activation_mode(&mut self, mode: ActivationMode) {
        if mode == self.activation_mode {
            return;
        }
        info!("Overlay activation mode changed from {:?} to {:?}", self.activation_mode, mode);
        self.activation_mode = mode;

        if mode == ActivationMode::Disabled && self.visibility == Visibility::Visible {
            // hide() recomputes the gate with the new mode
            self.hide();
        } else {
            self.recompute_gate();
        }
    }

    fn recompute_gate(&mut self) {
        match self.gate.recompute(self.activation_mode, self.visibility, self.clock) {
            GateTransition::Opened => {
                info!("Notification processing enabled");
                self.publish_event(OverlayEvent::ProcessingChanged { enabled: true });
            }
            GateTransition::Closed => {
                info!("Notification processing disabled");
                self.publish_event(OverlayEvent::ProcessingChanged { enabled: false });
            }
            GateTransition::Scheduled { due_at } => {
                debug!("Notification processing will be enabled at {:?}", due_at);
            }
            GateTransition::Unchanged => {}
        }
    }

    // --- Read state and closing ---

    /// Marks every notification in every bucket read and republishes the total.
    pub fn mark_all_read(&mut self) {
        let changed: usize = self.buckets.iter_mut().map(Bucket::mark_all_read).sum();
        trace!("Marked {} notifications read", changed);
        self.update_counts();
    }

    /// Marks one notification read. Returns `true` if its state changed.
    pub fn mark_read(&mut self, id: Uuid) -> Result<bool, OverlayError> {
        let index = self.bucket_index_of(id)?;
        let bucket = &mut self.buckets[index];
        let changed = bucket.get_mut(id).ok_or(OverlayError::NotFound(id))?.mark_read();
        if changed {
            bucket.recount();
            self.update_counts();
        }
        Ok(changed)
    }

    /// Closes one notification. A second close of the same notification is a
    /// no-op and returns `Ok(false)`.
    pub fn close(&mut self, id: Uuid) -> Result<bool, OverlayError> {
        let index = self.bucket_index_of(id)?;
        let closed = self.buckets[index].get_mut(id).ok_or(OverlayError::NotFound(id))?.close();
        if closed {
            self.notification_closed(index, id);
        }
        Ok(closed)
    }

    /// Closes every member of one bucket ("Clear All" / "Cancel All"). Running
    /// tasks in the bucket are cancelled. Returns how many notifications closed.
    #[instrument(skip(self), level = "debug")]
    pub fn clear_bucket(&mut self, index: usize) -> Result<usize, OverlayError> {
        let count = self.buckets.len();
        let bucket = self.buckets.get_mut(index).ok_or(OverlayError::BucketOutOfRange { index, count })?;
        let closed = bucket.close_all();
        for notification_id in &closed {
            self.publish_event(OverlayEvent::NotificationClosed { notification_id: *notification_id });
        }
        self.update_counts();
        Ok(closed.len())
    }

    /// Drops closed notifications once the presentation layer no longer shows them.
    pub fn prune_closed(&mut self) -> usize {
        let removed: usize = self.buckets.iter_mut().map(Bucket::prune_closed).sum();
        if removed > 0 {
            debug!("Pruned {} closed notifications", removed);
            self.update_counts();
        }
        removed
    }

    fn notification_closed(&mut self, index: usize, notification_id: Uuid) {
        self.buckets[index].recount();
        self.publish_event(OverlayEvent::NotificationClosed { notification_id });
        self.update_counts();
    }

    // --- Progress ---

    /// Updates a progress notification's fraction, clamped to `0.0..=1.0`.
    /// Finished or cancelled tasks keep their last value.
    pub fn set_progress(&mut self, id: Uuid, value: f32) -> Result<(), OverlayError> {
        let index = self.bucket_index_of(id)?;
        self.buckets[index].get_mut(id).ok_or(OverlayError::NotFound(id))?.set_progress(value)
    }

    /// Advances a progress notification's state machine. Completing it queues the
    /// completion notification through the overlay's own post path.
    pub fn set_progress_state(&mut self, id: Uuid, state: ProgressState) -> Result<(), OverlayError> {
        let index = self.bucket_index_of(id)?;
        let closed = self.buckets[index]
            .get_mut(id)
            .ok_or(OverlayError::NotFound(id))?
            .set_progress_state(state)?;
        if closed {
            self.notification_closed(index, id);
        }
        Ok(())
    }

    // --- Unread aggregation ---

    fn update_counts(&mut self) {
        let total: usize = self.buckets.iter().map(Bucket::unread_count).sum();
        let modified = self.unread_publisher.send_if_modified(|current| {
            if *current == total {
                return false;
            }
            *current = total;
            true
        });
        if modified {
            trace!("Unread notification count is now {}", total);
            self.publish_event(OverlayEvent::UnreadCountChanged { unread: total });
        }
    }

    /// Unread, open notifications across all buckets, as last published.
    pub fn unread_count(&self) -> usize {
        *self.unread_publisher.borrow()
    }

    /// Receiver that observes every change of [`Self::unread_count`].
    pub fn subscribe_unread_count(&self) -> watch::Receiver<usize> {
        self.unread_publisher.subscribe()
    }

    /// Subscribes to [`OverlayEvent`]s. Slow receivers may observe `Lagged`.
    pub fn subscribe_events(&self) -> broadcast::Receiver<OverlayEvent> {
        self.event_publisher.subscribe()
    }

    fn publish_event(&self, event: OverlayEvent) {
        if self.event_publisher.send(event).is_err() {
            trace!("No subscribers for overlay event");
        }
    }

    // --- Inspection ---

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn activation_mode(&self) -> ActivationMode {
        self.activation_mode
    }

    pub fn is_processing(&self) -> bool {
        self.gate.is_open()
    }

    /// Logical time at which a delayed processing enable will fire, if one is pending.
    pub fn pending_enable_at(&self) -> Option<Duration> {
        self.gate.pending_enable_at()
    }

    /// Logical time accumulated through [`NotificationOverlay::tick`].
    pub fn elapsed(&self) -> Duration {
        self.clock
    }

    /// Posts waiting in the deferred queue.
    pub fn pending_posts(&self) -> usize {
        self.queue.pending_len()
    }

    /// The overlay needs ticks while it is visible or still has posts to process.
    pub fn is_present(&self) -> bool {
        self.visibility == Visibility::Visible || self.queue.has_pending()
    }

    pub fn buckets(&self) -> &[Bucket] {
        &self.buckets
    }

    pub fn bucket(&self, index: usize) -> Option<&Bucket> {
        self.buckets.get(index)
    }

    pub fn notification(&self, id: Uuid) -> Option<&Notification> {
        self.buckets.iter().find_map(|bucket| bucket.get(id))
    }

    fn bucket_index_of(&self, id: Uuid) -> Result<usize, OverlayError> {
        self.buckets
            .iter()
            .position(|bucket| bucket.contains(id))
            .ok_or(OverlayError::NotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::types::NotificationKind;
    use pretty_assertions::assert_eq;

    const FRAME: Duration = Duration::from_millis(16);

    fn overlay(mode: ActivationMode) -> NotificationOverlay {
        NotificationOverlay::new(&OverlayConfig { activation_mode: mode, ..OverlayConfig::default() })
    }

    fn drain(overlay: &mut NotificationOverlay) {
        while overlay.tick(FRAME) {}
    }

    #[test]
    fn post_is_deferred_until_tick() {
        let mut overlay = overlay(ActivationMode::All);
        overlay.post(Notification::simple("hello"));
        assert_eq!(overlay.bucket(0).unwrap().len(), 0);
        assert_eq!(overlay.pending_posts(), 1);

        assert!(overlay.tick(FRAME));
        assert_eq!(overlay.bucket(0).unwrap().len(), 1);
        assert_eq!(overlay.unread_count(), 1);
        assert!(!overlay.tick(FRAME));
    }

    #[test]
    fn one_post_per_tick() {
        let mut overlay = overlay(ActivationMode::All);
        for i in 0..3 {
            overlay.post(Notification::simple(format!("n{}", i)));
        }
        overlay.tick(FRAME);
        assert_eq!(overlay.unread_count(), 1);
        overlay.tick(FRAME);
        assert_eq!(overlay.unread_count(), 2);
        assert_eq!(overlay.pending_posts(), 1);
    }

    #[test]
    fn closed_gate_accumulates_posts() {
        let mut overlay = overlay(ActivationMode::UserTriggered);
        assert!(!overlay.is_processing());
        for _ in 0..5 {
            overlay.post(Notification::simple("queued"));
        }
        for _ in 0..10 {
            assert!(!overlay.tick(FRAME));
        }
        assert_eq!(overlay.pending_posts(), 5);
        assert!(overlay.is_present());

        overlay.show();
        drain(&mut overlay);
        assert_eq!(overlay.bucket(0).unwrap().len(), 5);
    }

    #[test]
    fn hide_marks_everything_read() {
        let mut overlay = overlay(ActivationMode::All);
        overlay.show();
        overlay.post(Notification::simple("a"));
        overlay.post(Notification::progress("b"));
        drain(&mut overlay);
        assert_eq!(overlay.unread_count(), 2);

        overlay.hide();
        assert_eq!(overlay.unread_count(), 0);
        assert!(overlay.is_processing(), "activation mode All keeps processing while hidden");
    }

    #[test]
    fn disabled_mode_refuses_show_and_hides_overlay() {
        let mut overlay = overlay(ActivationMode::UserTriggered);
        assert!(overlay.show());
        overlay.set_activation_mode(ActivationMode::Disabled);
        assert_eq!(overlay.visibility(), Visibility::Hidden);
        assert!(!overlay.is_processing());
        assert!(!overlay.show());
        assert_eq!(overlay.visibility(), Visibility::Hidden);
    }

    #[test]
    fn unroutable_notification_is_dropped_without_stalling() {
        let mut overlay = overlay(ActivationMode::All);
        let mut events = overlay.subscribe_events();
        let stray = Notification::new(NotificationKind::custom("telemetry"), "ignored");
        let stray_id = stray.id();
        overlay.post(stray);
        overlay.post(Notification::simple("kept"));

        assert!(overlay.tick(FRAME));
        assert!(overlay.notification(stray_id).is_none());
        assert_eq!(
            events.try_recv().unwrap(),
            OverlayEvent::NotificationDropped { notification_id: stray_id, kind: NotificationKind::custom("telemetry") }
        );

        assert!(overlay.tick(FRAME));
        assert_eq!(overlay.unread_count(), 1);
    }

    #[test]
    fn addressing_unknown_notification_fails() {
        let mut overlay = overlay(ActivationMode::All);
        let id = Uuid::new_v4();
        assert_eq!(overlay.close(id), Err(OverlayError::NotFound(id)));
        assert_eq!(overlay.mark_read(id), Err(OverlayError::NotFound(id)));
        assert_eq!(overlay.set_progress(id, 0.5), Err(OverlayError::NotFound(id)));
        assert_eq!(overlay.clear_bucket(7), Err(OverlayError::BucketOutOfRange { index: 7, count: 2 }));
    }

    #[test]
    fn mark_read_updates_single_notification() {
        let mut overlay = overlay(ActivationMode::All);
        let notif = Notification::simple("read me");
        let id = notif.id();
        overlay.post(notif);
        overlay.post(Notification::simple("other"));
        drain(&mut overlay);

        assert_eq!(overlay.mark_read(id), Ok(true));
        assert_eq!(overlay.mark_read(id), Ok(false));
        assert_eq!(overlay.unread_count(), 1);
    }

    #[test]
    fn clear_bucket_cancels_running_tasks() {
        let mut overlay = overlay(ActivationMode::All);
        let task = Notification::progress("Rendering");
        let task_id = task.id();
        overlay.post(task);
        drain(&mut overlay);
        overlay.set_progress_state(task_id, ProgressState::Active).unwrap();

        assert_eq!(overlay.clear_bucket(1), Ok(1));
        let task = overlay.notification(task_id).unwrap();
        assert!(task.is_closed());
        assert_eq!(task.progress_tracker().unwrap().state(), ProgressState::Cancelled);
        assert_eq!(overlay.unread_count(), 0);

        assert_eq!(overlay.prune_closed(), 1);
        assert!(overlay.notification(task_id).is_none());
    }

    #[test]
    fn oversized_event_capacity_is_clamped() {
        let config = OverlayConfig { event_capacity: usize::MAX, ..OverlayConfig::default() };
        let mut overlay = NotificationOverlay::new(&config);
        let mut events = overlay.subscribe_events();
        overlay.show();
        assert_eq!(events.try_recv().unwrap(), OverlayEvent::VisibilityChanged { visibility: Visibility::Visible });
    }

    #[test]
    fn clock_saturates_instead_of_overflowing() {
        let mut overlay = overlay(ActivationMode::All);
        overlay.post(Notification::simple("late"));
        assert!(overlay.tick(Duration::MAX));
        assert!(!overlay.tick(FRAME));
        assert_eq!(overlay.elapsed(), Duration::MAX);
    }

    #[test]
    fn inspection_does_not_need_mutable_access() {
        let overlay = overlay(ActivationMode::UserTriggered);
        overlay.post(Notification::simple("waiting"));
        let poster = overlay.poster();
        poster.post(Notification::simple("also waiting"));
        assert_eq!(overlay.pending_posts(), 2);
        assert!(overlay.is_present());
    }

    #[test]
    fn unread_watch_publishes_changes() {
        let mut overlay = overlay(ActivationMode::All);
        let mut unread = overlay.subscribe_unread_count();
        assert_eq!(*unread.borrow(), 0);

        overlay.post(Notification::simple("ping"));
        overlay.tick(FRAME);
        assert!(unread.has_changed().unwrap());
        assert_eq!(*unread.borrow_and_update(), 1);

        overlay.mark_all_read();
        assert_eq!(*unread.borrow_and_update(), 0);
        overlay.mark_all_read();
        assert!(!unread.has_changed().unwrap());
    }
}
