//! Deferred post queue.
//!
//! Posting never touches bucket state directly. Every post goes through an
//! unbounded channel and is only picked up when the overlay drains, one post per
//! tick, while the processing gate is open. Because the sending half is a plain
//! capability ([`PostHandle`]) it can be handed to notifications themselves for
//! completion chaining, or to background work that wants to report back.

use std::collections::VecDeque;
use tokio::sync::mpsc;
use tracing::{debug, trace};

use super::notification::Notification;

/// Cloneable capability to post into an overlay's deferred queue.
#[derive(Debug, Clone)]
pub struct PostHandle {
    sender: mpsc::UnboundedSender<Notification>,
}

impl PostHandle {
    /// Enqueue `notification` for a later drain. Never blocks and never runs
    /// any part of the post synchronously.
    pub fn post(&self, notification: Notification) {
        let id = notification.id();
        if self.sender.send(notification).is_err() {
            debug!("Overlay queue is gone, discarding notification {}", id);
        } else {
            trace!("Notification {} enqueued", id);
        }
    }
}

/// Receiving side of the post channel, staged into a local FIFO so the owner can
/// inspect how much is pending.
#[derive(Debug)]
pub struct DeferredQueue {
    sender: mpsc::UnboundedSender<Notification>,
    receiver: mpsc::UnboundedReceiver<Notification>,
    staged: VecDeque<Notification>,
}

impl DeferredQueue {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self { sender, receiver, staged: VecDeque::new() }
    }

    pub fn handle(&self) -> PostHandle {
        PostHandle { sender: self.sender.clone() }
    }

    /// Pops at most one pending post, oldest first.
    pub fn drain_one(&mut self) -> Option<Notification> {
        self.stage();
        self.staged.pop_front()
    }

    /// Posts not yet drained, whether staged locally or still in the channel.
    pub fn pending_len(&self) -> usize {
        self.staged.len() + self.receiver.len()
    }

    pub fn has_pending(&self) -> bool {
        !self.staged.is_empty() || !self.receiver.is_empty()
    }

    // The queue keeps its own sender alive, so `try_recv` only ever reports Empty.
    fn stage(&mut self) {
        while let Ok(notification) = self.receiver.try_recv() {
            self.staged.push_back(notification);
        }
    }
}

impl Default for DeferredQueue {
    fn default() -> Self {
        Self::new()
    }
}
