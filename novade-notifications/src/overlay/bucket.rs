//! Buckets: fixed, kind-filtered collections of notifications.

use uuid::Uuid;

use super::notification::Notification;
use super::types::NotificationKind;

/// Declaration of a bucket, used when building an overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketDefinition {
    pub name: String,
    /// Label of the bucket-wide close action ("Clear All", "Cancel All").
    pub clear_label: String,
    pub accepted_kinds: Vec<NotificationKind>,
}

impl BucketDefinition {
    pub fn new(name: impl Into<String>, clear_label: impl Into<String>, accepted_kinds: Vec<NotificationKind>) -> Self {
        Self { name: name.into(), clear_label: clear_label.into(), accepted_kinds }
    }

    /// The two buckets every NovaDE overlay starts with: plain notifications and
    /// running tasks.
    pub fn default_layout() -> Vec<BucketDefinition> {
        vec![
            BucketDefinition::new("Notifications", "Clear All", vec![NotificationKind::Simple]),
            BucketDefinition::new("Running Tasks", "Cancel All", vec![NotificationKind::Progress]),
        ]
    }
}

/// An ordered collection of notifications. Members are kept in ascending depth
/// order; the unread count is cached and refreshed on every mutation.
#[derive(Debug)]
pub struct Bucket {
    definition: BucketDefinition,
    members: Vec<(i64, Notification)>,
    unread_count: usize,
}

impl Bucket {
    pub fn new(definition: BucketDefinition) -> Self {
        Self { definition, members: Vec::new(), unread_count: 0 }
    }

    pub fn name(&self) -> &str {
        &self.definition.name
    }

    pub fn clear_label(&self) -> &str {
        &self.definition.clear_label
    }

    pub fn accepted_kinds(&self) -> &[NotificationKind] {
        &self.definition.accepted_kinds
    }

    pub fn unread_count(&self) -> usize {
        self.unread_count
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Members in display order.
    pub fn iter(&self) -> impl Iterator<Item = &Notification> + '_ {
        self.members.iter().map(|(_, n)| n)
    }

    /// Members with their depth, in display order.
    pub fn entries(&self) -> impl Iterator<Item = (i64, &Notification)> + '_ {
        self.members.iter().map(|(depth, n)| (*depth, n))
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.members.iter().any(|(_, n)| n.id() == id)
    }

    pub fn get(&self, id: Uuid) -> Option<&Notification> {
        self.members.iter().map(|(_, n)| n).find(|n| n.id() == id)
    }

    pub(crate) fn get_mut(&mut self, id: Uuid) -> Option<&mut Notification> {
        self.members.iter_mut().map(|(_, n)| n).find(|n| n.id() == id)
    }

    pub(crate) fn insert(&mut self, depth: i64, notification: Notification) {
        let index = self.members.partition_point(|(existing, _)| *existing < depth);
        self.members.insert(index, (depth, notification));
        self.recount();
    }

    /// Returns how many members changed state.
    pub(crate) fn mark_all_read(&mut self) -> usize {
        let mut changed = 0;
        for (_, notification) in self.members.iter_mut() {
            if notification.mark_read() {
                changed += 1;
            }
        }
        self.recount();
        changed
    }

    /// Closes every member. Returns the ids that were actually closed by this call.
    pub(crate) fn close_all(&mut self) -> Vec<Uuid> {
        let closed = self
            .members
            .iter_mut()
            .filter_map(|(_, n)| n.close().then(|| n.id()))
            .collect();
        self.recount();
        closed
    }

    /// Drops closed members. Returns how many were removed.
    pub(crate) fn prune_closed(&mut self) -> usize {
        let before = self.members.len();
        self.members.retain(|(_, n)| !n.is_closed());
        self.recount();
        before - self.members.len()
    }

    pub(crate) fn recount(&mut self) {
        self.unread_count = self.members.iter().filter(|(_, n)| n.counts_as_unread()).count();
    }
}
