/// Hands out display depths for posted notifications.
///
/// A single counter is shared across all buckets. Regular notifications get the
/// positive counter value, so later posts sort after earlier ones; display-on-top
/// notifications get the negated value, so they sort before every regular entry
/// and the most recent of them comes first.
#[derive(Debug, Default, Clone)]
pub struct DepthAllocator {
    running: i64,
}

impl DepthAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_depth(&mut self, display_on_top: bool) -> i64 {
        self.running += 1;
        if display_on_top {
            -self.running
        } else {
            self.running
        }
    }

    /// Number of depths handed out so far.
    pub fn allocated(&self) -> i64 {
        self.running
    }
}
