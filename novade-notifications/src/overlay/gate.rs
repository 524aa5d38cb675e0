//! Processing gate with delayed enable.
//!
//! The gate decides whether the deferred post queue may be drained. Its target
//! value is `activation_mode == All || visibility == Visible`. Closing happens at
//! once; opening while the overlay is hidden waits for a configurable delay so a
//! backlog is not dumped on the user the moment activation flips. Every
//! recomputation cancels the pending enable before deciding anew, so an enable
//! scheduled under an older mode or visibility can never fire.

use std::time::Duration;
use tracing::{debug, trace};

use super::types::{ActivationMode, Visibility};

pub const DEFAULT_ENABLE_DELAY: Duration = Duration::from_millis(1000);

/// Outcome of a gate recomputation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateTransition {
    Opened,
    Closed,
    /// Enable is pending and will take effect at the given logical time.
    Scheduled { due_at: Duration },
    Unchanged,
}

#[derive(Debug, Clone)]
pub struct ProcessingGate {
    open: bool,
    enable_delay: Duration,
    /// Logical time of the scheduled enable. Cleared on every recompute.
    pending_enable: Option<Duration>,
}

impl ProcessingGate {
    pub fn new(enable_delay: Duration) -> Self {
        Self { open: false, enable_delay, pending_enable: None }
    }

    pub fn target(mode: ActivationMode, visibility: Visibility) -> bool {
        mode == ActivationMode::All || visibility == Visibility::Visible
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn enable_delay(&self) -> Duration {
        self.enable_delay
    }

    pub fn pending_enable_at(&self) -> Option<Duration> {
        self.pending_enable
    }

    /// Startup evaluation: an enabled target opens the gate without delay, since
    /// there is no backlog to protect the user from yet.
    pub fn initialize(&mut self, mode: ActivationMode, visibility: Visibility) -> GateTransition {
        self.pending_enable = None;
        self.open = Self::target(mode, visibility);
        debug!("Processing gate initialized (open: {})", self.open);
        if self.open {
            GateTransition::Opened
        } else {
            GateTransition::Closed
        }
    }

    /// Re-evaluates the gate after visibility or activation mode changed.
    pub fn recompute(&mut self, mode: ActivationMode, visibility: Visibility, now: Duration) -> GateTransition {
        self.pending_enable = None;

        if !Self::target(mode, visibility) {
            if self.open {
                self.open = false;
                return GateTransition::Closed;
            }
            return GateTransition::Unchanged;
        }

        if self.open {
            return GateTransition::Unchanged;
        }

        if visibility == Visibility::Visible || self.enable_delay.is_zero() {
            self.open = true;
            return GateTransition::Opened;
        }

        let due_at = now.saturating_add(self.enable_delay);
        self.pending_enable = Some(due_at);
        trace!("Processing gate enable scheduled for {:?}", due_at);
        GateTransition::Scheduled { due_at }
    }

    /// Fires the pending enable if it is due. Returns `true` if the gate opened.
    pub fn poll(&mut self, now: Duration) -> bool {
        match self.pending_enable {
            Some(due_at) if now >= due_at => {
                // Only scheduled while closed; any recompute clears it first.
                self.pending_enable = None;
                self.open = true;
                true
            }
            _ => false,
        }
    }
}

impl Default for ProcessingGate {
    fn default() -> Self {
        Self::new(DEFAULT_ENABLE_DELAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn target_follows_mode_or_visibility() {
        assert!(ProcessingGate::target(ActivationMode::All, Visibility::Hidden));
        assert!(ProcessingGate::target(ActivationMode::UserTriggered, Visibility::Visible));
        assert!(!ProcessingGate::target(ActivationMode::UserTriggered, Visibility::Hidden));
        assert!(!ProcessingGate::target(ActivationMode::Disabled, Visibility::Hidden));
    }

    #[test]
    fn initialize_opens_immediately_when_enabled() {
        let mut gate = ProcessingGate::default();
        assert_eq!(gate.initialize(ActivationMode::All, Visibility::Hidden), GateTransition::Opened);
        assert!(gate.is_open());

        let mut gate = ProcessingGate::default();
        assert_eq!(gate.initialize(ActivationMode::UserTriggered, Visibility::Hidden), GateTransition::Closed);
        assert!(!gate.is_open());
    }

    #[test]
    fn enable_while_hidden_waits_for_delay() {
        let mut gate = ProcessingGate::default();
        gate.initialize(ActivationMode::UserTriggered, Visibility::Hidden);

        let transition = gate.recompute(ActivationMode::All, Visibility::Hidden, ms(50));
        assert_eq!(transition, GateTransition::Scheduled { due_at: ms(1050) });
        assert!(!gate.poll(ms(1049)));
        assert!(!gate.is_open());
        assert!(gate.poll(ms(1050)));
        assert!(gate.is_open());
        assert_eq!(gate.pending_enable_at(), None);
    }

    #[test]
    fn enable_while_visible_is_immediate() {
        let mut gate = ProcessingGate::default();
        gate.initialize(ActivationMode::UserTriggered, Visibility::Hidden);
        assert_eq!(gate.recompute(ActivationMode::UserTriggered, Visibility::Visible, ms(0)), GateTransition::Opened);
        assert!(gate.is_open());
    }

    #[test]
    fn disable_is_immediate_and_cancels_pending_enable() {
        let mut gate = ProcessingGate::default();
        gate.initialize(ActivationMode::UserTriggered, Visibility::Hidden);
        gate.recompute(ActivationMode::All, Visibility::Hidden, ms(0));
        assert_eq!(gate.recompute(ActivationMode::UserTriggered, Visibility::Hidden, ms(10)), GateTransition::Unchanged);
        assert_eq!(gate.pending_enable_at(), None);
        assert!(!gate.poll(ms(5000)));
        assert!(!gate.is_open());

        gate.recompute(ActivationMode::UserTriggered, Visibility::Visible, ms(20));
        assert_eq!(gate.recompute(ActivationMode::UserTriggered, Visibility::Hidden, ms(30)), GateTransition::Closed);
        assert!(!gate.is_open());
    }

    #[test]
    fn already_open_gate_does_not_reschedule() {
        let mut gate = ProcessingGate::default();
        gate.initialize(ActivationMode::All, Visibility::Visible);
        assert_eq!(gate.recompute(ActivationMode::All, Visibility::Hidden, ms(0)), GateTransition::Unchanged);
        assert!(gate.is_open());
        assert_eq!(gate.pending_enable_at(), None);
    }

    #[test]
    fn superseded_enable_fires_only_at_rescheduled_time() {
        let mut gate = ProcessingGate::default();
        gate.initialize(ActivationMode::UserTriggered, Visibility::Hidden);
        gate.recompute(ActivationMode::All, Visibility::Hidden, ms(0));
        gate.recompute(ActivationMode::UserTriggered, Visibility::Hidden, ms(400));
        let transition = gate.recompute(ActivationMode::All, Visibility::Hidden, ms(600));
        assert_eq!(transition, GateTransition::Scheduled { due_at: ms(1600) });

        assert!(!gate.poll(ms(1000)), "the first enable was cancelled");
        assert!(!gate.is_open());
        assert!(gate.poll(ms(1600)));
        assert!(!gate.poll(ms(5000)), "an enable fires once");
    }

    #[test]
    fn scheduling_near_the_end_of_time_saturates() {
        let mut gate = ProcessingGate::default();
        gate.initialize(ActivationMode::UserTriggered, Visibility::Hidden);
        let transition = gate.recompute(ActivationMode::All, Visibility::Hidden, Duration::MAX);
        assert_eq!(transition, GateTransition::Scheduled { due_at: Duration::MAX });
        assert!(gate.poll(Duration::MAX));
    }

    #[test]
    fn zero_delay_opens_immediately_even_when_hidden() {
        let mut gate = ProcessingGate::new(Duration::ZERO);
        gate.initialize(ActivationMode::UserTriggered, Visibility::Hidden);
        assert_eq!(gate.recompute(ActivationMode::All, Visibility::Hidden, ms(0)), GateTransition::Opened);
    }
}
