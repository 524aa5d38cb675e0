use serde::{Deserialize, Serialize};

// --- Kinds ---

/// Category of a notification, used to pick the bucket that owns it.
///
/// Kinds form a small hierarchy: a kind is assignable to itself and to every
/// kind on its base chain, so a bucket declared for [`NotificationKind::Simple`]
/// also accepts [`NotificationKind::ProgressCompletion`] and any custom kind
/// derived from `Simple`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NotificationKind {
    /// Plain text notification.
    Simple,
    /// Long-running task with a progress state machine.
    Progress,
    /// Result posted by a finished [`NotificationKind::Progress`] notification.
    ProgressCompletion,
    /// Caller-supplied kind with an optional base kind.
    Custom {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        base: Option<Box<NotificationKind>>,
    },
}

impl NotificationKind {
    pub fn custom(name: impl Into<String>) -> Self {
        NotificationKind::Custom { name: name.into(), base: None }
    }

    pub fn custom_derived(name: impl Into<String>, base: NotificationKind) -> Self {
        NotificationKind::Custom { name: name.into(), base: Some(Box::new(base)) }
    }

    /// The kind this one derives from, if any.
    pub fn base(&self) -> Option<&NotificationKind> {
        match self {
            NotificationKind::ProgressCompletion => Some(&NotificationKind::Simple),
            NotificationKind::Custom { base, .. } => base.as_deref(),
            NotificationKind::Simple | NotificationKind::Progress => None,
        }
    }

    /// Whether a notification of this kind may be stored where `target` is accepted.
    pub fn is_assignable_to(&self, target: &NotificationKind) -> bool {
        let mut current = Some(self);
        while let Some(kind) = current {
            if kind == target {
                return true;
            }
            current = kind.base();
        }
        false
    }

    /// Only progress notifications get a completion target bound at post time.
    pub fn supports_completion_target(&self) -> bool {
        self.is_assignable_to(&NotificationKind::Progress)
    }
}

// --- Lifecycle enums ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ReadState {
    #[default]
    Unread,
    Read,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Visibility {
    #[default]
    Hidden,
    Visible,
}

/// Application-wide overlay activation mode.
///
/// `All` keeps notification processing running even while the overlay is hidden;
/// `Disabled` additionally refuses to show the overlay at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ActivationMode {
    Disabled,
    UserTriggered,
    #[default]
    All,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ProgressState {
    #[default]
    Queued,
    Active,
    Completed,
    Cancelled,
}

impl ProgressState {
    pub fn is_terminal(self) -> bool {
        matches!(self, ProgressState::Completed | ProgressState::Cancelled)
    }

    pub fn can_transition_to(self, next: ProgressState) -> bool {
        match (self, next) {
            (from, to) if from == to => true,
            (ProgressState::Queued, _) => true,
            (ProgressState::Active, ProgressState::Completed | ProgressState::Cancelled) => true,
            _ => false,
        }
    }
}
