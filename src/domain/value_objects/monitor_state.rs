use serde::{Deserialize, Serialize};

/// Engine state, derived from persisted facts rather than stored.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum MonitorState {
    /// No reference captured yet.
    Idle,
    /// Reference exists, monitoring inactive.
    Armed,
    /// Monitoring scheduled and running.
    Active,
}

impl MonitorState {
    #[must_use]
    pub const fn derive(has_reference: bool, is_active: bool) -> Self {
        match (has_reference, is_active) {
            (false, _) => Self::Idle,
            (true, false) => Self::Armed,
            (true, true) => Self::Active,
        }
    }
}

impl std::fmt::Display for MonitorState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Armed => write!(f, "armed"),
            Self::Active => write!(f, "active"),
        }
    }
}
