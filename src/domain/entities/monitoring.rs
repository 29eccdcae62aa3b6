use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Persisted monitoring configuration.
///
/// Owned exclusively by the config store; the engine reads and writes it on
/// every transition so that a process restart resumes correctly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitoringConfig {
    /// Whether periodic checks are currently armed.
    pub is_active: bool,
    /// Lower bound of the jittered re-check interval, in seconds.
    pub interval_min_secs: u64,
    /// Upper bound of the jittered re-check interval, in seconds.
    pub interval_max_secs: u64,
    /// Reload the page before capturing during a check cycle.
    pub auto_refresh: bool,
    /// Pause after a forced reload before capturing, in milliseconds.
    pub refresh_settle_delay_ms: u64,
    /// When the last check cycle reached its status update.
    pub last_check_at: Option<DateTime<Utc>>,
}

impl MonitoringConfig {
    /// Returns a copy with the interval invariant restored by clamping:
    /// both bounds at least 1 second, and `min <= max`.
    #[must_use]
    pub fn sanitized(&self) -> Self {
        let min = self.interval_min_secs.max(1);
        let max = self.interval_max_secs.max(min);
        Self {
            interval_min_secs: min,
            interval_max_secs: max,
            ..self.clone()
        }
    }
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            is_active: false,
            interval_min_secs: 40,
            interval_max_secs: 125,
            auto_refresh: true,
            refresh_settle_delay_ms: 2000,
            last_check_at: None,
        }
    }
}
