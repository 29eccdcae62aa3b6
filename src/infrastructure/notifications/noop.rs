use crate::domain::entities::comparison::ComparisonResult;
use crate::domain::entities::notification::NotificationTarget;
use crate::domain::ports::notifier::{ChangeNotifier, NotificationError};

/// No-op notifier that silently accepts every alert.
///
/// Used when the desktop channel is disabled in configuration.
pub struct NoopNotifier;

impl NoopNotifier {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Default for NoopNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangeNotifier for NoopNotifier {
    fn notify_change(
        &self,
        _target: &NotificationTarget,
        _page_url: &str,
        _result: &ComparisonResult,
    ) -> Result<(), NotificationError> {
        Ok(())
    }
}
