use thiserror::Error;

use crate::domain::entities::comparison::ComparisonResult;
use crate::domain::entities::notification::NotificationTarget;

#[derive(Error, Debug)]
pub enum NotificationError {
    #[error("failed to send notification: {0}")]
    SendFailed(String),
    #[error("notification channel unavailable: {0}")]
    ChannelUnavailable(String),
}

/// Delivers a change alert through one transport.
///
/// Best-effort: the engine treats every error as log-and-continue, so a
/// failed alert never aborts status bookkeeping.
pub trait ChangeNotifier: Send + Sync {
    /// Send an alert for a detected change on `page_url`.
    ///
    /// Transports that do not use operator credentials (e.g. desktop
    /// notifications) ignore `target`.
    ///
    /// # Errors
    ///
    /// Returns `NotificationError` if the notification fails to send
    /// or the channel is unavailable.
    fn notify_change(
        &self,
        target: &NotificationTarget,
        page_url: &str,
        result: &ComparisonResult,
    ) -> Result<(), NotificationError>;
}
