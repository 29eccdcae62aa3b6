use thiserror::Error;

use crate::domain::entities::monitoring::MonitoringConfig;
use crate::domain::entities::notification::NotificationTarget;
use crate::domain::entities::reference::ReferenceSnapshot;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("storage read failed: {0}")]
    ReadFailed(String),
    #[error("storage write failed: {0}")]
    WriteFailed(String),
}

/// Persists the monitoring configuration.
///
/// Each call is atomic on its own; no multi-key transactions are required.
pub trait MonitoringStore: Send + Sync {
    /// Load the stored monitoring configuration, if any.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the read operation fails.
    fn load_monitoring(&self) -> Result<Option<MonitoringConfig>, StoreError>;

    /// Persist the monitoring configuration, replacing any prior one.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the write operation fails.
    fn save_monitoring(&self, config: &MonitoringConfig) -> Result<(), StoreError>;
}

/// Persists the single reference snapshot.
pub trait ReferenceStore: Send + Sync {
    /// Load the current reference snapshot, if one was captured.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the read operation fails.
    fn load_reference(&self) -> Result<Option<ReferenceSnapshot>, StoreError>;

    /// Persist the reference snapshot, replacing any prior one.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the write operation fails.
    fn save_reference(&self, snapshot: &ReferenceSnapshot) -> Result<(), StoreError>;
}

/// Persists operator-entered settings: Telegram credentials and the
/// keyword list.
pub trait SettingsStore: Send + Sync {
    /// Load the stored Telegram credentials, if any.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the read operation fails.
    fn load_notification_target(&self) -> Result<Option<NotificationTarget>, StoreError>;

    /// Persist the Telegram credentials verbatim.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the write operation fails.
    fn save_notification_target(&self, target: &NotificationTarget) -> Result<(), StoreError>;

    /// Load the current keyword list (empty when never saved).
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the read operation fails.
    fn load_key_phrases(&self) -> Result<Vec<String>, StoreError>;

    /// Persist the keyword list, replacing any prior one.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the write operation fails.
    fn save_key_phrases(&self, phrases: &[String]) -> Result<(), StoreError>;
}
