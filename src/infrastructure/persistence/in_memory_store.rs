use std::sync::Mutex;

use crate::domain::entities::monitoring::MonitoringConfig;
use crate::domain::entities::notification::NotificationTarget;
use crate::domain::entities::reference::ReferenceSnapshot;
use crate::domain::ports::store::{
    MonitoringStore, ReferenceStore, SettingsStore, StoreError,
};

/// In-memory store for testing purposes.
pub struct InMemoryStore {
    monitoring: Mutex<Option<MonitoringConfig>>,
    reference: Mutex<Option<ReferenceSnapshot>>,
    target: Mutex<Option<NotificationTarget>>,
    key_phrases: Mutex<Vec<String>>,
}

impl InMemoryStore {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            monitoring: Mutex::new(None),
            reference: Mutex::new(None),
            target: Mutex::new(None),
            key_phrases: Mutex::new(Vec::new()),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MonitoringStore for InMemoryStore {
    fn load_monitoring(&self) -> Result<Option<MonitoringConfig>, StoreError> {
        Ok(self
            .monitoring
            .lock()
            .map_err(|_| StoreError::ReadFailed("lock poisoned".into()))?
            .clone())
    }

    fn save_monitoring(&self, config: &MonitoringConfig) -> Result<(), StoreError> {
        *self
            .monitoring
            .lock()
            .map_err(|_| StoreError::WriteFailed("lock poisoned".into()))? =
            Some(config.clone());
        Ok(())
    }
}

impl ReferenceStore for InMemoryStore {
    fn load_reference(&self) -> Result<Option<ReferenceSnapshot>, StoreError> {
        Ok(self
            .reference
            .lock()
            .map_err(|_| StoreError::ReadFailed("lock poisoned".into()))?
            .clone())
    }

    fn save_reference(&self, snapshot: &ReferenceSnapshot) -> Result<(), StoreError> {
        *self
            .reference
            .lock()
            .map_err(|_| StoreError::WriteFailed("lock poisoned".into()))? =
            Some(snapshot.clone());
        Ok(())
    }
}

impl SettingsStore for InMemoryStore {
    fn load_notification_target(&self) -> Result<Option<NotificationTarget>, StoreError> {
        Ok(self
            .target
            .lock()
            .map_err(|_| StoreError::ReadFailed("lock poisoned".into()))?
            .clone())
    }

    fn save_notification_target(&self, target: &NotificationTarget) -> Result<(), StoreError> {
        *self
            .target
            .lock()
            .map_err(|_| StoreError::WriteFailed("lock poisoned".into()))? = Some(target.clone());
        Ok(())
    }

    fn load_key_phrases(&self) -> Result<Vec<String>, StoreError> {
        Ok(self
            .key_phrases
            .lock()
            .map_err(|_| StoreError::ReadFailed("lock poisoned".into()))?
            .clone())
    }

    fn save_key_phrases(&self, phrases: &[String]) -> Result<(), StoreError> {
        *self
            .key_phrases
            .lock()
            .map_err(|_| StoreError::WriteFailed("lock poisoned".into()))? = phrases.to_vec();
        Ok(())
    }
}
