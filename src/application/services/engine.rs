use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::Serialize;
use thiserror::Error;

use crate::domain::diff::Differ;
use crate::domain::entities::comparison::ComparisonResult;
use crate::domain::entities::monitoring::MonitoringConfig;
use crate::domain::entities::notification::NotificationTarget;
use crate::domain::entities::reference::ReferenceSnapshot;
use crate::domain::ports::capture::PageCapture;
use crate::domain::ports::notifier::ChangeNotifier;
use crate::domain::ports::store::{MonitoringStore, ReferenceStore, SettingsStore, StoreError};
use crate::domain::value_objects::MonitorState;

/// Errors surfaced synchronously by operator-initiated engine operations.
#[derive(Error, Debug)]
pub enum MonitorError {
    #[error("no capturable target available")]
    CaptureUnavailable,
    #[error("capture failed: {0}")]
    CaptureFailed(String),
    #[error("no reference snapshot captured")]
    NoReference,
    #[error("Telegram settings not configured")]
    NotificationNotConfigured,
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// How far a single check cycle got. Background cycles never fail loudly;
/// every early exit is logged and reported here instead.
#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    /// Monitoring was inactive when the cycle fired (stop raced the timer).
    Inactive,
    /// No target surface could be resolved.
    TargetUnresolved,
    /// Monitoring is active but no reference snapshot exists.
    NoReference,
    /// The current sample could not be captured.
    CaptureFailed,
    /// The comparison itself failed.
    ComparisonFailed,
    /// The comparison ran to completion.
    Completed(ComparisonResult),
}

/// Read-only view over the persisted monitoring state.
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub state: MonitorState,
    pub monitoring: MonitoringConfig,
    pub reference_captured_at: Option<DateTime<Utc>>,
    pub notification_configured: bool,
}

/// Orchestrates reference capture, arming, and the check cycle:
/// reload → settle → capture → compare → notify.
///
/// Holds no state of its own; everything lives in the injected stores, so
/// any process can resume a check cycle by reloading config.
pub struct MonitorEngine<'a> {
    capture: &'a dyn PageCapture,
    differ: &'a dyn Differ,
    telegram: &'a dyn ChangeNotifier,
    local: &'a dyn ChangeNotifier,
    monitoring_store: &'a dyn MonitoringStore,
    reference_store: &'a dyn ReferenceStore,
    settings_store: &'a dyn SettingsStore,
    defaults: MonitoringConfig,
}

impl<'a> MonitorEngine<'a> {
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        capture: &'a dyn PageCapture,
        differ: &'a dyn Differ,
        telegram: &'a dyn ChangeNotifier,
        local: &'a dyn ChangeNotifier,
        monitoring_store: &'a dyn MonitoringStore,
        reference_store: &'a dyn ReferenceStore,
        settings_store: &'a dyn SettingsStore,
        defaults: MonitoringConfig,
    ) -> Self {
        Self {
            capture,
            differ,
            telegram,
            local,
            monitoring_store,
            reference_store,
            settings_store,
            defaults,
        }
    }

    fn monitoring(&self) -> Result<MonitoringConfig, StoreError> {
        Ok(self
            .monitoring_store
            .load_monitoring()?
            .unwrap_or_else(|| self.defaults.clone()))
    }

    /// Capture a fresh reference snapshot, overwriting any prior one.
    ///
    /// Freezes the current keyword list into the snapshot.
    ///
    /// # Errors
    ///
    /// `CaptureUnavailable` when no target is resolvable, `CaptureFailed`
    /// when the sample cannot be produced, `Store` on persistence failure.
    pub async fn capture_reference(&self) -> Result<ReferenceSnapshot, MonitorError> {
        let handle = self
            .capture
            .resolve_target()
            .await
            .ok_or(MonitorError::CaptureUnavailable)?;
        let frame = self
            .capture
            .capture(&handle)
            .await
            .map_err(|e| MonitorError::CaptureFailed(e.to_string()))?;
        let key_phrases = self.settings_store.load_key_phrases()?;

        let snapshot = ReferenceSnapshot::new(handle.url, Utc::now(), frame, key_phrases);
        self.reference_store.save_reference(&snapshot)?;
        tracing::info!(
            "Reference captured: {} ({}x{})",
            snapshot.target_url,
            snapshot.frame.width,
            snapshot.frame.height
        );
        Ok(snapshot)
    }

    /// Arm periodic monitoring and return the first check delay.
    ///
    /// The delay is drawn uniformly from the configured interval range and
    /// must be redrawn on every re-arm (see [`Self::draw_check_interval`]).
    ///
    /// # Errors
    ///
    /// `NoReference` without a captured baseline,
    /// `NotificationNotConfigured` without usable Telegram credentials;
    /// both leave the persisted state unchanged.
    pub fn start_monitoring(&self) -> Result<Duration, MonitorError> {
        if self.reference_store.load_reference()?.is_none() {
            return Err(MonitorError::NoReference);
        }
        let target = self
            .settings_store
            .load_notification_target()?
            .unwrap_or_default();
        if !target.is_configured() {
            return Err(MonitorError::NotificationNotConfigured);
        }

        let mut config = self.monitoring()?.sanitized();
        config.is_active = true;
        self.monitoring_store.save_monitoring(&config)?;
        let delay = self.draw_check_interval(&config);
        tracing::info!("Monitoring armed, first check in {}s", delay.as_secs());
        Ok(delay)
    }

    /// Disarm periodic monitoring. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns `Store` when the updated config cannot be persisted.
    pub fn stop_monitoring(&self) -> Result<(), MonitorError> {
        let mut config = self.monitoring()?;
        config.is_active = false;
        self.monitoring_store.save_monitoring(&config)?;
        tracing::info!("Monitoring stopped");
        Ok(())
    }

    /// Draw the next check delay from the configured interval range.
    ///
    /// Deliberate jitter: redrawn before every check so repeated checks are
    /// never perfectly periodic. Bounds are inclusive.
    #[must_use]
    pub fn draw_check_interval(&self, config: &MonitoringConfig) -> Duration {
        let config = config.sanitized();
        let secs =
            rand::thread_rng().gen_range(config.interval_min_secs..=config.interval_max_secs);
        Duration::from_secs(secs)
    }

    /// Current state and configuration, without transition.
    ///
    /// # Errors
    ///
    /// Returns `Store` when the underlying reads fail.
    pub fn status(&self) -> Result<StatusReport, MonitorError> {
        let monitoring = self.monitoring()?;
        let reference = self.reference_store.load_reference()?;
        let target = self
            .settings_store
            .load_notification_target()?
            .unwrap_or_default();
        Ok(StatusReport {
            state: MonitorState::derive(reference.is_some(), monitoring.is_active),
            reference_captured_at: reference.map(|r| r.captured_at),
            notification_configured: target.is_configured(),
            monitoring,
        })
    }

    /// Persist operator settings verbatim.
    ///
    /// # Errors
    ///
    /// Returns `Store` when persistence fails.
    pub fn save_settings(
        &self,
        target: &NotificationTarget,
        key_phrases: &[String],
    ) -> Result<(), MonitorError> {
        self.settings_store.save_notification_target(target)?;
        self.settings_store.save_key_phrases(key_phrases)?;
        Ok(())
    }

    /// Run one check cycle. Infallible: every failure is logged and absorbed
    /// so the scheduler always survives to the next wakeup.
    ///
    /// Except for the inactive abort, the cycle always refreshes
    /// `last_check_at` so the operator can tell a stalled engine from a
    /// quiet page.
    pub async fn check_cycle(&self) -> CycleOutcome {
        // Liveness re-check: a stop may have raced the timer that fired us.
        let config = match self.monitoring_store.load_monitoring() {
            Ok(Some(config)) => config,
            Ok(None) => {
                tracing::debug!("No monitoring config stored, cycle skipped");
                return CycleOutcome::Inactive;
            }
            Err(e) => {
                tracing::warn!("Failed to load monitoring config: {e}");
                return CycleOutcome::Inactive;
            }
        };
        if !config.is_active {
            tracing::debug!("Monitoring inactive, cycle skipped");
            return CycleOutcome::Inactive;
        }

        let (outcome, page_url) = self.evaluate(&config).await;

        // Status bookkeeping commits before any notification is attempted.
        let mut updated = config;
        updated.last_check_at = Some(Utc::now());
        if let Err(e) = self.monitoring_store.save_monitoring(&updated) {
            tracing::warn!("Failed to persist last check time: {e}");
        }

        if let CycleOutcome::Completed(result) = &outcome {
            if result.changed {
                tracing::warn!(
                    "Change detected ({:.2}% of sampled positions)",
                    result.change_magnitude
                );
                self.dispatch_alerts(page_url.as_deref().unwrap_or(""), result);
            } else {
                tracing::debug!("No change ({:.2}%)", result.change_magnitude);
            }
        }

        outcome
    }

    /// Steps 2–4 of the cycle: resolve → reload/settle → capture → compare.
    async fn evaluate(&self, config: &MonitoringConfig) -> (CycleOutcome, Option<String>) {
        let Some(handle) = self.capture.resolve_target().await else {
            tracing::warn!("No resolvable target, check skipped");
            return (CycleOutcome::TargetUnresolved, None);
        };
        let page_url = Some(handle.url.clone());

        let reference = match self.reference_store.load_reference() {
            Ok(Some(reference)) => reference,
            Ok(None) => {
                tracing::warn!("Monitoring active without a reference snapshot");
                return (CycleOutcome::NoReference, page_url);
            }
            Err(e) => {
                tracing::warn!("Failed to load reference snapshot: {e}");
                return (CycleOutcome::NoReference, page_url);
            }
        };

        if config.auto_refresh {
            if let Err(e) = self.capture.reload(&handle).await {
                tracing::warn!("Reload failed: {e}");
            }
            // Settle delay: let the page finish rendering post-reload.
            tokio::time::sleep(Duration::from_millis(config.refresh_settle_delay_ms)).await;
        }

        let current = match self.capture.capture(&handle).await {
            Ok(frame) => frame,
            Err(e) => {
                tracing::warn!("Capture failed: {e}");
                return (CycleOutcome::CaptureFailed, page_url);
            }
        };

        match self.differ.compare(&reference, &current).await {
            Ok(result) => (CycleOutcome::Completed(result), page_url),
            Err(e) => {
                tracing::warn!("Comparison failed: {e}");
                (CycleOutcome::ComparisonFailed, page_url)
            }
        }
    }

    /// Fire-and-forget dual dispatch: Telegram and the local path are two
    /// independent invocations with isolated error handling, so one failing
    /// never suppresses the other.
    fn dispatch_alerts(&self, page_url: &str, result: &ComparisonResult) {
        let target = match self.settings_store.load_notification_target() {
            Ok(Some(target)) => target,
            Ok(None) => NotificationTarget::default(),
            Err(e) => {
                tracing::warn!("Failed to load notification target: {e}");
                NotificationTarget::default()
            }
        };

        if let Err(e) = self.telegram.notify_change(&target, page_url, result) {
            tracing::warn!("Telegram notification failed: {e}");
        }
        if let Err(e) = self.local.notify_change(&target, page_url, result) {
            tracing::warn!("Desktop notification failed: {e}");
        }
    }
}
