#![allow(clippy::expect_used)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use guet::application::services::engine::{CycleOutcome, MonitorEngine, MonitorError};
use guet::domain::diff::PixelDiffer;
use guet::domain::entities::comparison::ComparisonResult;
use guet::domain::entities::frame::ImageFrame;
use guet::domain::entities::monitoring::MonitoringConfig;
use guet::domain::entities::notification::NotificationTarget;
use guet::domain::entities::reference::ReferenceSnapshot;
use guet::domain::ports::capture::{CaptureError, PageCapture, PageHandle};
use guet::domain::ports::notifier::{ChangeNotifier, NotificationError};
use guet::domain::ports::store::{MonitoringStore, ReferenceStore, SettingsStore};
use guet::infrastructure::persistence::in_memory_store::InMemoryStore;

const PAGE_URL: &str = "https://example.com/appointments";

// ---------------------------------------------------------------------------
// Frame helpers
// ---------------------------------------------------------------------------

fn uniform_frame(width: u32, height: u32, rgb: [u8; 3]) -> ImageFrame {
    let mut data = Vec::with_capacity((width * height * 4) as usize);
    for _ in 0..width * height {
        data.extend_from_slice(&[rgb[0], rgb[1], rgb[2], 255]);
    }
    ImageFrame::new(width, height, data)
}

/// Copy of `frame` with `count` positions of the 10-stride sampling grid
/// pushed far beyond the channel tolerance.
fn diverge_sampled_positions(frame: &ImageFrame, count: usize) -> ImageFrame {
    let mut out = frame.clone();
    let mut remaining = count;
    let mut y = 0;
    'outer: while y < out.height {
        let mut x = 0;
        while x < out.width {
            if remaining == 0 {
                break 'outer;
            }
            let offset = ((y * out.width + x) * 4) as usize;
            out.data[offset] = out.data[offset].wrapping_add(120);
            remaining -= 1;
            x += 10;
        }
        y += 10;
    }
    out
}

// ---------------------------------------------------------------------------
// CountingCapture
// ---------------------------------------------------------------------------

struct CountingCapture {
    frame: ImageFrame,
    captures: AtomicUsize,
}

impl CountingCapture {
    fn returning(frame: ImageFrame) -> Self {
        Self {
            frame,
            captures: AtomicUsize::new(0),
        }
    }

    fn capture_count(&self) -> usize {
        self.captures.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PageCapture for CountingCapture {
    async fn resolve_target(&self) -> Option<PageHandle> {
        Some(PageHandle {
            url: PAGE_URL.to_string(),
        })
    }

    async fn capture(&self, _target: &PageHandle) -> Result<ImageFrame, CaptureError> {
        self.captures.fetch_add(1, Ordering::SeqCst);
        Ok(self.frame.clone())
    }

    async fn reload(&self, _target: &PageHandle) -> Result<(), CaptureError> {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// TrackingNotifier
// ---------------------------------------------------------------------------

struct TrackingNotifier {
    results: Mutex<Vec<ComparisonResult>>,
}

impl TrackingNotifier {
    const fn new() -> Self {
        Self {
            results: Mutex::new(vec![]),
        }
    }

    fn delivered(&self) -> Vec<ComparisonResult> {
        self.results.lock().expect("lock").clone()
    }
}

impl ChangeNotifier for TrackingNotifier {
    fn notify_change(
        &self,
        _target: &NotificationTarget,
        _page_url: &str,
        result: &ComparisonResult,
    ) -> Result<(), NotificationError> {
        self.results.lock().expect("lock").push(result.clone());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn configured_target() -> NotificationTarget {
    NotificationTarget::new("123456:bot-token".to_string(), "987654".to_string())
}

fn seed_active(store: &InMemoryStore, reference: &ImageFrame) {
    store
        .save_reference(&ReferenceSnapshot::new(
            PAGE_URL.to_string(),
            Utc::now(),
            reference.clone(),
            vec![],
        ))
        .expect("save reference");
    store
        .save_notification_target(&configured_target())
        .expect("save target");
    store
        .save_monitoring(&MonitoringConfig {
            is_active: true,
            auto_refresh: false,
            refresh_settle_delay_ms: 0,
            ..MonitoringConfig::default()
        })
        .expect("save monitoring");
}

// ---------------------------------------------------------------------------
// Scenario A: unchanged page
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unchanged_page_refreshes_timestamp_without_alerts() {
    let reference = uniform_frame(100, 100, [90, 120, 150]);
    let store = InMemoryStore::new();
    seed_active(&store, &reference);

    let capture = CountingCapture::returning(reference);
    let differ = PixelDiffer::default();
    let telegram = TrackingNotifier::new();
    let local = TrackingNotifier::new();
    let engine = MonitorEngine::new(
        &capture,
        &differ,
        &telegram,
        &local,
        &store,
        &store,
        &store,
        MonitoringConfig::default(),
    );

    let outcome = engine.check_cycle().await;
    let CycleOutcome::Completed(result) = outcome else {
        panic!("expected completed cycle, got {outcome:?}");
    };
    assert!(!result.changed);
    assert!(result.change_magnitude.abs() < f64::EPSILON);

    let monitoring = store
        .load_monitoring()
        .expect("load")
        .expect("monitoring persisted");
    assert!(monitoring.last_check_at.is_some());
    assert!(telegram.delivered().is_empty());
    assert!(local.delivered().is_empty());
}

// ---------------------------------------------------------------------------
// Scenario B: 10% of sampled positions diverge
// ---------------------------------------------------------------------------

#[tokio::test]
async fn ten_percent_divergence_alerts_each_path_exactly_once() {
    let reference = uniform_frame(100, 100, [90, 120, 150]);
    let store = InMemoryStore::new();
    seed_active(&store, &reference);

    // 100x100 at stride 10 samples 100 positions; diverge 10 of them.
    let current = diverge_sampled_positions(&reference, 10);
    let capture = CountingCapture::returning(current);
    let differ = PixelDiffer::default();
    let telegram = TrackingNotifier::new();
    let local = TrackingNotifier::new();
    let engine = MonitorEngine::new(
        &capture,
        &differ,
        &telegram,
        &local,
        &store,
        &store,
        &store,
        MonitoringConfig::default(),
    );

    let outcome = engine.check_cycle().await;
    let CycleOutcome::Completed(result) = outcome else {
        panic!("expected completed cycle, got {outcome:?}");
    };
    assert!(result.changed);
    assert!((result.change_magnitude - 10.0).abs() < f64::EPSILON);

    let telegram_calls = telegram.delivered();
    let local_calls = local.delivered();
    assert_eq!(telegram_calls.len(), 1);
    assert_eq!(local_calls.len(), 1);
    assert!((telegram_calls[0].change_magnitude - 10.0).abs() < f64::EPSILON);
}

// ---------------------------------------------------------------------------
// Scenario C: start with empty credentials
// ---------------------------------------------------------------------------

#[tokio::test]
async fn start_with_empty_bot_token_reports_exact_error() {
    let store = InMemoryStore::new();
    store
        .save_reference(&ReferenceSnapshot::new(
            PAGE_URL.to_string(),
            Utc::now(),
            uniform_frame(10, 10, [0, 0, 0]),
            vec![],
        ))
        .expect("save reference");
    store
        .save_notification_target(&NotificationTarget::new(
            String::new(),
            "987654".to_string(),
        ))
        .expect("save target");

    let capture = CountingCapture::returning(uniform_frame(10, 10, [0, 0, 0]));
    let differ = PixelDiffer::default();
    let telegram = TrackingNotifier::new();
    let local = TrackingNotifier::new();
    let engine = MonitorEngine::new(
        &capture,
        &differ,
        &telegram,
        &local,
        &store,
        &store,
        &store,
        MonitoringConfig::default(),
    );

    let err = engine.start_monitoring().expect_err("must fail");
    assert!(matches!(err, MonitorError::NotificationNotConfigured));
    assert_eq!(err.to_string(), "Telegram settings not configured");

    // State unchanged: nothing activated the monitor.
    assert!(store
        .load_monitoring()
        .expect("load")
        .is_none_or(|m| !m.is_active));
}

// ---------------------------------------------------------------------------
// Scenario D: stop raced the scheduler
// ---------------------------------------------------------------------------

#[tokio::test]
async fn inactive_cycle_aborts_before_capture() {
    let reference = uniform_frame(100, 100, [90, 120, 150]);
    let store = InMemoryStore::new();
    seed_active(&store, &reference);

    let capture = CountingCapture::returning(diverge_sampled_positions(&reference, 50));
    let differ = PixelDiffer::default();
    let telegram = TrackingNotifier::new();
    let local = TrackingNotifier::new();
    let engine = MonitorEngine::new(
        &capture,
        &differ,
        &telegram,
        &local,
        &store,
        &store,
        &store,
        MonitoringConfig::default(),
    );

    // The stop lands between the timer arming and the cycle firing.
    engine.stop_monitoring().expect("stop");
    let outcome = engine.check_cycle().await;

    assert_eq!(outcome, CycleOutcome::Inactive);
    assert_eq!(capture.capture_count(), 0);
    assert!(store
        .load_monitoring()
        .expect("load")
        .expect("monitoring persisted")
        .last_check_at
        .is_none());
    assert!(telegram.delivered().is_empty());
    assert!(local.delivered().is_empty());
}

// ---------------------------------------------------------------------------
// Start/stop lifecycle and jitter bounds
// ---------------------------------------------------------------------------

#[tokio::test]
async fn full_lifecycle_capture_start_check_stop() {
    let store = InMemoryStore::new();
    store
        .save_notification_target(&configured_target())
        .expect("save target");
    store
        .save_key_phrases(&["no slots available".to_string()])
        .expect("save phrases");
    store
        .save_monitoring(&MonitoringConfig {
            auto_refresh: false,
            refresh_settle_delay_ms: 0,
            ..MonitoringConfig::default()
        })
        .expect("save monitoring");

    let frame = uniform_frame(60, 60, [10, 20, 30]);
    let capture = CountingCapture::returning(frame);
    let differ = PixelDiffer::default();
    let telegram = TrackingNotifier::new();
    let local = TrackingNotifier::new();
    let engine = MonitorEngine::new(
        &capture,
        &differ,
        &telegram,
        &local,
        &store,
        &store,
        &store,
        MonitoringConfig::default(),
    );

    // Idle → Armed: capture freezes the keyword list.
    let snapshot = engine.capture_reference().await.expect("capture");
    assert_eq!(snapshot.key_phrases, vec!["no slots available"]);

    // Armed → Active.
    let delay = engine.start_monitoring().expect("start");
    assert!((40..=125).contains(&delay.as_secs()));

    // Active → Active: an unchanged check leaves no alert behind.
    let outcome = engine.check_cycle().await;
    assert!(matches!(outcome, CycleOutcome::Completed(r) if !r.changed));

    // Active → Armed, twice: stop is idempotent.
    engine.stop_monitoring().expect("first stop");
    engine.stop_monitoring().expect("second stop");
    assert!(!store
        .load_monitoring()
        .expect("load")
        .expect("monitoring persisted")
        .is_active);
}

#[tokio::test]
async fn armed_interval_always_within_configured_bounds() {
    let store = InMemoryStore::new();
    seed_active(&store, &uniform_frame(10, 10, [0, 0, 0]));

    let capture = CountingCapture::returning(uniform_frame(10, 10, [0, 0, 0]));
    let differ = PixelDiffer::default();
    let telegram = TrackingNotifier::new();
    let local = TrackingNotifier::new();
    let engine = MonitorEngine::new(
        &capture,
        &differ,
        &telegram,
        &local,
        &store,
        &store,
        &store,
        MonitoringConfig::default(),
    );

    for _ in 0..100 {
        let delay = engine.start_monitoring().expect("start");
        assert!(
            (40..=125).contains(&delay.as_secs()),
            "armed interval {}s outside [40,125]",
            delay.as_secs()
        );
        engine.stop_monitoring().expect("stop");
    }
}

// ---------------------------------------------------------------------------
// Dimension change end to end
// ---------------------------------------------------------------------------

#[tokio::test]
async fn resized_page_is_always_a_change() {
    let reference = uniform_frame(100, 100, [90, 120, 150]);
    let store = InMemoryStore::new();
    seed_active(&store, &reference);

    let capture = CountingCapture::returning(uniform_frame(120, 100, [90, 120, 150]));
    let differ = PixelDiffer::default();
    let telegram = TrackingNotifier::new();
    let local = TrackingNotifier::new();
    let engine = MonitorEngine::new(
        &capture,
        &differ,
        &telegram,
        &local,
        &store,
        &store,
        &store,
        MonitoringConfig::default(),
    );

    let outcome = engine.check_cycle().await;
    let CycleOutcome::Completed(result) = outcome else {
        panic!("expected completed cycle, got {outcome:?}");
    };
    assert!(result.changed);
    assert!((result.change_magnitude - 100.0).abs() < f64::EPSILON);
    assert_eq!(result.missing_signals, vec!["dimensions differ"]);
    assert_eq!(telegram.delivered().len(), 1);
}
