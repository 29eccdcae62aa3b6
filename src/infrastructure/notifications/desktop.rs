use notify_rust::{Notification, Timeout, Urgency};

use crate::domain::entities::comparison::ComparisonResult;
use crate::domain::entities::notification::NotificationTarget;
use crate::domain::ports::notifier::{ChangeNotifier, NotificationError};

const MAX_BODY_CHARS: usize = 250;
const MAX_SUMMARY_CHARS: usize = 100;

/// Magnitude at or above which the notification is marked critical.
const CRITICAL_MAGNITUDE: f64 = 50.0;

/// Local desktop notification path, independent of the Telegram transport.
pub struct DesktopNotifier;

impl DesktopNotifier {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Default for DesktopNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangeNotifier for DesktopNotifier {
    fn notify_change(
        &self,
        _target: &NotificationTarget,
        page_url: &str,
        result: &ComparisonResult,
    ) -> Result<(), NotificationError> {
        let urgency = magnitude_to_urgency(result.change_magnitude);

        let raw_summary = "\u{26a0}\u{fe0f} Guet \u{2014} page change detected";
        let summary = truncate(&escape_markup(raw_summary), MAX_SUMMARY_CHARS);

        let raw_body = if result.missing_signals.is_empty() {
            format!(
                "{page_url}\n{:.2}% of sampled positions differ",
                result.change_magnitude
            )
        } else {
            format!(
                "{page_url}\n{:.2}% of sampled positions differ\n{}",
                result.change_magnitude,
                result.missing_signals.join(", ")
            )
        };
        let body = truncate(&escape_markup(&raw_body), MAX_BODY_CHARS);

        send_notification(&summary, &body, urgency)
    }
}

fn send_notification(summary: &str, body: &str, urgency: Urgency) -> Result<(), NotificationError> {
    Notification::new()
        .summary(summary)
        .body(body)
        .urgency(urgency)
        .timeout(Timeout::Milliseconds(10_000))
        .show()
        .map_err(|_| {
            NotificationError::ChannelUnavailable(
                "desktop notification server unreachable".to_string(),
            )
        })?;

    Ok(())
}

fn magnitude_to_urgency(magnitude: f64) -> Urgency {
    if magnitude >= CRITICAL_MAGNITUDE {
        Urgency::Critical
    } else {
        Urgency::Normal
    }
}

// Truncates on Unicode scalar values (not grapheme clusters; ZWJ sequences may split).
fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_owned()
    } else {
        let mut result: String = s.chars().take(max_chars - 1).collect();
        result.push('\u{2026}');
        result
    }
}

fn escape_markup(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
