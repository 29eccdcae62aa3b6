use std::fmt::Write;
use std::time::Duration;

use serde_json::json;
use tracing::warn;

use crate::domain::entities::comparison::ComparisonResult;
use crate::domain::entities::notification::NotificationTarget;
use crate::domain::ports::notifier::{ChangeNotifier, NotificationError};

const API_BASE: &str = "https://api.telegram.org";

/// Sends change alerts to a Telegram chat through the Bot API.
///
/// Credentials travel with each call so the notifier itself stays
/// stateless. Delivery is best-effort: non-2xx responses and network
/// failures are logged, never retried, never escalated.
pub struct TelegramNotifier {
    client: reqwest::Client,
    api_base: String,
}

impl TelegramNotifier {
    /// Creates a new Telegram notifier against the public Bot API.
    ///
    /// The HTTP client is configured with a 5-second timeout covering
    /// DNS resolution, connection, and response.
    ///
    /// # Errors
    ///
    /// Returns `NotificationError::ChannelUnavailable` if the HTTP client
    /// cannot be initialized (e.g. TLS backend failure).
    pub fn new() -> Result<Self, NotificationError> {
        Self::with_api_base(API_BASE.to_string())
    }

    /// Same as [`Self::new`] with a custom API base, for tests.
    ///
    /// # Errors
    ///
    /// Returns `NotificationError::ChannelUnavailable` if the HTTP client
    /// cannot be initialized.
    pub fn with_api_base(api_base: String) -> Result<Self, NotificationError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| {
                NotificationError::ChannelUnavailable(format!("failed to build HTTP client: {e}"))
            })?;

        Ok(Self { client, api_base })
    }

    fn send_message_url(&self, target: &NotificationTarget) -> String {
        format!("{}/bot{}/sendMessage", self.api_base, target.bot_token)
    }

    /// Sends the message payload. Best-effort: errors are logged and
    /// swallowed so a failing transport never blocks the check cycle.
    fn send_payload(&self, target: &NotificationTarget, text: &str) {
        let url = self.send_message_url(target);
        let payload = json!({
            "chat_id": target.chat_id,
            "text": text,
        });

        let result = tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current()
                .block_on(self.client.post(&url).json(&payload).send())
        });

        match result {
            Ok(resp) if resp.status().is_success() => {}
            Ok(resp) => warn!("Telegram HTTP {}", resp.status()),
            Err(e) => warn!("Telegram error: {e}"),
        }
    }
}

/// Alert text: the page, the computed magnitude, and the reasons.
fn format_message(page_url: &str, result: &ComparisonResult) -> String {
    let mut text = format!(
        "\u{26a0}\u{fe0f} Page change detected\n{page_url}\n{:.2}% of sampled positions differ",
        result.change_magnitude
    );
    for signal in &result.missing_signals {
        let _ = write!(text, "\n\u{2022} {signal}");
    }
    text
}

impl ChangeNotifier for TelegramNotifier {
    fn notify_change(
        &self,
        target: &NotificationTarget,
        page_url: &str,
        result: &ComparisonResult,
    ) -> Result<(), NotificationError> {
        if !target.is_configured() {
            return Err(NotificationError::ChannelUnavailable(
                "Telegram credentials missing".to_string(),
            ));
        }
        let text = format_message(page_url, result);
        self.send_payload(target, &text);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;

    fn make_notifier() -> TelegramNotifier {
        TelegramNotifier::new().expect("build HTTP client")
    }

    fn make_target() -> NotificationTarget {
        NotificationTarget::new("123:abc".to_string(), "4242".to_string())
    }

    fn make_result(magnitude: f64, signals: &[&str]) -> ComparisonResult {
        ComparisonResult {
            changed: true,
            change_magnitude: magnitude,
            missing_signals: signals.iter().map(ToString::to_string).collect(),
        }
    }

    #[test]
    fn send_message_url_embeds_token() {
        let n = make_notifier();
        let url = n.send_message_url(&make_target());
        assert_eq!(url, "https://api.telegram.org/bot123:abc/sendMessage");
    }

    #[test]
    fn custom_api_base_is_used() {
        let n = TelegramNotifier::with_api_base("http://127.0.0.1:9999".to_string())
            .expect("build HTTP client");
        let url = n.send_message_url(&make_target());
        assert_eq!(url, "http://127.0.0.1:9999/bot123:abc/sendMessage");
    }

    #[test]
    fn message_includes_magnitude_and_url() {
        let text = format_message(
            "https://example.com/slots",
            &make_result(12.34, &["visual changes detected"]),
        );
        assert!(text.contains("https://example.com/slots"));
        assert!(text.contains("12.34% of sampled positions differ"));
        assert!(text.contains("\u{2022} visual changes detected"));
    }

    #[test]
    fn message_lists_every_signal() {
        let text = format_message(
            "https://example.com",
            &make_result(100.0, &["dimensions differ", "keyword missing: complet"]),
        );
        assert!(text.contains("dimensions differ"));
        assert!(text.contains("keyword missing: complet"));
    }

    #[test]
    fn message_without_signals_has_no_bullets() {
        let text = format_message("https://example.com", &make_result(7.5, &[]));
        assert!(!text.contains('\u{2022}'));
    }

    #[test]
    fn unconfigured_target_is_channel_unavailable() {
        let n = make_notifier();
        let target = NotificationTarget::default();
        let result = n.notify_change(&target, "https://example.com", &make_result(50.0, &[]));
        assert!(matches!(
            result,
            Err(NotificationError::ChannelUnavailable(_))
        ));
    }
}
