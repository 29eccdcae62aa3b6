use std::time::Duration;

use async_trait::async_trait;

use crate::domain::entities::frame::ImageFrame;
use crate::domain::ports::capture::{CaptureError, PageCapture, PageHandle};
use crate::infrastructure::imaging;

/// Maximum stderr bytes included in error messages.
const MAX_STDERR_BYTES: usize = 512;

/// Captures the target page by driving a headless browser binary
/// (`chromium --headless --screenshot=...`).
///
/// Every capture navigates the page from scratch, so `reload` is a no-op
/// here; the engine's settle delay still applies between reload and capture.
pub struct HeadlessBrowserCapture {
    url: String,
    browser_bin: String,
    timeout_secs: u64,
    window_width: u32,
    window_height: u32,
}

impl HeadlessBrowserCapture {
    #[must_use]
    pub const fn new(
        url: String,
        browser_bin: String,
        timeout_secs: u64,
        window_width: u32,
        window_height: u32,
    ) -> Self {
        Self {
            url,
            browser_bin,
            timeout_secs,
            window_width,
            window_height,
        }
    }

    async fn screenshot(&self, url: &str) -> Result<ImageFrame, CaptureError> {
        let dir = tempfile::tempdir()
            .map_err(|e| CaptureError::Failed(format!("failed to create scratch dir: {e}")))?;
        let shot_path = dir.path().join("page.png");
        let Some(shot_arg) = shot_path.to_str() else {
            return Err(CaptureError::Failed(
                "scratch path is not valid UTF-8".to_string(),
            ));
        };

        let output = tokio::time::timeout(
            Duration::from_secs(self.timeout_secs),
            tokio::process::Command::new(&self.browser_bin)
                .args([
                    "--headless",
                    "--disable-gpu",
                    "--hide-scrollbars",
                    &format!("--screenshot={shot_arg}"),
                    &format!("--window-size={},{}", self.window_width, self.window_height),
                    url,
                ])
                .kill_on_drop(true)
                .output(),
        )
        .await
        .map_err(|_| CaptureError::Timeout(self.timeout_secs))?
        .map_err(|e| CaptureError::Failed(format!("failed to run {}: {e}", self.browser_bin)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(
                &output.stderr[..output.stderr.len().min(MAX_STDERR_BYTES)],
            );
            return Err(CaptureError::Failed(format!(
                "{} exited with {}: {stderr}",
                self.browser_bin, output.status
            )));
        }

        let bytes = std::fs::read(&shot_path)
            .map_err(|e| CaptureError::Failed(format!("screenshot file unreadable: {e}")))?;
        imaging::decode_png(&bytes).map_err(|e| CaptureError::Failed(e.to_string()))
    }
}

#[async_trait]
impl PageCapture for HeadlessBrowserCapture {
    async fn resolve_target(&self) -> Option<PageHandle> {
        if self.url.trim().is_empty() {
            return None;
        }
        Some(PageHandle {
            url: self.url.clone(),
        })
    }

    async fn capture(&self, target: &PageHandle) -> Result<ImageFrame, CaptureError> {
        let frame = self.screenshot(&target.url).await?;
        tracing::debug!(
            "Captured {} ({}x{})",
            target.url,
            frame.width,
            frame.height
        );
        Ok(frame)
    }

    async fn reload(&self, target: &PageHandle) -> Result<(), CaptureError> {
        // Each screenshot run navigates fresh; nothing to reload here.
        tracing::debug!("Reload is implicit for {}", target.url);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    fn make_capture(url: &str) -> HeadlessBrowserCapture {
        HeadlessBrowserCapture::new(url.to_string(), "chromium".to_string(), 30, 1280, 1024)
    }

    #[tokio::test]
    async fn empty_url_resolves_to_none() {
        let capture = make_capture("");
        assert!(capture.resolve_target().await.is_none());
    }

    #[tokio::test]
    async fn whitespace_url_resolves_to_none() {
        let capture = make_capture("   ");
        assert!(capture.resolve_target().await.is_none());
    }

    #[tokio::test]
    async fn configured_url_resolves_to_handle() {
        let capture = make_capture("https://example.com/slots");
        let handle = capture.resolve_target().await.expect("handle");
        assert_eq!(handle.url, "https://example.com/slots");
    }

    #[tokio::test]
    async fn reload_is_a_noop() {
        let capture = make_capture("https://example.com");
        let handle = capture.resolve_target().await.expect("handle");
        assert!(capture.reload(&handle).await.is_ok());
    }

    #[tokio::test]
    async fn missing_browser_binary_fails_capture() {
        let capture = HeadlessBrowserCapture::new(
            "https://example.com".to_string(),
            "definitely-not-a-browser-bin".to_string(),
            5,
            800,
            600,
        );
        let handle = capture.resolve_target().await.expect("handle");
        let result = capture.capture(&handle).await;
        assert!(matches!(result, Err(CaptureError::Failed(_))));
    }
}
