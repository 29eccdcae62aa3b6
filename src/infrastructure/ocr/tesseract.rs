use std::time::Duration;

use async_trait::async_trait;

use crate::domain::entities::frame::ImageFrame;
use crate::domain::ports::recognizer::{RecognitionError, TextRecognizer};
use crate::infrastructure::imaging;

/// Maximum recognized text size (1 MB). Anything larger than this out of a
/// single page screenshot is garbage.
const MAX_OUTPUT_BYTES: usize = 1024 * 1024;

/// Maximum stderr bytes included in error messages.
const MAX_STDERR_BYTES: usize = 512;

/// Shell-out text recognition through the `tesseract` CLI.
///
/// Backs the keyword comparison strategy only.
pub struct TesseractRecognizer {
    binary: String,
    lang: String,
    timeout_secs: u64,
}

impl TesseractRecognizer {
    #[must_use]
    pub const fn new(binary: String, lang: String, timeout_secs: u64) -> Self {
        Self {
            binary,
            lang,
            timeout_secs,
        }
    }
}

#[async_trait]
impl TextRecognizer for TesseractRecognizer {
    async fn extract_text(&self, frame: &ImageFrame) -> Result<String, RecognitionError> {
        let png = imaging::encode_png(frame)
            .map_err(|e| RecognitionError::InvalidOutput(e.to_string()))?;

        let dir = tempfile::tempdir()
            .map_err(|e| RecognitionError::Unavailable(format!("scratch dir: {e}")))?;
        let img_path = dir.path().join("frame.png");
        std::fs::write(&img_path, png)
            .map_err(|e| RecognitionError::Unavailable(format!("scratch write: {e}")))?;
        let Some(img_arg) = img_path.to_str() else {
            return Err(RecognitionError::Unavailable(
                "scratch path is not valid UTF-8".to_string(),
            ));
        };

        let output = tokio::time::timeout(
            Duration::from_secs(self.timeout_secs),
            tokio::process::Command::new(&self.binary)
                .args([img_arg, "stdout", "-l", &self.lang])
                .kill_on_drop(true)
                .output(),
        )
        .await
        .map_err(|_| RecognitionError::Timeout)?
        .map_err(|e| RecognitionError::Unavailable(format!("failed to run {}: {e}", self.binary)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(
                &output.stderr[..output.stderr.len().min(MAX_STDERR_BYTES)],
            );
            return Err(RecognitionError::Unavailable(format!(
                "{} exited with {}: {stderr}",
                self.binary, output.status
            )));
        }

        if output.stdout.len() > MAX_OUTPUT_BYTES {
            return Err(RecognitionError::InvalidOutput(format!(
                "recognized text too large: {} bytes",
                output.stdout.len()
            )));
        }

        let text = std::str::from_utf8(&output.stdout)
            .map_err(|e| RecognitionError::InvalidOutput(format!("invalid UTF-8: {e}")))?;
        Ok(text.trim().to_string())
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    fn small_frame() -> ImageFrame {
        ImageFrame::new(2, 2, vec![255; 16])
    }

    #[tokio::test]
    async fn missing_binary_is_unavailable() {
        let recognizer =
            TesseractRecognizer::new("definitely-not-tesseract".to_string(), "eng".to_string(), 5);
        let result = recognizer.extract_text(&small_frame()).await;
        assert!(matches!(result, Err(RecognitionError::Unavailable(_))));
    }

    #[tokio::test]
    async fn malformed_frame_is_invalid_output() {
        let recognizer = TesseractRecognizer::new("tesseract".to_string(), "eng".to_string(), 5);
        let frame = ImageFrame::new(4, 4, vec![0; 3]);
        let result = recognizer.extract_text(&frame).await;
        assert!(matches!(result, Err(RecognitionError::InvalidOutput(_))));
    }
}
