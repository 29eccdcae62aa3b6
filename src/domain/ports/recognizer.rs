use async_trait::async_trait;
use thiserror::Error;

use crate::domain::entities::frame::ImageFrame;

#[derive(Error, Debug)]
pub enum RecognitionError {
    #[error("text recognition unavailable: {0}")]
    Unavailable(String),
    #[error("text recognition timed out")]
    Timeout,
    #[error("unreadable recognition output: {0}")]
    InvalidOutput(String),
}

/// Extracts visible text from an image sample.
///
/// Only used by the keyword comparison strategy; the pixel strategy never
/// touches this port.
#[async_trait]
pub trait TextRecognizer: Send + Sync {
    /// Recognize the text content of the frame.
    ///
    /// # Errors
    ///
    /// Returns `RecognitionError` if the recognizer cannot run or produces
    /// unreadable output.
    async fn extract_text(&self, frame: &ImageFrame) -> Result<String, RecognitionError>;
}
