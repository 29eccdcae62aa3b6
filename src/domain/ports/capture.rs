use async_trait::async_trait;
use thiserror::Error;

use crate::domain::entities::frame::ImageFrame;

#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("capture failed: {0}")]
    Failed(String),
    #[error("capture timed out after {0}s")]
    Timeout(u64),
}

/// Resolved target surface, opaque to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageHandle {
    pub url: String,
}

/// Produces image samples of the target page.
#[async_trait]
pub trait PageCapture: Send + Sync {
    /// Resolve the target surface, or `None` when no target is available
    /// (e.g. no URL configured).
    async fn resolve_target(&self) -> Option<PageHandle>;

    /// Capture the currently rendered content of the target.
    ///
    /// # Errors
    ///
    /// Returns `CaptureError` if the image sample cannot be produced.
    async fn capture(&self, target: &PageHandle) -> Result<ImageFrame, CaptureError>;

    /// Force a reload of the target.
    ///
    /// # Errors
    ///
    /// Returns `CaptureError` if the reload cannot be issued.
    async fn reload(&self, target: &PageHandle) -> Result<(), CaptureError>;
}
