pub mod keyword;
pub mod pixel;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::entities::comparison::ComparisonResult;
use crate::domain::entities::frame::ImageFrame;
use crate::domain::entities::reference::ReferenceSnapshot;

pub use keyword::KeywordDiffer;
pub use pixel::PixelDiffer;

#[derive(Error, Debug)]
pub enum DiffError {
    #[error("comparison failed: {0}")]
    ComparisonFailed(String),
}

/// Computes a change signal between the reference and a fresh capture.
///
/// Implementations are selected by configuration and never mixed: one
/// strategy drives the whole check cycle.
#[async_trait]
pub trait Differ: Send + Sync {
    /// Compare the stored reference against the current sample.
    ///
    /// # Errors
    ///
    /// Returns `DiffError::ComparisonFailed` when a sample is malformed or
    /// a collaborator the strategy depends on cannot produce its signal.
    async fn compare(
        &self,
        reference: &ReferenceSnapshot,
        current: &ImageFrame,
    ) -> Result<ComparisonResult, DiffError>;
}

/// Round a percentage to 2 decimal places.
#[must_use]
pub(crate) fn round_percentage(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
