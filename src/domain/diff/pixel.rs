use async_trait::async_trait;

use crate::domain::entities::comparison::ComparisonResult;
use crate::domain::entities::frame::ImageFrame;
use crate::domain::entities::reference::ReferenceSnapshot;

use super::{round_percentage, DiffError, Differ};

/// Per-channel absolute difference above which a sampled position counts as
/// different (30 of 255, roughly 12%). Absorbs compression artifacts and
/// anti-aliasing jitter between captures.
const CHANNEL_TOLERANCE: u8 = 30;

/// Sampling stride in pixels, applied on both axes. Every stride-th column
/// of every stride-th row is inspected instead of the full buffer.
const SAMPLE_STRIDE: u32 = 10;

/// Default percentage of divergent samples above which a page counts as
/// changed.
pub const DEFAULT_CHANGE_THRESHOLD: f64 = 5.0;

/// Coarse structural change detector over sampled RGB positions.
///
/// Deliberately not semantic: it cannot tell a relevant content change from
/// an ad rotation beyond the magnitude threshold.
pub struct PixelDiffer {
    change_threshold: f64,
}

impl PixelDiffer {
    #[must_use]
    pub const fn new(change_threshold: f64) -> Self {
        Self { change_threshold }
    }

    fn compare_frames(
        &self,
        reference: &ImageFrame,
        current: &ImageFrame,
    ) -> Result<ComparisonResult, DiffError> {
        // A layout change is always a positive signal, never compared
        // pixel-wise.
        if reference.width != current.width || reference.height != current.height {
            return Ok(ComparisonResult::dimension_mismatch());
        }

        if !reference.is_well_formed() {
            return Err(DiffError::ComparisonFailed(
                "reference sample has a truncated pixel buffer".to_string(),
            ));
        }
        if !current.is_well_formed() {
            return Err(DiffError::ComparisonFailed(
                "current sample has a truncated pixel buffer".to_string(),
            ));
        }

        let mut sampled = 0u64;
        let mut different = 0u64;

        let mut y = 0;
        while y < reference.height {
            let mut x = 0;
            while x < reference.width {
                // Bounds were checked above; a miss here means the frame
                // lied about its dimensions.
                let (Some(a), Some(b)) = (reference.rgba_at(x, y), current.rgba_at(x, y)) else {
                    return Err(DiffError::ComparisonFailed(
                        "pixel lookup failed on a well-formed frame".to_string(),
                    ));
                };
                sampled += 1;
                if channels_differ(a, b) {
                    different += 1;
                }
                x += SAMPLE_STRIDE;
            }
            y += SAMPLE_STRIDE;
        }

        if sampled == 0 {
            return Ok(ComparisonResult::unchanged());
        }

        #[allow(clippy::cast_precision_loss)]
        let magnitude = round_percentage(100.0 * different as f64 / sampled as f64);
        let changed = magnitude > self.change_threshold;

        Ok(ComparisonResult {
            changed,
            change_magnitude: magnitude,
            missing_signals: if changed {
                vec!["visual changes detected".to_string()]
            } else {
                Vec::new()
            },
        })
    }
}

impl Default for PixelDiffer {
    fn default() -> Self {
        Self::new(DEFAULT_CHANGE_THRESHOLD)
    }
}

/// A position differs when any of R, G, B deviates beyond tolerance.
/// Alpha is ignored.
fn channels_differ(a: [u8; 4], b: [u8; 4]) -> bool {
    a.iter()
        .zip(b.iter())
        .take(3)
        .any(|(&ca, &cb)| ca.abs_diff(cb) > CHANNEL_TOLERANCE)
}

#[async_trait]
impl Differ for PixelDiffer {
    async fn compare(
        &self,
        reference: &ReferenceSnapshot,
        current: &ImageFrame,
    ) -> Result<ComparisonResult, DiffError> {
        self.compare_frames(&reference.frame, current)
    }
}
