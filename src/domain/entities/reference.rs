use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::frame::ImageFrame;

/// The baseline captured before monitoring begins.
///
/// Created by an explicit capture action and immutable until replaced by a
/// new capture; exactly one exists at a time. The keyword list is frozen at
/// capture time so later settings edits do not silently change what an
/// armed reference means.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceSnapshot {
    pub target_url: String,
    pub captured_at: DateTime<Utc>,
    pub frame: ImageFrame,
    pub key_phrases: Vec<String>,
}

impl ReferenceSnapshot {
    #[must_use]
    pub const fn new(
        target_url: String,
        captured_at: DateTime<Utc>,
        frame: ImageFrame,
        key_phrases: Vec<String>,
    ) -> Self {
        Self {
            target_url,
            captured_at,
            frame,
            key_phrases,
        }
    }
}
