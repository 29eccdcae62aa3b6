use async_trait::async_trait;

use crate::domain::entities::comparison::ComparisonResult;
use crate::domain::entities::frame::ImageFrame;
use crate::domain::entities::reference::ReferenceSnapshot;
use crate::domain::ports::recognizer::TextRecognizer;

use super::{round_percentage, DiffError, Differ};

/// Legacy change detector: recognizes the text of the current capture and
/// reports reference key phrases that disappeared.
///
/// Superseded by [`super::PixelDiffer`] as the authoritative strategy, kept
/// selectable by configuration. Any missing phrase is a change; the
/// magnitude reports the missing fraction.
pub struct KeywordDiffer {
    recognizer: Box<dyn TextRecognizer>,
}

impl KeywordDiffer {
    #[must_use]
    pub fn new(recognizer: Box<dyn TextRecognizer>) -> Self {
        Self { recognizer }
    }
}

#[async_trait]
impl Differ for KeywordDiffer {
    async fn compare(
        &self,
        reference: &ReferenceSnapshot,
        current: &ImageFrame,
    ) -> Result<ComparisonResult, DiffError> {
        if reference.key_phrases.is_empty() {
            return Ok(ComparisonResult::unchanged());
        }

        let text = self
            .recognizer
            .extract_text(current)
            .await
            .map_err(|e| DiffError::ComparisonFailed(e.to_string()))?;
        let haystack = text.to_lowercase();

        let missing: Vec<String> = reference
            .key_phrases
            .iter()
            .filter(|phrase| !haystack.contains(&phrase.to_lowercase()))
            .map(|phrase| format!("keyword missing: {phrase}"))
            .collect();

        #[allow(clippy::cast_precision_loss)]
        let magnitude =
            round_percentage(100.0 * missing.len() as f64 / reference.key_phrases.len() as f64);

        Ok(ComparisonResult {
            changed: !missing.is_empty(),
            change_magnitude: magnitude,
            missing_signals: missing,
        })
    }
}
