use serde::{Deserialize, Serialize};

/// Outcome of one comparison between the reference and a fresh capture.
///
/// Produced per check cycle and never persisted; it only triggers
/// notifications.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    /// Whether the change signal crossed the decision threshold.
    pub changed: bool,
    /// Percentage of sampled positions exceeding tolerance (0–100, rounded
    /// to 2 decimal places).
    pub change_magnitude: f64,
    /// Human-readable reasons for the verdict.
    pub missing_signals: Vec<String>,
}

impl ComparisonResult {
    /// No change detected.
    #[must_use]
    pub const fn unchanged() -> Self {
        Self {
            changed: false,
            change_magnitude: 0.0,
            missing_signals: Vec::new(),
        }
    }

    /// Layout change: the two samples have different pixel dimensions.
    /// Always a positive signal, never compared pixel-wise.
    #[must_use]
    pub fn dimension_mismatch() -> Self {
        Self {
            changed: true,
            change_magnitude: 100.0,
            missing_signals: vec!["dimensions differ".to_string()],
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn unchanged_has_zero_magnitude() {
        let result = ComparisonResult::unchanged();
        assert!(!result.changed);
        assert!(result.change_magnitude.abs() < f64::EPSILON);
        assert!(result.missing_signals.is_empty());
    }

    #[test]
    fn dimension_mismatch_is_full_magnitude() {
        let result = ComparisonResult::dimension_mismatch();
        assert!(result.changed);
        assert!((result.change_magnitude - 100.0).abs() < f64::EPSILON);
        assert_eq!(result.missing_signals, vec!["dimensions differ"]);
    }

    #[test]
    fn serde_roundtrip() {
        let result = ComparisonResult {
            changed: true,
            change_magnitude: 12.34,
            missing_signals: vec!["visual changes detected".to_string()],
        };
        let json = serde_json::to_string(&result).expect("serialize");
        let deserialized: ComparisonResult = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(result, deserialized);
    }
}
