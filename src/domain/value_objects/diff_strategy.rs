use serde::{Deserialize, Serialize};

/// Which change-detection strategy drives the check cycle.
///
/// The two strategies are not equivalent and are never merged into one code
/// path: pixel sampling is the authoritative default, keyword matching is
/// the retained legacy variant.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum DiffStrategy {
    #[default]
    Pixel,
    Keyword,
}

impl std::fmt::Display for DiffStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pixel => write!(f, "pixel"),
            Self::Keyword => write!(f, "keyword"),
        }
    }
}
