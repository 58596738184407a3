//! Interpretation tiers for the holistic score.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Qualitative band of a holistic alignment score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlignmentTier {
    /// score ≤ 0.2
    Fragmented,
    /// 0.2 < score ≤ 0.5
    Initializing,
    /// 0.5 < score ≤ 0.8
    Evolving,
    /// score > 0.8
    Harmonious,
}

impl AlignmentTier {
    /// Band containing `score`. Thresholds are strict lower bounds.
    pub fn from_score(score: f64) -> Self {
        if score > 0.8 {
            Self::Harmonious
        } else if score > 0.5 {
            Self::Evolving
        } else if score > 0.2 {
            Self::Initializing
        } else {
            Self::Fragmented
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Fragmented => "Fragmented",
            Self::Initializing => "Initializing",
            Self::Evolving => "Evolving",
            Self::Harmonious => "Harmonious",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Fragmented => "More interaction is needed to establish a stable value structure.",
            Self::Initializing => "Gathering the initial dimensions of your persona.",
            Self::Evolving => "The twin is forming a coherent structure but still adapting.",
            Self::Harmonious => "Your digital twin is deeply aligned with your core values.",
        }
    }

    /// `"<label>: <description>"`.
    pub fn interpretation(&self) -> String {
        format!("{}: {}", self.label(), self.description())
    }
}

impl fmt::Display for AlignmentTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
