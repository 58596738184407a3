//! Detection handlers.

mod pattern_detector;

pub use pattern_detector::{DetectionSummary, PatternDetector};
