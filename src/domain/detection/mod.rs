//! Detection Module - Pure analyzers that turn evidence into patterns.
//!
//! # Components
//!
//! - `AspectAggregator` - groups selected responses per (dimension, aspect)
//! - `SynergyAnalyzer` - pairs confident dimensions by alignment
//! - `SignalAnalyzer` - privacy sensitivity and meeting density signals
//! - `DetectionRules` - thresholds shared by all analyzers
//!
//! All functions are pure. Reading evidence and writing patterns is left to
//! the `PatternDetector` handler in the application layer.

mod aspect_aggregator;
mod rules;
mod signals;
mod synergy;

pub use aspect_aggregator::{AspectAggregator, AspectGroup};
pub use rules::DetectionRules;
pub use signals::SignalAnalyzer;
pub use synergy::{DimensionConfidence, SynergyAnalyzer};
