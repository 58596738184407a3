//! Application handlers.
//!
//! Handlers hold their ports as `Arc<dyn Port>` and orchestrate the pure
//! domain services.

pub mod alignment;
pub mod detection;
pub mod selection;
pub mod sync;

pub use alignment::AlignmentEngine;
pub use detection::{DetectionSummary, PatternDetector};
pub use selection::AdaptiveQuestionSelector;
pub use sync::{SyncPipeline, SyncReport};
