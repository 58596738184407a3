//! Sync handlers.

mod sync_pipeline;

pub use sync_pipeline::{SyncPipeline, SyncReport};
