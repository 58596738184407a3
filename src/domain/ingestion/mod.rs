//! Ingestion Module - Questions derived from connected data sources.

mod generator;

pub use generator::{DynamicQuestionGenerator, BUSY_CALENDAR_THRESHOLD, CALENDAR_WINDOW_DAYS};
