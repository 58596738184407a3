//! Selection handlers.

mod select_questions;

pub use select_questions::AdaptiveQuestionSelector;
