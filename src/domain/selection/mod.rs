//! Selection Module - Adaptive question ranking.
//!
//! Pure scoring over an unanswered candidate pool. Fetching the pool, the
//! coverage map and the random draws is the job of the
//! `AdaptiveQuestionSelector` handler.

mod policy;
mod scorer;

pub use policy::SelectionPolicy;
pub use scorer::{QuestionScorer, ScoreBreakdown, ScoredQuestion, SelectionContext};
