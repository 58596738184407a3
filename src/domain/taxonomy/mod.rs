//! Taxonomy and question bank reference data.
//!
//! Dimensions, aspects, questions and answer options are seeded once and are
//! read-only to the detection and scoring engines.

mod dimension;
mod question;

pub use dimension::{well_known, Aspect, Dimension, STANDARD_DIMENSIONS, TAXONOMY_SIZE};
pub use question::{
    AnswerOption, NewQuestion, OptionTemplate, Question, QuestionSource, QuestionType,
    DEFAULT_ENGAGEMENT_FACTOR,
};
