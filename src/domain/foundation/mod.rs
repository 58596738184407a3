//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, and error types
//! that form the vocabulary of the digital twin domain.

mod confidence;
mod errors;
mod ids;
mod timestamp;

pub use confidence::Confidence;
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{AnswerOptionId, AspectId, DimensionId, EntityId, ProfileId, QuestionId, ResponseId};
pub use timestamp::Timestamp;
