//! Question repository port (write side).

use crate::domain::foundation::{DomainError, QuestionId};
use crate::domain::pattern::UpsertOutcome;
use crate::domain::taxonomy::NewQuestion;
use async_trait::async_trait;

/// Repository port for generated questions.
#[async_trait]
pub trait QuestionRepository: Send + Sync {
    /// Insert a generated question unless one with the same text exists.
    ///
    /// An existing question is left untouched and reported as `Updated`
    /// with its original id.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if the question is malformed
    /// - `DatabaseError` on persistence failure
    async fn upsert_generated(
        &self,
        question: &NewQuestion,
    ) -> Result<(QuestionId, UpsertOutcome), DomainError>;
}
