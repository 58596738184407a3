//! Question reader port.

use crate::domain::foundation::{DomainError, ProfileId};
use crate::domain::taxonomy::Question;
use async_trait::async_trait;

/// Reader port for the question bank.
#[async_trait]
pub trait QuestionReader: Send + Sync {
    /// Active questions the profile has not answered, with their options.
    ///
    /// Ordered by engagement factor descending, then id, and capped at
    /// `pool_limit` rows.
    async fn unanswered_active(
        &self,
        profile_id: &ProfileId,
        pool_limit: usize,
    ) -> Result<Vec<Question>, DomainError>;
}
