//! Pattern repository port.
//!
//! Every implementation must enforce one row per `PatternKey`. Writing a
//! pattern whose key exists overwrites the stored values in one atomic step.

use crate::domain::foundation::{DomainError, ProfileId};
use crate::domain::pattern::{Pattern, UpsertOutcome};
use async_trait::async_trait;

/// Repository port for detected patterns.
#[async_trait]
pub trait PatternRepository: Send + Sync {
    /// Insert or overwrite a pattern by its key.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn upsert(&self, pattern: &Pattern) -> Result<UpsertOutcome, DomainError>;

    /// Upsert several patterns, returning one outcome per input.
    async fn upsert_batch(&self, patterns: &[Pattern]) -> Result<Vec<UpsertOutcome>, DomainError> {
        let mut outcomes = Vec::with_capacity(patterns.len());
        for pattern in patterns {
            outcomes.push(self.upsert(pattern).await?);
        }
        Ok(outcomes)
    }

    /// All patterns of a profile, any kind.
    async fn find_by_profile(&self, profile_id: &ProfileId) -> Result<Vec<Pattern>, DomainError>;
}
