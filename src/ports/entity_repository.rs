//! Entity repository port.

use crate::domain::entity::Entity;
use crate::domain::foundation::{DomainError, ProfileId};
use crate::domain::pattern::UpsertOutcome;
use async_trait::async_trait;

/// Repository port for ingested entities.
///
/// Entities are unique per (profile, entity type, name).
#[async_trait]
pub trait EntityRepository: Send + Sync {
    /// Insert an entity, or refresh source id, timestamp and metadata of the
    /// existing row with the same key.
    async fn upsert(&self, entity: &Entity) -> Result<UpsertOutcome, DomainError>;

    async fn find_by_profile(&self, profile_id: &ProfileId) -> Result<Vec<Entity>, DomainError>;
}
