//! Response reader port (read side).
//!
//! Responses are written by the surrounding application; the core only
//! reads them, joined with the answer options they point to.

use std::collections::HashMap;

use crate::domain::foundation::{DimensionId, DomainError, ProfileId};
use crate::domain::response::{ProfileActivity, ResponseEvidence};
use async_trait::async_trait;

/// Reader port for response-derived evidence.
#[async_trait]
pub trait ResponseReader: Send + Sync {
    /// All responses of a profile joined with option aspect, aspect
    /// dimension and option weight.
    ///
    /// Returns an empty list for unknown profiles.
    async fn evidence_for_profile(
        &self,
        profile_id: &ProfileId,
    ) -> Result<Vec<ResponseEvidence>, DomainError>;

    /// Count of responses per question primary dimension.
    async fn coverage_by_dimension(
        &self,
        profile_id: &ProfileId,
    ) -> Result<HashMap<DimensionId, u32>, DomainError>;

    /// Response and entity counters for a profile.
    async fn activity(&self, profile_id: &ProfileId) -> Result<ProfileActivity, DomainError>;
}
