//! AlignmentEngine - Holistic alignment for a profile.
//!
//! Never fails: a read error is logged and treated as missing data, and the
//! affected factors fall back to their empty-state values.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::alignment::{AlignmentCalculator, HolisticAlignment};
use crate::domain::foundation::{ProfileId, Timestamp};
use crate::ports::{PatternRepository, ResponseReader};

pub struct AlignmentEngine {
    patterns: Arc<dyn PatternRepository>,
    responses: Arc<dyn ResponseReader>,
}

impl AlignmentEngine {
    pub fn new(patterns: Arc<dyn PatternRepository>, responses: Arc<dyn ResponseReader>) -> Self {
        Self {
            patterns,
            responses,
        }
    }

    pub async fn calculate_holistic_alignment(&self, profile_id: &ProfileId) -> HolisticAlignment {
        self.calculate_holistic_alignment_at(profile_id, Timestamp::now())
            .await
    }

    /// Alignment with pattern ages measured against `as_of`.
    pub async fn calculate_holistic_alignment_at(
        &self,
        profile_id: &ProfileId,
        as_of: Timestamp,
    ) -> HolisticAlignment {
        let patterns = match self.patterns.find_by_profile(profile_id).await {
            Ok(patterns) => patterns,
            Err(err) => {
                warn!(profile_id = %profile_id, error = %err, "Pattern read failed; scoring without patterns");
                Vec::new()
            }
        };

        let activity = match self.responses.activity(profile_id).await {
            Ok(activity) => Some(activity),
            Err(err) => {
                warn!(profile_id = %profile_id, error = %err, "Activity read failed; using neutral clarity");
                None
            }
        };

        let alignment = AlignmentCalculator::compute(&patterns, activity.as_ref(), as_of);
        debug!(
            profile_id = %profile_id,
            score = alignment.score,
            tier = %alignment.tier,
            "Calculated holistic alignment"
        );
        alignment
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryTwinStore;
    use crate::domain::alignment::AlignmentTier;
    use crate::domain::foundation::{AspectId, Confidence, DimensionId};
    use crate::domain::pattern::Pattern;

    fn engine(store: &Arc<InMemoryTwinStore>) -> AlignmentEngine {
        AlignmentEngine::new(store.clone(), store.clone())
    }

    #[tokio::test]
    async fn cold_start_profile_is_fragmented() {
        let store = Arc::new(InMemoryTwinStore::with_standard_taxonomy());
        let result = engine(&store).calculate_holistic_alignment(&ProfileId::new()).await;
        assert!(result.score <= 0.2);
        assert_eq!(result.tier, AlignmentTier::Fragmented);
    }

    #[tokio::test]
    async fn read_failure_degrades_to_defaults() {
        let store = Arc::new(InMemoryTwinStore::with_standard_taxonomy());
        store.set_fail_reads(true);
        let result = engine(&store).calculate_holistic_alignment(&ProfileId::new()).await;
        assert_eq!(result.breakdown.dimension_count, 0);
        assert_eq!(result.breakdown.experience_clarity, 0.7);
        assert!((result.score - 0.255).abs() < 1e-12);
    }

    #[tokio::test]
    async fn fixed_clock_is_deterministic() {
        let store = Arc::new(InMemoryTwinStore::with_standard_taxonomy());
        let profile = ProfileId::new();
        let as_of = Timestamp::from_unix_secs(1705276800);
        for dim in 1..=4 {
            let pattern = Pattern::aspect(
                profile,
                DimensionId::new(dim),
                AspectId::new(dim),
                Confidence::new(0.5 + 0.1 * dim as f64),
                1.0,
                5,
                as_of.minus_days(dim * 3),
            );
            PatternRepository::upsert(store.as_ref(), &pattern).await.unwrap();
        }

        let engine = engine(&store);
        let first = engine.calculate_holistic_alignment_at(&profile, as_of).await;
        let second = engine.calculate_holistic_alignment_at(&profile, as_of).await;
        assert_eq!(first, second);
        assert_eq!(first.breakdown.dimension_count, 4);
    }
}
