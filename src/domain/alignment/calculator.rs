//! Alignment Calculator - six-factor holistic score.
//!
//! | Factor              | Weight |
//! |---------------------|--------|
//! | stability           | 0.10   |
//! | synergy density     | 0.20   |
//! | confidence average  | 0.20   |
//! | privacy shield      | 0.20   |
//! | strategic coherence | 0.15   |
//! | experience clarity  | 0.15   |
//!
//! Every factor lies in [0, 1], so the score does too.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::AlignmentTier;
use crate::domain::foundation::{DimensionId, Timestamp};
use crate::domain::pattern::{Pattern, PatternKind};
use crate::domain::response::ProfileActivity;
use crate::domain::taxonomy::TAXONOMY_SIZE;

pub const STABILITY_WEIGHT: f64 = 0.10;
pub const SYNERGY_DENSITY_WEIGHT: f64 = 0.20;
pub const CONFIDENCE_WEIGHT: f64 = 0.20;
pub const PRIVACY_SHIELD_WEIGHT: f64 = 0.20;
pub const COHERENCE_WEIGHT: f64 = 0.15;
pub const CLARITY_WEIGHT: f64 = 0.15;

/// Patterns at or below this confidence are noise for scoring purposes.
pub const RELEVANCE_THRESHOLD: f64 = 0.3;

/// Synergy rows below this alignment were rewritten after their pair weakened.
pub const ACTIVE_SYNERGY_THRESHOLD: f64 = 0.7;

/// Mean pattern age at which stability is full.
pub const STABILITY_HORIZON_DAYS: f64 = 30.0;

/// Stability of a profile without patterns.
pub const NEUTRAL_STABILITY: f64 = 0.5;

/// Clarity assumed when activity counters cannot be read.
pub const UNKNOWN_CLARITY: f64 = 0.7;

/// The six factors plus the dimension count they were derived from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlignmentBreakdown {
    pub stability: f64,
    pub synergy_density: f64,
    pub confidence_average: f64,
    pub privacy_shield: f64,
    pub strategic_coherence: f64,
    pub experience_clarity: f64,
    pub dimension_count: usize,
}

impl AlignmentBreakdown {
    /// Weighted sum of the six factors.
    pub fn weighted_score(&self) -> f64 {
        STABILITY_WEIGHT * self.stability
            + SYNERGY_DENSITY_WEIGHT * self.synergy_density
            + CONFIDENCE_WEIGHT * self.confidence_average
            + PRIVACY_SHIELD_WEIGHT * self.privacy_shield
            + COHERENCE_WEIGHT * self.strategic_coherence
            + CLARITY_WEIGHT * self.experience_clarity
    }
}

/// Result of a holistic alignment calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HolisticAlignment {
    pub score: f64,
    pub breakdown: AlignmentBreakdown,
    pub tier: AlignmentTier,
    pub interpretation: String,
}

impl HolisticAlignment {
    pub fn from_breakdown(breakdown: AlignmentBreakdown) -> Self {
        let score = breakdown.weighted_score().clamp(0.0, 1.0);
        let tier = AlignmentTier::from_score(score);
        Self {
            score,
            breakdown,
            tier,
            interpretation: tier.interpretation(),
        }
    }
}

/// Stateless alignment scoring.
pub struct AlignmentCalculator;

impl AlignmentCalculator {
    /// Computes the holistic alignment of a pattern set.
    ///
    /// `activity` is `None` when the activity counters could not be read.
    pub fn compute(
        patterns: &[Pattern],
        activity: Option<&ProfileActivity>,
        as_of: Timestamp,
    ) -> HolisticAlignment {
        let dimension_count = Self::dimension_count(patterns);
        let confidence_average = Self::confidence_average(patterns);

        HolisticAlignment::from_breakdown(AlignmentBreakdown {
            stability: Self::stability(patterns, as_of),
            synergy_density: Self::synergy_density(patterns, dimension_count),
            confidence_average,
            privacy_shield: Self::privacy_shield(dimension_count),
            strategic_coherence: Self::strategic_coherence(
                !patterns.is_empty(),
                dimension_count,
                confidence_average,
            ),
            experience_clarity: Self::experience_clarity(activity),
            dimension_count,
        })
    }

    /// Distinct dimensions among relevant aspect patterns.
    pub fn dimension_count(patterns: &[Pattern]) -> usize {
        patterns
            .iter()
            .filter(|p| p.confidence.value() > RELEVANCE_THRESHOLD)
            .filter_map(|p| match p.kind {
                PatternKind::Aspect { dimension_id, .. } => Some(dimension_id),
                _ => None,
            })
            .collect::<BTreeSet<DimensionId>>()
            .len()
    }

    /// Mean confidence of relevant patterns of every kind.
    pub fn confidence_average(patterns: &[Pattern]) -> f64 {
        let relevant: Vec<f64> = patterns
            .iter()
            .map(|p| p.confidence.value())
            .filter(|c| *c > RELEVANCE_THRESHOLD)
            .collect();
        if relevant.is_empty() {
            return 0.0;
        }
        relevant.iter().sum::<f64>() / relevant.len() as f64
    }

    /// Mean pattern age relative to the stability horizon.
    pub fn stability(patterns: &[Pattern], as_of: Timestamp) -> f64 {
        if patterns.is_empty() {
            return NEUTRAL_STABILITY;
        }
        let total_age: f64 = patterns
            .iter()
            .map(|p| as_of.days_since(&p.last_updated))
            .sum();
        let mean_age = total_age / patterns.len() as f64;
        (mean_age / STABILITY_HORIZON_DAYS).min(1.0)
    }

    /// Active synergies relative to the dimension pairs available.
    pub fn synergy_density(patterns: &[Pattern], dimension_count: usize) -> f64 {
        if dimension_count < 2 {
            return 0.0;
        }
        let synergies = patterns
            .iter()
            .filter(|p| p.is_synergy() && p.confidence.value() >= ACTIVE_SYNERGY_THRESHOLD)
            .count();
        let possible_pairs = dimension_count * (dimension_count - 1) / 2;
        (synergies as f64 / possible_pairs as f64).min(1.0)
    }

    /// Grows with the number of dimensions covered.
    pub fn privacy_shield(dimension_count: usize) -> f64 {
        (0.5 + 0.05 * dimension_count as f64).min(1.0)
    }

    /// Agreement between taxonomy breadth and confidence depth.
    pub fn strategic_coherence(has_patterns: bool, dimension_count: usize, confidence_average: f64) -> f64 {
        if !has_patterns {
            return 0.0;
        }
        let breadth = dimension_count as f64 / TAXONOMY_SIZE as f64;
        (1.0 - (breadth - confidence_average).abs()).max(0.0)
    }

    /// Share of responses given explicitly.
    pub fn experience_clarity(activity: Option<&ProfileActivity>) -> f64 {
        match activity {
            Some(activity) => activity.engagement_rate(),
            None => UNKNOWN_CLARITY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{AspectId, Confidence, ProfileId};
    use crate::domain::pattern::{SignalKind, SynergyMetadata};
    use proptest::prelude::*;

    fn now() -> Timestamp {
        Timestamp::from_unix_secs(1705276800)
    }

    fn aspect(dim: i64, confidence: f64, at: Timestamp) -> Pattern {
        Pattern::aspect(
            ProfileId::new(),
            DimensionId::new(dim),
            AspectId::new(dim * 100),
            Confidence::new(confidence),
            1.0,
            10,
            at,
        )
    }

    fn synergy(a: i64, b: i64, alignment: f64) -> Pattern {
        Pattern::synergy(
            ProfileId::new(),
            SynergyMetadata::new(DimensionId::new(a), DimensionId::new(b), alignment),
            1.5,
            2,
            now(),
        )
    }

    #[test]
    fn cold_start_is_fragmented() {
        let result = AlignmentCalculator::compute(&[], Some(&ProfileActivity::default()), now());
        assert!((result.score - 0.15).abs() < 1e-12);
        assert_eq!(result.tier, AlignmentTier::Fragmented);
        assert_eq!(result.breakdown.stability, 0.5);
        assert_eq!(result.breakdown.privacy_shield, 0.5);
        assert_eq!(result.breakdown.dimension_count, 0);
    }

    #[test]
    fn unreadable_activity_uses_neutral_clarity() {
        let result = AlignmentCalculator::compute(&[], None, now());
        assert_eq!(result.breakdown.experience_clarity, 0.7);
        assert!((result.score - 0.255).abs() < 1e-12);
    }

    #[test]
    fn three_confident_dimensions_score_above_half() {
        let patterns = vec![
            aspect(1, 0.9, now()),
            aspect(2, 0.85, now()),
            aspect(3, 0.8, now()),
            synergy(1, 2, 0.874),
            synergy(1, 3, 0.848),
            synergy(2, 3, 0.824),
        ];
        let result = AlignmentCalculator::compute(&patterns, Some(&ProfileActivity::default()), now());
        assert_eq!(result.breakdown.dimension_count, 3);
        assert_eq!(result.breakdown.synergy_density, 1.0);
        assert!((result.breakdown.privacy_shield - 0.65).abs() < 1e-12);
        assert!(result.score > 0.5);
        assert_eq!(result.tier, AlignmentTier::Evolving);
    }

    #[test]
    fn stability_grows_with_age() {
        let young = vec![aspect(1, 0.9, now().minus_days(3))];
        let old = vec![aspect(1, 0.9, now().minus_days(60))];
        assert!((AlignmentCalculator::stability(&young, now()) - 0.1).abs() < 1e-9);
        assert_eq!(AlignmentCalculator::stability(&old, now()), 1.0);
    }

    #[test]
    fn low_confidence_patterns_do_not_count() {
        let patterns = vec![aspect(1, 0.2, now()), aspect(2, 0.3, now())];
        assert_eq!(AlignmentCalculator::dimension_count(&patterns), 0);
        assert_eq!(AlignmentCalculator::confidence_average(&patterns), 0.0);
    }

    #[test]
    fn signals_count_toward_confidence_not_dimensions() {
        let signal = Pattern::signal(
            ProfileId::new(),
            SignalKind::PrivacySensitivityHigh,
            Confidence::new(0.5),
            4,
            now(),
        );
        let patterns = vec![aspect(1, 0.9, now()), signal];
        assert_eq!(AlignmentCalculator::dimension_count(&patterns), 1);
        assert!((AlignmentCalculator::confidence_average(&patterns) - 0.7).abs() < 1e-12);
    }

    #[test]
    fn synergy_density_is_capped() {
        let patterns = vec![synergy(1, 2, 0.9), synergy(1, 3, 0.9), synergy(2, 3, 0.9)];
        assert_eq!(AlignmentCalculator::synergy_density(&patterns, 2), 1.0);
        assert_eq!(AlignmentCalculator::synergy_density(&patterns, 1), 0.0);
    }

    #[test]
    fn weakened_synergies_do_not_count() {
        let patterns = vec![synergy(1, 2, 0.9), synergy(1, 3, 0.5), synergy(2, 3, 0.0)];
        assert!((AlignmentCalculator::synergy_density(&patterns, 3) - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(
            AlignmentCalculator::synergy_density(&[synergy(1, 2, 0.69)], 2),
            0.0
        );
    }

    #[test]
    fn privacy_shield_caps_at_one() {
        assert_eq!(AlignmentCalculator::privacy_shield(15), 1.0);
        assert!((AlignmentCalculator::privacy_shield(4) - 0.7).abs() < 1e-12);
    }

    #[test]
    fn serializes_camel_case() {
        let result = AlignmentCalculator::compute(&[], Some(&ProfileActivity::default()), now());
        let json = serde_json::to_value(&result).unwrap();
        assert!(json["breakdown"]["synergyDensity"].is_number());
        assert!(json["breakdown"]["dimensionCount"].is_number());
        assert!(json["interpretation"].as_str().unwrap().starts_with("Fragmented"));
    }

    #[test]
    fn deterministic_for_fixed_clock() {
        let patterns = vec![aspect(1, 0.9, now().minus_days(5)), aspect(4, 0.6, now().minus_days(1))];
        let activity = ProfileActivity {
            explicit_responses: 8,
            passive_responses: 2,
            ingested_entities: 0,
        };
        let a = AlignmentCalculator::compute(&patterns, Some(&activity), now());
        let b = AlignmentCalculator::compute(&patterns, Some(&activity), now());
        assert_eq!(a, b);
    }

    proptest! {
        #[test]
        fn score_is_bounded(
            confs in proptest::collection::vec((1i64..=15, 0.0f64..=1.0, 0i64..90), 0..30),
            explicit in 0u32..50,
            passive in 0u32..50,
        ) {
            let patterns: Vec<Pattern> = confs
                .iter()
                .map(|(d, c, age)| aspect(*d, *c, now().minus_days(*age)))
                .collect();
            let activity = ProfileActivity {
                explicit_responses: explicit,
                passive_responses: passive,
                ingested_entities: 0,
            };
            let result = AlignmentCalculator::compute(&patterns, Some(&activity), now());
            prop_assert!((0.0..=1.0).contains(&result.score));
            prop_assert!(result.breakdown.dimension_count <= TAXONOMY_SIZE);
        }
    }
}
