//! Synergy Analyzer - cross-dimension alignment detection.
//!
//! Aspect patterns are first collapsed to one confidence per dimension so the
//! pairing loop runs over at most the fifteen taxonomy dimensions rather than
//! over every aspect pair.

use std::collections::{BTreeMap, BTreeSet};

use super::DetectionRules;
use crate::domain::foundation::{DimensionId, ProfileId, Timestamp};
use crate::domain::pattern::{Pattern, PatternKind, SynergyMetadata};

/// Mean confidence of a dimension's relevant aspect patterns.
#[derive(Debug, Clone, PartialEq)]
pub struct DimensionConfidence {
    pub dimension_id: DimensionId,
    pub confidence: f64,
    /// Number of aspect patterns averaged.
    pub pattern_count: u32,
}

/// Stateless synergy detection.
pub struct SynergyAnalyzer;

impl SynergyAnalyzer {
    /// Alignment of two dimension confidences: their geometric mean.
    ///
    /// Symmetric, bounded to [0, 1] and non-decreasing in both arguments.
    pub fn alignment(a: f64, b: f64) -> f64 {
        let a = if a.is_nan() { 0.0 } else { a.clamp(0.0, 1.0) };
        let b = if b.is_nan() { 0.0 } else { b.clamp(0.0, 1.0) };
        (a * b).sqrt()
    }

    /// Collapses aspect patterns above `floor` to per-dimension means.
    ///
    /// Sorted by confidence descending, then by dimension id.
    pub fn dimension_confidences(patterns: &[Pattern], floor: f64) -> Vec<DimensionConfidence> {
        let mut sums: BTreeMap<DimensionId, (f64, u32)> = BTreeMap::new();

        for pattern in patterns {
            let PatternKind::Aspect { dimension_id, .. } = pattern.kind else {
                continue;
            };
            if pattern.confidence.value() <= floor {
                continue;
            }
            let entry = sums.entry(dimension_id).or_insert((0.0, 0));
            entry.0 += pattern.confidence.value();
            entry.1 += 1;
        }

        let mut dims: Vec<DimensionConfidence> = sums
            .into_iter()
            .filter(|(_, (_, count))| *count > 0)
            .map(|(dimension_id, (sum, count))| DimensionConfidence {
                dimension_id,
                confidence: sum / f64::from(count),
                pattern_count: count,
            })
            .collect();

        dims.sort_by(|a, b| {
            b.confidence
                .total_cmp(&a.confidence)
                .then(a.dimension_id.cmp(&b.dimension_id))
        });
        dims
    }

    /// Finds every dimension pair whose alignment reaches `threshold`.
    ///
    /// `dims` must be sorted by confidence descending. Because alignment is
    /// monotone, the inner loop stops at the first failing partner and the
    /// outer loop stops once a dimension fails with its best partner.
    pub fn find_synergies(dims: &[DimensionConfidence], threshold: f64) -> Vec<SynergyMetadata> {
        let mut synergies = Vec::new();
        let n = dims.len();

        for i in 0..n {
            let a = &dims[i];
            if i + 1 < n && Self::alignment(a.confidence, dims[i + 1].confidence) < threshold {
                break;
            }
            for b in &dims[i + 1..] {
                let alignment = Self::alignment(a.confidence, b.confidence);
                if alignment < threshold {
                    break;
                }
                synergies.push(SynergyMetadata::new(a.dimension_id, b.dimension_id, alignment));
            }
        }

        synergies
    }

    /// Builds synergy patterns from a profile's current patterns.
    ///
    /// Pairs reaching the threshold are returned first. Every synergy row
    /// already present in `patterns` whose pair no longer qualifies follows
    /// with its recomputed alignment, or 0 when a dimension dropped out, so
    /// a pass replaces every stored synergy.
    pub fn build_patterns(
        profile_id: ProfileId,
        patterns: &[Pattern],
        rules: &DetectionRules,
        at: Timestamp,
    ) -> Vec<Pattern> {
        let dims = Self::dimension_confidences(patterns, rules.synergy_relevance_floor);
        let by_dimension: BTreeMap<DimensionId, &DimensionConfidence> =
            dims.iter().map(|d| (d.dimension_id, d)).collect();
        let evidence_of = |meta: &SynergyMetadata| {
            [meta.dim1, meta.dim2]
                .iter()
                .filter_map(|id| by_dimension.get(id))
                .map(|d| d.pattern_count)
                .sum::<u32>()
        };

        let found = Self::find_synergies(&dims, rules.synergy_threshold);
        let found_pairs: BTreeSet<(DimensionId, DimensionId)> =
            found.iter().map(|m| (m.dim1, m.dim2)).collect();

        let stale = patterns.iter().filter_map(|p| match &p.kind {
            PatternKind::Synergy(meta) if !found_pairs.contains(&(meta.dim1, meta.dim2)) => {
                let alignment = match (by_dimension.get(&meta.dim1), by_dimension.get(&meta.dim2)) {
                    (Some(a), Some(b)) => Self::alignment(a.confidence, b.confidence),
                    _ => 0.0,
                };
                Some(SynergyMetadata::new(meta.dim1, meta.dim2, alignment))
            }
            _ => None,
        });

        found
            .into_iter()
            .chain(stale)
            .map(|meta| {
                let evidence = evidence_of(&meta);
                Pattern::synergy(profile_id, meta, rules.synergy_impact_weight, evidence, at)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{AspectId, Confidence};
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn at() -> Timestamp {
        Timestamp::from_unix_secs(1705276800)
    }

    fn aspect(profile: ProfileId, dim: i64, aspect: i64, confidence: f64) -> Pattern {
        Pattern::aspect(
            profile,
            DimensionId::new(dim),
            AspectId::new(aspect),
            Confidence::new(confidence),
            1.0,
            5,
            at(),
        )
    }

    fn dim(id: i64, confidence: f64) -> DimensionConfidence {
        DimensionConfidence {
            dimension_id: DimensionId::new(id),
            confidence,
            pattern_count: 1,
        }
    }

    #[test]
    fn alignment_is_geometric_mean() {
        assert!((SynergyAnalyzer::alignment(0.81, 1.0) - 0.9).abs() < 1e-12);
        assert_eq!(SynergyAnalyzer::alignment(0.0, 1.0), 0.0);
        assert_eq!(SynergyAnalyzer::alignment(1.0, 1.0), 1.0);
    }

    #[test]
    fn dimension_confidences_average_per_dimension() {
        let profile = ProfileId::new();
        let patterns = vec![
            aspect(profile, 1, 1, 0.9),
            aspect(profile, 1, 2, 0.7),
            aspect(profile, 2, 6, 0.6),
            aspect(profile, 3, 11, 0.1), // below floor
        ];
        let dims = SynergyAnalyzer::dimension_confidences(&patterns, 0.3);
        assert_eq!(dims.len(), 2);
        assert_eq!(dims[0].dimension_id, DimensionId::new(1));
        assert!((dims[0].confidence - 0.8).abs() < 1e-12);
        assert_eq!(dims[0].pattern_count, 2);
    }

    #[test]
    fn dimension_confidences_ignore_non_aspect_patterns() {
        let profile = ProfileId::new();
        let meta = SynergyMetadata::new(DimensionId::new(1), DimensionId::new(2), 0.9);
        let patterns = vec![Pattern::synergy(profile, meta, 1.5, 2, at())];
        assert!(SynergyAnalyzer::dimension_confidences(&patterns, 0.3).is_empty());
    }

    #[test]
    fn three_confident_dimensions_yield_three_synergies() {
        let profile = ProfileId::new();
        let patterns = vec![
            aspect(profile, 1, 1, 0.9),
            aspect(profile, 2, 6, 0.85),
            aspect(profile, 3, 11, 0.8),
        ];
        let synergies =
            SynergyAnalyzer::build_patterns(profile, &patterns, &DetectionRules::default(), at());
        assert_eq!(synergies.len(), 3);
        let types: HashSet<String> = synergies.iter().map(|p| p.pattern_type()).collect();
        assert!(types.contains("synergy_dimension_alignment_1_2"));
        assert!(types.contains("synergy_dimension_alignment_1_3"));
        assert!(types.contains("synergy_dimension_alignment_2_3"));
        assert!(synergies.iter().all(|p| p.confidence.value() >= 0.7));
    }

    #[test]
    fn single_dimension_has_no_synergy() {
        let profile = ProfileId::new();
        let patterns = vec![aspect(profile, 1, 1, 0.9), aspect(profile, 1, 2, 0.95)];
        let synergies =
            SynergyAnalyzer::build_patterns(profile, &patterns, &DetectionRules::default(), at());
        assert!(synergies.is_empty());
    }

    #[test]
    fn patterns_at_the_floor_are_not_relevant() {
        let profile = ProfileId::new();
        let patterns = vec![aspect(profile, 1, 1, 0.3), aspect(profile, 2, 6, 0.31)];
        let dims = SynergyAnalyzer::dimension_confidences(&patterns, 0.3);
        assert_eq!(dims.len(), 1);
        assert_eq!(dims[0].dimension_id, DimensionId::new(2));
    }

    #[test]
    fn stored_synergy_is_rewritten_when_pair_weakens() {
        let profile = ProfileId::new();
        let rules = DetectionRules::default();
        let meta = SynergyMetadata::new(DimensionId::new(1), DimensionId::new(2), 1.0);
        let patterns = vec![
            aspect(profile, 1, 1, 0.9),
            aspect(profile, 1, 2, 0.35),
            aspect(profile, 2, 6, 0.4),
            Pattern::synergy(profile, meta, 1.5, 2, at()),
        ];

        let rebuilt = SynergyAnalyzer::build_patterns(profile, &patterns, &rules, at());
        assert_eq!(rebuilt.len(), 1);
        assert_eq!(rebuilt[0].pattern_type(), "synergy_dimension_alignment_1_2");
        let expected = (0.625f64 * 0.4).sqrt();
        assert!((rebuilt[0].confidence.value() - expected).abs() < 1e-12);
        assert!(rebuilt[0].confidence.value() < rules.synergy_threshold);
        assert!((rebuilt[0].impact_score - expected * 1.5).abs() < 1e-12);
    }

    #[test]
    fn stored_synergy_drops_to_zero_without_its_dimension() {
        let profile = ProfileId::new();
        let meta = SynergyMetadata::new(DimensionId::new(1), DimensionId::new(2), 0.9);
        let patterns = vec![
            aspect(profile, 1, 1, 0.9),
            aspect(profile, 2, 6, 0.1),
            Pattern::synergy(profile, meta, 1.5, 2, at()),
        ];

        let rebuilt =
            SynergyAnalyzer::build_patterns(profile, &patterns, &DetectionRules::default(), at());
        assert_eq!(rebuilt.len(), 1);
        assert_eq!(rebuilt[0].confidence.value(), 0.0);
        assert_eq!(rebuilt[0].evidence_count, 1);
    }

    #[test]
    fn weak_pairs_are_pruned() {
        let dims = vec![dim(4, 0.95), dim(2, 0.9), dim(7, 0.4), dim(9, 0.35)];
        let synergies = SynergyAnalyzer::find_synergies(&dims, 0.7);
        assert_eq!(synergies.len(), 1);
        assert_eq!(synergies[0].dim1, DimensionId::new(2));
        assert_eq!(synergies[0].dim2, DimensionId::new(4));
    }

    #[test]
    fn strong_leader_pairs_with_moderate_partner() {
        // sqrt(1.0 * 0.5) ≈ 0.707 passes, sqrt(0.5 * 0.5) does not
        let dims = vec![dim(1, 1.0), dim(2, 0.5), dim(3, 0.5)];
        let synergies = SynergyAnalyzer::find_synergies(&dims, 0.7);
        assert_eq!(synergies.len(), 2);
    }

    proptest! {
        #[test]
        fn alignment_is_symmetric_and_bounded(a in 0.0f64..=1.0, b in 0.0f64..=1.0) {
            let ab = SynergyAnalyzer::alignment(a, b);
            prop_assert_eq!(ab, SynergyAnalyzer::alignment(b, a));
            prop_assert!((0.0..=1.0).contains(&ab));
        }

        #[test]
        fn alignment_is_monotone(a in 0.0f64..=1.0, b in 0.0f64..=1.0, bump in 0.0f64..=1.0) {
            let higher = (a + bump).min(1.0);
            prop_assert!(SynergyAnalyzer::alignment(higher, b) >= SynergyAnalyzer::alignment(a, b));
        }

        #[test]
        fn pruned_search_matches_exhaustive_pairs(confs in proptest::collection::vec(0.3f64..=1.0, 0..15)) {
            let mut dims: Vec<DimensionConfidence> = confs
                .iter()
                .enumerate()
                .map(|(i, c)| dim(i as i64 + 1, *c))
                .collect();
            dims.sort_by(|a, b| b.confidence.total_cmp(&a.confidence).then(a.dimension_id.cmp(&b.dimension_id)));

            let found: HashSet<(DimensionId, DimensionId)> = SynergyAnalyzer::find_synergies(&dims, 0.7)
                .into_iter()
                .map(|m| (m.dim1, m.dim2))
                .collect();

            let mut expected = HashSet::new();
            for (i, a) in dims.iter().enumerate() {
                for b in &dims[i + 1..] {
                    if SynergyAnalyzer::alignment(a.confidence, b.confidence) >= 0.7 {
                        let pair = if a.dimension_id < b.dimension_id {
                            (a.dimension_id, b.dimension_id)
                        } else {
                            (b.dimension_id, a.dimension_id)
                        };
                        expected.insert(pair);
                    }
                }
            }
            prop_assert_eq!(found, expected);
        }
    }
}
