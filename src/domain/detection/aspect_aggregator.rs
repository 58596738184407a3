//! Aspect Aggregator - groups selected responses into preference evidence.

use std::collections::BTreeMap;

use super::DetectionRules;
use crate::domain::foundation::{AspectId, Confidence, DimensionId, ProfileId, Timestamp};
use crate::domain::pattern::Pattern;
use crate::domain::response::{ResponseEvidence, ResponseType};

/// Responses that landed on one (dimension, aspect) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct AspectGroup {
    pub dimension_id: DimensionId,
    pub aspect_id: AspectId,
    pub frequency: u32,
    pub total_weight: f64,
}

impl AspectGroup {
    /// Mean endorsement weight; `None` for an empty group.
    pub fn strength(&self) -> Option<f64> {
        if self.frequency == 0 {
            return None;
        }
        Some(self.total_weight / f64::from(self.frequency))
    }

    pub fn qualifies(&self, rules: &DetectionRules) -> bool {
        self.frequency > 0 && self.frequency >= rules.min_evidence
    }

    /// Converts a qualifying group into an aspect pattern.
    pub fn to_pattern(
        &self,
        profile_id: ProfileId,
        rules: &DetectionRules,
        at: Timestamp,
    ) -> Option<Pattern> {
        if !self.qualifies(rules) {
            return None;
        }
        let strength = self.strength()?;
        Some(Pattern::aspect(
            profile_id,
            self.dimension_id,
            self.aspect_id,
            Confidence::from_evidence(self.frequency, rules.confidence_saturation),
            strength,
            self.frequency,
            at,
        ))
    }
}

/// Stateless aggregation of response evidence.
pub struct AspectAggregator;

impl AspectAggregator {
    /// Groups explicit selections by (dimension, aspect).
    ///
    /// Evidence without an aspect link, or of a non-selected type, is
    /// discarded. Groups come back ordered by key, so repeated runs over the
    /// same evidence yield identical output.
    pub fn group(evidence: &[ResponseEvidence]) -> Vec<AspectGroup> {
        let mut groups: BTreeMap<(DimensionId, AspectId), (u32, f64)> = BTreeMap::new();

        for item in evidence {
            if item.response_type != ResponseType::Selected {
                continue;
            }
            let (Some(dimension_id), Some(aspect_id)) = (item.dimension_id, item.aspect_id) else {
                continue;
            };
            let entry = groups.entry((dimension_id, aspect_id)).or_insert((0, 0.0));
            entry.0 += 1;
            entry.1 += item.weight;
        }

        groups
            .into_iter()
            .map(|((dimension_id, aspect_id), (frequency, total_weight))| AspectGroup {
                dimension_id,
                aspect_id,
                frequency,
                total_weight,
            })
            .collect()
    }

    /// Builds one pattern per qualifying group.
    pub fn build_patterns(
        profile_id: ProfileId,
        evidence: &[ResponseEvidence],
        rules: &DetectionRules,
        at: Timestamp,
    ) -> Vec<Pattern> {
        Self::group(evidence)
            .iter()
            .filter_map(|group| group.to_pattern(profile_id, rules, at))
            .collect()
    }
}
