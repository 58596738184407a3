//! The Pattern record and its uniqueness key.

use serde::{Deserialize, Serialize};

use super::kind::{PatternKind, SignalKind, SynergyMetadata};
use crate::domain::foundation::{AspectId, Confidence, DimensionId, ProfileId, Timestamp};

/// Uniqueness key enforced by every pattern store.
///
/// Aspect patterns are keyed by (profile, dimension, aspect); synergy and
/// signal patterns by (profile, pattern_type).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PatternKey {
    Aspect {
        profile_id: ProfileId,
        dimension_id: DimensionId,
        aspect_id: AspectId,
    },
    Typed {
        profile_id: ProfileId,
        pattern_type: String,
    },
}

impl PatternKey {
    pub fn profile_id(&self) -> ProfileId {
        match self {
            Self::Aspect { profile_id, .. } | Self::Typed { profile_id, .. } => *profile_id,
        }
    }
}

/// What an upsert did to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// No row existed for the key.
    Inserted,
    /// The existing row for the key was overwritten.
    Updated,
}

/// A derived, confidence-scored belief about a profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pattern {
    pub profile_id: ProfileId,
    pub kind: PatternKind,
    pub confidence: Confidence,
    pub strength: f64,
    pub evidence_count: u32,
    /// Fixed at write time; readers never recompute it.
    pub impact_score: f64,
    pub last_updated: Timestamp,
}

impl Pattern {
    /// Aspect preference pattern; impact is confidence × strength.
    pub fn aspect(
        profile_id: ProfileId,
        dimension_id: DimensionId,
        aspect_id: AspectId,
        confidence: Confidence,
        strength: f64,
        evidence_count: u32,
        at: Timestamp,
    ) -> Self {
        Self {
            profile_id,
            kind: PatternKind::Aspect {
                dimension_id,
                aspect_id,
            },
            confidence,
            strength,
            evidence_count,
            impact_score: confidence.value() * strength,
            last_updated: at,
        }
    }

    /// Synergy pattern; confidence and strength both carry the alignment.
    pub fn synergy(
        profile_id: ProfileId,
        metadata: SynergyMetadata,
        impact_weight: f64,
        evidence_count: u32,
        at: Timestamp,
    ) -> Self {
        let alignment = Confidence::new(metadata.alignment);
        Self {
            profile_id,
            confidence: alignment,
            strength: alignment.value(),
            evidence_count,
            impact_score: alignment.value() * impact_weight,
            kind: PatternKind::Synergy(metadata),
            last_updated: at,
        }
    }

    /// Signal pattern; strength mirrors confidence.
    pub fn signal(
        profile_id: ProfileId,
        signal: SignalKind,
        confidence: Confidence,
        evidence_count: u32,
        at: Timestamp,
    ) -> Self {
        Self {
            profile_id,
            kind: PatternKind::Signal(signal),
            confidence,
            strength: confidence.value(),
            evidence_count,
            impact_score: confidence.value() * confidence.value(),
            last_updated: at,
        }
    }

    /// The key this pattern is stored under.
    pub fn key(&self) -> PatternKey {
        match &self.kind {
            PatternKind::Aspect {
                dimension_id,
                aspect_id,
            } => PatternKey::Aspect {
                profile_id: self.profile_id,
                dimension_id: *dimension_id,
                aspect_id: *aspect_id,
            },
            other => PatternKey::Typed {
                profile_id: self.profile_id,
                pattern_type: other.pattern_type(),
            },
        }
    }

    pub fn pattern_type(&self) -> String {
        self.kind.pattern_type()
    }

    pub fn is_aspect(&self) -> bool {
        matches!(self.kind, PatternKind::Aspect { .. })
    }

    pub fn is_synergy(&self) -> bool {
        self.kind.is_synergy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at() -> Timestamp {
        Timestamp::from_unix_secs(1705276800)
    }

    #[test]
    fn aspect_pattern_derives_impact() {
        let profile = ProfileId::new();
        let p = Pattern::aspect(
            profile,
            DimensionId::new(1),
            AspectId::new(1),
            Confidence::new(0.5),
            0.8,
            5,
            at(),
        );
        assert!((p.impact_score - 0.4).abs() < 1e-12);
        assert!(p.is_aspect());
        assert_eq!(
            p.key(),
            PatternKey::Aspect {
                profile_id: profile,
                dimension_id: DimensionId::new(1),
                aspect_id: AspectId::new(1),
            }
        );
    }

    #[test]
    fn synergy_pattern_scales_impact_by_weight() {
        let meta = SynergyMetadata::new(DimensionId::new(3), DimensionId::new(1), 0.8);
        let p = Pattern::synergy(ProfileId::new(), meta, 1.5, 2, at());
        assert!((p.impact_score - 1.2).abs() < 1e-12);
        assert_eq!(p.confidence.value(), 0.8);
        assert_eq!(p.pattern_type(), "synergy_dimension_alignment_1_3");
        assert!(p.is_synergy());
    }

    #[test]
    fn signal_pattern_is_keyed_by_type() {
        let profile = ProfileId::new();
        let p = Pattern::signal(
            profile,
            SignalKind::PrivacySensitivityHigh,
            Confidence::new(0.6),
            10,
            at(),
        );
        assert_eq!(
            p.key(),
            PatternKey::Typed {
                profile_id: profile,
                pattern_type: "privacy_sensitivity_high".to_string(),
            }
        );
        assert_eq!(p.key().profile_id(), profile);
    }
}
