//! Pattern discriminants: aspect preference, dimension synergy, behavioral signal.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{AspectId, DimensionId, ValidationError};

/// Stored `pattern_type` of every aspect pattern.
pub const PREFERENCE_PATTERN_TYPE: &str = "preference";

/// Prefix shared by all synergy pattern types.
pub const SYNERGY_PATTERN_PREFIX: &str = "synergy_";

const SYNERGY_DIMENSION_PREFIX: &str = "synergy_dimension_alignment_";

const SYNERGY_DESCRIPTION: &str = "Strong alignment between these dimensions";

/// Behavioral signal detected from evidence volume rather than answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalKind {
    /// Much of the profile's evidence comes from passively collected sources.
    PrivacySensitivityHigh,
    /// Calendar load over the trailing month.
    MeetingDensity,
}

impl SignalKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PrivacySensitivityHigh => "privacy_sensitivity_high",
            Self::MeetingDensity => "meeting_density",
        }
    }
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SignalKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "privacy_sensitivity_high" => Ok(Self::PrivacySensitivityHigh),
            "meeting_density" => Ok(Self::MeetingDensity),
            other => Err(ValidationError::invalid_format(
                "pattern_type",
                format!("unknown signal '{}'", other),
            )),
        }
    }
}

/// Describes the dimension pair behind a synergy pattern.
///
/// The pair is canonical: `dim1 < dim2` always holds, so (A, B) and (B, A)
/// map to the same pattern key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynergyMetadata {
    pub dim1: DimensionId,
    pub dim2: DimensionId,
    pub alignment: f64,
    pub description: String,
}

impl SynergyMetadata {
    pub fn new(a: DimensionId, b: DimensionId, alignment: f64) -> Self {
        let (dim1, dim2) = if a <= b { (a, b) } else { (b, a) };
        Self {
            dim1,
            dim2,
            alignment,
            description: SYNERGY_DESCRIPTION.to_string(),
        }
    }

    /// Stored `pattern_type` for this pair.
    pub fn pattern_type(&self) -> String {
        format!("{}{}_{}", SYNERGY_DIMENSION_PREFIX, self.dim1, self.dim2)
    }

    /// Extracts the dimension pair from a synergy `pattern_type`.
    pub fn parse_pattern_type(pattern_type: &str) -> Option<(DimensionId, DimensionId)> {
        let rest = pattern_type.strip_prefix(SYNERGY_DIMENSION_PREFIX)?;
        let (a, b) = rest.split_once('_')?;
        Some((a.parse().ok()?, b.parse().ok()?))
    }
}

/// Which kind of belief a pattern records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum PatternKind {
    /// Preference for one aspect of a dimension.
    Aspect {
        dimension_id: DimensionId,
        aspect_id: AspectId,
    },
    /// Correlated confidence between two dimensions.
    Synergy(SynergyMetadata),
    /// Behavioral signal.
    Signal(SignalKind),
}

impl PatternKind {
    /// Stored `pattern_type` value.
    pub fn pattern_type(&self) -> String {
        match self {
            Self::Aspect { .. } => PREFERENCE_PATTERN_TYPE.to_string(),
            Self::Synergy(meta) => meta.pattern_type(),
            Self::Signal(signal) => signal.as_str().to_string(),
        }
    }

    /// Dimension of an aspect pattern.
    pub fn dimension_id(&self) -> Option<DimensionId> {
        match self {
            Self::Aspect { dimension_id, .. } => Some(*dimension_id),
            _ => None,
        }
    }

    /// Aspect of an aspect pattern.
    pub fn aspect_id(&self) -> Option<AspectId> {
        match self {
            Self::Aspect { aspect_id, .. } => Some(*aspect_id),
            _ => None,
        }
    }

    pub fn is_synergy(&self) -> bool {
        matches!(self, Self::Synergy(_))
    }

    /// Rebuilds a kind from its stored columns.
    ///
    /// Rows with both dimension and aspect set are aspect patterns; otherwise
    /// the `pattern_type` decides between synergy and signal.
    pub fn from_parts(
        pattern_type: &str,
        dimension_id: Option<DimensionId>,
        aspect_id: Option<AspectId>,
        metadata: Option<serde_json::Value>,
    ) -> Result<Self, ValidationError> {
        if let (Some(dimension_id), Some(aspect_id)) = (dimension_id, aspect_id) {
            return Ok(Self::Aspect {
                dimension_id,
                aspect_id,
            });
        }

        if pattern_type.starts_with(SYNERGY_PATTERN_PREFIX) {
            if let Some(meta) = metadata
                .and_then(|value| serde_json::from_value::<SynergyMetadata>(value).ok())
            {
                return Ok(Self::Synergy(meta));
            }
            let (a, b) = SynergyMetadata::parse_pattern_type(pattern_type).ok_or_else(|| {
                ValidationError::invalid_format("pattern_type", "malformed synergy pattern type")
            })?;
            return Ok(Self::Synergy(SynergyMetadata::new(a, b, 0.0)));
        }

        pattern_type.parse::<SignalKind>().map(Self::Signal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synergy_metadata_canonicalizes_pair() {
        let forward = SynergyMetadata::new(DimensionId::new(2), DimensionId::new(9), 0.8);
        let reverse = SynergyMetadata::new(DimensionId::new(9), DimensionId::new(2), 0.8);
        assert_eq!(forward, reverse);
        assert_eq!(forward.pattern_type(), "synergy_dimension_alignment_2_9");
    }

    #[test]
    fn synergy_pattern_type_parses_back() {
        let parsed = SynergyMetadata::parse_pattern_type("synergy_dimension_alignment_3_12");
        assert_eq!(parsed, Some((DimensionId::new(3), DimensionId::new(12))));
        assert_eq!(SynergyMetadata::parse_pattern_type("preference"), None);
        assert_eq!(SynergyMetadata::parse_pattern_type("synergy_dimension_alignment_x_1"), None);
    }

    #[test]
    fn pattern_type_per_kind() {
        let aspect = PatternKind::Aspect {
            dimension_id: DimensionId::new(1),
            aspect_id: AspectId::new(4),
        };
        assert_eq!(aspect.pattern_type(), PREFERENCE_PATTERN_TYPE);
        assert_eq!(
            PatternKind::Signal(SignalKind::MeetingDensity).pattern_type(),
            "meeting_density"
        );
    }

    #[test]
    fn from_parts_prefers_aspect_columns() {
        let kind = PatternKind::from_parts(
            "preference",
            Some(DimensionId::new(1)),
            Some(AspectId::new(2)),
            None,
        )
        .unwrap();
        assert_eq!(kind.aspect_id(), Some(AspectId::new(2)));
    }

    #[test]
    fn from_parts_reads_synergy_metadata() {
        let meta = SynergyMetadata::new(DimensionId::new(1), DimensionId::new(2), 0.9);
        let value = serde_json::to_value(&meta).unwrap();
        let kind = PatternKind::from_parts(&meta.pattern_type(), None, None, Some(value)).unwrap();
        assert_eq!(kind, PatternKind::Synergy(meta));
    }

    #[test]
    fn from_parts_falls_back_to_pattern_type_for_synergy() {
        let kind =
            PatternKind::from_parts("synergy_dimension_alignment_4_5", None, None, None).unwrap();
        match kind {
            PatternKind::Synergy(meta) => {
                assert_eq!(meta.dim1, DimensionId::new(4));
                assert_eq!(meta.dim2, DimensionId::new(5));
            }
            other => panic!("Expected synergy, got {:?}", other),
        }
    }

    #[test]
    fn from_parts_reads_signals_and_rejects_unknown() {
        let kind = PatternKind::from_parts("privacy_sensitivity_high", None, None, None).unwrap();
        assert_eq!(kind, PatternKind::Signal(SignalKind::PrivacySensitivityHigh));
        assert!(PatternKind::from_parts("mystery", None, None, None).is_err());
    }

    #[test]
    fn kind_serializes_with_tag() {
        let json = serde_json::to_value(PatternKind::Signal(SignalKind::MeetingDensity)).unwrap();
        assert_eq!(json["kind"], "signal");
        assert_eq!(json["detail"], "meeting_density");
    }
}
