//! Tunable thresholds for pattern detection.

use serde::Deserialize;

use crate::domain::foundation::ValidationError;

/// Thresholds and weights used by the detection analyzers.
///
/// Deserializable so the `engine.detection` configuration section can
/// override any field; omitted fields keep their defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DetectionRules {
    /// Responses needed on an aspect before a preference is asserted.
    pub min_evidence: u32,
    /// Evidence count at which aspect confidence reaches 1.0.
    pub confidence_saturation: f64,
    /// Aspect patterns below this confidence are ignored when pairing dimensions.
    pub synergy_relevance_floor: f64,
    /// Minimum alignment for a dimension pair to count as a synergy.
    pub synergy_threshold: f64,
    /// Multiplier from alignment to synergy impact.
    pub synergy_impact_weight: f64,
    /// Trailing window for calendar-derived signals.
    pub meeting_window_days: i64,
    /// Events in the window at which meeting density saturates.
    pub meeting_saturation: f64,
}

impl Default for DetectionRules {
    fn default() -> Self {
        Self {
            min_evidence: 3,
            confidence_saturation: 10.0,
            synergy_relevance_floor: 0.3,
            synergy_threshold: 0.7,
            synergy_impact_weight: 1.5,
            meeting_window_days: 30,
            meeting_saturation: 40.0,
        }
    }
}

impl DetectionRules {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.min_evidence == 0 {
            return Err(ValidationError::out_of_range(
                "min_evidence",
                1.0,
                f64::from(u32::MAX),
                0.0,
            ));
        }
        check_positive("confidence_saturation", self.confidence_saturation)?;
        check_unit("synergy_relevance_floor", self.synergy_relevance_floor)?;
        check_unit("synergy_threshold", self.synergy_threshold)?;
        check_positive("synergy_impact_weight", self.synergy_impact_weight)?;
        check_positive("meeting_saturation", self.meeting_saturation)?;
        if self.meeting_window_days <= 0 {
            return Err(ValidationError::out_of_range(
                "meeting_window_days",
                1.0,
                365.0,
                self.meeting_window_days as f64,
            ));
        }
        Ok(())
    }
}

fn check_unit(field: &str, value: f64) -> Result<(), ValidationError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ValidationError::out_of_range(field, 0.0, 1.0, value));
    }
    Ok(())
}

fn check_positive(field: &str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ValidationError::out_of_range(field, f64::MIN_POSITIVE, f64::MAX, value));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let rules = DetectionRules::default();
        assert!(rules.validate().is_ok());
        assert_eq!(rules.min_evidence, 3);
        assert_eq!(rules.confidence_saturation, 10.0);
    }

    #[test]
    fn rejects_zero_min_evidence() {
        let rules = DetectionRules {
            min_evidence: 0,
            ..Default::default()
        };
        assert!(rules.validate().is_err());
    }

    #[test]
    fn rejects_threshold_above_one() {
        let rules = DetectionRules {
            synergy_threshold: 1.2,
            ..Default::default()
        };
        assert!(rules.validate().is_err());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let rules: DetectionRules = serde_json::from_str(r#"{ "synergy_threshold": 0.75 }"#).unwrap();
        assert_eq!(rules.synergy_threshold, 0.75);
        assert_eq!(rules.min_evidence, 3);
    }
}
