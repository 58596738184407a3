//! Selection weights and limits.

use serde::Deserialize;

use crate::domain::foundation::ValidationError;

/// Weights of the four score components and the pool limits.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SelectionPolicy {
    pub coverage_weight: f64,
    pub weakness_weight: f64,
    pub engagement_weight: f64,
    pub freshness_weight: f64,
    /// Aspect patterns below this confidence mark their dimension as weak.
    pub weak_confidence_threshold: f64,
    /// Maximum number of unanswered questions considered per call.
    pub candidate_pool_limit: usize,
    /// Batch size used when the caller does not ask for one.
    pub default_limit: usize,
}

impl Default for SelectionPolicy {
    fn default() -> Self {
        Self {
            coverage_weight: 0.4,
            weakness_weight: 0.3,
            engagement_weight: 0.15,
            freshness_weight: 0.15,
            weak_confidence_threshold: 0.6,
            candidate_pool_limit: 500,
            default_limit: 10,
        }
    }
}

impl SelectionPolicy {
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [
            ("coverage_weight", self.coverage_weight),
            ("weakness_weight", self.weakness_weight),
            ("engagement_weight", self.engagement_weight),
            ("freshness_weight", self.freshness_weight),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ValidationError::out_of_range(field, 0.0, f64::MAX, value));
            }
        }
        if !(0.0..=1.0).contains(&self.weak_confidence_threshold) {
            return Err(ValidationError::out_of_range(
                "weak_confidence_threshold",
                0.0,
                1.0,
                self.weak_confidence_threshold,
            ));
        }
        if self.candidate_pool_limit == 0 {
            return Err(ValidationError::out_of_range(
                "candidate_pool_limit",
                1.0,
                f64::from(u32::MAX),
                0.0,
            ));
        }
        if self.default_limit == 0 || self.default_limit > self.candidate_pool_limit {
            return Err(ValidationError::out_of_range(
                "default_limit",
                1.0,
                self.candidate_pool_limit as f64,
                self.default_limit as f64,
            ));
        }
        Ok(())
    }
}
