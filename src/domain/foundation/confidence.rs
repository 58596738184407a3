//! Confidence value object (unit interval).

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

/// A value between 0.0 and 1.0 inclusive.
///
/// Construction via [`Confidence::new`] clamps and maps NaN to zero, so a
/// `Confidence` held by a pattern is always within bounds.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Confidence(f64);

impl Confidence {
    /// No confidence.
    pub const ZERO: Self = Self(0.0);

    /// Full confidence.
    pub const FULL: Self = Self(1.0);

    /// Creates a new Confidence, clamping to valid range.
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            return Self::ZERO;
        }
        Self(value.clamp(0.0, 1.0))
    }

    /// Creates a Confidence, returning error if out of range.
    pub fn try_new(value: f64) -> Result<Self, ValidationError> {
        if !(0.0..=1.0).contains(&value) {
            return Err(ValidationError::out_of_range("confidence", 0.0, 1.0, value));
        }
        Ok(Self(value))
    }

    /// Confidence earned from `evidence` observations, saturating at `saturation`.
    pub fn from_evidence(evidence: u32, saturation: f64) -> Self {
        if saturation <= 0.0 {
            return Self::FULL;
        }
        Self::new(f64::from(evidence) / saturation)
    }

    /// Returns the value as f64.
    pub fn value(&self) -> f64 {
        self.0
    }
}

impl Default for Confidence {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}
