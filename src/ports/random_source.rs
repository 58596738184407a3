//! Randomness port for selection freshness.

/// Source of uniform draws in [0, 1).
pub trait RandomSource: Send + Sync {
    fn next_unit(&self) -> f64;
}
