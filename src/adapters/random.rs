//! RandomSource implementations.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

use crate::ports::RandomSource;

/// Fresh thread-local randomness on every draw.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRandomSource;

impl RandomSource for ThreadRandomSource {
    fn next_unit(&self) -> f64 {
        rand::thread_rng().gen::<f64>()
    }
}

/// Reproducible draws from a fixed seed.
pub struct SeededRandomSource {
    rng: Mutex<StdRng>,
}

impl SeededRandomSource {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl RandomSource for SeededRandomSource {
    fn next_unit(&self) -> f64 {
        match self.rng.lock() {
            Ok(mut rng) => rng.gen::<f64>(),
            Err(poisoned) => poisoned.into_inner().gen::<f64>(),
        }
    }
}

/// Always returns the same value, clamped into [0, 1).
#[derive(Debug, Clone, Copy)]
pub struct FixedRandomSource(f64);

impl FixedRandomSource {
    pub fn new(value: f64) -> Self {
        let value = if value.is_finite() { value } else { 0.0 };
        Self(value.clamp(0.0, 1.0 - f64::EPSILON))
    }
}

impl RandomSource for FixedRandomSource {
    fn next_unit(&self) -> f64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thread_source_stays_in_unit_interval() {
        let source = ThreadRandomSource;
        for _ in 0..1000 {
            let v = source.next_unit();
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn same_seed_same_sequence() {
        let a = SeededRandomSource::new(42);
        let b = SeededRandomSource::new(42);
        for _ in 0..10 {
            assert_eq!(a.next_unit(), b.next_unit());
        }
    }

    #[test]
    fn fixed_source_is_clamped() {
        assert_eq!(FixedRandomSource::new(0.25).next_unit(), 0.25);
        assert!(FixedRandomSource::new(3.0).next_unit() < 1.0);
        assert_eq!(FixedRandomSource::new(f64::NAN).next_unit(), 0.0);
    }
}
