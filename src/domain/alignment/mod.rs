//! Alignment Module - Holistic score over a profile's patterns.

mod calculator;
mod tier;

pub use calculator::{
    AlignmentBreakdown, AlignmentCalculator, HolisticAlignment, ACTIVE_SYNERGY_THRESHOLD,
    CLARITY_WEIGHT, COHERENCE_WEIGHT, CONFIDENCE_WEIGHT, PRIVACY_SHIELD_WEIGHT,
    RELEVANCE_THRESHOLD, STABILITY_WEIGHT, SYNERGY_DENSITY_WEIGHT,
};
pub use tier::AlignmentTier;
