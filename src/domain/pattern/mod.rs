//! Patterns - derived beliefs about a profile.
//!
//! A pattern is one of three kinds, distinguished by [`PatternKind`]:
//!
//! - **Aspect** - preference for an aspect within a dimension
//! - **Synergy** - correlated confidence between two dimensions
//! - **Signal** - behavioral signal such as privacy sensitivity
//!
//! # Domain Invariants
//!
//! 1. Exactly one pattern per [`PatternKey`]; writes are upserts
//! 2. Confidence lies in [0, 1]
//! 3. Impact score is fixed when the pattern is written

mod kind;
#[allow(clippy::module_inception)]
mod pattern;

pub use kind::{
    PatternKind, SignalKind, SynergyMetadata, PREFERENCE_PATTERN_TYPE, SYNERGY_PATTERN_PREFIX,
};
pub use pattern::{Pattern, PatternKey, UpsertOutcome};
