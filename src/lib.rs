//! Digital Twin - behavioral model of a person built from answers and
//! connected data sources.
//!
//! The crate detects preference, synergy and signal patterns from question
//! responses and ingested entities, selects the next questions adaptively,
//! and summarizes a profile as a single holistic alignment score.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
