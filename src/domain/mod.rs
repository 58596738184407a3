//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, errors)
//! - `taxonomy` - Dimensions, aspects, questions and answer options
//! - `response` - Response records and the evidence derived from them
//! - `entity` - Records ingested from connected data sources
//! - `pattern` - Derived patterns and their uniqueness keys
//! - `detection` - Pure analyzers turning evidence into patterns
//! - `selection` - Adaptive question scoring
//! - `alignment` - Holistic alignment score
//! - `ingestion` - Dynamic questions from ingested entities

pub mod alignment;
pub mod detection;
pub mod entity;
pub mod foundation;
pub mod ingestion;
pub mod pattern;
pub mod response;
pub mod selection;
pub mod taxonomy;
