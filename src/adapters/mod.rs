//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `memory` - In-memory store implementing every storage port
//! - `postgres` - PostgreSQL implementations via sqlx
//! - `random` - `RandomSource` implementations

pub mod memory;
pub mod postgres;
pub mod random;

pub use memory::InMemoryTwinStore;
pub use random::{FixedRandomSource, SeededRandomSource, ThreadRandomSource};
