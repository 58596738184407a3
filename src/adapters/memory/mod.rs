//! In-memory adapters for tests and embedded use.

mod twin_store;

pub use twin_store::InMemoryTwinStore;
