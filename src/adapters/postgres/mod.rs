//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! - `PostgresPatternRepository` - Keyed pattern upserts
//! - `PostgresResponseReader` - Response evidence, coverage and activity
//! - `PostgresQuestionStore` - Candidate pool and generated questions
//! - `PostgresEntityRepository` - Ingested entities
//! - `connect_pool` / `run_migrations` - Pool construction and schema setup

mod entity_repository;
mod pattern_repository;
mod pool;
mod question_store;
mod response_reader;

pub use entity_repository::PostgresEntityRepository;
pub use pattern_repository::PostgresPatternRepository;
pub use pool::{connect_pool, run_migrations};
pub use question_store::PostgresQuestionStore;
pub use response_reader::PostgresResponseReader;
