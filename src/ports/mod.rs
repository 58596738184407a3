//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Read Ports
//!
//! - `ResponseReader` - Response evidence, coverage and activity counters
//! - `QuestionReader` - Unanswered candidate pool
//!
//! ## Write Ports
//!
//! - `PatternRepository` - Keyed pattern upserts
//! - `QuestionRepository` - Generated questions, deduplicated by text
//! - `EntityRepository` - Ingested entities, deduplicated by name
//!
//! ## Other
//!
//! - `RandomSource` - Injected randomness for question freshness

mod entity_repository;
mod pattern_repository;
mod question_reader;
mod question_repository;
mod random_source;
mod response_reader;

pub use entity_repository::EntityRepository;
pub use pattern_repository::PatternRepository;
pub use question_reader::QuestionReader;
pub use question_repository::QuestionRepository;
pub use random_source::RandomSource;
pub use response_reader::ResponseReader;
