//! Storage abstraction for the parameter dependency graph.
//!
//! Provides the [`GraphStore`] trait defining the storage contract that all
//! backends implement, plus the [`InMemoryStore`] and [`SqliteStore`] as
//! first-class backends.
//!
//! # Architecture
//!
//! The store owns three record families: parameters with their options,
//! dependencies keyed by their `(parent, option, child)` triple, and
//! node-position records. The editor never caches writes here; every call is
//! a single-row atomic operation and reads return whole collections.
//!
//! # Modules
//!
//! - [`error`]: StorageError enum with all failure modes
//! - [`traits`]: GraphStore trait definition
//! - [`memory`]: InMemoryStore implementation
//! - [`schema`]: SQL migration setup
//! - [`sqlite`]: SqliteStore implementation

pub mod error;
pub mod memory;
pub mod schema;
pub mod sqlite;
pub mod traits;

#[cfg(test)]
pub(crate) mod conformance;

// Re-export key types for ergonomic use.
pub use error::StorageError;
pub use memory::InMemoryStore;
pub use sqlite::SqliteStore;
pub use traits::GraphStore;
