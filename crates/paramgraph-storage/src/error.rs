//! Storage error types for paramgraph-storage.
//!
//! [`StorageError`] covers all anticipated failure modes in the storage layer:
//! database and migration failures, serialization, entity-not-found variants
//! for each record type, and integrity violations.

use paramgraph_core::{DependencyKey, NodeId, OptionId, ParameterId};
use thiserror::Error;

/// Errors produced by storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The underlying SQLite call failed.
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Applying schema migrations failed.
    #[error("migration error: {0}")]
    Migration(String),

    /// JSON serialization or deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A parameter with the given ID was not found.
    #[error("parameter not found: {0}")]
    ParameterNotFound(ParameterId),

    /// An option with the given ID was not found.
    #[error("option not found: {0}")]
    OptionNotFound(OptionId),

    /// No dependency matches the given triple.
    #[error("dependency not found: {0}")]
    DependencyNotFound(DependencyKey),

    /// A dependency with the same triple already exists.
    #[error("dependency already exists: {0}")]
    DuplicateDependency(DependencyKey),

    /// A node-position record was not found.
    #[error("node position not found: {0}")]
    NodePositionNotFound(NodeId),

    /// A data integrity violation was detected.
    #[error("integrity error: {reason}")]
    IntegrityError { reason: String },
}
