//! Editor error types.
//!
//! [`EditorError`] is the unified error type returned by every
//! [`EditorController`](crate::controller::EditorController) operation. Core
//! validation failures and storage failures convert into it with `?`.

use paramgraph_core::CoreError;
use paramgraph_storage::StorageError;

/// Errors produced by editor operations.
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    /// A command was rejected before any write was issued.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The store rejected or failed a read or write.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// A spawned write task panicked or was cancelled.
    #[error("write task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl EditorError {
    /// True when the error was raised by local validation and nothing was
    /// written.
    pub fn is_rejection(&self) -> bool {
        matches!(self, EditorError::Core(_))
    }
}
