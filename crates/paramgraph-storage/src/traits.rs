//! The [`GraphStore`] trait defining the storage contract for the editor.
//!
//! Read methods return whole collections in a stable order (insertion order),
//! which the editor uses as canvas list order. Each write method touches
//! exactly one row and is atomic.
//!
//! All backends (InMemoryStore, SqliteStore) implement this trait, so they are
//! swappable without changing editor logic.

use paramgraph_core::{
    Dependency, DependencyKey, NodeId, NodePosition, OptionId, ParamOption, Parameter,
    ParameterWithOptions,
};

use crate::error::StorageError;

/// The storage contract for parameters, dependencies and node positions.
///
/// The trait is synchronous; the editor serializes access behind an async
/// mutex and never holds it across unrelated work.
pub trait GraphStore {
    // -------------------------------------------------------------------
    // Parameters and options (owned by the parameter-management flows)
    // -------------------------------------------------------------------

    /// Inserts a parameter.
    fn insert_parameter(&mut self, parameter: &Parameter) -> Result<(), StorageError>;

    /// Inserts an option. Its parameter must already exist.
    fn insert_option(&mut self, option: &ParamOption) -> Result<(), StorageError>;

    /// Lists all parameters with their options sorted by display position.
    fn list_parameters(&self) -> Result<Vec<ParameterWithOptions>, StorageError>;

    // -------------------------------------------------------------------
    // Dependencies
    // -------------------------------------------------------------------

    /// Lists all dependencies.
    fn list_dependencies(&self) -> Result<Vec<Dependency>, StorageError>;

    /// Creates a dependency with a fresh id.
    ///
    /// Fails with [`StorageError::IntegrityError`] for a self-reference or an
    /// option not owned by the parent parameter, and with
    /// [`StorageError::DuplicateDependency`] if the triple already exists.
    fn create_dependency(&mut self, key: DependencyKey) -> Result<Dependency, StorageError>;

    /// Deletes exactly the dependency matching `key`.
    fn delete_dependency(&mut self, key: &DependencyKey) -> Result<(), StorageError>;

    // -------------------------------------------------------------------
    // Node positions
    // -------------------------------------------------------------------

    /// Lists all node-position records.
    fn list_node_positions(&self) -> Result<Vec<NodePosition>, StorageError>;

    /// Retrieves one node-position record.
    fn get_node_position(&self, id: NodeId) -> Result<NodePosition, StorageError>;

    /// Creates the record, or overwrites the one with the same id in place.
    fn upsert_node_position(&mut self, record: &NodePosition) -> Result<(), StorageError>;

    /// Replaces the saved visible-option subset of an existing record.
    fn update_visible_options(
        &mut self,
        id: NodeId,
        options: &[OptionId],
    ) -> Result<(), StorageError>;

    /// Deletes a node-position record.
    fn delete_node_position(&mut self, id: NodeId) -> Result<(), StorageError>;
}
