//! In-memory implementation of [`GraphStore`].
//!
//! [`InMemoryStore`] is a first-class backend for tests, demos, and anywhere
//! persistence isn't needed. It stores all data in insertion-ordered maps with
//! identical semantics to the SQLite backend.

use indexmap::IndexMap;

use paramgraph_core::{
    Dependency, DependencyId, DependencyKey, NodeId, NodePosition, OptionId, ParamOption,
    Parameter, ParameterId, ParameterWithOptions,
};

use crate::error::StorageError;
use crate::traits::GraphStore;

/// In-memory implementation of [`GraphStore`].
#[derive(Debug, Default, Clone)]
pub struct InMemoryStore {
    parameters: IndexMap<ParameterId, Parameter>,
    options: IndexMap<OptionId, ParamOption>,
    dependencies: IndexMap<DependencyKey, Dependency>,
    positions: IndexMap<NodeId, NodePosition>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    fn assert_parameter_exists(&self, id: ParameterId) -> Result<(), StorageError> {
        if self.parameters.contains_key(&id) {
            Ok(())
        } else {
            Err(StorageError::ParameterNotFound(id))
        }
    }
}

impl GraphStore for InMemoryStore {
    fn insert_parameter(&mut self, parameter: &Parameter) -> Result<(), StorageError> {
        if self.parameters.contains_key(&parameter.id) {
            return Err(StorageError::IntegrityError {
                reason: format!("parameter {} already exists", parameter.id),
            });
        }
        self.parameters.insert(parameter.id, parameter.clone());
        Ok(())
    }

    fn insert_option(&mut self, option: &ParamOption) -> Result<(), StorageError> {
        self.assert_parameter_exists(option.parameter_id)?;
        if self.options.contains_key(&option.id) {
            return Err(StorageError::IntegrityError {
                reason: format!("option {} already exists", option.id),
            });
        }
        self.options.insert(option.id, option.clone());
        Ok(())
    }

    fn list_parameters(&self) -> Result<Vec<ParameterWithOptions>, StorageError> {
        Ok(self
            .parameters
            .values()
            .map(|parameter| {
                let mut options: Vec<ParamOption> = self
                    .options
                    .values()
                    .filter(|o| o.parameter_id == parameter.id)
                    .cloned()
                    .collect();
                options.sort_by_key(|o| o.position);
                ParameterWithOptions {
                    parameter: parameter.clone(),
                    options,
                }
            })
            .collect())
    }

    fn list_dependencies(&self) -> Result<Vec<Dependency>, StorageError> {
        Ok(self.dependencies.values().cloned().collect())
    }

    fn create_dependency(&mut self, key: DependencyKey) -> Result<Dependency, StorageError> {
        if key.parent_parameter_id == key.child_parameter_id {
            return Err(StorageError::IntegrityError {
                reason: format!("parameter {} cannot depend on itself", key.child_parameter_id),
            });
        }
        self.assert_parameter_exists(key.parent_parameter_id)?;
        self.assert_parameter_exists(key.child_parameter_id)?;
        let option = self
            .options
            .get(&key.parent_option_id)
            .ok_or(StorageError::OptionNotFound(key.parent_option_id))?;
        if option.parameter_id != key.parent_parameter_id {
            return Err(StorageError::IntegrityError {
                reason: format!(
                    "option {} does not belong to parameter {}",
                    key.parent_option_id, key.parent_parameter_id
                ),
            });
        }
        if self.dependencies.contains_key(&key) {
            return Err(StorageError::DuplicateDependency(key));
        }
        let dependency = Dependency::from_key(DependencyId::generate(), key);
        self.dependencies.insert(key, dependency.clone());
        Ok(dependency)
    }

    fn delete_dependency(&mut self, key: &DependencyKey) -> Result<(), StorageError> {
        self.dependencies
            .shift_remove(key)
            .map(|_| ())
            .ok_or(StorageError::DependencyNotFound(*key))
    }

    fn list_node_positions(&self) -> Result<Vec<NodePosition>, StorageError> {
        Ok(self.positions.values().cloned().collect())
    }

    fn get_node_position(&self, id: NodeId) -> Result<NodePosition, StorageError> {
        self.positions
            .get(&id)
            .cloned()
            .ok_or(StorageError::NodePositionNotFound(id))
    }

    fn upsert_node_position(&mut self, record: &NodePosition) -> Result<(), StorageError> {
        self.assert_parameter_exists(record.parameter_id)?;
        // IndexMap::insert keeps the original slot for an existing key.
        self.positions.insert(record.id, record.clone());
        Ok(())
    }

    fn update_visible_options(
        &mut self,
        id: NodeId,
        options: &[OptionId],
    ) -> Result<(), StorageError> {
        let record = self
            .positions
            .get_mut(&id)
            .ok_or(StorageError::NodePositionNotFound(id))?;
        record.visible_options = Some(options.to_vec());
        Ok(())
    }

    fn delete_node_position(&mut self, id: NodeId) -> Result<(), StorageError> {
        self.positions
            .shift_remove(&id)
            .map(|_| ())
            .ok_or(StorageError::NodePositionNotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conformance;

    #[test]
    fn parameters_with_sorted_options() {
        conformance::parameters_with_sorted_options(&mut InMemoryStore::new());
    }

    #[test]
    fn option_requires_parameter() {
        conformance::option_requires_parameter(&mut InMemoryStore::new());
    }

    #[test]
    fn dependency_lifecycle() {
        conformance::dependency_lifecycle(&mut InMemoryStore::new());
    }

    #[test]
    fn dependency_validation() {
        conformance::dependency_validation(&mut InMemoryStore::new());
    }

    #[test]
    fn delete_dependency_leaves_siblings() {
        conformance::delete_dependency_leaves_siblings(&mut InMemoryStore::new());
    }

    #[test]
    fn node_position_upsert_keeps_order() {
        conformance::node_position_upsert_keeps_order(&mut InMemoryStore::new());
    }

    #[test]
    fn visible_options_update_and_delete() {
        conformance::visible_options_update_and_delete(&mut InMemoryStore::new());
    }
}
