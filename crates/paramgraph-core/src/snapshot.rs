//! The last-fetched copy of every record the editor renders from.

use crate::catalog::ParameterCatalog;
use crate::id::NodeId;
use crate::records::{Dependency, NodePosition};

/// Parameters, dependencies and node positions as last read from the store.
///
/// Node positions keep store order, which is also canvas list order.
#[derive(Debug, Clone, Default)]
pub struct GraphSnapshot {
    pub catalog: ParameterCatalog,
    pub dependencies: Vec<Dependency>,
    pub positions: Vec<NodePosition>,
}

impl GraphSnapshot {
    pub fn position(&self, id: NodeId) -> Option<&NodePosition> {
        self.positions.iter().find(|p| p.id == id)
    }

    pub fn position_mut(&mut self, id: NodeId) -> Option<&mut NodePosition> {
        self.positions.iter_mut().find(|p| p.id == id)
    }

    /// Replaces the record with the same id in place, or appends it.
    pub fn upsert_position(&mut self, record: NodePosition) {
        match self.position_mut(record.id) {
            Some(existing) => *existing = record,
            None => self.positions.push(record),
        }
    }

    pub fn remove_position(&mut self, id: NodeId) -> Option<NodePosition> {
        let idx = self.positions.iter().position(|p| p.id == id)?;
        Some(self.positions.remove(idx))
    }
}
