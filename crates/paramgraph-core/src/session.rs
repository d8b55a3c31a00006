//! Session-local editor state: tombstones and visible-option overrides.
//!
//! Both collections are process-local and never synchronized across
//! sessions. They are backed by `DashMap`/`DashSet` so the render thread can
//! read them while write tasks on the runtime update them.

use dashmap::{DashMap, DashSet};

use crate::id::{NodeId, OptionId};

/// Tombstones and overrides for one editing session.
#[derive(Debug, Default)]
pub struct SessionState {
    tombstones: DashSet<NodeId>,
    overrides: DashMap<NodeId, Vec<OptionId>>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `id` deleted. Returns `false` if it was already tombstoned.
    pub fn tombstone(&self, id: NodeId) -> bool {
        self.tombstones.insert(id)
    }

    /// Reverts a tombstone after a failed delete.
    pub fn revive(&self, id: NodeId) -> bool {
        self.tombstones.remove(&id).is_some()
    }

    pub fn is_tombstoned(&self, id: NodeId) -> bool {
        self.tombstones.contains(&id)
    }

    pub fn tombstone_count(&self) -> usize {
        self.tombstones.len()
    }

    /// The option subset currently in effect for `id`, if one was set this session.
    pub fn override_for(&self, id: NodeId) -> Option<Vec<OptionId>> {
        self.overrides.get(&id).map(|entry| entry.value().clone())
    }

    pub fn set_override(&self, id: NodeId, options: Vec<OptionId>) {
        self.overrides.insert(id, options);
    }

    /// Removes and returns the override for `id`.
    pub fn take_override(&self, id: NodeId) -> Option<Vec<OptionId>> {
        self.overrides.remove(&id).map(|(_, options)| options)
    }
}
