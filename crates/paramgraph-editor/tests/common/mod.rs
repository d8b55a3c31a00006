//! Shared fixtures for editor integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use paramgraph_core::{
    Dependency, DependencyKey, EditorConfig, NodeId, NodePosition, OptionId, ParamOption,
    Parameter, ParameterId, ParameterWithOptions, Position,
};
use paramgraph_editor::{ChannelNotifier, EditorController, Notification};
use paramgraph_storage::{GraphStore, InMemoryStore, StorageError};
use tokio::sync::mpsc::UnboundedReceiver;

/// A seeded parameter and its option ids in display order.
pub struct Seeded {
    pub id: ParameterId,
    pub options: Vec<OptionId>,
}

impl Seeded {
    pub fn canonical(&self) -> NodeId {
        NodeId::canonical(self.id)
    }
}

pub fn seed(store: &mut impl GraphStore, label: &str, options: &[&str]) -> Seeded {
    let id = ParameterId::generate();
    store
        .insert_parameter(&Parameter {
            id,
            slug: label.to_lowercase().replace(' ', "-"),
            label: label.to_string(),
        })
        .unwrap();
    let options = options
        .iter()
        .enumerate()
        .map(|(position, label)| {
            let option = ParamOption {
                id: OptionId::generate(),
                parameter_id: id,
                label: label.to_string(),
                position: position as u32,
            };
            store.insert_option(&option).unwrap();
            option.id
        })
        .collect();
    Seeded { id, options }
}

pub fn seed_numbered(store: &mut impl GraphStore, label: &str, count: usize) -> Seeded {
    let labels: Vec<String> = (0..count).map(|i| format!("{label} {i}")).collect();
    let refs: Vec<&str> = labels.iter().map(String::as_str).collect();
    seed(store, label, &refs)
}

pub fn place(store: &mut impl GraphStore, parameter: ParameterId, x: f64, y: f64) {
    store
        .upsert_node_position(&NodePosition::canonical(parameter, Position::new(x, y)))
        .unwrap();
}

pub type Notes = UnboundedReceiver<Notification>;

/// Builds a controller over `store`, refreshed and wired to a channel
/// notifier.
pub async fn editor<S: GraphStore + Send + 'static>(store: S) -> (EditorController<S>, Notes) {
    let (notifier, notes) = ChannelNotifier::new();
    let editor = EditorController::new(store, EditorConfig::default()).with_notifier(notifier);
    editor.refresh().await;
    (editor, notes)
}

pub fn drain(notes: &mut Notes) -> Vec<Notification> {
    let mut out = Vec::new();
    while let Ok(note) = notes.try_recv() {
        out.push(note);
    }
    out
}

/// Store wrapper whose writes (and optionally reads) can be made to fail.
#[derive(Clone, Default)]
pub struct FlakyStore {
    pub inner: InMemoryStore,
    pub fail_writes: Arc<AtomicBool>,
    pub fail_position_reads: Arc<AtomicBool>,
    pub write_count: Arc<std::sync::atomic::AtomicUsize>,
}

impl FlakyStore {
    pub fn new(inner: InMemoryStore) -> Self {
        FlakyStore {
            inner,
            ..Default::default()
        }
    }

    fn write(&self) -> Result<(), StorageError> {
        self.write_count.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::IntegrityError {
                reason: "store unavailable".into(),
            });
        }
        Ok(())
    }
}

impl GraphStore for FlakyStore {
    fn insert_parameter(&mut self, parameter: &Parameter) -> Result<(), StorageError> {
        self.inner.insert_parameter(parameter)
    }

    fn insert_option(&mut self, option: &ParamOption) -> Result<(), StorageError> {
        self.inner.insert_option(option)
    }

    fn list_parameters(&self) -> Result<Vec<ParameterWithOptions>, StorageError> {
        self.inner.list_parameters()
    }

    fn list_dependencies(&self) -> Result<Vec<Dependency>, StorageError> {
        self.inner.list_dependencies()
    }

    fn create_dependency(&mut self, key: DependencyKey) -> Result<Dependency, StorageError> {
        self.write()?;
        self.inner.create_dependency(key)
    }

    fn delete_dependency(&mut self, key: &DependencyKey) -> Result<(), StorageError> {
        self.write()?;
        self.inner.delete_dependency(key)
    }

    fn list_node_positions(&self) -> Result<Vec<NodePosition>, StorageError> {
        if self.fail_position_reads.load(Ordering::SeqCst) {
            return Err(StorageError::IntegrityError {
                reason: "positions unavailable".into(),
            });
        }
        self.inner.list_node_positions()
    }

    fn get_node_position(&self, id: NodeId) -> Result<NodePosition, StorageError> {
        self.inner.get_node_position(id)
    }

    fn upsert_node_position(&mut self, record: &NodePosition) -> Result<(), StorageError> {
        self.write()?;
        self.inner.upsert_node_position(record)
    }

    fn update_visible_options(
        &mut self,
        id: NodeId,
        options: &[OptionId],
    ) -> Result<(), StorageError> {
        self.write()?;
        self.inner.update_visible_options(id, options)
    }

    fn delete_node_position(&mut self, id: NodeId) -> Result<(), StorageError> {
        self.write()?;
        self.inner.delete_node_position(id)
    }
}
