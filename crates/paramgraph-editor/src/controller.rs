//! EditorController: the single coordinator between the render layer and the
//! store.
//!
//! Every mutating operation is split in two. The synchronous prelude runs when
//! the method is called: it validates the command, updates session state
//! (tombstones, overrides, cached positions) and returns a future. The future
//! performs the store write, reports the outcome through the [`Notifier`] and
//! bumps the revision channel on success. The render layer re-materializes
//! from [`EditorController::view`] as soon as the prelude returns, so writes
//! never block a frame.
//!
//! [`EditorController::dispatch`] is the command entry point keyed by node id;
//! it runs the prelude and spawns the future on the tokio runtime.

use std::future::{self, Future};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;

use paramgraph_core::materialize::resolve_visible_options;
use paramgraph_core::{
    materialize, CoreError, Dependency, DependencyGraph, DependencyKey, EditorConfig,
    GraphSnapshot, GraphView, NodeCommand, NodeId, NodePosition, OptionId, ParameterCatalog,
    ParameterId, Position, SessionState, SourceHandle, TargetHandle,
};
use paramgraph_storage::GraphStore;

use crate::error::EditorError;
use crate::intent::{IgnoreIntents, Intent, IntentDispatcher};
use crate::notify::{Notification, Notifier, TracingNotifier};
use crate::viewport::{visible_center, ViewportHandle};

fn read_snapshot(snapshot: &RwLock<GraphSnapshot>) -> RwLockReadGuard<'_, GraphSnapshot> {
    snapshot.read().unwrap_or_else(PoisonError::into_inner)
}

fn write_snapshot(snapshot: &RwLock<GraphSnapshot>) -> RwLockWriteGuard<'_, GraphSnapshot> {
    snapshot.write().unwrap_or_else(PoisonError::into_inner)
}

/// Reports `result` and passes it through. Local rejections are warnings,
/// store failures are errors.
fn report<T>(
    notifier: &dyn Notifier,
    result: Result<T, EditorError>,
    success: &str,
    failure: &str,
) -> Result<T, EditorError> {
    match &result {
        Ok(_) => notifier.notify(Notification::success(success)),
        Err(err) if err.is_rejection() => {
            notifier.notify(Notification::warning(format!("{failure}: {err}")))
        }
        Err(err) => notifier.notify(Notification::error(format!("{failure}: {err}"))),
    }
    result
}

/// Coordinates materialization, session state and store writes for one
/// editing session.
///
/// Cloning is cheap; clones share the store, session state and caches.
pub struct EditorController<S> {
    store: Arc<Mutex<S>>,
    session: Arc<SessionState>,
    snapshot: Arc<RwLock<GraphSnapshot>>,
    config: Arc<EditorConfig>,
    notifier: Arc<dyn Notifier>,
    intents: Arc<dyn IntentDispatcher>,
    viewport: Option<ViewportHandle>,
    revision: Arc<watch::Sender<u64>>,
}

impl<S> Clone for EditorController<S> {
    fn clone(&self) -> Self {
        EditorController {
            store: Arc::clone(&self.store),
            session: Arc::clone(&self.session),
            snapshot: Arc::clone(&self.snapshot),
            config: Arc::clone(&self.config),
            notifier: Arc::clone(&self.notifier),
            intents: Arc::clone(&self.intents),
            viewport: self.viewport.clone(),
            revision: Arc::clone(&self.revision),
        }
    }
}

impl<S: GraphStore + Send + 'static> EditorController<S> {
    /// Creates a controller over `store` with a tracing notifier, no intent
    /// collaborator and no viewport. Call [`refresh`](Self::refresh) before the
    /// first [`view`](Self::view).
    pub fn new(store: S, config: EditorConfig) -> Self {
        let (revision, _) = watch::channel(0);
        EditorController {
            store: Arc::new(Mutex::new(store)),
            session: Arc::new(SessionState::new()),
            snapshot: Arc::new(RwLock::new(GraphSnapshot::default())),
            config: Arc::new(config),
            notifier: Arc::new(TracingNotifier),
            intents: Arc::new(IgnoreIntents),
            viewport: None,
            revision: Arc::new(revision),
        }
    }

    pub fn with_notifier(mut self, notifier: impl Notifier + 'static) -> Self {
        self.notifier = Arc::new(notifier);
        self
    }

    pub fn with_intents(mut self, intents: impl IntentDispatcher + 'static) -> Self {
        self.intents = Arc::new(intents);
        self
    }

    pub fn with_viewport(mut self, viewport: ViewportHandle) -> Self {
        self.viewport = Some(viewport);
        self
    }

    pub fn store(&self) -> &Arc<Mutex<S>> {
        &self.store
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// A copy of the cached records.
    pub fn snapshot(&self) -> GraphSnapshot {
        read_snapshot(&self.snapshot).clone()
    }

    /// Number of successful writes so far.
    pub fn revision(&self) -> u64 {
        *self.revision.borrow()
    }

    /// Receiver that changes after every successful write. Consumers use it to
    /// invalidate whatever they derived from the store.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// Re-fetches parameters, dependencies and node positions.
    ///
    /// A collection that fails to load keeps its previous cached value, so the
    /// canvas degrades instead of emptying.
    pub fn refresh(&self) -> impl Future<Output = ()> + Send + 'static {
        let store = Arc::clone(&self.store);
        let snapshot = Arc::clone(&self.snapshot);
        async move {
            let (parameters, dependencies, positions) = {
                let store = store.lock().await;
                (
                    store.list_parameters(),
                    store.list_dependencies(),
                    store.list_node_positions(),
                )
            };

            let mut snap = write_snapshot(&snapshot);
            match parameters {
                Ok(entries) => snap.catalog = ParameterCatalog::from_entries(entries),
                Err(err) => tracing::warn!(%err, "failed to load parameters; keeping cached catalog"),
            }
            match dependencies {
                Ok(dependencies) => snap.dependencies = dependencies,
                Err(err) => {
                    tracing::warn!(%err, "failed to load dependencies; keeping cached list")
                }
            }
            match positions {
                Ok(positions) => snap.positions = positions,
                Err(err) => {
                    tracing::warn!(%err, "failed to load node positions; keeping cached list")
                }
            }
            tracing::info!(
                parameters = snap.catalog.len(),
                dependencies = snap.dependencies.len(),
                nodes = snap.positions.len(),
                "graph refreshed"
            );
        }
    }

    /// Materializes nodes, then edges, from the cached records and session
    /// state.
    pub fn view(&self) -> GraphView {
        let snap = read_snapshot(&self.snapshot);
        materialize(&snap, &self.session, &self.config)
    }

    /// The parameter rendered by a live (cached, not tombstoned) node.
    pub fn parameter_of(&self, node: NodeId) -> Result<ParameterId, CoreError> {
        self.live_record(node).map(|record| record.parameter_id)
    }

    fn live_record(&self, node: NodeId) -> Result<NodePosition, CoreError> {
        if self.session.is_tombstoned(node) {
            return Err(CoreError::NodeNotFound { id: node });
        }
        read_snapshot(&self.snapshot)
            .position(node)
            .cloned()
            .ok_or(CoreError::NodeNotFound { id: node })
    }

    fn bump(revision: &watch::Sender<u64>) {
        revision.send_modify(|rev| *rev += 1);
    }

    // -----------------------------------------------------------------------
    // Node commands
    // -----------------------------------------------------------------------

    fn prepare_duplicate(&self, parameter_id: ParameterId) -> Result<NodePosition, CoreError> {
        let snap = read_snapshot(&self.snapshot);
        if !snap.catalog.contains(parameter_id) {
            return Err(CoreError::ParameterNotFound { id: parameter_id });
        }
        let origin = snap
            .positions
            .iter()
            .find(|p| p.parameter_id == parameter_id && !self.session.is_tombstoned(p.id));

        let at = match origin {
            Some(record) => record.position().offset(self.config.duplicate_offset),
            None => self.config.default_origin,
        };
        let visible = match origin.and_then(|record| self.session.override_for(record.id)) {
            Some(selected) => snap.catalog.restrict_to_parameter(parameter_id, &selected),
            None => snap
                .catalog
                .first_option_ids(parameter_id, self.config.duplicate_visible_options),
        };

        Ok(NodePosition {
            id: NodeId::generate(),
            parameter_id,
            x: at.x,
            y: at.y,
            visible_options: Some(visible),
        })
    }

    /// Adds another node for `parameter_id`, offset from its first node on the
    /// canvas. The node appears only once the store accepted it.
    pub fn duplicate_node(
        &self,
        parameter_id: ParameterId,
    ) -> impl Future<Output = Result<NodePosition, EditorError>> + Send + 'static {
        let prepared = self.prepare_duplicate(parameter_id);
        let store = Arc::clone(&self.store);
        let snapshot = Arc::clone(&self.snapshot);
        let notifier = Arc::clone(&self.notifier);
        let revision = Arc::clone(&self.revision);

        async move {
            let result: Result<NodePosition, EditorError> = async {
                let record = prepared?;
                store.lock().await.upsert_node_position(&record)?;
                write_snapshot(&snapshot).upsert_position(record.clone());
                Self::bump(&revision);
                tracing::info!(node = %record.id, parameter = %parameter_id, "node duplicated");
                Ok(record)
            }
            .await;
            report(&*notifier, result, "Node duplicated", "Could not duplicate node")
        }
    }

    /// Removes a node from the canvas immediately and deletes its record.
    ///
    /// The node stays hidden for the rest of the session once the delete
    /// succeeds. On failure the node and its override come back.
    pub fn delete_node(
        &self,
        node: NodeId,
    ) -> impl Future<Output = Result<(), EditorError>> + Send + 'static {
        let prepared = self.live_record(node).map(|_| {
            self.session.tombstone(node);
            self.session.take_override(node)
        });
        let store = Arc::clone(&self.store);
        let session = Arc::clone(&self.session);
        let snapshot = Arc::clone(&self.snapshot);
        let notifier = Arc::clone(&self.notifier);
        let revision = Arc::clone(&self.revision);

        async move {
            let result: Result<(), EditorError> = async {
                let previous_override = prepared?;
                let deleted = store.lock().await.delete_node_position(node);
                if let Err(err) = deleted {
                    session.revive(node);
                    if let Some(options) = previous_override {
                        session.set_override(node, options);
                    }
                    return Err(err.into());
                }
                write_snapshot(&snapshot).remove_position(node);
                Self::bump(&revision);
                tracing::info!(%node, "node deleted");
                Ok(())
            }
            .await;
            report(&*notifier, result, "Node deleted", "Could not delete node")
        }
    }

    /// Asks the parameter-management collaborator to open `node`'s parameter
    /// for editing.
    pub fn edit_node(&self, node: NodeId) -> Result<(), EditorError> {
        let parameter_id = self.parameter_of(node)?;
        let parameter = read_snapshot(&self.snapshot)
            .catalog
            .parameter(parameter_id)
            .cloned()
            .ok_or(CoreError::ParameterNotFound { id: parameter_id })?;
        self.intents.dispatch(Intent::EditParameter {
            parameter,
            is_editing: true,
        });
        Ok(())
    }

    /// Asks the collaborator to open visibility configuration. Only dependency
    /// children have anything to configure.
    pub fn configure_visibility(&self, node: NodeId) -> Result<(), EditorError> {
        let parameter_id = self.parameter_of(node)?;
        let is_child = {
            let snap = read_snapshot(&self.snapshot);
            DependencyGraph::from_dependencies(&snap.dependencies).is_child(parameter_id)
        };
        if !is_child {
            return Err(CoreError::NotADependencyChild { id: parameter_id }.into());
        }
        self.intents.dispatch(Intent::ConfigureVisibility { parameter_id });
        Ok(())
    }

    /// Commits a drag. The cached record moves at once; the write carries the
    /// node's current visible options. Dropping a tombstoned node does nothing.
    pub fn node_drag_stop(
        &self,
        node: NodeId,
        position: Position,
    ) -> impl Future<Output = Result<(), EditorError>> + Send + 'static {
        let prepared = if self.session.is_tombstoned(node) {
            Ok(None)
        } else {
            self.live_record(node).map(|record| {
                let mut snap = write_snapshot(&self.snapshot);
                let (visible, _) =
                    resolve_visible_options(&record, &snap.catalog, &self.session, &self.config);
                let moved = NodePosition {
                    id: record.write_key(),
                    x: position.x,
                    y: position.y,
                    visible_options: Some(visible),
                    ..record
                };
                snap.upsert_position(moved.clone());
                Some(moved)
            })
        };
        let store = Arc::clone(&self.store);
        let notifier = Arc::clone(&self.notifier);
        let revision = Arc::clone(&self.revision);

        async move {
            let moved = match prepared {
                Ok(Some(moved)) => Ok(moved),
                Ok(None) => {
                    tracing::debug!(%node, "drag stop on deleted node ignored");
                    return Ok(());
                }
                Err(err) => Err(EditorError::from(err)),
            };
            let result: Result<(), EditorError> = async {
                let moved = moved?;
                store.lock().await.upsert_node_position(&moved)?;
                Self::bump(&revision);
                tracing::debug!(node = %moved.id, x = moved.x, y = moved.y, "node position saved");
                Ok(())
            }
            .await;
            report(&*notifier, result, "Node position saved", "Could not save node position")
        }
    }

    /// Changes which options `node` shows. The override applies to the next
    /// [`view`](Self::view) immediately; the write follows. Options that do not
    /// belong to the node's parameter are discarded.
    pub fn visible_options_changed(
        &self,
        node: NodeId,
        options: Vec<OptionId>,
    ) -> impl Future<Output = Result<Vec<OptionId>, EditorError>> + Send + 'static {
        let prepared = self.live_record(node).map(|record| {
            let visible = read_snapshot(&self.snapshot)
                .catalog
                .restrict_to_parameter(record.parameter_id, &options);
            self.session.set_override(node, visible.clone());
            visible
        });
        let store = Arc::clone(&self.store);
        let snapshot = Arc::clone(&self.snapshot);
        let notifier = Arc::clone(&self.notifier);
        let revision = Arc::clone(&self.revision);

        async move {
            let result: Result<Vec<OptionId>, EditorError> = async {
                let visible = prepared?;
                store.lock().await.update_visible_options(node, &visible)?;
                if let Some(record) = write_snapshot(&snapshot).position_mut(node) {
                    record.visible_options = Some(visible.clone());
                }
                Self::bump(&revision);
                tracing::debug!(%node, count = visible.len(), "visible options saved");
                Ok(visible)
            }
            .await;
            report(&*notifier, result, "Visible options saved", "Could not save visible options")
        }
    }

    // -----------------------------------------------------------------------
    // Dependencies
    // -----------------------------------------------------------------------

    fn prepare_connect(&self, source: &str, target: &str) -> Result<DependencyKey, CoreError> {
        let source: SourceHandle = source.parse()?;
        let target: TargetHandle = target.parse()?;
        let parent = self.parameter_of(source.node)?;
        let child = self.parameter_of(target.node)?;
        if parent == child {
            return Err(CoreError::SelfDependency { id: parent });
        }

        let snap = read_snapshot(&self.snapshot);
        if snap.catalog.owner_of(source.option) != Some(parent) {
            return Err(CoreError::OptionNotInParameter {
                option: source.option,
                parameter: parent,
            });
        }
        if DependencyGraph::from_dependencies(&snap.dependencies).would_create_cycle(parent, child)
        {
            tracing::warn!(%parent, %child, "new dependency closes a cycle");
        }

        Ok(DependencyKey {
            parent_parameter_id: parent,
            parent_option_id: source.option,
            child_parameter_id: child,
        })
    }

    /// Creates the dependency drawn from `source_handle` to `target_handle`.
    ///
    /// Nothing is added locally; the edge appears once the dependency list has
    /// been re-read after the write.
    pub fn connect(
        &self,
        source_handle: &str,
        target_handle: &str,
    ) -> impl Future<Output = Result<Dependency, EditorError>> + Send + 'static {
        let prepared = self.prepare_connect(source_handle, target_handle);
        let store = Arc::clone(&self.store);
        let snapshot = Arc::clone(&self.snapshot);
        let notifier = Arc::clone(&self.notifier);
        let revision = Arc::clone(&self.revision);

        async move {
            let result: Result<Dependency, EditorError> = async {
                let key = prepared?;
                let (created, listed) = {
                    let mut store = store.lock().await;
                    let created = store.create_dependency(key)?;
                    (created, store.list_dependencies())
                };
                match listed {
                    Ok(dependencies) => write_snapshot(&snapshot).dependencies = dependencies,
                    Err(err) => tracing::warn!(%err, "failed to re-read dependencies"),
                }
                Self::bump(&revision);
                tracing::info!(%key, "dependency created");
                Ok(created)
            }
            .await;
            report(&*notifier, result, "Dependency created", "Could not create dependency")
        }
    }

    /// Deletes each dependency in `keys`, then re-reads the dependency list.
    ///
    /// Every key is attempted; the first failure is returned after all of them
    /// ran. An empty `keys` is a no-op: no store access and no notification.
    pub fn edges_delete(
        &self,
        keys: Vec<DependencyKey>,
    ) -> impl Future<Output = Result<(), EditorError>> + Send + 'static {
        let store = Arc::clone(&self.store);
        let snapshot = Arc::clone(&self.snapshot);
        let notifier = Arc::clone(&self.notifier);
        let revision = Arc::clone(&self.revision);

        async move {
            if keys.is_empty() {
                tracing::debug!("no dependencies to delete");
                return Ok(());
            }
            let mut first_error = None;
            let mut deleted = 0usize;
            let listed = {
                let mut store = store.lock().await;
                for key in &keys {
                    match store.delete_dependency(key) {
                        Ok(()) => {
                            deleted += 1;
                            tracing::info!(%key, "dependency deleted");
                        }
                        Err(err) => {
                            notifier.notify(Notification::error(format!(
                                "Could not delete dependency: {err}"
                            )));
                            first_error.get_or_insert(EditorError::from(err));
                        }
                    }
                }
                store.list_dependencies()
            };
            match listed {
                Ok(dependencies) => write_snapshot(&snapshot).dependencies = dependencies,
                Err(err) => tracing::warn!(%err, "failed to re-read dependencies"),
            }
            if deleted > 0 {
                Self::bump(&revision);
                let message = if deleted == 1 {
                    "Dependency deleted".to_string()
                } else {
                    format!("{deleted} dependencies deleted")
                };
                notifier.notify(Notification::success(message));
            }
            match first_error {
                Some(err) => Err(err),
                None => Ok(()),
            }
        }
    }

    // -----------------------------------------------------------------------
    // Placement
    // -----------------------------------------------------------------------

    fn prepare_place(&self, parameter_id: ParameterId) -> Result<NodePosition, CoreError> {
        let snap = read_snapshot(&self.snapshot);
        if !snap.catalog.contains(parameter_id) {
            return Err(CoreError::ParameterNotFound { id: parameter_id });
        }
        let at = match &self.viewport {
            Some(handle) => visible_center(handle),
            None => self.config.default_origin,
        };
        let canonical = NodeId::canonical(parameter_id);
        let canonical_taken =
            snap.position(canonical).is_some() || self.session.is_tombstoned(canonical);
        let mut record = NodePosition::canonical(parameter_id, at);
        if canonical_taken {
            // The canonical slot is in use (or deleted this session); place a
            // duplicate instead.
            record.id = NodeId::generate();
        }
        Ok(record)
    }

    /// Puts `parameter_id` on the canvas at the centre of the visible area.
    ///
    /// The first placement creates the canonical node; later placements create
    /// duplicates. No visible subset is saved, so the node shows its first
    /// options.
    pub fn place_parameter(
        &self,
        parameter_id: ParameterId,
    ) -> impl Future<Output = Result<NodePosition, EditorError>> + Send + 'static {
        let prepared = self.prepare_place(parameter_id);
        let store = Arc::clone(&self.store);
        let snapshot = Arc::clone(&self.snapshot);
        let notifier = Arc::clone(&self.notifier);
        let revision = Arc::clone(&self.revision);

        async move {
            let result: Result<NodePosition, EditorError> = async {
                let record = prepared?;
                store.lock().await.upsert_node_position(&record)?;
                write_snapshot(&snapshot).upsert_position(record.clone());
                Self::bump(&revision);
                tracing::info!(node = %record.id, parameter = %parameter_id, "parameter placed");
                Ok(record)
            }
            .await;
            report(&*notifier, result, "Parameter placed", "Could not place parameter")
        }
    }

    // -----------------------------------------------------------------------
    // Dispatch
    // -----------------------------------------------------------------------

    /// Runs `command` against the node it names. The synchronous part happens
    /// before this returns; the write runs on the tokio runtime.
    ///
    /// Must be called from within a tokio runtime.
    pub fn dispatch(&self, command: NodeCommand) -> JoinHandle<Result<(), EditorError>> {
        tracing::debug!(node = %command.node(), kind = ?command.kind(), "dispatching node command");
        match command {
            NodeCommand::Duplicate { node } => match self.parameter_of(node) {
                Ok(parameter_id) => {
                    let write = self.duplicate_node(parameter_id);
                    tokio::spawn(async move { write.await.map(|_| ()) })
                }
                Err(err) => self.reject("Could not duplicate node", err),
            },
            NodeCommand::Edit { node } => tokio::spawn(future::ready(self.edit_node(node))),
            NodeCommand::Delete { node } => tokio::spawn(self.delete_node(node)),
            NodeCommand::ConfigureVisibility { node } => {
                tokio::spawn(future::ready(self.configure_visibility(node)))
            }
            NodeCommand::VisibleOptionsChanged { node, options } => {
                let write = self.visible_options_changed(node, options);
                tokio::spawn(async move { write.await.map(|_| ()) })
            }
            NodeCommand::DragStop { node, position } => {
                tokio::spawn(self.node_drag_stop(node, position))
            }
        }
    }

    fn reject(&self, failure: &str, err: CoreError) -> JoinHandle<Result<(), EditorError>> {
        let result = report(&*self.notifier, Err(err.into()), "", failure);
        tokio::spawn(future::ready(result))
    }
}
