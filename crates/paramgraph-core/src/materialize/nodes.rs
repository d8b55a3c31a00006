//! Node materialization: node-position records to renderable nodes.

use serde::Serialize;

use crate::analysis::DependencyGraph;
use crate::catalog::ParameterCatalog;
use crate::command::NodeCommandKind;
use crate::config::EditorConfig;
use crate::handle::{SourceHandle, TargetHandle};
use crate::id::{NodeId, OptionId};
use crate::records::{NodePosition, ParamOption, Parameter, Position};
use crate::session::SessionState;

/// Where a node's visible-option subset came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VisibleSource {
    /// Session override, not yet confirmed or already confirmed by a write.
    Override,
    /// Value saved on the node-position record.
    Persisted,
    /// Nothing saved yet; the first options of the parameter.
    Default,
}

/// A renderable on-canvas instance of a parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    pub id: NodeId,
    pub parameter: Parameter,
    pub options: Vec<ParamOption>,
    pub position: Position,
    pub visible_options: Vec<OptionId>,
    pub visible_source: VisibleSource,
    pub is_canonical: bool,
    pub commands: Vec<NodeCommandKind>,
}

impl Node {
    pub fn supports(&self, kind: NodeCommandKind) -> bool {
        self.commands.contains(&kind)
    }

    pub fn shows_option(&self, option: OptionId) -> bool {
        self.visible_options.contains(&option)
    }

    pub fn source_handle(&self, option: OptionId) -> SourceHandle {
        SourceHandle {
            node: self.id,
            option,
        }
    }

    pub fn target_handle(&self) -> TargetHandle {
        TargetHandle { node: self.id }
    }
}

/// Resolves the visible-option subset of one record: session override, then
/// the persisted value, then the first `initial_visible_options` options.
/// The result only ever contains options of the record's parameter.
pub fn resolve_visible_options(
    record: &NodePosition,
    catalog: &ParameterCatalog,
    session: &SessionState,
    config: &EditorConfig,
) -> (Vec<OptionId>, VisibleSource) {
    if let Some(selected) = session.override_for(record.id) {
        let visible = catalog.restrict_to_parameter(record.parameter_id, &selected);
        return (visible, VisibleSource::Override);
    }
    if let Some(saved) = &record.visible_options {
        let visible = catalog.restrict_to_parameter(record.parameter_id, saved);
        return (visible, VisibleSource::Persisted);
    }
    (
        catalog.first_option_ids(record.parameter_id, config.initial_visible_options),
        VisibleSource::Default,
    )
}

/// Builds the node list in record order.
///
/// Tombstoned records are dropped. Records whose parameter is missing from the
/// catalog are skipped with a warning.
pub fn materialize_nodes(
    positions: &[NodePosition],
    catalog: &ParameterCatalog,
    dependencies: &DependencyGraph,
    session: &SessionState,
    config: &EditorConfig,
) -> Vec<Node> {
    let mut nodes = Vec::with_capacity(positions.len());

    for record in positions {
        if session.is_tombstoned(record.id) {
            continue;
        }
        let Some(entry) = catalog.get(record.parameter_id) else {
            tracing::warn!(
                node = %record.id,
                parameter = %record.parameter_id,
                "node position references a missing parameter; skipping"
            );
            continue;
        };

        let (visible_options, visible_source) =
            resolve_visible_options(record, catalog, session, config);

        let mut commands = vec![
            NodeCommandKind::Duplicate,
            NodeCommandKind::Edit,
            NodeCommandKind::Delete,
            NodeCommandKind::ChangeVisibleOptions,
            NodeCommandKind::Move,
        ];
        if dependencies.is_child(record.parameter_id) {
            commands.push(NodeCommandKind::ConfigureVisibility);
        }

        nodes.push(Node {
            id: record.id,
            parameter: entry.parameter.clone(),
            options: entry.options.clone(),
            position: record.position(),
            visible_options,
            visible_source,
            is_canonical: record.is_canonical(),
            commands,
        });
    }

    nodes
}
