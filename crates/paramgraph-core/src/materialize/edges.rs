//! Edge materialization: dependency rows to renderable edges.
//!
//! A dependency renders only when a node of the parent parameter currently
//! shows the parent option, and a node of the child parameter exists.
//! Dependencies that cannot be placed are dropped without error.

use serde::Serialize;

use crate::config::SourceSelection;
use crate::handle::{SourceHandle, TargetHandle};
use crate::id::{DependencyId, NodeId};
use crate::records::{Dependency, DependencyKey};

use super::nodes::Node;

/// A renderable dependency edge between two node instances.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Edge {
    pub key: DependencyKey,
    pub dependency_id: DependencyId,
    pub source: NodeId,
    pub target: NodeId,
    pub source_handle: String,
    pub target_handle: String,
    /// More than one node could have served as the source.
    pub ambiguous_source: bool,
}

impl Edge {
    /// Stable edge identity, derived from the dependency triple.
    pub fn id(&self) -> String {
        self.key.to_string()
    }
}

fn select_source<'a>(
    candidates: &[&'a Node],
    selection: SourceSelection,
) -> Option<&'a Node> {
    match selection {
        SourceSelection::ListOrder => candidates.first().copied(),
        SourceSelection::CanonicalFirst => candidates
            .iter()
            .find(|n| n.is_canonical)
            .or_else(|| candidates.iter().min_by_key(|n| n.id))
            .copied(),
    }
}

/// Builds the edge list in dependency order.
pub fn materialize_edges(
    dependencies: &[Dependency],
    nodes: &[Node],
    selection: SourceSelection,
) -> Vec<Edge> {
    let mut edges = Vec::with_capacity(dependencies.len());

    for dep in dependencies {
        let candidates: Vec<&Node> = nodes
            .iter()
            .filter(|n| {
                n.parameter.id == dep.parent_parameter_id && n.shows_option(dep.parent_option_id)
            })
            .collect();
        let Some(source) = select_source(&candidates, selection) else {
            tracing::trace!(dependency = %dep.id, "no node shows the parent option; edge hidden");
            continue;
        };
        let Some(target) = nodes.iter().find(|n| n.parameter.id == dep.child_parameter_id) else {
            tracing::trace!(dependency = %dep.id, "child parameter has no node; edge hidden");
            continue;
        };

        edges.push(Edge {
            key: dep.key(),
            dependency_id: dep.id,
            source: source.id,
            target: target.id,
            source_handle: SourceHandle {
                node: source.id,
                option: dep.parent_option_id,
            }
            .to_string(),
            target_handle: TargetHandle { node: target.id }.to_string(),
            ambiguous_source: candidates.len() > 1,
        });
    }

    edges
}
