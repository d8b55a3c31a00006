//! Parameter-level view of the dependency rows.
//!
//! Collapses dependencies to parent → child parameter edges (options are
//! ignored) so the editor can ask structural questions: is a parameter a
//! dependency child, and would a new dependency close a cycle.

use petgraph::algo::has_path_connecting;
use petgraph::graphmap::DiGraphMap;

use crate::id::ParameterId;
use crate::records::Dependency;

/// Directed parameter graph built from dependency rows.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    graph: DiGraphMap<ParameterId, usize>,
}

impl DependencyGraph {
    /// Builds the graph. Edge weights count how many option-level
    /// dependencies link the same two parameters.
    pub fn from_dependencies<'a>(dependencies: impl IntoIterator<Item = &'a Dependency>) -> Self {
        let mut graph = DiGraphMap::new();
        for dep in dependencies {
            let from = dep.parent_parameter_id;
            let to = dep.child_parameter_id;
            match graph.edge_weight_mut(from, to) {
                Some(count) => *count += 1,
                None => {
                    graph.add_edge(from, to, 1);
                }
            }
        }
        DependencyGraph { graph }
    }

    /// Returns true if some dependency has `parameter` as its child.
    pub fn is_child(&self, parameter: ParameterId) -> bool {
        self.graph.contains_node(parameter)
            && self
                .graph
                .neighbors_directed(parameter, petgraph::Direction::Incoming)
                .next()
                .is_some()
    }

    /// Returns true if adding `parent → child` would create a cycle.
    pub fn would_create_cycle(&self, parent: ParameterId, child: ParameterId) -> bool {
        if parent == child {
            return true;
        }
        if !self.graph.contains_node(parent) || !self.graph.contains_node(child) {
            return false;
        }
        has_path_connecting(&self.graph, child, parent, None)
    }
}
