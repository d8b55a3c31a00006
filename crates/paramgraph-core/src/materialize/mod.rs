//! Pure view derivation.
//!
//! Nodes and edges are rebuilt from scratch on every pass from the snapshot
//! plus session state; nothing here is mutated in place. Nodes are
//! materialized first, then edges are resolved against the node list.

pub mod edges;
pub mod nodes;

use serde::Serialize;

use crate::analysis::DependencyGraph;
use crate::config::EditorConfig;
use crate::id::NodeId;
use crate::session::SessionState;
use crate::snapshot::GraphSnapshot;

pub use edges::{materialize_edges, Edge};
pub use nodes::{materialize_nodes, resolve_visible_options, Node, VisibleSource};

/// Everything the canvas draws for one frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GraphView {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl GraphView {
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }
}

/// Runs both materializers over `snapshot`.
pub fn materialize(
    snapshot: &GraphSnapshot,
    session: &SessionState,
    config: &EditorConfig,
) -> GraphView {
    let dependency_graph = DependencyGraph::from_dependencies(&snapshot.dependencies);
    let nodes = materialize_nodes(
        &snapshot.positions,
        &snapshot.catalog,
        &dependency_graph,
        session,
        config,
    );
    let edges = materialize_edges(&snapshot.dependencies, &nodes, config.source_selection);
    GraphView { nodes, edges }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ParameterCatalog;
    use crate::id::{DependencyId, OptionId, ParameterId};
    use crate::records::{Dependency, NodePosition, ParamOption, Parameter, ParameterWithOptions};
    use proptest::prelude::*;

    const PARAMS: usize = 4;
    const OPTIONS: usize = 3;

    fn fixed_catalog() -> (Vec<ParameterWithOptions>, ParameterCatalog) {
        let entries: Vec<ParameterWithOptions> = (0..PARAMS)
            .map(|p| {
                let id = ParameterId::generate();
                ParameterWithOptions {
                    parameter: Parameter {
                        id,
                        slug: format!("p{p}"),
                        label: format!("P{p}"),
                    },
                    options: (0..OPTIONS)
                        .map(|o| ParamOption {
                            id: OptionId::generate(),
                            parameter_id: id,
                            label: format!("o{o}"),
                            position: o as u32,
                        })
                        .collect(),
                }
            })
            .collect();
        let catalog = ParameterCatalog::from_entries(entries.clone());
        (entries, catalog)
    }

    prop_compose! {
        // (parameter index, is canonical, visible option mask)
        fn arb_records()(records in prop::collection::vec((0..PARAMS, any::<bool>(), 0u8..8), 0..8)) -> Vec<(usize, bool, u8)> {
            records
        }
    }

    prop_compose! {
        // (parent index, option index, child index)
        fn arb_deps()(deps in prop::collection::vec((0..PARAMS, 0..OPTIONS, 0..PARAMS), 0..8)) -> Vec<(usize, usize, usize)> {
            deps
        }
    }

    fn build_snapshot(
        entries: &[ParameterWithOptions],
        catalog: ParameterCatalog,
        records: &[(usize, bool, u8)],
        deps: &[(usize, usize, usize)],
    ) -> GraphSnapshot {
        let mut positions: Vec<NodePosition> = Vec::new();
        for (p, canonical, mask) in records {
            let entry = &entries[*p];
            let id = if *canonical {
                NodeId::canonical(entry.parameter.id)
            } else {
                NodeId::generate()
            };
            if positions.iter().any(|r| r.id == id) {
                continue;
            }
            let visible = entry
                .options
                .iter()
                .enumerate()
                .filter(|(i, _)| (*mask >> i) & 1 == 1)
                .map(|(_, o)| o.id)
                .collect();
            positions.push(NodePosition {
                id,
                parameter_id: entry.parameter.id,
                x: 0.0,
                y: 0.0,
                visible_options: Some(visible),
            });
        }
        let dependencies = deps
            .iter()
            .filter(|(parent, _, child)| parent != child)
            .map(|(parent, option, child)| Dependency {
                id: DependencyId::generate(),
                parent_parameter_id: entries[*parent].parameter.id,
                parent_option_id: entries[*parent].options[*option].id,
                child_parameter_id: entries[*child].parameter.id,
            })
            .collect();
        GraphSnapshot {
            catalog,
            dependencies,
            positions,
        }
    }

    proptest! {
        #[test]
        fn edge_renders_iff_both_ends_exist(records in arb_records(), deps in arb_deps()) {
            let (entries, catalog) = fixed_catalog();
            let snapshot = build_snapshot(&entries, catalog, &records, &deps);
            let view = materialize(&snapshot, &SessionState::new(), &EditorConfig::default());

            for dep in &snapshot.dependencies {
                let has_source = view.nodes.iter().any(|n| {
                    n.parameter.id == dep.parent_parameter_id && n.shows_option(dep.parent_option_id)
                });
                let has_target = view.nodes.iter().any(|n| n.parameter.id == dep.child_parameter_id);
                let rendered = view.edges.iter().any(|e| e.dependency_id == dep.id);
                prop_assert_eq!(rendered, has_source && has_target);
            }
        }

        #[test]
        fn materialization_is_deterministic(records in arb_records(), deps in arb_deps()) {
            let (entries, catalog) = fixed_catalog();
            let snapshot = build_snapshot(&entries, catalog, &records, &deps);
            let session = SessionState::new();
            let config = EditorConfig::default();
            let first = materialize(&snapshot, &session, &config);
            let second = materialize(&snapshot, &session, &config);
            prop_assert_eq!(first, second);
        }
    }
}
