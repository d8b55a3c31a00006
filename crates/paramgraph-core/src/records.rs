//! Persisted record shapes: parameters, options, dependencies, and node
//! positions.
//!
//! These are plain data. Validation of cross-record invariants happens in the
//! [`catalog`](crate::catalog) and the materializers, which tolerate dangling
//! references by omission rather than failing.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::id::{DependencyId, NodeId, OptionId, ParameterId};

/// A named, option-based selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub id: ParameterId,
    pub slug: String,
    pub label: String,
}

/// One selectable value of a parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamOption {
    pub id: OptionId,
    pub parameter_id: ParameterId,
    pub label: String,
    /// Display order within the owning parameter.
    #[serde(default)]
    pub position: u32,
}

/// A parameter together with its options in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterWithOptions {
    pub parameter: Parameter,
    pub options: Vec<ParamOption>,
}

impl ParameterWithOptions {
    /// Option ids in display order.
    pub fn option_ids(&self) -> impl Iterator<Item = OptionId> + '_ {
        self.options.iter().map(|o| o.id)
    }

    /// Returns true if `option` belongs to this parameter.
    pub fn owns_option(&self, option: OptionId) -> bool {
        self.options.iter().any(|o| o.id == option)
    }
}

/// The identity triple of a dependency.
///
/// Unique across the store, and stable across re-materializations, so it
/// doubles as the edge identity on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DependencyKey {
    pub parent_parameter_id: ParameterId,
    pub parent_option_id: OptionId,
    pub child_parameter_id: ParameterId,
}

impl fmt::Display for DependencyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}-{}",
            self.parent_parameter_id, self.parent_option_id, self.child_parameter_id
        )
    }
}

/// "When the parent's option is active, the child becomes relevant."
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    pub id: DependencyId,
    pub parent_parameter_id: ParameterId,
    pub parent_option_id: OptionId,
    pub child_parameter_id: ParameterId,
}

impl Dependency {
    pub fn key(&self) -> DependencyKey {
        DependencyKey {
            parent_parameter_id: self.parent_parameter_id,
            parent_option_id: self.parent_option_id,
            child_parameter_id: self.child_parameter_id,
        }
    }

    pub fn from_key(id: DependencyId, key: DependencyKey) -> Self {
        Dependency {
            id,
            parent_parameter_id: key.parent_parameter_id,
            parent_option_id: key.parent_option_id,
            child_parameter_id: key.child_parameter_id,
        }
    }
}

/// A canvas coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Position { x, y }
    }

    pub fn offset(self, by: Position) -> Self {
        Position {
            x: self.x + by.x,
            y: self.y + by.y,
        }
    }
}

/// Persisted layout of one on-canvas node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodePosition {
    pub id: NodeId,
    pub parameter_id: ParameterId,
    pub x: f64,
    pub y: f64,
    /// `None` until a visible-option subset has been saved for this node.
    pub visible_options: Option<Vec<OptionId>>,
}

impl NodePosition {
    /// A canonical record (id equals the parameter id) with no saved visibility.
    pub fn canonical(parameter_id: ParameterId, at: Position) -> Self {
        NodePosition {
            id: NodeId::canonical(parameter_id),
            parameter_id,
            x: at.x,
            y: at.y,
            visible_options: None,
        }
    }

    pub fn is_canonical(&self) -> bool {
        self.id.is_canonical_for(self.parameter_id)
    }

    pub fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }

    /// The key a position write uses: the parameter id for canonical nodes,
    /// the node's own id for duplicates. Both coincide as UUIDs.
    pub fn write_key(&self) -> NodeId {
        if self.is_canonical() {
            NodeId::canonical(self.parameter_id)
        } else {
            self.id
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dependency_key_display_joins_the_triple() {
        let key = DependencyKey {
            parent_parameter_id: ParameterId::generate(),
            parent_option_id: OptionId::generate(),
            child_parameter_id: ParameterId::generate(),
        };
        let rendered = key.to_string();
        assert!(rendered.starts_with(&key.parent_parameter_id.to_string()));
        assert!(rendered.ends_with(&key.child_parameter_id.to_string()));
        assert_eq!(rendered.len(), 36 * 3 + 2);
    }

    #[test]
    fn canonical_record_is_detected() {
        let param = ParameterId::generate();
        let canonical = NodePosition::canonical(param, Position::default());
        assert!(canonical.is_canonical());

        let duplicate = NodePosition {
            id: NodeId::generate(),
            ..canonical.clone()
        };
        assert!(!duplicate.is_canonical());
        assert_eq!(duplicate.write_key(), duplicate.id);
        assert_eq!(canonical.write_key(), NodeId::canonical(param));
    }

    #[test]
    fn option_order_is_preserved() {
        let param = ParameterId::generate();
        let options: Vec<ParamOption> = (0..3)
            .map(|i| ParamOption {
                id: OptionId::generate(),
                parameter_id: param,
                label: format!("o{i}"),
                position: i,
            })
            .collect();
        let entry = ParameterWithOptions {
            parameter: Parameter {
                id: param,
                slug: "p".into(),
                label: "P".into(),
            },
            options: options.clone(),
        };
        let ids: Vec<OptionId> = entry.option_ids().collect();
        assert_eq!(ids, options.iter().map(|o| o.id).collect::<Vec<_>>());
        assert!(entry.owns_option(options[1].id));
        assert!(!entry.owns_option(OptionId::generate()));
    }
}
