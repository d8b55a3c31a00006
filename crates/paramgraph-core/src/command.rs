//! Per-node commands.
//!
//! Nodes do not carry callbacks. They advertise which [`NodeCommandKind`]s
//! apply to them, and the render layer sends a [`NodeCommand`] keyed by node
//! id to the editor controller.

use serde::{Deserialize, Serialize};

use crate::id::{NodeId, OptionId};
use crate::records::Position;

/// Which interactions a node supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeCommandKind {
    Duplicate,
    Edit,
    Delete,
    ConfigureVisibility,
    ChangeVisibleOptions,
    Move,
}

/// A user gesture targeting one node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeCommand {
    Duplicate { node: NodeId },
    Edit { node: NodeId },
    Delete { node: NodeId },
    ConfigureVisibility { node: NodeId },
    VisibleOptionsChanged { node: NodeId, options: Vec<OptionId> },
    DragStop { node: NodeId, position: Position },
}

impl NodeCommand {
    pub fn node(&self) -> NodeId {
        match self {
            NodeCommand::Duplicate { node }
            | NodeCommand::Edit { node }
            | NodeCommand::Delete { node }
            | NodeCommand::ConfigureVisibility { node }
            | NodeCommand::VisibleOptionsChanged { node, .. }
            | NodeCommand::DragStop { node, .. } => *node,
        }
    }

    pub fn kind(&self) -> NodeCommandKind {
        match self {
            NodeCommand::Duplicate { .. } => NodeCommandKind::Duplicate,
            NodeCommand::Edit { .. } => NodeCommandKind::Edit,
            NodeCommand::Delete { .. } => NodeCommandKind::Delete,
            NodeCommand::ConfigureVisibility { .. } => NodeCommandKind::ConfigureVisibility,
            NodeCommand::VisibleOptionsChanged { .. } => NodeCommandKind::ChangeVisibleOptions,
            NodeCommand::DragStop { .. } => NodeCommandKind::Move,
        }
    }
}
