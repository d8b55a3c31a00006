//! Core error types for paramgraph-core.
//!
//! Uses `thiserror` for structured, matchable error variants covering the
//! failure modes of handle decoding and dependency validation.

use crate::id::{NodeId, OptionId, ParameterId};
use thiserror::Error;

/// Core errors produced by the paramgraph-core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A string could not be parsed as an id.
    #[error("invalid id: '{value}'")]
    InvalidId { value: String },

    /// A handle id did not have the `<nodeId>-<suffix>` shape.
    #[error("invalid handle id: '{handle}'")]
    InvalidHandle { handle: String },

    /// A node id is not present on the canvas.
    #[error("node not found: NodeId({id})")]
    NodeNotFound { id: NodeId },

    /// A parameter id is not present in the catalog.
    #[error("parameter not found: ParameterId({id})")]
    ParameterNotFound { id: ParameterId },

    /// A dependency would connect a parameter to itself.
    #[error("a parameter cannot depend on itself: ParameterId({id})")]
    SelfDependency { id: ParameterId },

    /// An option was used with a parameter that does not own it.
    #[error("option {option} does not belong to parameter {parameter}")]
    OptionNotInParameter {
        option: OptionId,
        parameter: ParameterId,
    },

    /// Visibility configuration was requested for a parameter nothing depends on.
    #[error("parameter {id} is not the child of any dependency")]
    NotADependencyChild { id: ParameterId },

    /// A configuration value is out of range.
    #[error("invalid config: {field} {reason}")]
    InvalidConfig { field: &'static str, reason: String },
}
