//! Data model and pure view derivation for the parameter dependency editor.
//!
//! Parameters own options; dependencies say "when this option of the parent is
//! active, the child becomes relevant". Node positions place parameters on a
//! canvas, possibly several times. This crate turns those records plus
//! session-local state into renderable nodes and edges, and owns the viewport
//! math. It performs no I/O.
//!
//! # Modules
//!
//! - [`id`]: UUID newtypes for every entity
//! - [`records`]: persisted record shapes
//! - [`catalog`], [`snapshot`]: indexed read models
//! - [`session`]: tombstones and visible-option overrides
//! - [`materialize`]: node and edge materializers
//! - [`handle`]: connection handle-id codec
//! - [`analysis`]: parameter-level dependency graph
//! - [`viewport`]: pan/zoom controller

pub mod analysis;
pub mod catalog;
pub mod command;
pub mod config;
pub mod error;
pub mod handle;
pub mod id;
pub mod materialize;
pub mod records;
pub mod session;
pub mod snapshot;
pub mod viewport;

// Re-export commonly used types
pub use analysis::DependencyGraph;
pub use catalog::ParameterCatalog;
pub use command::{NodeCommand, NodeCommandKind};
pub use config::{EditorConfig, SourceSelection, ViewportConfig};
pub use error::CoreError;
pub use handle::{SourceHandle, TargetHandle};
pub use id::{DependencyId, NodeId, OptionId, ParameterId};
pub use materialize::{materialize, Edge, GraphView, Node, VisibleSource};
pub use records::{
    Dependency, DependencyKey, NodePosition, ParamOption, Parameter, ParameterWithOptions,
    Position,
};
pub use session::SessionState;
pub use snapshot::GraphSnapshot;
pub use viewport::{PointerButton, SelectionRect, Viewport, ViewportController};
