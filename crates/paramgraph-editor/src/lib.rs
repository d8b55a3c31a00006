//! Interaction layer of the parameter dependency-graph editor.
//!
//! [`EditorController`] turns user gestures into session-state changes and
//! store writes, and hands the render layer a freshly materialized
//! [`GraphView`](paramgraph_core::GraphView) on demand. Outcomes go to a
//! [`Notifier`]; requests for flows the editor does not own (the parameter
//! form, the visibility dialog) go to an [`IntentDispatcher`].
//!
//! # Modules
//!
//! - [`controller`]: EditorController and its operations
//! - [`error`]: EditorError wrapping core and storage failures
//! - [`intent`]: Intent enum and dispatchers
//! - [`notify`]: Notification sink trait and implementations
//! - [`viewport`]: shared viewport handle

pub mod controller;
pub mod error;
pub mod intent;
pub mod notify;
pub mod viewport;

pub use controller::EditorController;
pub use error::EditorError;
pub use intent::{ChannelDispatcher, IgnoreIntents, Intent, IntentDispatcher};
pub use notify::{ChannelNotifier, Notification, NotificationLevel, Notifier, TracingNotifier};
pub use viewport::{shared_viewport, visible_center, ViewportHandle};
