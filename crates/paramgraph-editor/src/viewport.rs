//! Shared access to the canvas viewport.
//!
//! The render layer owns pointer and wheel handling on the
//! [`ViewportController`]; the editor only reads from it (for example to
//! place a new node at the visible centre). Both hold the same handle.

use std::sync::{Arc, PoisonError, RwLock};

use paramgraph_core::{Position, ViewportConfig, ViewportController};

/// Viewport shared between the render layer and the editor.
pub type ViewportHandle = Arc<RwLock<ViewportController>>;

/// Creates a handle around a fresh controller.
pub fn shared_viewport(config: ViewportConfig) -> ViewportHandle {
    Arc::new(RwLock::new(ViewportController::new(config)))
}

/// World coordinates at the centre of the canvas.
pub fn visible_center(handle: &ViewportHandle) -> Position {
    handle
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .visible_center()
}
