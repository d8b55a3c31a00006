//! Canvas pan/zoom state and pointer handling.
//!
//! Screen coordinates relate to world (canvas) coordinates by
//! `screen = world * zoom + offset`. Primary-button drags draw a selection
//! rectangle; panning is bound to the middle button instead of the default
//! drag. Zoom is always clamped to the configured bounds.

use serde::{Deserialize, Serialize};

use crate::config::ViewportConfig;
use crate::records::Position;

/// Pan offset and zoom factor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub x: f64,
    pub y: f64,
    pub zoom: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Viewport {
            x: 0.0,
            y: 0.0,
            zoom: 1.0,
        }
    }
}

impl Viewport {
    pub fn screen_to_world(&self, screen: Position) -> Position {
        Position::new((screen.x - self.x) / self.zoom, (screen.y - self.y) / self.zoom)
    }

    pub fn world_to_screen(&self, world: Position) -> Position {
        Position::new(world.x * self.zoom + self.x, world.y * self.zoom + self.y)
    }
}

/// Mouse buttons the canvas distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Middle,
    Secondary,
}

/// A rubber-band selection in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionRect {
    pub origin: Position,
    pub corner: Position,
}

impl SelectionRect {
    /// Normalized `(min, max)` corners in world coordinates.
    pub fn world_bounds(&self, viewport: &Viewport) -> (Position, Position) {
        let a = viewport.screen_to_world(self.origin);
        let b = viewport.screen_to_world(self.corner);
        (
            Position::new(a.x.min(b.x), a.y.min(b.y)),
            Position::new(a.x.max(b.x), a.y.max(b.y)),
        )
    }

    pub fn contains_world(&self, viewport: &Viewport, point: Position) -> bool {
        let (min, max) = self.world_bounds(viewport);
        point.x >= min.x && point.x <= max.x && point.y >= min.y && point.y <= max.y
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Gesture {
    Idle,
    Panning { last: Position },
    Selecting(SelectionRect),
}

/// Owns the viewport and turns pointer/wheel input into viewport changes.
#[derive(Debug, Clone)]
pub struct ViewportController {
    viewport: Viewport,
    width: f64,
    height: f64,
    config: ViewportConfig,
    gesture: Gesture,
}

impl ViewportController {
    /// Unusable zoom bounds are normalized, so zooming never panics.
    pub fn new(config: ViewportConfig) -> Self {
        if let Err(err) = config.validate() {
            tracing::warn!(%err, "viewport config normalized");
        }
        let config = config.normalized();
        ViewportController {
            viewport: Viewport::default(),
            width: 0.0,
            height: 0.0,
            config,
            gesture: Gesture::Idle,
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = Viewport {
            zoom: self.clamp_zoom(viewport.zoom),
            ..viewport
        };
    }

    /// Records the canvas size in screen pixels.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width.max(0.0);
        self.height = height.max(0.0);
    }

    fn clamp_zoom(&self, zoom: f64) -> f64 {
        zoom.clamp(self.config.min_zoom, self.config.max_zoom)
    }

    /// Starts a gesture. Returns true if the canvas consumed the press.
    pub fn pointer_down(&mut self, button: PointerButton, at: Position) -> bool {
        match button {
            PointerButton::Middle => {
                self.gesture = Gesture::Panning { last: at };
                true
            }
            PointerButton::Primary => {
                self.gesture = Gesture::Selecting(SelectionRect {
                    origin: at,
                    corner: at,
                });
                true
            }
            PointerButton::Secondary => false,
        }
    }

    pub fn pointer_move(&mut self, at: Position) {
        match self.gesture {
            Gesture::Panning { last } => {
                self.gesture = Gesture::Panning { last: at };
                self.pan_by(at.x - last.x, at.y - last.y);
            }
            Gesture::Selecting(rect) => {
                self.gesture = Gesture::Selecting(SelectionRect { corner: at, ..rect });
            }
            Gesture::Idle => {}
        }
    }

    /// Ends the gesture started by `button`, returning the finished selection
    /// if a rubber band was being drawn.
    pub fn pointer_up(&mut self, button: PointerButton) -> Option<SelectionRect> {
        let finished = match (button, self.gesture) {
            (PointerButton::Middle, Gesture::Panning { .. }) => None,
            (PointerButton::Primary, Gesture::Selecting(rect)) => Some(rect),
            _ => return None,
        };
        self.gesture = Gesture::Idle;
        finished
    }

    pub fn is_panning(&self) -> bool {
        matches!(self.gesture, Gesture::Panning { .. })
    }

    /// The selection currently being drawn.
    pub fn selection(&self) -> Option<SelectionRect> {
        match self.gesture {
            Gesture::Selecting(rect) => Some(rect),
            _ => None,
        }
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.viewport.x += dx;
        self.viewport.y += dy;
    }

    /// Zooms to `zoom`, keeping the world point under `anchor` fixed on screen.
    pub fn zoom_to(&mut self, zoom: f64, anchor: Position) {
        let before = self.viewport.screen_to_world(anchor);
        let zoom = self.clamp_zoom(zoom);
        self.viewport = Viewport {
            x: anchor.x - before.x * zoom,
            y: anchor.y - before.y * zoom,
            zoom,
        };
    }

    /// Wheel input; positive `notches` zoom in.
    pub fn wheel(&mut self, notches: f64, anchor: Position) {
        let factor = self.config.wheel_step.powf(notches);
        self.zoom_to(self.viewport.zoom * factor, anchor);
    }

    /// Pinch input; `scale` is the ratio of finger distances since the last event.
    pub fn pinch(&mut self, scale: f64, anchor: Position) {
        if scale > 0.0 {
            self.zoom_to(self.viewport.zoom * scale, anchor);
        }
    }

    /// World coordinates at the centre of the canvas. New nodes are placed
    /// here so they land in view.
    pub fn visible_center(&self) -> Position {
        self.viewport
            .screen_to_world(Position::new(self.width / 2.0, self.height / 2.0))
    }

    /// Pans so that `world` sits at the centre of the canvas.
    pub fn center_on(&mut self, world: Position) {
        self.viewport.x = self.width / 2.0 - world.x * self.viewport.zoom;
        self.viewport.y = self.height / 2.0 - world.y * self.viewport.zoom;
    }

    /// Frames all `points` with `padding` screen pixels on every side.
    pub fn fit_bounds(&mut self, points: &[Position], padding: f64) {
        let Some(first) = points.first() else {
            return;
        };
        let (mut min, mut max) = (*first, *first);
        for p in points {
            min = Position::new(min.x.min(p.x), min.y.min(p.y));
            max = Position::new(max.x.max(p.x), max.y.max(p.y));
        }
        let avail_w = (self.width - 2.0 * padding).max(1.0);
        let avail_h = (self.height - 2.0 * padding).max(1.0);
        let span_w = (max.x - min.x).max(1.0);
        let span_h = (max.y - min.y).max(1.0);
        let zoom = self.clamp_zoom((avail_w / span_w).min(avail_h / span_h));
        let center = Position::new((min.x + max.x) / 2.0, (min.y + max.y) / 2.0);
        self.viewport = Viewport {
            x: self.width / 2.0 - center.x * zoom,
            y: self.height / 2.0 - center.y * zoom,
            zoom,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> ViewportController {
        let mut c = ViewportController::new(ViewportConfig::default());
        c.resize(800.0, 600.0);
        c
    }

    fn close(a: Position, b: Position) -> bool {
        (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9
    }

    #[test]
    fn middle_drag_pans() {
        let mut c = controller();
        assert!(c.pointer_down(PointerButton::Middle, Position::new(100.0, 100.0)));
        c.pointer_move(Position::new(130.0, 90.0));
        c.pointer_move(Position::new(150.0, 80.0));
        assert!(c.is_panning());
        assert_eq!(c.pointer_up(PointerButton::Middle), None);
        assert!(!c.is_panning());
        assert_eq!(c.viewport().x, 50.0);
        assert_eq!(c.viewport().y, -20.0);
    }

    #[test]
    fn primary_drag_selects_without_panning() {
        let mut c = controller();
        c.pointer_down(PointerButton::Primary, Position::new(10.0, 10.0));
        c.pointer_move(Position::new(60.0, 40.0));
        let rect = c.pointer_up(PointerButton::Primary).unwrap();
        assert_eq!(rect.corner, Position::new(60.0, 40.0));
        assert_eq!(c.viewport(), Viewport::default());
        assert!(rect.contains_world(&c.viewport(), Position::new(30.0, 20.0)));
    }

    #[test]
    fn zoom_is_clamped() {
        let mut c = controller();
        c.zoom_to(100.0, Position::default());
        assert_eq!(c.viewport().zoom, ViewportConfig::default().max_zoom);
        c.zoom_to(0.0001, Position::default());
        assert_eq!(c.viewport().zoom, ViewportConfig::default().min_zoom);
    }

    #[test]
    fn zoom_keeps_anchor_fixed() {
        let mut c = controller();
        c.pan_by(40.0, -10.0);
        let anchor = Position::new(300.0, 200.0);
        let world_before = c.viewport().screen_to_world(anchor);
        c.wheel(2.0, anchor);
        let world_after = c.viewport().screen_to_world(anchor);
        assert!(close(world_before, world_after));
        assert!(c.viewport().zoom > 1.0);
    }

    #[test]
    fn visible_center_tracks_pan_and_zoom() {
        let mut c = controller();
        assert!(close(c.visible_center(), Position::new(400.0, 300.0)));
        c.pan_by(-400.0, -300.0);
        assert!(close(c.visible_center(), Position::new(800.0, 600.0)));
        c.set_viewport(Viewport {
            x: 0.0,
            y: 0.0,
            zoom: 2.0,
        });
        assert!(close(c.visible_center(), Position::new(200.0, 150.0)));
    }

    #[test]
    fn center_on_moves_the_visible_center() {
        let mut c = controller();
        c.zoom_to(1.5, Position::new(10.0, 10.0));
        c.center_on(Position::new(-250.0, 75.0));
        assert!(close(c.visible_center(), Position::new(-250.0, 75.0)));
    }

    #[test]
    fn fit_bounds_centres_points() {
        let mut c = controller();
        c.fit_bounds(&[Position::new(0.0, 0.0), Position::new(400.0, 300.0)], 0.0);
        assert!(close(c.visible_center(), Position::new(200.0, 150.0)));
        assert_eq!(c.viewport().zoom, 2.0);
    }

    #[test]
    fn inverted_zoom_bounds_do_not_panic() {
        let mut c = ViewportController::new(ViewportConfig {
            min_zoom: 3.0,
            max_zoom: 1.0,
            wheel_step: 1.1,
        });
        c.resize(800.0, 600.0);
        c.wheel(1.0, Position::new(400.0, 300.0));
        assert_eq!(c.viewport().zoom, 1.1);
        c.zoom_to(10.0, Position::default());
        assert_eq!(c.viewport().zoom, 3.0);
        c.set_viewport(Viewport {
            x: 0.0,
            y: 0.0,
            zoom: 0.1,
        });
        assert_eq!(c.viewport().zoom, 1.0);
        c.fit_bounds(&[Position::new(0.0, 0.0), Position::new(10.0, 10.0)], 0.0);
        assert_eq!(c.viewport().zoom, 3.0);
    }
}
