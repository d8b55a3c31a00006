//! Editor tunables.
//!
//! Every field has a default, so a partial JSON document deserializes into a
//! complete [`EditorConfig`].

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::records::Position;

/// How the edge materializer picks a source node when several nodes of the
/// parent parameter expose the parent option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceSelection {
    /// First qualifying node in canvas list order.
    #[default]
    ListOrder,
    /// The canonical node if it qualifies, else the qualifying node with the
    /// lowest id.
    CanonicalFirst,
}

/// Zoom limits for the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Zoom multiplier applied per wheel notch.
    pub wheel_step: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        ViewportConfig {
            min_zoom: 0.2,
            max_zoom: 2.0,
            wheel_step: 1.1,
        }
    }
}

fn positive_finite(field: &'static str, value: f64) -> Result<(), CoreError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(CoreError::InvalidConfig {
            field,
            reason: format!("must be a positive finite number, got {value}"),
        })
    }
}

impl ViewportConfig {
    /// Checks that the zoom bounds are usable and ordered.
    pub fn validate(&self) -> Result<(), CoreError> {
        positive_finite("viewport.min_zoom", self.min_zoom)?;
        positive_finite("viewport.max_zoom", self.max_zoom)?;
        positive_finite("viewport.wheel_step", self.wheel_step)?;
        if self.min_zoom > self.max_zoom {
            return Err(CoreError::InvalidConfig {
                field: "viewport.min_zoom",
                reason: format!("{} exceeds max_zoom {}", self.min_zoom, self.max_zoom),
            });
        }
        Ok(())
    }

    /// A usable copy: unusable values fall back to their defaults and
    /// inverted bounds are swapped.
    pub fn normalized(self) -> Self {
        let defaults = ViewportConfig::default();
        let pick = |value: f64, fallback: f64| {
            if value.is_finite() && value > 0.0 {
                value
            } else {
                fallback
            }
        };
        let min_zoom = pick(self.min_zoom, defaults.min_zoom);
        let max_zoom = pick(self.max_zoom, defaults.max_zoom);
        ViewportConfig {
            min_zoom: min_zoom.min(max_zoom),
            max_zoom: min_zoom.max(max_zoom),
            wheel_step: pick(self.wheel_step, defaults.wheel_step),
        }
    }
}

/// Defaults used when materializing and creating nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Options shown on a node that has never saved a visible subset.
    pub initial_visible_options: usize,
    /// Options shown on a fresh duplicate when no override can be inherited.
    pub duplicate_visible_options: usize,
    /// Offset of a duplicate from the node it was copied from.
    pub duplicate_offset: Position,
    /// Where a duplicate lands when its parameter has no node on canvas.
    pub default_origin: Position,
    pub source_selection: SourceSelection,
    pub viewport: ViewportConfig,
}

impl Default for EditorConfig {
    fn default() -> Self {
        EditorConfig {
            initial_visible_options: 5,
            duplicate_visible_options: 3,
            duplicate_offset: Position::new(20.0, 20.0),
            default_origin: Position::new(0.0, 0.0),
            source_selection: SourceSelection::ListOrder,
            viewport: ViewportConfig::default(),
        }
    }
}

impl EditorConfig {
    pub fn validate(&self) -> Result<(), CoreError> {
        self.viewport.validate()
    }
}
