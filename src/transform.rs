//! Coordinate transform between simulation space (Y-up) and screen space (Y-down).
//!
//! The backend describes the scene with the origin at the bottom-left. The
//! canvas puts it at the top-left. Only Y differs, and the mapping is its own
//! inverse for a fixed viewport height, so the same [`Viewport::invert`] is
//! used for reading scene values onto the screen and for writing pointer
//! positions back into the scene.

#[cfg(test)]
#[path = "transform_test.rs"]
mod transform_test;

use serde::{Deserialize, Serialize};

/// A point in either simulation or screen space.
///
/// Serialized as `{"X": .., "Y": ..}` to match the backend wire shape.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    #[serde(rename = "X")]
    pub x: f64,
    #[serde(rename = "Y")]
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Fixed-height viewport used to flip the Y axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Flip a Y coordinate: `height - y`.
    #[must_use]
    pub fn invert(&self, y: f64) -> f64 {
        self.height - y
    }

    /// Map a simulation-space point to screen space.
    #[must_use]
    pub fn to_screen(&self, sim: Point) -> Point {
        Point { x: sim.x, y: self.invert(sim.y) }
    }

    /// Map a screen-space point back to simulation space.
    #[must_use]
    pub fn to_sim(&self, screen: Point) -> Point {
        Point { x: screen.x, y: self.invert(screen.y) }
    }
}
