#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::transform::{Point, Viewport};

/// Size of the light icon in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IconSize {
    pub width: f64,
    pub height: f64,
}

impl IconSize {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Screen-space rectangle, top-left anchored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ScreenRect {
    /// Strict containment: points on the edge are outside.
    #[must_use]
    pub fn contains(&self, pt: Point) -> bool {
        pt.x > self.x && pt.x < self.x + self.width && pt.y > self.y && pt.y < self.y + self.height
    }
}

/// Grab box of the light icon: anchored at the light's screen position and
/// extending right and down by the icon size.
#[must_use]
pub fn light_grab_box(light: Point, viewport: &Viewport, icon: IconSize) -> ScreenRect {
    let top_left = viewport.to_screen(light);
    ScreenRect { x: top_left.x, y: top_left.y, width: icon.width, height: icon.height }
}

/// Whether a pointer press at `screen_pt` grabs the light.
#[must_use]
pub fn hits_light(screen_pt: Point, light: Point, viewport: &Viewport, icon: IconSize) -> bool {
    light_grab_box(light, viewport, icon).contains(screen_pt)
}
