//! Shared constants for the viewer: palette, label geometry, and defaults.

// ── Palette ─────────────────────────────────────────────────────

/// Canvas background.
pub const BACKGROUND_FILL: &str = "rgb(117, 114, 107)";

/// Fill for occluding polygons (the "columns").
pub const POLYGON_FILL: &str = "rgb(181, 121, 24)";

/// Outline for occluding polygons.
pub const POLYGON_STROKE: &str = "#000";

/// Polygon outline width in pixels.
pub const POLYGON_STROKE_WIDTH: f64 = 1.0;

/// Fill for lit triangles.
pub const TRIANGLE_FILL: &str = "rgb(217, 206, 189)";

/// Fallback disc drawn in place of the light icon until its image loads.
pub const LIGHT_FALLBACK_FILL: &str = "rgb(255, 204, 0)";

// ── Overlay text ────────────────────────────────────────────────

/// Baseline origin shared by the lit-area label and the error overlay.
pub const LABEL_X: f64 = 10.0;
pub const LABEL_Y: f64 = 30.0;

pub const LABEL_FONT_PX: f64 = 19.0;
pub const LABEL_FILL: &str = "#000";

pub const ERROR_FONT_PX: f64 = 32.0;
pub const ERROR_FILL: &str = "rgb(0, 102, 153)";

// ── Defaults ────────────────────────────────────────────────────

pub const DEFAULT_SCENE_URL: &str = "http://localhost:8008/api/v1/scene";
pub const DEFAULT_CONFIG_URL: &str = "http://localhost:8008/api/v1/scene/config";

/// Period of the push/pull cycle while a drag session is active.
pub const DEFAULT_SYNC_INTERVAL_MS: u32 = 100;

/// Light icon size used for hit-testing until the real image reports its size.
pub const DEFAULT_ICON_WIDTH: f64 = 40.0;
pub const DEFAULT_ICON_HEIGHT: f64 = 40.0;

pub const DEFAULT_ICON_SRC: &str = "sun.png";
