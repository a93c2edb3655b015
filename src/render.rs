//! Rendering: draws the scene through the Y-flip onto a 2D surface.
//!
//! [`draw`] decides what goes on screen and in which order; a [`Painter`]
//! carries out the primitive calls. The browser painter ([`CanvasSurface`])
//! is the only place that touches [`web_sys::CanvasRenderingContext2d`].
//! Nothing here mutates application state.
//!
//! All fallible `Canvas2D` calls propagate errors via `Result<(), JsValue>`.
//! The top-level caller (the animation-frame loop) logs the result.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

use crate::consts::{
    BACKGROUND_FILL, ERROR_FILL, ERROR_FONT_PX, LABEL_FILL, LABEL_FONT_PX, LABEL_X, LABEL_Y, LIGHT_FALLBACK_FILL,
    POLYGON_FILL, POLYGON_STROKE, POLYGON_STROKE_WIDTH, TRIANGLE_FILL,
};
use crate::engine::EngineCore;
use crate::hit::IconSize;
use crate::transform::{Point, Viewport};

/// Outline style for a filled path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke<'a> {
    pub color: &'a str,
    pub width: f64,
}

/// Primitive drawing operations, in screen coordinates.
pub trait Painter {
    type Error;

    /// Fill the whole surface.
    fn clear(&mut self, width: f64, height: f64, fill: &str) -> Result<(), Self::Error>;

    /// Fill (and optionally outline) the closed path through `points`.
    fn fill_path(&mut self, points: &[Point], fill: &str, stroke: Option<Stroke<'_>>) -> Result<(), Self::Error>;

    /// Draw `text` with its baseline starting at `origin`.
    fn fill_text(&mut self, text: &str, origin: Point, font_px: f64, fill: &str) -> Result<(), Self::Error>;

    /// Draw the light icon centered on `center`.
    fn draw_icon(&mut self, center: Point, size: IconSize) -> Result<(), Self::Error>;
}

/// Text of the lit-area label.
#[must_use]
pub fn lit_area_label(lit_area: f64) -> String {
    format!("Lit area is: {lit_area}%")
}

/// Draw one frame.
///
/// Layer order: background, polygons, triangles, label (or error), light icon.
/// Before the first load only a load error, if any, is drawn.
///
/// # Errors
///
/// Returns the painter's error from the first primitive that fails.
pub fn draw<P: Painter>(painter: &mut P, engine: &EngineCore) -> Result<(), P::Error> {
    let (Some(scene), Some(viewport)) = (engine.scene(), engine.viewport()) else {
        if let Some(message) = engine.overlay_error() {
            draw_error(painter, message)?;
        }
        return Ok(());
    };

    painter.clear(viewport.width, viewport.height, BACKGROUND_FILL)?;

    let outline = Stroke { color: POLYGON_STROKE, width: POLYGON_STROKE_WIDTH };
    for polygon in &scene.polygons {
        draw_shape(painter, &viewport, polygon, POLYGON_FILL, Some(outline))?;
    }
    for triangle in &scene.triangles {
        draw_shape(painter, &viewport, triangle, TRIANGLE_FILL, None)?;
    }

    match engine.overlay_error() {
        Some(message) => draw_error(painter, message)?,
        None => painter.fill_text(
            &lit_area_label(scene.lit_area),
            Point::new(LABEL_X, LABEL_Y),
            LABEL_FONT_PX,
            LABEL_FILL,
        )?,
    }

    painter.draw_icon(viewport.to_screen(scene.light), engine.icon_size())
}

fn draw_shape<P: Painter>(
    painter: &mut P,
    viewport: &Viewport,
    vertices: &[Point],
    fill: &str,
    stroke: Option<Stroke<'_>>,
) -> Result<(), P::Error> {
    if vertices.is_empty() {
        return Ok(());
    }
    let screen: Vec<Point> = vertices.iter().map(|v| viewport.to_screen(*v)).collect();
    painter.fill_path(&screen, fill, stroke)
}

fn draw_error<P: Painter>(painter: &mut P, message: &str) -> Result<(), P::Error> {
    painter.fill_text(message, Point::new(LABEL_X, LABEL_Y), ERROR_FONT_PX, ERROR_FILL)
}

// =============================================================
// Browser surface
// =============================================================

/// Painter backed by a `<canvas>` 2D context.
pub struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
    icon: Option<HtmlImageElement>,
}

impl CanvasSurface {
    #[must_use]
    pub fn new(ctx: CanvasRenderingContext2d, icon: Option<HtmlImageElement>) -> Self {
        Self { ctx, icon }
    }

    fn loaded_icon(&self) -> Option<&HtmlImageElement> {
        self.icon
            .as_ref()
            .filter(|img| img.complete() && img.natural_width() > 0)
    }
}

impl Painter for CanvasSurface {
    type Error = JsValue;

    fn clear(&mut self, width: f64, height: f64, fill: &str) -> Result<(), JsValue> {
        self.ctx.set_fill_style_str(fill);
        self.ctx.fill_rect(0.0, 0.0, width, height);
        Ok(())
    }

    fn fill_path(&mut self, points: &[Point], fill: &str, stroke: Option<Stroke<'_>>) -> Result<(), JsValue> {
        let Some((first, rest)) = points.split_first() else {
            return Ok(());
        };
        self.ctx.begin_path();
        self.ctx.move_to(first.x, first.y);
        for pt in rest {
            self.ctx.line_to(pt.x, pt.y);
        }
        self.ctx.close_path();

        self.ctx.set_fill_style_str(fill);
        self.ctx.fill();

        if let Some(stroke) = stroke {
            self.ctx.set_stroke_style_str(stroke.color);
            self.ctx.set_line_width(stroke.width);
            self.ctx.stroke();
        }
        Ok(())
    }

    fn fill_text(&mut self, text: &str, origin: Point, font_px: f64, fill: &str) -> Result<(), JsValue> {
        self.ctx.set_font(&format!("{font_px:.0}px sans-serif"));
        self.ctx.set_text_align("left");
        self.ctx.set_text_baseline("alphabetic");
        self.ctx.set_fill_style_str(fill);
        self.ctx.fill_text(text, origin.x, origin.y)
    }

    fn draw_icon(&mut self, center: Point, size: IconSize) -> Result<(), JsValue> {
        let x = center.x - size.width / 2.0;
        let y = center.y - size.height / 2.0;
        if let Some(img) = self.loaded_icon() {
            return self
                .ctx
                .draw_image_with_html_image_element_and_dw_and_dh(img, x, y, size.width, size.height);
        }

        self.ctx.begin_path();
        self.ctx.arc(center.x, center.y, size.width.min(size.height) / 2.0, 0.0, 2.0 * PI)?;
        self.ctx.set_fill_style_str(LIGHT_FALLBACK_FILL);
        self.ctx.fill();
        Ok(())
    }
}
