// The 2D drawing surface the renderer paints on. In the browser it's a canvas
// 2D context, in tests it's a recorder.

use crate::color::Color;
use crate::errors::{EnvironmentSnafu, ParticleError};
use snafu::OptionExt as _;
use std::f64::consts::PI;
use vecmath::Vector2;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

pub trait Surface {
    /// Change the surface's pixel dimensions. Existing content may be lost.
    fn resize(&mut self, width: f64, height: f64);
    /// Wipe the whole surface.
    fn clear(&mut self);
    fn fill_disc(&mut self, center: Vector2<f64>, radius: f64, color: Color);
    fn stroke_line(&mut self, from: Vector2<f64>, to: Vector2<f64>, color: Color, line_width: f64);
}

pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
}

impl CanvasSurface {
    // Grabs the 2D context from a canvas on the DOM
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, ParticleError> {
        let context = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .and_then(|context| context.dyn_into::<CanvasRenderingContext2d>().ok())
            .context(EnvironmentSnafu {
                what: "2d canvas context",
            })?;
        Ok(Self { canvas, context })
    }
}

impl Surface for CanvasSurface {
    fn resize(&mut self, width: f64, height: f64) {
        self.canvas.set_width(width.max(0.0) as u32);
        self.canvas.set_height(height.max(0.0) as u32);
    }

    fn clear(&mut self) {
        self.context.clear_rect(
            0.0,
            0.0,
            f64::from(self.canvas.width()),
            f64::from(self.canvas.height()),
        );
    }

    fn fill_disc(&mut self, center: Vector2<f64>, radius: f64, color: Color) {
        self.context.begin_path();
        if let Err(error) = self.context.arc(center[0], center[1], radius, 0.0, PI * 2.0) {
            tracing::trace!("Skipping disc: {:?}", error);
            return;
        }
        self.context
            .set_fill_style(&JsValue::from_str(&color.to_css()));
        self.context.fill();
    }

    fn stroke_line(&mut self, from: Vector2<f64>, to: Vector2<f64>, color: Color, line_width: f64) {
        self.context.begin_path();
        self.context.move_to(from[0], from[1]);
        self.context.line_to(to[0], to[1]);
        self.context
            .set_stroke_style(&JsValue::from_str(&color.to_css()));
        self.context.set_line_width(line_width);
        self.context.stroke();
    }
}
