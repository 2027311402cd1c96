// Drawing surface the particle field renders into. The field only talks to
// the trait so it can be driven against a recording surface in tests and
// against a real 2d canvas in the browser.

use crate::color::Color;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

pub trait Surface {
    fn width(&self) -> f64;
    fn height(&self) -> f64;
    fn clear(&mut self);
    /// Global opacity is restored to 1.0 before returning.
    fn draw_filled_circle(&mut self, x: f64, y: f64, radius: f64, color: Color, opacity: f64);
    fn draw_line(&mut self, from: [f64; 2], to: [f64; 2], color: Color, opacity: f64, width: f64);
    fn resize(&mut self, width: f64, height: f64);
}

pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
}

impl CanvasSurface {
    // A canvas without a 2d context means the effect is unavailable, which
    // is reported as Ok(None) rather than an error
    pub fn from_canvas(canvas: HtmlCanvasElement) -> Result<Option<Self>, JsValue> {
        let context = match canvas.get_context("2d")? {
            Some(ctx) => ctx.dyn_into::<CanvasRenderingContext2d>()?,
            None => return Ok(None),
        };
        Ok(Some(CanvasSurface { canvas, context }))
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }
}

impl Surface for CanvasSurface {
    fn width(&self) -> f64 {
        self.canvas.width() as f64
    }

    fn height(&self) -> f64 {
        self.canvas.height() as f64
    }

    fn clear(&mut self) {
        self.context.clear_rect(0.0, 0.0, self.width(), self.height());
    }

    #[allow(deprecated)]
    fn draw_filled_circle(&mut self, x: f64, y: f64, radius: f64, color: Color, opacity: f64) {
        self.context.begin_path();
        // arc only fails on a negative radius, sizes are always positive
        let _ = self.context.arc(x, y, radius, 0.0, 2.0 * std::f64::consts::PI);
        self.context
            .set_fill_style(&JsValue::from_str(&color.to_css_hex()));
        self.context.set_global_alpha(opacity);
        self.context.fill();
        self.context.set_global_alpha(1.0);
    }

    #[allow(deprecated)]
    fn draw_line(&mut self, from: [f64; 2], to: [f64; 2], color: Color, opacity: f64, width: f64) {
        self.context.begin_path();
        self.context.move_to(from[0], from[1]);
        self.context.line_to(to[0], to[1]);
        self.context
            .set_stroke_style(&JsValue::from_str(&color.to_css_rgba(opacity)));
        self.context.set_line_width(width);
        self.context.stroke();
    }

    fn resize(&mut self, width: f64, height: f64) {
        self.canvas.set_width(width as u32);
        self.canvas.set_height(height as u32);
    }
}
