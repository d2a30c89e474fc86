//! [`Surface`] over an HTML canvas 2D context.

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::config::RenderContext;
use crate::error::{GridError, Result};
use crate::render::surface::{Surface, TextMeasure};

use super::measure_cache::TextWidthCache;

pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    font: String,
    measure_cache: TextWidthCache,
}

impl CanvasSurface {
    /// Take the 2D context of `canvas`. A canvas without one cannot render
    /// anything, so this is the one place the grid fails hard.
    pub fn new(canvas: HtmlCanvasElement, render: &RenderContext) -> Result<Self> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|_| GridError::MissingContext)?
            .ok_or(GridError::MissingContext)?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| GridError::MissingContext)?;
        let mut surface = Self {
            canvas,
            ctx,
            font: String::new(),
            measure_cache: TextWidthCache::default(),
        };
        surface.resize(render)?;
        Ok(surface)
    }

    /// Size the backing store in device pixels and scale drawing back to
    /// CSS pixels.
    pub fn resize(&mut self, render: &RenderContext) -> Result<()> {
        let (width, height) = render.physical_size();
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        let style = self.canvas.style();
        let _ = style.set_property("width", &format!("{}px", render.width));
        let _ = style.set_property("height", &format!("{}px", render.height));
        self.ctx
            .set_transform(render.dpr, 0.0, 0.0, render.dpr, 0.0, 0.0)
            .map_err(|_| GridError::Render("Failed to set canvas transform".into()))?;
        self.ctx.set_text_align("center");
        self.ctx.set_text_baseline("middle");
        // Resizing a canvas resets its state, including the font.
        self.font.clear();
        Ok(())
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    /// Helper to get crisp pixel position for 1px lines
    fn crisp(x: f64) -> f64 {
        x.floor() + 0.5
    }

    /// Snap a line coordinate so odd-width strokes cover whole pixels.
    fn snap(v: f64, line_width: f64) -> f64 {
        if line_width.round().rem_euclid(2.0) > 0.5 {
            Self::crisp(v)
        } else {
            v.round()
        }
    }
}

impl TextMeasure for CanvasSurface {
    fn set_font(&mut self, font: &str) {
        if self.font != font {
            self.ctx.set_font(font);
            font.clone_into(&mut self.font);
        }
    }

    fn measure_text(&mut self, text: &str) -> f64 {
        let ctx = &self.ctx;
        self.measure_cache.get_or_measure(&self.font, text, || {
            ctx.measure_text(text).map(|m| m.width()).unwrap_or(0.0)
        })
    }
}

impl Surface for CanvasSurface {
    fn clear(&mut self, width: f64, height: f64) {
        self.ctx.clear_rect(0.0, 0.0, width, height);
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: &str) {
        self.ctx.set_fill_style_str(color);
        self.ctx.fill_rect(x, y, width, height);
    }

    fn stroke_line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, line_width: f64, color: &str) {
        let (x1, x2) = if (x1 - x2).abs() < f64::EPSILON {
            let x = Self::snap(x1, line_width);
            (x, x)
        } else {
            (x1, x2)
        };
        let (y1, y2) = if (y1 - y2).abs() < f64::EPSILON {
            let y = Self::snap(y1, line_width);
            (y, y)
        } else {
            (y1, y2)
        };
        self.ctx.set_stroke_style_str(color);
        self.ctx.set_line_width(line_width);
        self.ctx.begin_path();
        self.ctx.move_to(x1, y1);
        self.ctx.line_to(x2, y2);
        self.ctx.stroke();
    }

    fn stroke_rect(&mut self, x: f64, y: f64, width: f64, height: f64, line_width: f64, color: &str) {
        self.ctx.set_stroke_style_str(color);
        self.ctx.set_line_width(line_width);
        self.ctx
            .stroke_rect(Self::crisp(x), Self::crisp(y), width.round(), height.round());
    }

    fn set_line_dash(&mut self, segments: &[f64]) {
        let dash = js_sys::Array::new();
        for segment in segments {
            dash.push(&(*segment).into());
        }
        let _ = self.ctx.set_line_dash(&dash);
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64, color: &str) {
        self.ctx.set_fill_style_str(color);
        let _ = self.ctx.fill_text(text, x, y);
    }

    fn clip_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.ctx.save();
        self.ctx.begin_path();
        self.ctx.rect(x, y, width, height);
        self.ctx.clip();
    }

    fn restore(&mut self) {
        self.ctx.restore();
        // The restored state may carry a different font.
        self.font.clear();
    }
}
