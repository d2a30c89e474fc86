//! Drawing surface traits.
//!
//! The render pass paints through [`Surface`] so the same code drives the
//! Canvas 2D backend in the browser and the recording surface in tests and
//! the CLI. All coordinates are logical (CSS) pixels; backends apply the
//! device pixel ratio themselves.

/// Text measurement in the currently selected font.
pub trait TextMeasure {
    /// Select a CSS font string such as `"bold 13px Inter"`.
    fn set_font(&mut self, font: &str);

    /// Advance width of `text` in the current font.
    fn measure_text(&mut self, text: &str) -> f64;
}

/// Immediate-mode 2D painting.
pub trait Surface: TextMeasure {
    /// Erase everything.
    fn clear(&mut self, width: f64, height: f64);

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: &str);

    fn stroke_line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, line_width: f64, color: &str);

    fn stroke_rect(&mut self, x: f64, y: f64, width: f64, height: f64, line_width: f64, color: &str);

    /// Dash pattern for subsequent strokes; empty for solid lines.
    fn set_line_dash(&mut self, segments: &[f64]);

    /// Draw text centered on `(x, y)` (center alignment, middle baseline).
    fn fill_text(&mut self, text: &str, x: f64, y: f64, color: &str);

    /// Save state and restrict painting to a rectangle until [`Surface::restore`].
    fn clip_rect(&mut self, x: f64, y: f64, width: f64, height: f64);

    fn restore(&mut self);
}
