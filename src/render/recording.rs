//! A surface that records draw calls instead of painting.
//!
//! Used by tests, benches and the CLI to inspect a frame without a browser.
//! Text is measured as 0.6 × font size per character, which is close enough
//! to a proportional UI font for layout decisions and fully deterministic.

use super::surface::{Surface, TextMeasure};

const CHAR_WIDTH_FACTOR: f64 = 0.6;
const FALLBACK_FONT_SIZE: f64 = 13.0;

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Clear {
        width: f64,
        height: f64,
    },
    FillRect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        color: String,
    },
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        line_width: f64,
        color: String,
        dashed: bool,
    },
    StrokeRect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        line_width: f64,
        color: String,
        dashed: bool,
    },
    Text {
        text: String,
        x: f64,
        y: f64,
        color: String,
        font: String,
    },
    Clip {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    Restore,
}

#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub ops: Vec<DrawOp>,
    font: String,
    font_size: f64,
    dash: Vec<f64>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self {
            font_size: FALLBACK_FONT_SIZE,
            ..Self::default()
        }
    }

    pub fn reset(&mut self) {
        self.ops.clear();
        self.dash.clear();
    }

    /// Every straight line drawn, as `(x1, y1, x2, y2, color)`.
    pub fn lines(&self) -> impl Iterator<Item = (f64, f64, f64, f64, &str)> + '_ {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Line {
                x1,
                y1,
                x2,
                y2,
                color,
                ..
            } => Some((*x1, *y1, *x2, *y2, color.as_str())),
            _ => None,
        })
    }

    /// Every text run drawn.
    pub fn texts(&self) -> impl Iterator<Item = &str> + '_ {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn count<F: Fn(&DrawOp) -> bool>(&self, pred: F) -> usize {
        self.ops.iter().filter(|op| pred(op)).count()
    }
}

/// Pull the pixel size out of a CSS font string (`"bold 13px Inter"` -> 13).
fn font_size_of(font: &str) -> Option<f64> {
    font.split_whitespace()
        .find_map(|token| token.strip_suffix("px")?.parse().ok())
}

impl TextMeasure for RecordingSurface {
    fn set_font(&mut self, font: &str) {
        font.clone_into(&mut self.font);
        self.font_size = font_size_of(font).unwrap_or(FALLBACK_FONT_SIZE);
    }

    fn measure_text(&mut self, text: &str) -> f64 {
        let chars = text.chars().count();
        // Cells never hold anywhere near 2^52 characters.
        #[allow(clippy::cast_precision_loss)]
        let chars = chars as f64;
        chars * self.font_size * CHAR_WIDTH_FACTOR
    }
}

impl Surface for RecordingSurface {
    fn clear(&mut self, width: f64, height: f64) {
        self.ops.push(DrawOp::Clear { width, height });
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: &str) {
        self.ops.push(DrawOp::FillRect {
            x,
            y,
            width,
            height,
            color: color.to_string(),
        });
    }

    fn stroke_line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, line_width: f64, color: &str) {
        self.ops.push(DrawOp::Line {
            x1,
            y1,
            x2,
            y2,
            line_width,
            color: color.to_string(),
            dashed: !self.dash.is_empty(),
        });
    }

    fn stroke_rect(&mut self, x: f64, y: f64, width: f64, height: f64, line_width: f64, color: &str) {
        self.ops.push(DrawOp::StrokeRect {
            x,
            y,
            width,
            height,
            line_width,
            color: color.to_string(),
            dashed: !self.dash.is_empty(),
        });
    }

    fn set_line_dash(&mut self, segments: &[f64]) {
        self.dash = segments.to_vec();
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64, color: &str) {
        self.ops.push(DrawOp::Text {
            text: text.to_string(),
            x,
            y,
            color: color.to_string(),
            font: self.font.clone(),
        });
    }

    fn clip_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.ops.push(DrawOp::Clip {
            x,
            y,
            width,
            height,
        });
    }

    fn restore(&mut self) {
        self.ops.push(DrawOp::Restore);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn measures_by_font_size() {
        let mut surface = RecordingSurface::new();
        assert_eq!(surface.measure_text("abcde"), 5.0 * 13.0 * 0.6);
        surface.set_font("italic bold 20px Inter, sans-serif");
        assert_eq!(surface.measure_text("ab"), 24.0);
    }

    #[test]
    fn records_dash_state() {
        let mut surface = RecordingSurface::new();
        surface.set_line_dash(&[2.0, 2.0]);
        surface.stroke_rect(0.0, 0.0, 10.0, 10.0, 1.0, "red");
        surface.set_line_dash(&[]);
        surface.stroke_line(0.0, 0.0, 1.0, 1.0, 1.0, "red");
        assert!(matches!(surface.ops[0], DrawOp::StrokeRect { dashed: true, .. }));
        assert!(matches!(surface.ops[1], DrawOp::Line { dashed: false, .. }));
    }
}
