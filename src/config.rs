//! Grid configuration: header metrics, paddings, fonts and colors.
//!
//! Every field has a default, so hosts can send a partial JSON object and
//! only override what they care about.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Visual and metric constants of the grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GridConfig {
    /// Height of the column header strip in pixels
    pub header_row_height: f64,
    /// Width of the row header strip in pixels
    pub header_column_width: f64,
    /// Thickness of the band between frozen and scrolled panes
    pub frozen_separator_width: f64,
    /// Horizontal text inset inside a cell
    pub cell_padding: f64,
    /// Vertical text inset for top/bottom aligned text
    pub text_vertical_padding: f64,
    /// Font size used when a style carries none (or zero)
    pub default_font_size: f64,
    /// Line height as a multiple of the font size
    pub line_height_factor: f64,
    /// Side of the square drag handle at the selection corner
    pub handle_size: f64,
    /// Distance in pixels at which a header edge counts as a resize handle
    pub resize_handle_tolerance: f64,
    /// Extra room added to autosized columns and rows
    pub autosize_padding: f64,
    pub cell_font_family: String,
    pub header_font_family: String,
    pub header_font_size: f64,

    pub grid_color: String,
    pub grid_separator_color: String,
    pub default_fill_color: String,
    pub default_text_color: String,
    pub outline_color: String,
    pub header_background: String,
    pub header_selected_background: String,
    pub header_text_color: String,
    pub header_selected_color: String,
    pub header_border_color: String,
    pub cut_range_color: String,
    /// Colors cycled through for ranges referenced by the formula being edited
    pub active_range_palette: Vec<String>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            header_row_height: 28.0,
            header_column_width: 30.0,
            frozen_separator_width: 3.0,
            cell_padding: 4.0,
            text_vertical_padding: 4.0,
            default_font_size: 13.0,
            line_height_factor: 1.5,
            handle_size: 5.0,
            resize_handle_tolerance: 3.0,
            autosize_padding: 8.0,
            cell_font_family: "Inter, sans-serif".to_string(),
            header_font_family: "Inter, sans-serif".to_string(),
            header_font_size: 12.0,
            grid_color: "#E0E0E0".to_string(),
            grid_separator_color: "#E0E0E0".to_string(),
            default_fill_color: "#FFFFFF".to_string(),
            default_text_color: "#2E414D".to_string(),
            outline_color: "#F2994A".to_string(),
            header_background: "#FFFFFF".to_string(),
            header_selected_background: "#EEEEEE".to_string(),
            header_text_color: "#333333".to_string(),
            header_selected_color: "#333333".to_string(),
            header_border_color: "#DEE0EF".to_string(),
            cut_range_color: "red".to_string(),
            active_range_palette: [
                "#59B9BC", "#EC5753", "#3358B7", "#F8CD3C", "#3BB68A", "#523E93", "#A23C52",
                "#8CB354", "#D03627", "#1B717E",
            ]
            .iter()
            .map(|c| (*c).to_string())
            .collect(),
        }
    }
}

impl GridConfig {
    /// Parse a (possibly partial) JSON configuration.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Line height for a given font size.
    pub fn line_height(&self, font_size: f64) -> f64 {
        font_size * self.line_height_factor
    }

    /// Palette color for the `index`-th active range, cycling.
    pub fn active_range_color(&self, index: usize) -> &str {
        match self.active_range_palette.len() {
            0 => self.outline_color.as_str(),
            len => self
                .active_range_palette
                .get(index % len)
                .map_or(self.outline_color.as_str(), String::as_str),
        }
    }
}

/// Canvas size and device pixel ratio for the current frame.
///
/// Built once when the view is created and refreshed by [`RenderContext::resize`]
/// whenever the host reports a size or DPI change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderContext {
    /// Logical (CSS pixel) width
    pub width: f64,
    /// Logical (CSS pixel) height
    pub height: f64,
    pub dpr: f64,
}

impl RenderContext {
    pub fn new(width: f64, height: f64, dpr: f64) -> Self {
        let mut ctx = Self {
            width: 0.0,
            height: 0.0,
            dpr: 1.0,
        };
        ctx.resize(width, height, dpr);
        ctx
    }

    /// Update size and ratio. Non-positive ratios fall back to 1.
    pub fn resize(&mut self, width: f64, height: f64, dpr: f64) {
        self.width = width.max(0.0);
        self.height = height.max(0.0);
        self.dpr = if dpr > 0.0 && dpr.is_finite() { dpr } else { 1.0 };
    }

    /// Backing-store size in device pixels.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn physical_size(&self) -> (u32, u32) {
        // Both factors are non-negative and finite.
        (
            (self.width * self.dpr).round() as u32,
            (self.height * self.dpr).round() as u32,
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_grid_constants() {
        let config = GridConfig::default();
        assert_eq!(config.header_row_height, 28.0);
        assert_eq!(config.header_column_width, 30.0);
        assert_eq!(config.frozen_separator_width, 3.0);
        assert_eq!(config.line_height(13.0), 19.5);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = GridConfig::from_json(r##"{"headerRowHeight": 24, "gridColor": "#000"}"##)
            .unwrap();
        assert_eq!(config.header_row_height, 24.0);
        assert_eq!(config.grid_color, "#000");
        assert_eq!(config.header_column_width, 30.0);
    }

    #[test]
    fn bad_json_is_a_config_error() {
        assert!(GridConfig::from_json("{").is_err());
    }

    #[test]
    fn palette_cycles() {
        let config = GridConfig::default();
        assert_eq!(config.active_range_color(0), "#59B9BC");
        assert_eq!(config.active_range_color(10), "#59B9BC");
        assert_eq!(config.active_range_color(11), "#EC5753");
    }

    #[test]
    fn render_context_sanitizes_ratio() {
        let mut ctx = RenderContext::new(800.0, 600.0, 0.0);
        assert_eq!(ctx.dpr, 1.0);
        ctx.resize(100.0, 50.0, 2.0);
        assert_eq!(ctx.physical_size(), (200, 100));
    }
}
