//! Common test utilities: a builder for `MemoryModel` scenarios and render
//! helpers over the recording surface.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use xlgrid::render::DrawOp;
use xlgrid::types::{CellStyle, SelectedView};
use xlgrid::{
    FrameSummary, GridConfig, MemoryModel, RecordingSurface, RenderContext, SheetModel,
};

pub const WIDTH: f64 = 800.0;
pub const HEIGHT: f64 = 600.0;

pub fn ctx() -> RenderContext {
    RenderContext::new(WIDTH, HEIGHT, 1.0)
}

pub fn config() -> GridConfig {
    GridConfig::default()
}

/// Builder for a single-sheet model.
///
/// ```rust,ignore
/// let model = SheetBuilder::new()
///     .frozen(2, 3)
///     .origin(50, 10)
///     .text(1, 1, "Header")
///     .build();
/// ```
pub struct SheetBuilder {
    model: MemoryModel,
}

impl Default for SheetBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SheetBuilder {
    pub fn new() -> Self {
        Self {
            model: MemoryModel::new(),
        }
    }

    pub fn frozen(mut self, rows: u32, columns: u32) -> Self {
        self.model.set_frozen(0, rows, columns).unwrap();
        self
    }

    /// First scrolled row and column shown.
    pub fn origin(mut self, top_row: u32, left_column: u32) -> Self {
        self.model
            .set_top_left_visible_cell(top_row, left_column)
            .unwrap();
        self
    }

    pub fn text(mut self, row: u32, column: u32, value: &str) -> Self {
        self.model.set_text(row, column, value).unwrap();
        self
    }

    pub fn number(mut self, row: u32, column: u32, value: &str) -> Self {
        self.model.set_number(row, column, value).unwrap();
        self
    }

    pub fn style(mut self, row: u32, column: u32, style: CellStyle) -> Self {
        self.model.set_style(0, row, column, style).unwrap();
        self
    }

    pub fn column_width(mut self, column: u32, width: f64) -> Self {
        self.model.set_columns_width(0, column, column, width).unwrap();
        self
    }

    pub fn row_height(mut self, row: u32, height: f64) -> Self {
        self.model.set_rows_height(0, row, row, height).unwrap();
        self
    }

    pub fn hide_grid_lines(mut self) -> Self {
        self.model.set_show_grid_lines(0, false).unwrap();
        self
    }

    /// Select `[row_start, column_start, row_end, column_end]` with the active
    /// cell at the first corner, keeping the scroll origin.
    pub fn select(mut self, range: [u32; 4]) -> Self {
        let view = self.model.selected_view();
        self.model
            .set_view(SelectedView {
                row: range[0],
                column: range[1],
                range,
                ..view
            })
            .unwrap();
        self
    }

    pub fn build(self) -> MemoryModel {
        self.model
    }
}

/// Render one frame of `model` into a fresh recording surface.
pub fn render(model: MemoryModel) -> (RecordingSurface, FrameSummary) {
    let mut grid = xlgrid::GridView::new(model, config(), ctx());
    let mut surface = RecordingSurface::new();
    let frame = grid.render(&mut surface);
    (surface, frame)
}

/// Lines drawn exactly along `x1..x2` at `y` (horizontal) or `y1..y2` at `x`.
pub fn lines_at(surface: &RecordingSurface, x1: f64, y1: f64, x2: f64, y2: f64) -> Vec<DrawOp> {
    surface
        .ops
        .iter()
        .filter(|op| {
            matches!(op, DrawOp::Line { x1: a, y1: b, x2: c, y2: d, .. }
                if *a == x1 && *b == y1 && *c == x2 && *d == y2)
        })
        .cloned()
        .collect()
}
