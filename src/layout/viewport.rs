//! Viewport resolution: scroll offsets to whole rows/columns and the visible cell range.

use crate::cell_ref::{clamp_column, clamp_row, LAST_COLUMN, LAST_ROW};
use crate::config::GridConfig;
use crate::model::SheetModel;
use crate::types::CellCoord;

use super::{Geometry, SheetLayout};

/// First and last visible cells of the scrolled pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleCellRange {
    pub top_left: CellCoord,
    pub bottom_right: CellCoord,
}

/// Scroll offsets of the host's scroll container, in pixels past the frozen panes.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Viewport {
    pub scroll_left: f64,
    pub scroll_top: f64,
}

impl Viewport {
    pub fn new(scroll_left: f64, scroll_top: f64) -> Self {
        Self {
            scroll_left: scroll_left.max(0.0),
            scroll_top: scroll_top.max(0.0),
        }
    }

    /// Viewport origin for these offsets, snapped to whole rows and columns.
    pub fn origin<M: SheetModel + ?Sized>(&self, layout: &SheetLayout<'_, M>) -> CellCoord {
        let (row, _) = layout.bounded_row(self.scroll_top);
        let (column, _) = layout.bounded_column(self.scroll_left);
        CellCoord::new(row, column)
    }

    /// Adjust offsets so `cell` is fully visible. Returns whether anything moved.
    pub fn reveal<M: SheetModel + ?Sized>(
        &mut self,
        layout: &SheetLayout<'_, M>,
        cell: CellCoord,
    ) -> bool {
        let before = *self;
        let top_left = layout.top_left();
        let bottom_right = layout.bottom_right();
        if !layout.is_frozen_column(cell.column) {
            if cell.column < top_left.column {
                self.scroll_left = layout
                    .geometry()
                    .columns_span(layout.frozen_columns() + 1, cell.column);
            } else if cell.column >= bottom_right.column {
                self.scroll_left = self.scroll_left.max(layout.min_scroll_left(cell.column));
            }
        }
        if !layout.is_frozen_row(cell.row) {
            if cell.row < top_left.row {
                self.scroll_top = layout
                    .geometry()
                    .rows_span(layout.frozen_rows() + 1, cell.row);
            } else if cell.row >= bottom_right.row {
                self.scroll_top = self.scroll_top.max(layout.min_scroll_top(cell.row));
            }
        }
        *self != before
    }
}

/// Walk forward from the origin until the canvas is filled or the sheet ends.
pub(super) fn resolve_visible_cells<M: SheetModel + ?Sized>(
    geometry: &Geometry<'_, M>,
    config: &GridConfig,
    width: f64,
    height: f64,
    origin: (u32, u32),
    frozen_size: (f64, f64),
) -> VisibleCellRange {
    let (frozen_rows_height, frozen_columns_width) = frozen_size;
    let top_row = clamp_row(origin.0.max(geometry.frozen_rows().saturating_add(1)));
    let left_column = clamp_column(origin.1.max(geometry.frozen_columns().saturating_add(1)));

    let mut bottom_row = top_row;
    let mut y = config.header_row_height + frozen_rows_height;
    for row in top_row..=LAST_ROW {
        let row_height = geometry.row_height(row);
        if y >= height - row_height || row == LAST_ROW {
            bottom_row = row;
            break;
        }
        y += row_height;
    }

    let mut right_column = left_column;
    let mut x = config.header_column_width + frozen_columns_width;
    for column in left_column..=LAST_COLUMN {
        let column_width = geometry.column_width(column);
        if x >= width - column_width || column == LAST_COLUMN {
            right_column = column;
            break;
        }
        x += column_width;
    }

    VisibleCellRange {
        top_left: CellCoord::new(top_row, left_column),
        bottom_right: CellCoord::new(bottom_row, right_column),
    }
}

impl<M: SheetModel + ?Sized> SheetLayout<'_, M> {
    /// Row whose cumulative offset past the frozen rows is the largest not
    /// exceeding `max_top`, together with that offset.
    pub fn bounded_row(&self, max_top: f64) -> (u32, f64) {
        let mut top = 0.0;
        let mut row = self.frozen_rows().saturating_add(1);
        while row <= LAST_ROW && top <= max_top {
            let height = self.row_height(row);
            if top + height > max_top {
                break;
            }
            top += height;
            row += 1;
        }
        (clamp_row(row), top)
    }

    /// Column counterpart of [`Self::bounded_row`].
    pub fn bounded_column(&self, max_left: f64) -> (u32, f64) {
        let mut left = 0.0;
        let mut column = self.frozen_columns().saturating_add(1);
        while column <= LAST_COLUMN && left <= max_left {
            let width = self.column_width(column);
            if left + width > max_left {
                break;
            }
            left += width;
            column += 1;
        }
        (clamp_column(column), left)
    }

    /// Smallest whole-column scroll offset that shows `target_column` entirely.
    pub fn min_scroll_left(&self, target_column: u32) -> f64 {
        let column_start = self.frozen_columns().saturating_add(1);
        let distance = self
            .geometry()
            .columns_span(column_start, target_column.saturating_add(1));
        let min_left = distance - self.width()
            + self.frozen_columns_width()
            + self.config().header_column_width;

        let mut left = 0.0;
        for column in column_start..=LAST_COLUMN {
            if left >= min_left {
                break;
            }
            left += self.column_width(column);
        }
        left
    }

    /// Smallest whole-row scroll offset that shows `target_row` entirely.
    pub fn min_scroll_top(&self, target_row: u32) -> f64 {
        let row_start = self.frozen_rows().saturating_add(1);
        let distance = self
            .geometry()
            .rows_span(row_start, target_row.saturating_add(1));
        let min_top =
            distance - self.height() + self.frozen_rows_height() + self.config().header_row_height;

        let mut top = 0.0;
        for row in row_start..=LAST_ROW {
            if top >= min_top {
                break;
            }
            top += self.row_height(row);
        }
        top
    }

    /// Total scrollable extent of the sheet, headers included, with one spare
    /// column and two spare rows of slack at the far edges.
    pub fn sheet_dimensions(&self) -> (f64, f64) {
        let geometry = self.geometry();
        let width = self.config().header_column_width
            + geometry.columns_span(1, LAST_COLUMN + 1)
            + geometry.column_width(LAST_COLUMN);
        let height = self.config().header_row_height
            + geometry.rows_span(1, LAST_ROW + 1)
            + 2.0 * geometry.row_height(LAST_ROW);
        (width.floor(), height.floor())
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;
    use crate::config::RenderContext;
    use crate::model::MemoryModel;

    fn ctx() -> RenderContext {
        RenderContext::new(800.0, 600.0, 1.0)
    }

    #[test]
    fn bounded_row_lands_on_whole_rows() {
        let model = MemoryModel::new();
        let config = GridConfig::default();
        let layout = SheetLayout::new(&model, &config, &ctx());
        assert_eq!(layout.bounded_row(0.0), (1, 0.0));
        assert_eq!(layout.bounded_row(27.0), (1, 0.0));
        assert_eq!(layout.bounded_row(28.0), (2, 28.0));
        assert_eq!(layout.bounded_row(85.0), (4, 84.0));
    }

    #[test]
    fn bounded_column_starts_after_frozen() {
        let mut model = MemoryModel::new();
        model.set_frozen(0, 0, 2).unwrap();
        let config = GridConfig::default();
        let layout = SheetLayout::new(&model, &config, &ctx());
        assert_eq!(layout.bounded_column(0.0), (3, 0.0));
        assert_eq!(layout.bounded_column(250.0), (5, 200.0));
    }

    #[test]
    fn bounded_row_clamps_past_the_sheet() {
        let mut model = MemoryModel::new();
        model.sheets[0].default_row_height = 1.0;
        let config = GridConfig::default();
        let layout = SheetLayout::new(&model, &config, &ctx());
        let (row, _) = layout.bounded_row(f64::MAX);
        assert_eq!(row, LAST_ROW);
    }

    #[test]
    fn visible_range_fills_canvas() {
        let model = MemoryModel::new();
        let config = GridConfig::default();
        let layout = SheetLayout::new(&model, &config, &ctx());
        let visible = layout.visible_cells();
        assert_eq!(visible.top_left, CellCoord::new(1, 1));
        // 28 + 20 * 28 = 588; row 21 reaches the bottom edge.
        assert_eq!(visible.bottom_right.row, 21);
        // 30 + 7 * 100 = 730; column 8 reaches the right edge.
        assert_eq!(visible.bottom_right.column, 8);
    }

    #[test]
    fn visible_range_stops_at_sheet_edge() {
        let model = MemoryModel::new();
        let config = GridConfig::default();
        let layout = SheetLayout::with_origin(&model, &config, &ctx(), LAST_ROW - 2, LAST_COLUMN);
        let visible = layout.visible_cells();
        assert_eq!(visible.bottom_right, CellCoord::new(LAST_ROW, LAST_COLUMN));
    }

    #[test]
    fn min_scroll_left_reveals_target() {
        let model = MemoryModel::new();
        let config = GridConfig::default();
        let layout = SheetLayout::new(&model, &config, &ctx());
        // Column 10 ends at 1000 px; 770 px of room means scrolling at least 230.
        assert_eq!(layout.min_scroll_left(10), 300.0);
        assert_eq!(layout.min_scroll_left(2), 0.0);
    }

    #[test]
    fn min_scroll_top_reveals_target() {
        let model = MemoryModel::new();
        let config = GridConfig::default();
        let layout = SheetLayout::new(&model, &config, &ctx());
        // Row 30 ends at 840 px; 572 px of room means scrolling at least 268.
        assert_eq!(layout.min_scroll_top(30), 280.0);
    }

    #[test]
    fn viewport_origin_and_reveal() {
        let model = MemoryModel::new();
        let config = GridConfig::default();
        let mut viewport = Viewport::new(250.0, 60.0);
        let origin = viewport.origin(&SheetLayout::new(&model, &config, &ctx()));
        assert_eq!(origin, CellCoord::new(3, 3));

        let layout = SheetLayout::with_origin(&model, &config, &ctx(), origin.row, origin.column);
        assert!(viewport.reveal(&layout, CellCoord::new(1, 1)));
        assert_eq!(viewport, Viewport::new(0.0, 0.0));
        assert!(!viewport.reveal(&layout, CellCoord::new(1, 1)));
        assert!(!viewport.reveal(&layout, CellCoord::new(4, 5)));
    }

    #[test]
    fn sheet_dimensions_cover_every_row() {
        let model = MemoryModel::new();
        let config = GridConfig::default();
        let layout = SheetLayout::new(&model, &config, &ctx());
        let (w, h) = layout.sheet_dimensions();
        assert_eq!(w, 30.0 + 100.0 * f64::from(LAST_COLUMN) + 100.0);
        assert_eq!(h, 28.0 + 28.0 * f64::from(LAST_ROW) + 56.0);
    }
}
