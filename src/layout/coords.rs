//! Cell <-> canvas pixel mapping across frozen and scrolled panes.

use crate::cell_ref::{LAST_COLUMN, LAST_ROW};
use crate::model::SheetModel;
use crate::types::{CellArea, CellCoord};

use super::sheet_layout::CellRect;
use super::SheetLayout;

impl<M: SheetModel + ?Sized> SheetLayout<'_, M> {
    /// Top-left corner of a cell in canvas coordinates.
    ///
    /// Frozen rows/columns are measured from the header. Cells at or after
    /// the viewport origin are measured forward from the frozen panes. Cells
    /// scrolled out before the origin get negative-going offsets measured
    /// backward from it, which spill lookups need for off-screen anchors.
    pub fn coordinates_by_cell(&self, row: u32, column: u32) -> (f64, f64) {
        let config = self.config();
        let geometry = self.geometry();
        let top_left = self.top_left();

        let y = if row <= self.frozen_rows() {
            config.header_row_height + geometry.rows_span(1, row)
        } else if row >= top_left.row {
            config.header_row_height
                + self.frozen_rows_height()
                + geometry.rows_span(top_left.row, row)
        } else {
            config.header_row_height + self.frozen_rows_height()
                - geometry.rows_span(row, top_left.row)
        };

        let x = if column <= self.frozen_columns() {
            config.header_column_width + geometry.columns_span(1, column)
        } else if column >= top_left.column {
            config.header_column_width
                + self.frozen_columns_width()
                + geometry.columns_span(top_left.column, column)
        } else {
            config.header_column_width + self.frozen_columns_width()
                - geometry.columns_span(column, top_left.column)
        };

        (x.floor(), y.floor())
    }

    /// The visible cell under a canvas point.
    ///
    /// Points over the headers resolve to the cell just before the origin,
    /// and points past the sheet edge clamp to the last row/column. `None`
    /// only comes back if a point inside the frozen band fails to resolve to
    /// a frozen cell, which consistent sizes never produce.
    pub fn cell_by_coordinates(&self, x: f64, y: f64) -> Option<CellCoord> {
        let column = self.column_at(x)?;
        let row = self.row_at(y)?;
        Some(CellCoord::new(row.max(1), column.max(1)))
    }

    fn column_at(&self, x: f64) -> Option<u32> {
        let header = self.config().header_column_width;
        let top_left = self.top_left();
        if x < header {
            let mut column = top_left.column;
            let mut cell_x = header;
            while cell_x >= x {
                if column <= 1 {
                    column = 1;
                    break;
                }
                column -= 1;
                cell_x -= self.column_width(column);
            }
            Some(column)
        } else if x < header + self.frozen_columns_width() {
            let mut column = 0;
            let mut cell_x = header;
            while cell_x <= x {
                column += 1;
                if column > self.frozen_columns() {
                    return None;
                }
                cell_x += self.column_width(column);
            }
            Some(column)
        } else {
            let mut column = top_left.column - 1;
            let mut cell_x = header + self.frozen_columns_width();
            while cell_x <= x {
                column += 1;
                if column > LAST_COLUMN {
                    column = LAST_COLUMN;
                    break;
                }
                cell_x += self.column_width(column);
            }
            Some(column)
        }
    }

    fn row_at(&self, y: f64) -> Option<u32> {
        let header = self.config().header_row_height;
        let top_left = self.top_left();
        if y < header {
            let mut row = top_left.row;
            let mut cell_y = header;
            while cell_y >= y {
                if row <= 1 {
                    row = 1;
                    break;
                }
                row -= 1;
                cell_y -= self.row_height(row);
            }
            Some(row)
        } else if y < header + self.frozen_rows_height() {
            let mut row = 0;
            let mut cell_y = header;
            while cell_y <= y {
                row += 1;
                if row > self.frozen_rows() {
                    return None;
                }
                cell_y += self.row_height(row);
            }
            Some(row)
        } else {
            let mut row = top_left.row - 1;
            let mut cell_y = header + self.frozen_rows_height();
            while cell_y <= y {
                row += 1;
                if row > LAST_ROW {
                    row = LAST_ROW;
                    break;
                }
                cell_y += self.row_height(row);
            }
            Some(row)
        }
    }

    /// Pixel width and height of a block of cells as it appears on screen.
    ///
    /// A block that starts in the frozen panes and continues into the
    /// scrolled ones reaches at least to the end of the frozen band, even
    /// when its scrolled part is out of view.
    pub fn area_dimensions(&self, area: &CellArea) -> (f64, f64) {
        let (x_start, y_start) = self.coordinates_by_cell(area.row_start, area.column_start);
        let (mut x_end, mut y_end) = self.coordinates_by_cell(area.row_end, area.column_end);
        x_end += self.column_width(area.column_end);
        y_end += self.row_height(area.row_end);

        let frozen_rows = self.frozen_rows();
        let frozen_columns = self.frozen_columns();
        if frozen_rows != 0 || frozen_columns != 0 {
            let (mut x_frozen_end, mut y_frozen_end) =
                self.coordinates_by_cell(frozen_rows, frozen_columns);
            if frozen_columns > 0 {
                x_frozen_end += self.column_width(frozen_columns);
            }
            if frozen_rows > 0 {
                y_frozen_end += self.row_height(frozen_rows);
            }
            if area.row_start <= frozen_rows && area.row_end > frozen_rows {
                y_end = y_end.max(y_frozen_end);
            }
            if area.column_start <= frozen_columns && area.column_end > frozen_columns {
                x_end = x_end.max(x_frozen_end);
            }
        }
        ((x_end - x_start).abs(), (y_end - y_start).abs())
    }

    /// On-screen rectangle of a block of cells.
    pub fn area_rect(&self, area: &CellArea) -> CellRect {
        let (x, y) = self.coordinates_by_cell(area.row_start, area.column_start);
        let (width, height) = self.area_dimensions(area);
        CellRect {
            x,
            y,
            width,
            height,
        }
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
    use crate::config::{GridConfig, RenderContext};
    use crate::model::MemoryModel;

    fn frozen_model(rows: u32, columns: u32) -> MemoryModel {
        let mut model = MemoryModel::new();
        model.set_frozen(0, rows, columns).unwrap();
        model
    }

    #[test]
    fn first_cell_sits_at_header_corner() {
        let model = MemoryModel::new();
        let config = GridConfig::default();
        let ctx = RenderContext::new(800.0, 600.0, 1.0);
        let layout = SheetLayout::new(&model, &config, &ctx);
        assert_eq!(layout.coordinates_by_cell(1, 1), (30.0, 28.0));
        assert_eq!(layout.coordinates_by_cell(2, 3), (230.0, 56.0));
        assert_eq!(
            layout.cell_by_coordinates(30.0, 28.0),
            Some(CellCoord::new(1, 1))
        );
    }

    #[test]
    fn scrolled_out_cells_have_negative_offsets() {
        let model = MemoryModel::new();
        let config = GridConfig::default();
        let ctx = RenderContext::new(800.0, 600.0, 1.0);
        let layout = SheetLayout::with_origin(&model, &config, &ctx, 5, 4);
        assert_eq!(layout.coordinates_by_cell(5, 4), (30.0, 28.0));
        assert_eq!(layout.coordinates_by_cell(3, 2), (-170.0, -28.0));
    }

    #[test]
    fn header_points_resolve_to_cell_before_origin() {
        let model = MemoryModel::new();
        let config = GridConfig::default();
        let ctx = RenderContext::new(800.0, 600.0, 1.0);
        let layout = SheetLayout::with_origin(&model, &config, &ctx, 5, 4);
        assert_eq!(
            layout.cell_by_coordinates(10.0, 10.0),
            Some(CellCoord::new(4, 3))
        );
        let at_top = SheetLayout::new(&model, &config, &ctx);
        assert_eq!(
            at_top.cell_by_coordinates(-500.0, -500.0),
            Some(CellCoord::new(1, 1))
        );
    }

    #[test]
    fn frozen_band_points_resolve_to_frozen_cells() {
        let model = frozen_model(2, 1);
        let config = GridConfig::default();
        let ctx = RenderContext::new(800.0, 600.0, 1.0);
        let layout = SheetLayout::with_origin(&model, &config, &ctx, 40, 9);
        assert_eq!(
            layout.cell_by_coordinates(31.0, 57.0),
            Some(CellCoord::new(2, 1))
        );
        // Past frozen column 1 plus separator: first scrolled column.
        assert_eq!(
            layout.cell_by_coordinates(134.0, 29.0),
            Some(CellCoord::new(1, 9))
        );
    }

    #[test]
    fn points_past_sheet_edge_clamp() {
        let model = MemoryModel::new();
        let config = GridConfig::default();
        let ctx = RenderContext::new(800.0, 600.0, 1.0);
        let layout = SheetLayout::with_origin(
            &model,
            &config,
            &ctx,
            crate::cell_ref::LAST_ROW,
            LAST_COLUMN,
        );
        assert_eq!(
            layout.cell_by_coordinates(790.0, 590.0),
            Some(CellCoord::new(crate::cell_ref::LAST_ROW, LAST_COLUMN))
        );
    }

    #[test]
    fn area_straddling_frozen_boundary_reaches_band_end() {
        let model = frozen_model(2, 0);
        let config = GridConfig::default();
        let ctx = RenderContext::new(800.0, 600.0, 1.0);
        let layout = SheetLayout::with_origin(&model, &config, &ctx, 50, 1);
        // Rows 1..=10 with rows 3..=49 scrolled away: the visible part ends at
        // the last frozen row.
        let (_, h) = layout.area_dimensions(&CellArea::from_corners(1, 1, 10, 1));
        assert_eq!(h, 56.0);
        let (w, h) = layout.area_dimensions(&CellArea::from_corners(1, 1, 1, 3));
        assert_eq!((w, h), (300.0, 28.0));
    }
}
