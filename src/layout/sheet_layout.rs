//! Per-frame layout of a sheet inside the canvas.
//!
//! A `SheetLayout` is cheap to build and is rebuilt for every render and
//! every pointer event: sizes are non-uniform and scroll, resize and freeze
//! counts change continuously, so nothing here outlives a frame.

use std::ops::RangeInclusive;

use crate::config::{GridConfig, RenderContext};
use crate::model::SheetModel;
use crate::types::CellCoord;

use super::viewport::{resolve_visible_cells, VisibleCellRange};
use super::Geometry;

/// One of the four simultaneously visible regions of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaneKind {
    /// Frozen rows × frozen columns
    FrozenCorner,
    /// Frozen rows × scrolled columns
    FrozenRows,
    /// Scrolled rows × frozen columns
    FrozenColumns,
    /// Scrolled rows × scrolled columns
    Scrolled,
}

/// A pane: the block of cells it shows and where its top-left corner lands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pane {
    pub kind: PaneKind,
    pub row_start: u32,
    pub row_end: u32,
    pub column_start: u32,
    pub column_end: u32,
    pub x: f64,
    pub y: f64,
}

impl Pane {
    pub fn rows(&self) -> RangeInclusive<u32> {
        self.row_start..=self.row_end
    }

    pub fn columns(&self) -> RangeInclusive<u32> {
        self.column_start..=self.column_end
    }
}

/// Rectangle of a cell in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

pub struct SheetLayout<'a, M: SheetModel + ?Sized> {
    geometry: Geometry<'a, M>,
    config: &'a GridConfig,
    width: f64,
    height: f64,
    frozen_rows: u32,
    frozen_columns: u32,
    frozen_rows_height: f64,
    frozen_columns_width: f64,
    visible: VisibleCellRange,
}

impl<'a, M: SheetModel + ?Sized> SheetLayout<'a, M> {
    /// Lay out the model's selected sheet at its current scroll origin.
    pub fn new(model: &'a M, config: &'a GridConfig, ctx: &RenderContext) -> Self {
        let view = model.selected_view();
        Self::with_origin(model, config, ctx, view.top_row, view.left_column)
    }

    /// Lay out the selected sheet with an explicit scroll origin.
    pub fn with_origin(
        model: &'a M,
        config: &'a GridConfig,
        ctx: &RenderContext,
        top_row: u32,
        left_column: u32,
    ) -> Self {
        let geometry = Geometry::new(model, model.selected_sheet(), config.frozen_separator_width);
        let frozen_rows = geometry.frozen_rows();
        let frozen_columns = geometry.frozen_columns();
        let frozen_rows_height = geometry.frozen_rows_height();
        let frozen_columns_width = geometry.frozen_columns_width();
        let visible = resolve_visible_cells(
            &geometry,
            config,
            ctx.width,
            ctx.height,
            (top_row, left_column),
            (frozen_rows_height, frozen_columns_width),
        );
        Self {
            geometry,
            config,
            width: ctx.width,
            height: ctx.height,
            frozen_rows,
            frozen_columns,
            frozen_rows_height,
            frozen_columns_width,
            visible,
        }
    }

    pub fn geometry(&self) -> &Geometry<'a, M> {
        &self.geometry
    }

    pub fn model(&self) -> &'a M {
        self.geometry.model()
    }

    pub fn sheet(&self) -> u32 {
        self.geometry.sheet()
    }

    pub fn config(&self) -> &'a GridConfig {
        self.config
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn row_height(&self, row: u32) -> f64 {
        self.geometry.row_height(row)
    }

    pub fn column_width(&self, column: u32) -> f64 {
        self.geometry.column_width(column)
    }

    pub fn frozen_rows(&self) -> u32 {
        self.frozen_rows
    }

    pub fn frozen_columns(&self) -> u32 {
        self.frozen_columns
    }

    pub fn frozen_rows_height(&self) -> f64 {
        self.frozen_rows_height
    }

    pub fn frozen_columns_width(&self) -> f64 {
        self.frozen_columns_width
    }

    pub fn is_frozen_row(&self, row: u32) -> bool {
        row <= self.frozen_rows
    }

    pub fn is_frozen_column(&self, column: u32) -> bool {
        column <= self.frozen_columns
    }

    /// The visible cell rectangle of the scrolled pane.
    pub fn visible_cells(&self) -> VisibleCellRange {
        self.visible
    }

    /// Viewport origin: first scrolled row/column in view.
    pub fn top_left(&self) -> CellCoord {
        self.visible.top_left
    }

    pub fn bottom_right(&self) -> CellCoord {
        self.visible.bottom_right
    }

    /// Row in the scrolled-out band between the frozen rows and the origin.
    pub fn is_row_scrolled_out(&self, row: u32) -> bool {
        row > self.frozen_rows && row < self.visible.top_left.row
    }

    /// Column in the scrolled-out band between the frozen columns and the origin.
    pub fn is_column_scrolled_out(&self, column: u32) -> bool {
        column > self.frozen_columns && column < self.visible.top_left.column
    }

    /// Non-empty panes, frozen corner first.
    pub fn panes(&self) -> Vec<Pane> {
        let header_x = self.config.header_column_width;
        let header_y = self.config.header_row_height;
        let scrolled_x = header_x + self.frozen_columns_width;
        let scrolled_y = header_y + self.frozen_rows_height;
        let top_left = self.visible.top_left;
        let bottom_right = self.visible.bottom_right;

        let mut panes = Vec::with_capacity(4);
        let frozen_rows = (self.frozen_rows > 0).then_some((1, self.frozen_rows));
        let frozen_columns = (self.frozen_columns > 0).then_some((1, self.frozen_columns));
        let scrolled_rows = (top_left.row, bottom_right.row);
        let scrolled_columns = (top_left.column, bottom_right.column);

        let mut push = |kind, rows: (u32, u32), columns: (u32, u32), x, y| {
            panes.push(Pane {
                kind,
                row_start: rows.0,
                row_end: rows.1,
                column_start: columns.0,
                column_end: columns.1,
                x,
                y,
            });
        };
        if let (Some(rows), Some(columns)) = (frozen_rows, frozen_columns) {
            push(PaneKind::FrozenCorner, rows, columns, header_x, header_y);
        }
        if let Some(rows) = frozen_rows {
            push(PaneKind::FrozenRows, rows, scrolled_columns, scrolled_x, header_y);
        }
        if let Some(columns) = frozen_columns {
            push(PaneKind::FrozenColumns, scrolled_rows, columns, header_x, scrolled_y);
        }
        push(PaneKind::Scrolled, scrolled_rows, scrolled_columns, scrolled_x, scrolled_y);
        panes
    }

    /// Rectangle of a single cell, positioned like [`Self::coordinates_by_cell`].
    pub fn cell_rect(&self, row: u32, column: u32) -> CellRect {
        let (x, y) = self.coordinates_by_cell(row, column);
        CellRect {
            x,
            y,
            width: self.column_width(column),
            height: self.row_height(row),
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
    use crate::model::MemoryModel;
    use crate::types::SelectedView;

    fn layout_with_frozen(model: &mut MemoryModel, rows: u32, columns: u32) {
        model.set_frozen(0, rows, columns).unwrap();
    }

    #[test]
    fn single_pane_without_frozen() {
        let model = MemoryModel::new();
        let config = GridConfig::default();
        let ctx = RenderContext::new(800.0, 600.0, 1.0);
        let layout = SheetLayout::new(&model, &config, &ctx);
        let panes = layout.panes();
        assert_eq!(panes.len(), 1);
        assert_eq!(panes[0].kind, PaneKind::Scrolled);
        assert_eq!((panes[0].x, panes[0].y), (30.0, 28.0));
    }

    #[test]
    fn four_panes_with_frozen_rows_and_columns() {
        let mut model = MemoryModel::new();
        layout_with_frozen(&mut model, 2, 1);
        let config = GridConfig::default();
        let ctx = RenderContext::new(800.0, 600.0, 1.0);
        let layout = SheetLayout::new(&model, &config, &ctx);
        let kinds: Vec<PaneKind> = layout.panes().iter().map(|p| p.kind).collect();
        assert_eq!(
            kinds,
            vec![
                PaneKind::FrozenCorner,
                PaneKind::FrozenRows,
                PaneKind::FrozenColumns,
                PaneKind::Scrolled
            ]
        );
        assert_eq!(layout.top_left(), CellCoord::new(3, 2));
    }

    #[test]
    fn origin_never_lands_inside_frozen_panes() {
        let mut model = MemoryModel::new();
        layout_with_frozen(&mut model, 4, 4);
        model
            .set_view(SelectedView {
                top_row: 2,
                left_column: 1,
                ..SelectedView::default()
            })
            .unwrap();
        let config = GridConfig::default();
        let ctx = RenderContext::new(800.0, 600.0, 1.0);
        let layout = SheetLayout::new(&model, &config, &ctx);
        assert_eq!(layout.top_left(), CellCoord::new(5, 5));
        assert!(layout.is_frozen_row(4));
        assert!(!layout.is_row_scrolled_out(5));
    }
}
