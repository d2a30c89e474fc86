//! Viewport resolution and cell <-> pixel mapping across frozen panes.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use common::{config, ctx, SheetBuilder, HEIGHT, WIDTH};
use test_case::test_case;
use xlgrid::cell_ref::{LAST_COLUMN, LAST_ROW};
use xlgrid::layout::PaneKind;
use xlgrid::types::CellCoord;
use xlgrid::{GridView, SheetLayout, SheetModel};

// ============================================================================
// Frozen panes scrolled far away
// ============================================================================

#[test]
fn frozen_cells_ignore_scroll() {
    let model = SheetBuilder::new().frozen(2, 3).origin(50, 10).build();
    let config = config();
    let ctx = ctx();
    let layout = SheetLayout::new(&model, &config, &ctx);

    assert_eq!(layout.coordinates_by_cell(1, 1), (30.0, 28.0));
    // Header + 3 frozen columns + separator, header + 2 frozen rows + separator.
    assert_eq!(layout.coordinates_by_cell(50, 10), (333.0, 87.0));
    assert_eq!(layout.top_left(), CellCoord::new(50, 10));

    let unscrolled = SheetBuilder::new().frozen(2, 3).build();
    let layout = SheetLayout::new(&unscrolled, &config, &ctx);
    assert_eq!(layout.coordinates_by_cell(1, 1), (30.0, 28.0));
    assert_eq!(layout.coordinates_by_cell(3, 4), (333.0, 87.0));
}

#[test]
fn scrolled_out_cells_measure_backward_from_origin() {
    let model = SheetBuilder::new().frozen(2, 3).origin(50, 10).build();
    let config = config();
    let ctx = ctx();
    let layout = SheetLayout::new(&model, &config, &ctx);
    // Column 8 is two columns before the origin.
    let (x, y) = layout.coordinates_by_cell(48, 8);
    assert_eq!(x, 333.0 - 200.0);
    assert_eq!(y, 87.0 - 56.0);
    assert!(layout.is_column_scrolled_out(8));
    assert!(layout.is_row_scrolled_out(48));
}

// ============================================================================
// Tiling
// ============================================================================

#[test_case(0, 0; "no frozen panes")]
#[test_case(2, 0; "frozen rows")]
#[test_case(0, 3; "frozen columns")]
#[test_case(2, 3; "both")]
fn panes_tile_the_canvas(frozen_rows: u32, frozen_columns: u32) {
    let model = SheetBuilder::new()
        .frozen(frozen_rows, frozen_columns)
        .origin(40, 12)
        .column_width(13, 57.0)
        .row_height(42, 61.0)
        .build();
    let config = config();
    let ctx = ctx();
    let layout = SheetLayout::new(&model, &config, &ctx);
    let separator = config.frozen_separator_width;

    for pane in layout.panes() {
        let first = layout.cell_rect(pane.row_start, pane.column_start);
        assert_eq!((first.x, first.y), (pane.x, pane.y), "{:?}", pane.kind);

        // Cells inside a pane abut with no gap or overlap.
        for row in pane.rows() {
            for column in pane.columns() {
                let rect = layout.cell_rect(row, column);
                if column < pane.column_end {
                    assert_eq!(layout.cell_rect(row, column + 1).x, rect.x + rect.width);
                }
                if row < pane.row_end {
                    assert_eq!(layout.cell_rect(row + 1, column).y, rect.y + rect.height);
                }
            }
        }

        // Scrolled panes start right after the frozen band and its separator.
        match pane.kind {
            PaneKind::Scrolled | PaneKind::FrozenRows if frozen_columns > 0 => {
                let last_frozen = layout.cell_rect(pane.row_start, frozen_columns);
                assert_eq!(pane.x, last_frozen.x + last_frozen.width + separator);
            }
            _ => {}
        }
        match pane.kind {
            PaneKind::Scrolled | PaneKind::FrozenColumns if frozen_rows > 0 => {
                let last_frozen = layout.cell_rect(frozen_rows, pane.column_start);
                assert_eq!(pane.y, last_frozen.y + last_frozen.height + separator);
            }
            _ => {}
        }
    }

    // The last visible row/column reaches the canvas edge; the one before doesn't.
    let bottom_right = layout.bottom_right();
    let last = layout.cell_rect(bottom_right.row, bottom_right.column);
    assert!(last.y + last.height >= HEIGHT);
    assert!(last.x + last.width >= WIDTH);
    let before = layout.cell_rect(bottom_right.row - 1, bottom_right.column - 1);
    assert!(before.y + before.height < HEIGHT);
    assert!(before.x + before.width < WIDTH);
}

#[test]
fn pixel_lookup_inverts_cell_coordinates() {
    let model = SheetBuilder::new()
        .frozen(2, 3)
        .origin(50, 10)
        .column_width(11, 37.0)
        .row_height(51, 45.0)
        .build();
    let config = config();
    let ctx = ctx();
    let layout = SheetLayout::new(&model, &config, &ctx);
    for pane in layout.panes() {
        for row in pane.rows() {
            for column in pane.columns() {
                let (x, y) = layout.coordinates_by_cell(row, column);
                assert_eq!(
                    layout.cell_by_coordinates(x + 1.0, y + 1.0),
                    Some(CellCoord::new(row, column)),
                    "cell {row}:{column} at ({x}, {y})"
                );
            }
        }
    }
}

#[test]
fn headers_resolve_to_cell_before_origin() {
    let model = SheetBuilder::new().origin(20, 5).build();
    let config = config();
    let ctx = ctx();
    let layout = SheetLayout::new(&model, &config, &ctx);
    // Just left of the first visible column: the column before the origin.
    assert_eq!(
        layout.cell_by_coordinates(29.0, 100.0).map(|c| c.column),
        Some(4)
    );
    assert_eq!(layout.cell_by_coordinates(29.0, 27.0), Some(CellCoord::new(19, 4)));
}

// ============================================================================
// Bounded rows and sheet edges
// ============================================================================

#[test_case(0.0 => (1, 0.0); "at origin")]
#[test_case(27.9 => (1, 0.0); "inside first row")]
#[test_case(28.0 => (2, 28.0); "exact boundary")]
#[test_case(90.0 => (3, 68.0); "after tall row")]
#[test_case(96.0 => (4, 96.0); "next boundary")]
fn bounded_row_lands_on_whole_rows(scroll_top: f64) -> (u32, f64) {
    let model = SheetBuilder::new().row_height(2, 40.0).build();
    let config = config();
    let ctx = ctx();
    SheetLayout::new(&model, &config, &ctx).bounded_row(scroll_top)
}

#[test]
fn visible_range_clamps_at_sheet_end() {
    let model = SheetBuilder::new()
        .origin(LAST_ROW - 2, LAST_COLUMN - 1)
        .build();
    let config = config();
    let ctx = ctx();
    let layout = SheetLayout::new(&model, &config, &ctx);
    assert_eq!(layout.bottom_right(), CellCoord::new(LAST_ROW, LAST_COLUMN));
    assert_eq!(layout.top_left(), CellCoord::new(LAST_ROW - 2, LAST_COLUMN - 1));
    assert_eq!(
        layout.cell_by_coordinates(WIDTH - 1.0, HEIGHT - 1.0),
        Some(CellCoord::new(LAST_ROW, LAST_COLUMN))
    );
}

#[test]
fn origin_past_the_end_is_clamped() {
    let model = SheetBuilder::new().origin(LAST_ROW + 10, LAST_COLUMN + 10).build();
    let config = config();
    let ctx = ctx();
    let layout = SheetLayout::new(&model, &config, &ctx);
    assert_eq!(layout.top_left(), CellCoord::new(LAST_ROW, LAST_COLUMN));
}

#[test_log::test]
fn scrolling_moves_model_origin() {
    let model = SheetBuilder::new().frozen(2, 3).build();
    let mut grid = GridView::new(model, config(), ctx());
    // Scroll offsets count from the first scrolled row/column.
    assert!(grid.scroll_to(250.0, 60.0).unwrap());
    let view = grid.model().selected_view();
    assert_eq!((view.top_row, view.left_column), (5, 6));
    assert_eq!(grid.layout().coordinates_by_cell(5, 6), (333.0, 87.0));
}

#[test]
fn sheet_dimensions_cover_every_row_and_column() {
    let model = SheetBuilder::new().build();
    let config = config();
    let ctx = ctx();
    let (width, height) = SheetLayout::new(&model, &config, &ctx).sheet_dimensions();
    assert_eq!(width, 30.0 + 100.0 * f64::from(LAST_COLUMN) + 100.0);
    assert_eq!(height, 28.0 + 28.0 * f64::from(LAST_ROW) + 56.0);
}
