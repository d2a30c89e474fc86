//! Pointer gestures routed through `GridView`: selection, header resize,
//! autofill and the editor.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use common::{config, ctx, SheetBuilder};
use xlgrid::cell_ref::LAST_ROW;
use xlgrid::render::overlay::PARKED_OFFSET;
use xlgrid::render::{Axis, OverlayBox};
use xlgrid::types::{AreaType, CellArea};
use xlgrid::{GridView, MemoryModel, PointerEvent, RecordingSurface, Refresh, SheetModel};

fn grid(model: MemoryModel) -> GridView<MemoryModel> {
    let mut grid = GridView::new(model, config(), ctx());
    // Header resize handles are placed by the render pass.
    grid.render(&mut RecordingSurface::new());
    grid
}

fn click(grid: &mut GridView<MemoryModel>, x: f64, y: f64) -> Refresh {
    let down = grid.pointer_down(PointerEvent::new(x, y));
    grid.pointer_up(PointerEvent::new(x, y));
    down
}

// ============================================================================
// Header resize
// ============================================================================

#[test]
fn resize_inside_column_selection_applies_to_every_column() {
    let mut grid = grid(SheetBuilder::new().build());
    assert_eq!(click(&mut grid, 180.0, 10.0), Refresh::Committed);
    let shifted = grid.pointer_down(PointerEvent::new(380.0, 10.0).with_shift(true));
    assert_eq!(shifted, Refresh::Committed);
    grid.pointer_up(PointerEvent::new(380.0, 10.0));
    assert_eq!(
        grid.model().selected_view().area(),
        CellArea::from_corners(1, 2, LAST_ROW, 4)
    );

    // Right edge of column C.
    assert_eq!(grid.pointer_down(PointerEvent::new(330.0, 10.0)), Refresh::Repaint);
    assert_eq!(grid.pointer_up(PointerEvent::new(350.0, 10.0)), Refresh::Resized);
    let model = grid.model();
    assert_eq!(model.column_width(0, 1), 100.0);
    for column in 2..=4 {
        assert_eq!(model.column_width(0, column), 120.0);
    }
    assert_eq!(model.column_width(0, 5), 100.0);
}

#[test]
fn row_resize_follows_the_pointer() {
    let mut grid = grid(SheetBuilder::new().build());
    // Bottom edge of row 2.
    grid.pointer_down(PointerEvent::new(10.0, 84.0));
    grid.pointer_move(PointerEvent::new(10.0, 100.0));
    assert_eq!(grid.resize_guide(), Some((Axis::Row, 100.0)));
    assert_eq!(grid.pointer_up(PointerEvent::new(10.0, 100.0)), Refresh::Resized);
    assert_eq!(grid.model().row_height(0, 2), 44.0);
    assert_eq!(grid.model().row_height(0, 3), 28.0);
}

#[test]
fn collapsing_resize_is_rejected() {
    let mut grid = grid(SheetBuilder::new().build());
    grid.pointer_down(PointerEvent::new(10.0, 84.0));
    grid.pointer_move(PointerEvent::new(10.0, 40.0));
    // The guide stays at the last positive size.
    assert_eq!(grid.resize_guide(), Some((Axis::Row, 84.0)));
    assert_eq!(grid.pointer_up(PointerEvent::new(10.0, 40.0)), Refresh::Repaint);
    assert_eq!(grid.model().row_height(0, 2), 28.0);
    assert!(grid.resize_guide().is_none());
}

// ============================================================================
// Autofill
// ============================================================================

#[test]
fn handle_drag_fills_columns_right() {
    let mut grid = grid(SheetBuilder::new().text(2, 2, "seed").build());
    assert_eq!(click(&mut grid, 180.0, 70.0), Refresh::Committed);

    // B2's handle sits on its bottom-right corner at (230, 84).
    assert_eq!(grid.pointer_down(PointerEvent::new(229.0, 83.0)), Refresh::None);
    assert_eq!(grid.pointer_move(PointerEvent::new(480.0, 70.0)), Refresh::Repaint);
    let preview = *grid.state().extend_to_area().unwrap();
    assert_eq!(preview.area_type, AreaType::ColumnsRight);
    assert_eq!((preview.column_start, preview.column_end), (3, 5));
    assert_eq!(
        grid.overlays().extend_to,
        Some(OverlayBox {
            x: 230.0,
            y: 56.0,
            width: 299.0,
            height: 27.0,
        })
    );

    assert_eq!(grid.pointer_up(PointerEvent::new(480.0, 70.0)), Refresh::Committed);
    assert!(grid.state().extend_to_area().is_none());
    assert_eq!(grid.model().formatted_cell_value(0, 2, 5), "seed");
    assert_eq!(grid.model().selected_view().range, [2, 2, 2, 5]);
}

#[test]
fn drag_back_inside_selection_keeps_last_preview() {
    let mut grid = grid(SheetBuilder::new().text(2, 2, "seed").build());
    click(&mut grid, 180.0, 70.0);
    grid.pointer_down(PointerEvent::new(229.0, 83.0));
    grid.pointer_move(PointerEvent::new(180.0, 150.0));
    assert_eq!(
        grid.state().extend_to_area().map(|a| a.area_type),
        Some(AreaType::RowsDown)
    );
    assert_eq!(grid.pointer_move(PointerEvent::new(180.0, 70.0)), Refresh::None);
    assert_eq!(
        grid.state().extend_to_area().map(|a| a.area_type),
        Some(AreaType::RowsDown)
    );
}

// ============================================================================
// Editor
// ============================================================================

#[test]
fn selection_overlays_hide_while_editing() {
    let mut grid = grid(SheetBuilder::new().build());
    let mut measure = RecordingSurface::new();
    assert_eq!(
        grid.double_click(&mut measure, PointerEvent::new(180.0, 70.0)),
        Refresh::Repaint
    );
    let overlays = grid.overlays();
    assert!(overlays.cell_outline.is_none());
    assert!(overlays.handle.is_none());
    assert_eq!(
        overlays.editor,
        OverlayBox {
            x: 130.0,
            y: 56.0,
            width: 97.0,
            height: 25.0,
        }
    );

    // Clicking another cell ends a plain edit and selects it.
    assert_eq!(click(&mut grid, 380.0, 150.0), Refresh::Committed);
    let overlays = grid.overlays();
    assert!(!grid.state().is_editing());
    assert!(overlays.cell_outline.is_some());
    assert_eq!(overlays.editor.x, PARKED_OFFSET);
}

#[test]
fn clicking_the_edited_cell_keeps_editing() {
    let mut grid = grid(SheetBuilder::new().build());
    grid.double_click(&mut RecordingSurface::new(), PointerEvent::new(180.0, 70.0));
    assert_eq!(grid.pointer_down(PointerEvent::new(150.0, 60.0)), Refresh::None);
    assert!(grid.state().is_editing());
}

// ============================================================================
// Scrolling and selection
// ============================================================================

#[test_log::test]
fn click_after_scroll_selects_scrolled_cell() {
    let mut grid = grid(SheetBuilder::new().build());
    assert!(grid.scroll_to(220.0, 98.0).unwrap());
    grid.render(&mut RecordingSurface::new());
    // First visible cell is C4.
    click(&mut grid, 80.0, 40.0);
    let view = grid.model().selected_view();
    assert_eq!((view.row, view.column), (4, 3));
}

#[test]
fn drag_selection_across_frozen_boundary() {
    let mut grid = grid(SheetBuilder::new().frozen(1, 1).origin(10, 5).build());
    // A1 is frozen; the scrolled pane starts at E10 at (133, 59).
    grid.pointer_down(PointerEvent::new(80.0, 40.0));
    assert_eq!(grid.pointer_move(PointerEvent::new(240.0, 95.0)), Refresh::Committed);
    grid.pointer_up(PointerEvent::new(240.0, 95.0));
    assert_eq!(
        grid.model().selected_view().area(),
        CellArea::from_corners(1, 1, 11, 6)
    );
}
