//! Pointer routing: hit testing and the drag session state machine.
//!
//! Pointer-down decides what was hit, in this order:
//! 1. a header resize handle
//! 2. the top-left corner (select all)
//! 3. a row header, 4. a column header (whole row/column, shift extends)
//! 5. the selection's corner handle (start an extend-to drag)
//! 6. a cell (select it, or insert a reference while editing a formula)
//!
//! Moves and the release are routed by the [`DragSession`] alone. Model
//! failures during a gesture are logged and the gesture simply ends.

use log::warn;

use crate::cell_ref::{LAST_COLUMN, LAST_ROW};
use crate::config::{GridConfig, RenderContext};
use crate::error::Result;
use crate::layout::SheetLayout;
use crate::model::SheetModel;
use crate::render::overlay::{compute_overlays, OverlayBox};
use crate::render::{Axis, HandlePool, ResizeHandle, TextMeasure};
use crate::state::{EditingCell, ReferencedRange, WorkbookState};
use crate::types::{CellArea, CellCoord};

use super::autosize::autosize;
use super::drag::{DragSession, ResizeDrag};
use super::extend::{classify_extend, fill_down_to_neighbor, release_extend};
use super::resize::commit_resize;

/// What the host should do after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Refresh {
    /// Nothing visible changed
    None,
    /// Only the grid needs repainting (guides, previews, editor state)
    Repaint,
    /// The model changed: repaint and notify the rest of the application
    Committed,
    /// Row heights or column widths changed: as `Committed`, and the
    /// scrollable extent of the sheet must be measured again
    Resized,
}

/// A pointer event in canvas (CSS pixel) coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerEvent {
    pub x: f64,
    pub y: f64,
    pub shift: bool,
}

impl PointerEvent {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, shift: false }
    }

    pub fn with_shift(mut self, shift: bool) -> Self {
        self.shift = shift;
        self
    }

    /// Convert client coordinates using the canvas bounding rect.
    ///
    /// The rect is in CSS pixels and may be scaled relative to the logical
    /// canvas size (page zoom, CSS transforms), so the offset is rescaled to
    /// the render context.
    pub fn from_client(
        client_x: f64,
        client_y: f64,
        rect: (f64, f64, f64, f64),
        ctx: &RenderContext,
    ) -> Self {
        let (left, top, width, height) = rect;
        let scale_x = if width > 0.0 { ctx.width / width } else { 1.0 };
        let scale_y = if height > 0.0 { ctx.height / height } else { 1.0 };
        Self::new((client_x - left) * scale_x, (client_y - top) * scale_y)
    }
}

/// What sits under a canvas point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HitTarget {
    ResizeHandle(ResizeHandle),
    Corner,
    RowHeader(u32),
    ColumnHeader(u32),
    OutlineHandle,
    Cell(CellCoord),
    None,
}

fn box_contains(b: &OverlayBox, x: f64, y: f64, slack: f64) -> bool {
    x >= b.x - slack && x <= b.x + b.width + slack && y >= b.y - slack && y <= b.y + b.height + slack
}

/// Resolve a canvas point against this frame's layout.
pub fn hit_test<M: SheetModel + ?Sized>(
    layout: &SheetLayout<'_, M>,
    pool: &HandlePool,
    state: &WorkbookState,
    x: f64,
    y: f64,
) -> HitTarget {
    let config = layout.config();
    if x < 0.0 || y < 0.0 || x > layout.width() || y > layout.height() {
        return HitTarget::None;
    }
    if let Some(handle) = pool.hit_test(x, y, config) {
        return HitTarget::ResizeHandle(handle);
    }
    let in_row_headers = x < config.header_column_width;
    let in_column_headers = y < config.header_row_height;
    match (in_row_headers, in_column_headers) {
        (true, true) => return HitTarget::Corner,
        (true, false) => {
            return layout
                .cell_by_coordinates(config.header_column_width, y)
                .map_or(HitTarget::None, |c| HitTarget::RowHeader(c.row));
        }
        (false, true) => {
            return layout
                .cell_by_coordinates(x, config.header_row_height)
                .map_or(HitTarget::None, |c| HitTarget::ColumnHeader(c.column));
        }
        (false, false) => {}
    }
    let handle = compute_overlays(layout, state).handle;
    if handle.is_some_and(|b| box_contains(&b, x, y, config.resize_handle_tolerance)) {
        return HitTarget::OutlineHandle;
    }
    layout
        .cell_by_coordinates(x, y)
        .map_or(HitTarget::None, HitTarget::Cell)
}

/// Everything a gesture reads or writes besides the session itself.
pub struct GestureContext<'a, M: SheetModel + ?Sized> {
    pub model: &'a mut M,
    pub state: &'a mut WorkbookState,
    pub config: &'a GridConfig,
    pub render: &'a RenderContext,
    pub pool: &'a HandlePool,
}

impl<M: SheetModel + ?Sized> GestureContext<'_, M> {
    fn hit(&self, x: f64, y: f64) -> HitTarget {
        let layout = SheetLayout::new(&*self.model, self.config, self.render);
        hit_test(&layout, self.pool, self.state, x, y)
    }

    fn cell_at(&self, x: f64, y: f64) -> Option<CellCoord> {
        SheetLayout::new(&*self.model, self.config, self.render).cell_by_coordinates(x, y)
    }
}

/// Log a failed model call and carry on with the given outcome.
fn settle(result: Result<Refresh>, on_error: Refresh) -> Refresh {
    result.unwrap_or_else(|e| {
        warn!("grid gesture failed: {e}");
        on_error
    })
}

/// Owns the [`DragSession`] and turns pointer events into model commands.
#[derive(Debug, Default)]
pub struct PointerController {
    session: DragSession,
}

impl PointerController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> &DragSession {
        &self.session
    }

    /// Abandon any drag without committing it.
    pub fn cancel(&mut self, state: &mut WorkbookState) {
        if self.session == DragSession::ExtendingArea {
            state.clear_extend_to_area();
        }
        self.session = DragSession::Idle;
    }

    pub fn pointer_down<M: SheetModel + ?Sized>(
        &mut self,
        cx: &mut GestureContext<'_, M>,
        event: PointerEvent,
    ) -> Refresh {
        let target = cx.hit(event.x, event.y);
        settle(self.begin(cx, target, event), Refresh::Repaint)
    }

    fn begin<M: SheetModel + ?Sized>(
        &mut self,
        cx: &mut GestureContext<'_, M>,
        target: HitTarget,
        event: PointerEvent,
    ) -> Result<Refresh> {
        let model = &mut *cx.model;
        match target {
            HitTarget::None => Ok(Refresh::None),
            HitTarget::ResizeHandle(handle) => {
                let pointer = match handle.axis {
                    Axis::Column => event.x,
                    Axis::Row => event.y,
                };
                self.session = DragSession::resize(handle.axis, ResizeDrag::new(&handle, pointer));
                Ok(Refresh::Repaint)
            }
            HitTarget::Corner => {
                model.set_selected_cell(1, 1)?;
                model.set_selected_range(&CellArea::from_corners(1, 1, LAST_ROW, LAST_COLUMN))?;
                Ok(Refresh::Committed)
            }
            HitTarget::RowHeader(row) => {
                let range = model.selected_view().area();
                let (first, last) = if event.shift {
                    (range.row_start.min(row), range.row_end.max(row))
                } else {
                    (row, row)
                };
                model.set_selected_cell(first, 1)?;
                model.set_selected_range(&CellArea::from_corners(first, 1, last, LAST_COLUMN))?;
                Ok(Refresh::Committed)
            }
            HitTarget::ColumnHeader(column) => {
                let range = model.selected_view().area();
                let (first, last) = if event.shift {
                    (range.column_start.min(column), range.column_end.max(column))
                } else {
                    (column, column)
                };
                model.set_selected_cell(1, first)?;
                model.set_selected_range(&CellArea::from_corners(1, first, LAST_ROW, last))?;
                Ok(Refresh::Committed)
            }
            HitTarget::OutlineHandle => {
                self.session = DragSession::ExtendingArea;
                Ok(Refresh::None)
            }
            HitTarget::Cell(cell) => self.begin_on_cell(cx, cell, event.shift),
        }
    }

    fn begin_on_cell<M: SheetModel + ?Sized>(
        &mut self,
        cx: &mut GestureContext<'_, M>,
        cell: CellCoord,
        shift: bool,
    ) -> Result<Refresh> {
        let sheet = cx.model.selected_sheet();
        if let Some(editing) = cx.state.editing_cell_mut() {
            if editing.sheet == sheet && editing.row == cell.row && editing.column == cell.column {
                return Ok(Refresh::None);
            }
            if editing.is_formula {
                editing.referenced_range = Some(ReferencedRange {
                    sheet,
                    area: CellArea::cell(cell.row, cell.column),
                });
                self.session = DragSession::InsertingReference { anchor: cell };
                return Ok(Refresh::Repaint);
            }
            // Clicking away from a plain edit ends it; the host owns the text.
            cx.state.stop_editing();
        }

        let model = &mut *cx.model;
        if shift {
            let active = model.selected_view().active_cell();
            model.set_selected_range(&CellArea::from_corners(
                active.row,
                active.column,
                cell.row,
                cell.column,
            ))?;
        } else {
            model.set_selected_cell(cell.row, cell.column)?;
            self.session = DragSession::SelectingArea;
        }
        Ok(Refresh::Committed)
    }

    pub fn pointer_move<M: SheetModel + ?Sized>(
        &mut self,
        cx: &mut GestureContext<'_, M>,
        event: PointerEvent,
    ) -> Refresh {
        match &mut self.session {
            DragSession::Idle => Refresh::None,
            DragSession::ResizingColumn(drag) => {
                drag.update(event.x);
                Refresh::Repaint
            }
            DragSession::ResizingRow(drag) => {
                drag.update(event.y);
                Refresh::Repaint
            }
            DragSession::SelectingArea => {
                let Some(cell) = cx.cell_at(event.x, event.y) else {
                    return Refresh::None;
                };
                let model = &mut *cx.model;
                let active = model.selected_view().active_cell();
                let area = CellArea::from_corners(active.row, active.column, cell.row, cell.column);
                if model.selected_view().area() == area {
                    return Refresh::None;
                }
                settle(
                    model.set_selected_range(&area).map(|()| Refresh::Committed),
                    Refresh::None,
                )
            }
            DragSession::ExtendingArea => {
                let Some(cell) = cx.cell_at(event.x, event.y) else {
                    return Refresh::None;
                };
                let selection = cx.model.selected_view().area();
                match classify_extend(&selection, cell.row, cell.column) {
                    Some(area) => {
                        cx.state.set_extend_to_area(Some(area));
                        Refresh::Repaint
                    }
                    None => Refresh::None,
                }
            }
            DragSession::InsertingReference { anchor } => {
                let anchor = *anchor;
                let Some(cell) = cx.cell_at(event.x, event.y) else {
                    return Refresh::None;
                };
                let Some(editing) = cx.state.editing_cell_mut() else {
                    return Refresh::None;
                };
                let Some(range) = editing.referenced_range.as_mut() else {
                    return Refresh::None;
                };
                range.area = CellArea::from_corners(anchor.row, anchor.column, cell.row, cell.column);
                Refresh::Repaint
            }
        }
    }

    pub fn pointer_up<M: SheetModel + ?Sized>(
        &mut self,
        cx: &mut GestureContext<'_, M>,
        event: PointerEvent,
    ) -> Refresh {
        let session = std::mem::take(&mut self.session);
        match session {
            DragSession::Idle | DragSession::SelectingArea | DragSession::InsertingReference { .. } => {
                Refresh::None
            }
            DragSession::ResizingColumn(drag) => finish_resize(cx, Axis::Column, &drag, event.x),
            DragSession::ResizingRow(drag) => finish_resize(cx, Axis::Row, &drag, event.y),
            DragSession::ExtendingArea => settle(
                release_extend(&mut *cx.model, cx.state)
                    .map(|applied| if applied { Refresh::Committed } else { Refresh::Repaint }),
                Refresh::Repaint,
            ),
        }
    }

    /// Double-click: autosize on a header edge, fill down on the corner
    /// handle, open the editor on a cell.
    pub fn double_click<M, T>(
        &mut self,
        cx: &mut GestureContext<'_, M>,
        measure: &mut T,
        event: PointerEvent,
    ) -> Refresh
    where
        M: SheetModel + ?Sized,
        T: TextMeasure + ?Sized,
    {
        self.session = DragSession::Idle;
        match cx.hit(event.x, event.y) {
            HitTarget::ResizeHandle(handle) => settle(
                autosize(&mut *cx.model, measure, cx.config, handle.axis, handle.index)
                    .map(|changed| if changed { Refresh::Resized } else { Refresh::None }),
                Refresh::None,
            ),
            HitTarget::OutlineHandle => settle(
                fill_down_to_neighbor(&mut *cx.model).map(committed_or_none),
                Refresh::None,
            ),
            HitTarget::Cell(cell) => {
                let sheet = cx.model.selected_sheet();
                let width = cx.model.column_width(sheet, cell.column).round();
                let height = cx.model.row_height(sheet, cell.row).round();
                cx.state
                    .start_editing(EditingCell::new(sheet, cell.row, cell.column, width, height));
                Refresh::Repaint
            }
            _ => Refresh::None,
        }
    }
}

fn committed_or_none(changed: bool) -> Refresh {
    if changed {
        Refresh::Committed
    } else {
        Refresh::None
    }
}

fn finish_resize<M: SheetModel + ?Sized>(
    cx: &mut GestureContext<'_, M>,
    axis: Axis,
    drag: &ResizeDrag,
    pointer: f64,
) -> Refresh {
    let size = drag.size_at(pointer);
    settle(
        commit_resize(&mut *cx.model, axis, drag.index, drag.origin_size, size).map(|changed| {
            if changed {
                Refresh::Resized
            } else {
                Refresh::Repaint
            }
        }),
        Refresh::Repaint,
    )
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
    use crate::render::headers::PoolKey;
    use crate::render::RecordingSurface;
    use crate::types::{AreaType, SelectedView};

    struct Fixture {
        model: MemoryModel,
        state: WorkbookState,
        config: GridConfig,
        render: RenderContext,
        pool: HandlePool,
        controller: PointerController,
    }

    impl Fixture {
        fn new() -> Self {
            let mut pool = HandlePool::new();
            pool.begin_frame(PoolKey {
                sheet: 0,
                frozen_rows: 0,
                frozen_columns: 0,
            });
            // Column A ends at x = 130, row 1 at y = 56.
            pool.place(Axis::Column, 1, 130.0, 100.0);
            pool.place(Axis::Row, 1, 56.0, 28.0);
            pool.end_frame();
            Self {
                model: MemoryModel::new(),
                state: WorkbookState::new(),
                config: GridConfig::default(),
                render: RenderContext::new(800.0, 600.0, 1.0),
                pool,
                controller: PointerController::new(),
            }
        }

        fn cx(&mut self) -> (&mut PointerController, GestureContext<'_, MemoryModel>) {
            (
                &mut self.controller,
                GestureContext {
                    model: &mut self.model,
                    state: &mut self.state,
                    config: &self.config,
                    render: &self.render,
                    pool: &self.pool,
                },
            )
        }

        fn down(&mut self, event: PointerEvent) -> Refresh {
            let (controller, mut cx) = self.cx();
            controller.pointer_down(&mut cx, event)
        }

        fn moved(&mut self, event: PointerEvent) -> Refresh {
            let (controller, mut cx) = self.cx();
            controller.pointer_move(&mut cx, event)
        }

        fn up(&mut self, event: PointerEvent) -> Refresh {
            let (controller, mut cx) = self.cx();
            controller.pointer_up(&mut cx, event)
        }
    }

    #[test]
    fn client_points_are_rescaled() {
        let ctx = RenderContext::new(800.0, 600.0, 2.0);
        let event = PointerEvent::from_client(150.0, 80.0, (50.0, 20.0, 400.0, 300.0), &ctx);
        assert_eq!((event.x, event.y), (200.0, 120.0));
    }

    #[test]
    fn hit_order_prefers_resize_handles() {
        let fx = Fixture::new();
        let layout = SheetLayout::new(&fx.model, &fx.config, &fx.render);
        let hit = |x, y| hit_test(&layout, &fx.pool, &fx.state, x, y);
        assert!(matches!(hit(131.0, 10.0), HitTarget::ResizeHandle(h) if h.axis == Axis::Column));
        assert_eq!(hit(10.0, 10.0), HitTarget::Corner);
        assert_eq!(hit(10.0, 100.0), HitTarget::RowHeader(3));
        assert_eq!(hit(250.0, 10.0), HitTarget::ColumnHeader(3));
        // Default selection A1: handle box centered on (130, 56).
        assert_eq!(hit(128.0, 54.0), HitTarget::OutlineHandle);
        assert_eq!(hit(250.0, 100.0), HitTarget::Cell(CellCoord::new(3, 3)));
        assert_eq!(hit(900.0, 100.0), HitTarget::None);
    }

    #[test]
    fn resize_drag_commits_on_release() {
        let mut fx = Fixture::new();
        assert_eq!(fx.down(PointerEvent::new(130.0, 10.0)), Refresh::Repaint);
        assert_eq!(fx.moved(PointerEvent::new(160.0, 10.0)), Refresh::Repaint);
        assert_eq!(
            fx.controller.session().resize_guide(),
            Some((Axis::Column, 160.0))
        );
        assert_eq!(fx.up(PointerEvent::new(160.0, 10.0)), Refresh::Resized);
        assert_eq!(fx.model.column_width(0, 1), 130.0);
        assert!(fx.controller.session().is_idle());
    }

    #[test]
    fn resize_released_in_place_issues_nothing() {
        let mut fx = Fixture::new();
        fx.down(PointerEvent::new(10.0, 56.0));
        assert!(matches!(fx.controller.session(), DragSession::ResizingRow(_)));
        assert_eq!(fx.up(PointerEvent::new(10.0, 56.0)), Refresh::Repaint);
        assert_eq!(fx.model.row_height(0, 1), 28.0);
    }

    #[test]
    fn header_clicks_select_whole_lines() {
        let mut fx = Fixture::new();
        assert_eq!(fx.down(PointerEvent::new(250.0, 10.0)), Refresh::Committed);
        assert_eq!(
            fx.model.selected_view().area(),
            CellArea::from_corners(1, 3, LAST_ROW, 3)
        );
        fx.down(PointerEvent::new(450.0, 10.0).with_shift(true));
        assert_eq!(
            fx.model.selected_view().area(),
            CellArea::from_corners(1, 3, LAST_ROW, 5)
        );
        fx.down(PointerEvent::new(10.0, 10.0));
        assert_eq!(
            fx.model.selected_view().area(),
            CellArea::from_corners(1, 1, LAST_ROW, LAST_COLUMN)
        );
    }

    #[test]
    fn cell_drag_selects_area() {
        let mut fx = Fixture::new();
        fx.down(PointerEvent::new(250.0, 100.0));
        assert_eq!(*fx.controller.session(), DragSession::SelectingArea);
        assert_eq!(fx.moved(PointerEvent::new(350.0, 130.0)), Refresh::Committed);
        assert_eq!(fx.moved(PointerEvent::new(350.0, 130.0)), Refresh::None);
        assert_eq!(fx.up(PointerEvent::new(350.0, 130.0)), Refresh::None);
        assert_eq!(fx.model.selected_view().area(), CellArea::from_corners(3, 3, 4, 4));
    }

    #[test]
    fn handle_drag_previews_then_fills() {
        let mut fx = Fixture::new();
        fx.model.set_text(1, 1, "seed").unwrap();
        assert_eq!(fx.down(PointerEvent::new(130.0, 56.0)), Refresh::None);
        assert_eq!(*fx.controller.session(), DragSession::ExtendingArea);
        // Row 4 spans y 112..140.
        assert_eq!(fx.moved(PointerEvent::new(80.0, 120.0)), Refresh::Repaint);
        let preview = *fx.state.extend_to_area().unwrap();
        assert_eq!(preview.area_type, AreaType::RowsDown);
        assert_eq!((preview.row_start, preview.row_end), (2, 4));
        assert_eq!(fx.up(PointerEvent::new(80.0, 120.0)), Refresh::Committed);
        assert!(fx.state.extend_to_area().is_none());
        assert_eq!(fx.model.formatted_cell_value(0, 4, 1), "seed");
        assert_eq!(fx.model.selected_view().area(), CellArea::from_corners(1, 1, 4, 1));
    }

    #[test]
    fn formula_edit_turns_clicks_into_references() {
        let mut fx = Fixture::new();
        let mut editing = EditingCell::new(0, 1, 1, 100.0, 28.0);
        editing.is_formula = true;
        fx.state.start_editing(editing);
        assert_eq!(fx.down(PointerEvent::new(250.0, 100.0)), Refresh::Repaint);
        fx.moved(PointerEvent::new(350.0, 130.0));
        let range = fx.state.editing_cell().unwrap().referenced_range.unwrap();
        assert_eq!(range.area, CellArea::from_corners(3, 3, 4, 4));
        assert_eq!(range.text(), "C3:D4");
        // The selection itself did not move.
        assert_eq!(fx.model.selected_view().area(), CellArea::cell(1, 1));
    }

    #[test]
    fn plain_edit_ends_on_click_away() {
        let mut fx = Fixture::new();
        fx.state.start_editing(EditingCell::new(0, 1, 1, 100.0, 28.0));
        assert_eq!(fx.down(PointerEvent::new(250.0, 100.0)), Refresh::Committed);
        assert!(!fx.state.is_editing());
        assert_eq!(fx.model.selected_view().active_cell(), CellCoord::new(3, 3));
    }

    #[test]
    fn double_click_on_column_edge_autosizes() {
        let mut fx = Fixture::new();
        fx.model.set_text(2, 1, "abcdefghijklmnopqrstuvwxy").unwrap();
        let mut measure = RecordingSurface::new();
        let (controller, mut cx) = fx.cx();
        let refresh = controller.double_click(&mut cx, &mut measure, PointerEvent::new(130.0, 10.0));
        assert_eq!(refresh, Refresh::Resized);
        // 25 chars at 7.8px plus 8px.
        assert!((fx.model.column_width(0, 1) - 203.0).abs() < 1e-9);
    }

    #[test]
    fn double_click_on_cell_opens_editor() {
        let mut fx = Fixture::new();
        let mut measure = RecordingSurface::new();
        let (controller, mut cx) = fx.cx();
        controller.double_click(&mut cx, &mut measure, PointerEvent::new(250.0, 100.0));
        let editing = fx.state.editing_cell().unwrap();
        assert_eq!((editing.row, editing.column), (3, 3));
        assert_eq!((editing.editor_width, editing.editor_height), (100.0, 28.0));
    }

    #[test]
    fn shift_click_extends_from_active_cell() {
        let mut fx = Fixture::new();
        fx.model
            .set_view(SelectedView {
                row: 2,
                column: 2,
                range: [2, 2, 2, 2],
                ..SelectedView::default()
            })
            .unwrap();
        fx.down(PointerEvent::new(350.0, 130.0).with_shift(true));
        assert_eq!(fx.model.selected_view().area(), CellArea::from_corners(2, 2, 4, 4));
        assert!(fx.controller.session().is_idle());
    }
}
