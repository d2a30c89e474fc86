//! The grid engine: one sheet view over a [`SheetModel`].
//!
//! [`GridView`] owns everything that lives between frames (configuration,
//! render context, transient UI state, the resize handle pool and the drag
//! session) and borrows the rest from the model on every call. It is plain
//! Rust and runs natively; the browser binding in `web` wraps it around a
//! JS model and a canvas.

#[cfg(target_arch = "wasm32")]
mod web;

use log::{debug, info};

use crate::config::{GridConfig, RenderContext};
use crate::error::Result;
use crate::interaction::{GestureContext, PointerController, PointerEvent, Refresh};
use crate::layout::{SheetLayout, Viewport};
use crate::model::SheetModel;
use crate::render::overlay::compute_overlays;
use crate::render::{render_sheet, Axis, FrameSummary, HandlePool, Overlays, Surface, TextMeasure};
use crate::state::WorkbookState;
use crate::types::CellCoord;

#[cfg(target_arch = "wasm32")]
pub use web::XlGrid;

pub struct GridView<M: SheetModel> {
    model: M,
    config: GridConfig,
    render: RenderContext,
    state: WorkbookState,
    pool: HandlePool,
    pointer: PointerController,
    viewport: Viewport,
    /// Scrollable extent, kept until row or column sizes change
    dimensions: Option<(f64, f64)>,
}

impl<M: SheetModel> GridView<M> {
    pub fn new(model: M, config: GridConfig, render: RenderContext) -> Self {
        Self {
            model,
            config,
            render,
            state: WorkbookState::new(),
            pool: HandlePool::new(),
            pointer: PointerController::new(),
            viewport: Viewport::default(),
            dimensions: None,
        }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// Mutable access for host-side edits. Call [`Self::render`] afterwards.
    pub fn model_mut(&mut self) -> &mut M {
        self.dimensions = None;
        &mut self.model
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn render_context(&self) -> &RenderContext {
        &self.render
    }

    pub fn state(&self) -> &WorkbookState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut WorkbookState {
        &mut self.state
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Layout of the selected sheet at the model's current origin.
    pub fn layout(&self) -> SheetLayout<'_, M> {
        SheetLayout::new(&self.model, &self.config, &self.render)
    }

    /// Paint one frame.
    pub fn render<S: Surface + ?Sized>(&mut self, surface: &mut S) -> FrameSummary {
        let layout = SheetLayout::new(&self.model, &self.config, &self.render);
        render_sheet(surface, &layout, &self.state, &mut self.pool)
    }

    /// Overlay boxes for the current state, without painting.
    pub fn overlays(&self) -> Overlays {
        compute_overlays(&self.layout(), &self.state)
    }

    /// The canvas changed size or moved to a screen with another pixel ratio.
    pub fn resize(&mut self, width: f64, height: f64, dpr: f64) {
        self.render.resize(width, height, dpr);
        debug!("grid resized to {width}x{height} @ {dpr}");
    }

    /// Scroll the grid: snap the offsets to whole rows and columns and move
    /// the model's viewport origin there. Returns whether the origin changed.
    pub fn scroll_to(&mut self, scroll_left: f64, scroll_top: f64) -> Result<bool> {
        self.viewport = Viewport::new(scroll_left, scroll_top);
        self.top_left_for_scroll(scroll_left, scroll_top)
    }

    /// The origin for the given scroll offsets, written to the model.
    pub fn top_left_for_scroll(&mut self, scroll_left: f64, scroll_top: f64) -> Result<bool> {
        let origin = Viewport::new(scroll_left, scroll_top).origin(&self.layout());
        let view = self.model.selected_view();
        if (view.top_row, view.left_column) == (origin.row, origin.column) {
            return Ok(false);
        }
        self.model.set_top_left_visible_cell(origin.row, origin.column)?;
        Ok(true)
    }

    /// Offsets that bring `cell` fully into view, if the current ones don't.
    /// The host applies them to its scroll container, which then calls
    /// [`Self::scroll_to`].
    pub fn reveal(&self, cell: CellCoord) -> Option<Viewport> {
        let mut viewport = self.viewport;
        viewport.reveal(&self.layout(), cell).then_some(viewport)
    }

    /// Size of the host's scroll content.
    ///
    /// Sums every row and column of the sheet, so the result is kept until
    /// sizes change through a gesture or through [`Self::model_mut`].
    pub fn sheet_dimensions(&mut self) -> (f64, f64) {
        if let Some(dimensions) = self.dimensions {
            return dimensions;
        }
        let dimensions = self.layout().sheet_dimensions();
        self.dimensions = Some(dimensions);
        dimensions
    }

    /// Sizes or freeze counts changed outside a gesture.
    pub fn invalidate_dimensions(&mut self) {
        self.dimensions = None;
    }

    fn settle(&mut self, refresh: Refresh) -> Refresh {
        if refresh == Refresh::Resized {
            self.dimensions = None;
        }
        refresh
    }

    /// The live resize guide line, if a header edge is being dragged.
    pub fn resize_guide(&self) -> Option<(Axis, f64)> {
        self.pointer.session().resize_guide()
    }

    pub fn is_dragging(&self) -> bool {
        !self.pointer.session().is_idle()
    }

    /// Drop any drag in progress, committing nothing.
    pub fn cancel_gesture(&mut self) {
        self.pointer.cancel(&mut self.state);
    }

    fn gesture(&mut self) -> (&mut PointerController, GestureContext<'_, M>) {
        (
            &mut self.pointer,
            GestureContext {
                model: &mut self.model,
                state: &mut self.state,
                config: &self.config,
                render: &self.render,
                pool: &self.pool,
            },
        )
    }

    pub fn pointer_down(&mut self, event: PointerEvent) -> Refresh {
        let (pointer, mut cx) = self.gesture();
        pointer.pointer_down(&mut cx, event)
    }

    pub fn pointer_move(&mut self, event: PointerEvent) -> Refresh {
        let (pointer, mut cx) = self.gesture();
        pointer.pointer_move(&mut cx, event)
    }

    pub fn pointer_up(&mut self, event: PointerEvent) -> Refresh {
        let (pointer, mut cx) = self.gesture();
        let refresh = pointer.pointer_up(&mut cx, event);
        if refresh >= Refresh::Committed {
            info!("gesture committed at ({}, {})", event.x, event.y);
        }
        self.settle(refresh)
    }

    pub fn double_click<T: TextMeasure + ?Sized>(
        &mut self,
        measure: &mut T,
        event: PointerEvent,
    ) -> Refresh {
        let (pointer, mut cx) = self.gesture();
        let refresh = pointer.double_click(&mut cx, measure, event);
        self.settle(refresh)
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
    use std::borrow::Cow;
    use std::cell::Cell;

    use crate::model::MemoryModel;
    use crate::render::RecordingSurface;
    use crate::types::{AutoFillArea, CellArea, CellStyle, CellType, SelectedView};

    /// Memory model that counts row height queries.
    #[derive(Default)]
    struct CountingModel {
        inner: MemoryModel,
        row_queries: Cell<usize>,
    }

    impl SheetModel for CountingModel {
        fn selected_sheet(&self) -> u32 {
            self.inner.selected_sheet()
        }
        fn row_height(&self, sheet: u32, row: u32) -> f64 {
            self.row_queries.set(self.row_queries.get() + 1);
            self.inner.row_height(sheet, row)
        }
        fn column_width(&self, sheet: u32, column: u32) -> f64 {
            self.inner.column_width(sheet, column)
        }
        fn frozen_rows_count(&self, sheet: u32) -> u32 {
            self.inner.frozen_rows_count(sheet)
        }
        fn frozen_columns_count(&self, sheet: u32) -> u32 {
            self.inner.frozen_columns_count(sheet)
        }
        fn show_grid_lines(&self, sheet: u32) -> bool {
            self.inner.show_grid_lines(sheet)
        }
        fn cell_style(&self, sheet: u32, row: u32, column: u32) -> Cow<'_, CellStyle> {
            self.inner.cell_style(sheet, row, column)
        }
        fn cell_type(&self, sheet: u32, row: u32, column: u32) -> CellType {
            self.inner.cell_type(sheet, row, column)
        }
        fn formatted_cell_value(&self, sheet: u32, row: u32, column: u32) -> String {
            self.inner.formatted_cell_value(sheet, row, column)
        }
        fn selected_view(&self) -> SelectedView {
            self.inner.selected_view()
        }
        fn last_non_empty_in_row_before_column(&self, sheet: u32, row: u32, column: u32) -> Option<u32> {
            self.inner.last_non_empty_in_row_before_column(sheet, row, column)
        }
        fn first_non_empty_in_row_after_column(&self, sheet: u32, row: u32, column: u32) -> Option<u32> {
            self.inner.first_non_empty_in_row_after_column(sheet, row, column)
        }
        fn rows_with_data(&self, sheet: u32, column: u32) -> Vec<u32> {
            self.inner.rows_with_data(sheet, column)
        }
        fn columns_with_data(&self, sheet: u32, row: u32) -> Vec<u32> {
            self.inner.columns_with_data(sheet, row)
        }
        fn set_rows_height(&mut self, sheet: u32, start: u32, end: u32, height: f64) -> Result<()> {
            self.inner.set_rows_height(sheet, start, end, height)
        }
        fn set_columns_width(&mut self, sheet: u32, start: u32, end: u32, width: f64) -> Result<()> {
            self.inner.set_columns_width(sheet, start, end, width)
        }
        fn auto_fill_rows(&mut self, source: &AutoFillArea, to_row: u32) -> Result<()> {
            self.inner.auto_fill_rows(source, to_row)
        }
        fn auto_fill_columns(&mut self, source: &AutoFillArea, to_column: u32) -> Result<()> {
            self.inner.auto_fill_columns(source, to_column)
        }
        fn set_top_left_visible_cell(&mut self, row: u32, column: u32) -> Result<()> {
            self.inner.set_top_left_visible_cell(row, column)
        }
        fn set_selected_cell(&mut self, row: u32, column: u32) -> Result<()> {
            self.inner.set_selected_cell(row, column)
        }
        fn set_selected_range(&mut self, area: &CellArea) -> Result<()> {
            self.inner.set_selected_range(area)
        }
    }

    fn view() -> GridView<MemoryModel> {
        GridView::new(
            MemoryModel::new(),
            GridConfig::default(),
            RenderContext::new(800.0, 600.0, 1.0),
        )
    }

    #[test]
    fn scroll_snaps_to_whole_rows() {
        let mut grid = view();
        // 3.5 rows of 28px and 2.2 columns of 100px.
        assert!(grid.scroll_to(220.0, 98.0).unwrap());
        let v = grid.model().selected_view();
        assert_eq!((v.top_row, v.left_column), (4, 3));
        assert!(!grid.scroll_to(230.0, 100.0).unwrap());
    }

    #[test]
    fn render_populates_handle_pool_for_pointer_routing() {
        let mut grid = view();
        let mut surface = RecordingSurface::new();
        grid.render(&mut surface);
        // Edge of column A.
        assert_eq!(grid.pointer_down(PointerEvent::new(130.0, 10.0)), Refresh::Repaint);
        assert!(grid.is_dragging());
        grid.pointer_move(PointerEvent::new(150.0, 10.0));
        assert_eq!(grid.resize_guide(), Some((Axis::Column, 150.0)));
        assert_eq!(grid.pointer_up(PointerEvent::new(150.0, 10.0)), Refresh::Resized);
        assert_eq!(grid.model().column_width(0, 1), 120.0);
        assert!(!grid.is_dragging());
    }

    #[test]
    fn cancel_drops_extend_preview() {
        let mut grid = view();
        grid.pointer_down(PointerEvent::new(130.0, 56.0));
        grid.pointer_move(PointerEvent::new(80.0, 120.0));
        assert!(grid.state().extend_to_area().is_some());
        grid.cancel_gesture();
        assert!(grid.state().extend_to_area().is_none());
        assert!(!grid.is_dragging());
    }

    #[test]
    fn reveal_scrolls_down_to_far_cell() {
        let grid = view();
        // 600px canvas: rows 1..=20 fit below the 28px header.
        let viewport = grid.reveal(CellCoord::new(40, 1)).unwrap();
        assert!(viewport.scroll_top > 0.0);
        assert_eq!(viewport.scroll_left, 0.0);
        assert!(grid.reveal(CellCoord::new(2, 2)).is_none());
    }

    #[test]
    fn selection_commits_keep_sheet_dimensions() {
        let mut grid = GridView::new(
            CountingModel::default(),
            GridConfig::default(),
            RenderContext::new(800.0, 600.0, 1.0),
        );
        grid.render(&mut RecordingSurface::new());
        let before = grid.sheet_dimensions();

        // Click and drag-select: the model changes, the sizes do not.
        assert_eq!(grid.pointer_down(PointerEvent::new(180.0, 70.0)), Refresh::Committed);
        assert_eq!(grid.pointer_move(PointerEvent::new(380.0, 150.0)), Refresh::Committed);
        grid.pointer_up(PointerEvent::new(380.0, 150.0));
        grid.model().row_queries.set(0);
        assert_eq!(grid.sheet_dimensions(), before);
        assert_eq!(grid.model().row_queries.get(), 0);

        // Column A's edge dragged 20px wider.
        grid.pointer_down(PointerEvent::new(130.0, 10.0));
        assert_eq!(grid.pointer_up(PointerEvent::new(150.0, 10.0)), Refresh::Resized);
        grid.model().row_queries.set(0);
        let after = grid.sheet_dimensions();
        assert!(grid.model().row_queries.get() > 0);
        assert_eq!(after, (before.0 + 20.0, before.1));
    }

    #[test]
    fn host_edits_invalidate_sheet_dimensions() {
        let mut grid = view();
        let (_, height) = grid.sheet_dimensions();
        grid.model_mut().set_rows_height(0, 1, 1, 48.0).unwrap();
        assert_eq!(grid.sheet_dimensions().1, height + 20.0);
    }
}
