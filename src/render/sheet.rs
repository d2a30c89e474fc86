//! The full render pass of one frame.

use log::debug;

use crate::layout::{SheetLayout, VisibleCellRange};
use crate::model::SheetModel;
use crate::state::WorkbookState;

use super::border::paint_cell_style;
use super::headers::{render_column_headers, render_row_headers, HandlePool, PoolKey};
use super::overlay::{compute_overlays, draw_active_ranges, draw_cut_range, Overlays};
use super::surface::Surface;
use super::text::{compute_cells_text, paint_cell_text};

/// What a render pass produced, for the DOM overlays and for diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSummary {
    pub visible: VisibleCellRange,
    pub panes: usize,
    pub cells_painted: usize,
    pub text_layouts: usize,
    /// Cells whose left edge is covered by spilled text, sorted
    pub spills: Vec<(u32, u32)>,
    pub overlays: Overlays,
}

/// Paint the whole grid.
///
/// Text is laid out before any cell is painted, since the spill marks decide
/// which left edges are skipped. Then come fills and borders pane by pane,
/// the frozen separators, cell text, headers, and finally the painted
/// overlays (active ranges and the cut range).
pub fn render_sheet<M, S>(
    surface: &mut S,
    layout: &SheetLayout<'_, M>,
    state: &WorkbookState,
    pool: &mut HandlePool,
) -> FrameSummary
where
    M: SheetModel + ?Sized,
    S: Surface + ?Sized,
{
    let config = layout.config();
    let width = layout.width();
    let height = layout.height();
    surface.clear(width, height);

    let text = compute_cells_text(layout, surface);

    let panes = layout.panes();
    let mut cells_painted = 0;
    for pane in &panes {
        for row in pane.rows() {
            for column in pane.columns() {
                let rect = layout.cell_rect(row, column);
                paint_cell_style(surface, layout, &text.spills, row, column, rect);
                cells_painted += 1;
            }
        }
    }

    let separator = config.frozen_separator_width;
    if layout.frozen_rows() > 0 {
        let y = config.header_row_height + layout.frozen_rows_height() - separator / 2.0;
        surface.stroke_line(0.0, y, width, y, separator, &config.grid_separator_color);
    }
    if layout.frozen_columns() > 0 {
        let x = config.header_column_width + layout.frozen_columns_width() - separator / 2.0;
        surface.stroke_line(x, 0.0, x, height, separator, &config.grid_separator_color);
    }

    for cell in &text.layouts {
        paint_cell_text(surface, cell);
    }

    let model = layout.model();
    let selection = model.selected_view().area();
    pool.begin_frame(PoolKey {
        sheet: layout.sheet(),
        frozen_rows: layout.frozen_rows(),
        frozen_columns: layout.frozen_columns(),
    });
    render_column_headers(surface, layout, &selection, pool);
    render_row_headers(surface, layout, &selection, pool);
    pool.end_frame();

    surface.fill_rect(
        0.0,
        0.0,
        config.header_column_width,
        config.header_row_height,
        &config.header_background,
    );
    surface.stroke_line(0.0, 0.0, width, 0.0, 1.0, &config.grid_separator_color);

    let overlays = compute_overlays(layout, state);
    draw_active_ranges(surface, layout, state);
    draw_cut_range(surface, layout, state);

    let visible = layout.visible_cells();
    debug!(
        "rendered sheet {} rows {}..={} columns {}..={}: {} cells, {} text layouts, {} spills",
        layout.sheet(),
        visible.top_left.row,
        visible.bottom_right.row,
        visible.top_left.column,
        visible.bottom_right.column,
        cells_painted,
        text.layouts.len(),
        text.spills.len()
    );

    FrameSummary {
        visible,
        panes: panes.len(),
        cells_painted,
        text_layouts: text.layouts.len(),
        spills: text.spills.sorted(),
        overlays,
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
    use crate::render::recording::{DrawOp, RecordingSurface};
    use crate::state::CutRange;
    use crate::types::CellArea;

    fn render(model: &MemoryModel, state: &WorkbookState) -> (RecordingSurface, FrameSummary) {
        let config = GridConfig::default();
        let ctx = RenderContext::new(800.0, 600.0, 1.0);
        let layout = SheetLayout::new(model, &config, &ctx);
        let mut surface = RecordingSurface::new();
        let mut pool = HandlePool::new();
        let summary = render_sheet(&mut surface, &layout, state, &mut pool);
        (surface, summary)
    }

    #[test]
    fn clears_first_and_paints_text_between_cells_and_headers() {
        let mut model = MemoryModel::new();
        model.set_text(3, 3, "hello").unwrap();
        let (surface, summary) = render(&model, &WorkbookState::new());
        assert!(matches!(surface.ops[0], DrawOp::Clear { width, .. } if width == 800.0));
        let position = |pred: &dyn Fn(&DrawOp) -> bool| surface.ops.iter().position(pred).unwrap();
        let cell_fill = position(&|op| {
            matches!(op, DrawOp::FillRect { x, y, .. } if *x == 230.0 && *y == 84.0)
        });
        let text = position(&|op| matches!(op, DrawOp::Text { text, .. } if text == "hello"));
        let header = position(&|op| matches!(op, DrawOp::Text { text, .. } if text == "A"));
        assert!(cell_fill < text);
        assert!(text < header);
        assert_eq!(summary.panes, 1);
        assert_eq!(summary.text_layouts, 1);
    }

    #[test]
    fn every_visible_cell_is_painted_once() {
        let model = MemoryModel::new();
        let (_, summary) = render(&model, &WorkbookState::new());
        let visible = summary.visible;
        let rows = visible.bottom_right.row - visible.top_left.row + 1;
        let columns = visible.bottom_right.column - visible.top_left.column + 1;
        assert_eq!(summary.cells_painted, usize::try_from(rows * columns).unwrap());
    }

    #[test]
    fn frozen_panes_get_separators() {
        let mut model = MemoryModel::new();
        model.set_frozen(0, 2, 1).unwrap();
        let (surface, summary) = render(&model, &WorkbookState::new());
        assert_eq!(summary.panes, 4);
        let separators: Vec<_> = surface
            .ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Line {
                    x1,
                    y1,
                    line_width,
                    ..
                } if *line_width == 3.0 => Some((*x1, *y1)),
                _ => None,
            })
            .collect();
        // 28 + 56 + 3 - 1.5 and 30 + 100 + 3 - 1.5
        assert_eq!(separators, vec![(0.0, 85.5), (131.5, 0.0)]);
    }

    #[test]
    fn spill_marks_are_reported() {
        let mut model = MemoryModel::new();
        model.set_text(1, 1, "a long piece of text that spills").unwrap();
        let (_, summary) = render(&model, &WorkbookState::new());
        assert_eq!(summary.spills, vec![(1, 2), (1, 3)]);
    }

    #[test]
    fn cut_range_is_painted_last() {
        let model = MemoryModel::new();
        let mut state = WorkbookState::new();
        state.set_cut_range(Some(CutRange {
            sheet: 0,
            area: CellArea::cell(2, 2),
        }));
        let (surface, _) = render(&model, &state);
        let n = surface.ops.len();
        assert!(matches!(
            surface.ops[n - 2],
            DrawOp::StrokeRect { dashed: true, .. }
        ));
        assert_eq!(surface.ops[n - 1], DrawOp::Restore);
    }
}
