//! Selection overlay helpers.
//!
//! The outline, area, handle, extend-to and editor boxes are positioned DOM
//! elements in the browser; this module only computes their boxes so the
//! selection math stays testable without depending on Canvas or DOM APIs.
//! Cut and active ranges are painted straight onto the surface.

use crate::cell_ref::{LAST_COLUMN, LAST_ROW};
use crate::config::GridConfig;
use crate::layout::SheetLayout;
use crate::model::SheetModel;
use crate::state::{ActiveRange, WorkbookState};
use crate::types::CellArea;

use super::colors::with_alpha;
use super::surface::Surface;

/// Where the editor is parked while no edit is active on the shown sheet.
pub const PARKED_OFFSET: f64 = -9999.0;

const CUT_DASH: [f64; 2] = [2.0, 2.0];
const ACTIVE_RANGE_ALPHA: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// A CSS `rect(top right bottom left)` clip, relative to the clipped element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipRect {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl ClipRect {
    pub fn to_css(&self) -> String {
        format!(
            "rect({}px {}px {}px {}px)",
            self.top, self.right, self.bottom, self.left
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AreaOutline {
    pub bounds: OverlayBox,
    pub clip: Option<ClipRect>,
    pub draw_bottom: bool,
    pub draw_right: bool,
}

/// Boxes of the DOM overlays for one frame. `None` means hidden.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Overlays {
    pub cell_outline: Option<OverlayBox>,
    pub area_outline: Option<AreaOutline>,
    pub handle: Option<OverlayBox>,
    pub extend_to: Option<OverlayBox>,
    pub extend_to_clip: Option<ClipRect>,
    pub editor: OverlayBox,
}

/// Clip for an overlay whose start is scrolled out behind the frozen panes,
/// so it never paints over them or the headers.
fn clip_behind_frozen<M: SheetModel + ?Sized>(
    layout: &SheetLayout<'_, M>,
    bounds: OverlayBox,
    include_frozen_rows: bool,
    include_frozen_columns: bool,
) -> Option<ClipRect> {
    if !include_frozen_rows && !include_frozen_columns {
        return None;
    }
    let config = layout.config();
    let frozen_width = if include_frozen_columns {
        layout.frozen_columns_width()
    } else {
        0.0
    };
    let frozen_height = if include_frozen_rows {
        layout.frozen_rows_height()
    } else {
        0.0
    };
    let x_min = config.header_column_width + frozen_width;
    let y_min = config.header_row_height + frozen_height;
    let x_max = layout.width();
    let y_max = layout.height();
    let OverlayBox {
        x,
        y,
        width,
        height,
    } = bounds;
    Some(ClipRect {
        top: if y < y_min { y_min - y } else { 0.0 },
        left: if x < x_min { x_min - x } else { 0.0 },
        right: if x + width > x_max { x_max - x } else { width + 4.0 },
        bottom: if y + height > y_max { y_max - y } else { height + 4.0 },
    })
}

/// Place every DOM overlay for the current selection and edit state.
pub fn compute_overlays<M: SheetModel + ?Sized>(
    layout: &SheetLayout<'_, M>,
    state: &WorkbookState,
) -> Overlays {
    let (cell_outline, area_outline, handle) = if state.is_editing() {
        (None, None, None)
    } else {
        selection_overlays(layout)
    };
    let (extend_to, extend_to_clip) = match extend_to_box(layout, state) {
        Some((bounds, clip)) => (Some(bounds), clip),
        None => (None, None),
    };
    Overlays {
        cell_outline,
        area_outline,
        handle,
        extend_to,
        extend_to_clip,
        editor: editor_box(layout, state),
    }
}

fn selection_overlays<M: SheetModel + ?Sized>(
    layout: &SheetLayout<'_, M>,
) -> (Option<OverlayBox>, Option<AreaOutline>, Option<OverlayBox>) {
    let view = layout.model().selected_view();
    let frozen_rows = layout.frozen_rows();
    let frozen_columns = layout.frozen_columns();
    let top_left = layout.top_left();
    let handle_size = layout.config().handle_size;

    let active_hidden =
        layout.is_row_scrolled_out(view.row) || layout.is_column_scrolled_out(view.column);
    let (x, y) = layout.coordinates_by_cell(view.row, view.column);
    let cell_outline = (!active_hidden).then(|| OverlayBox {
        x: x - 1.0,
        y: y - 1.0,
        width: layout.column_width(view.column) - 1.0,
        height: layout.row_height(view.row) - 1.0,
    });

    let area = view.area();
    let place_handle = |corner_x: f64, corner_y: f64| OverlayBox {
        x: corner_x - handle_size / 2.0 - 1.0,
        y: corner_y - handle_size / 2.0 - 1.0,
        width: handle_size,
        height: handle_size,
    };

    if area.is_single_cell() {
        let (hx, hy) = layout.coordinates_by_cell(area.row_start, area.column_start);
        let handle = (!active_hidden).then(|| {
            place_handle(
                hx + layout.column_width(area.column_start),
                hy + layout.row_height(area.row_start),
            )
        });
        return (cell_outline, None, handle);
    }

    let rect = layout.area_rect(&area);
    let bounds = OverlayBox {
        x: rect.x,
        y: rect.y,
        width: rect.width - 1.0,
        height: rect.height - 1.0,
    };
    let clip = clip_behind_frozen(
        layout,
        OverlayBox {
            width: rect.width - 2.0,
            height: rect.height - 2.0,
            ..bounds
        },
        layout.is_row_scrolled_out(area.row_start),
        layout.is_column_scrolled_out(area.column_start),
    );

    // The last row/column sits in the scrolled-out band (the one right
    // before the origin still shows its corner).
    let end_row_hidden = area.row_end > frozen_rows && area.row_end < top_left.row - 1;
    let end_column_hidden =
        area.column_end > frozen_columns && area.column_end < top_left.column - 1;
    let straddles_rows = area.row_start <= frozen_rows && area.row_end > frozen_rows;
    let straddles_columns = area.column_start <= frozen_columns && area.column_end > frozen_columns;
    let draw_bottom = !(straddles_rows && end_row_hidden);
    let draw_right = !(straddles_columns && end_column_hidden);

    let handle = (!end_row_hidden && !end_column_hidden)
        .then(|| place_handle(rect.x + rect.width, rect.y + rect.height));
    let area_outline = AreaOutline {
        bounds,
        clip,
        draw_bottom,
        draw_right,
    };
    (cell_outline, Some(area_outline), handle)
}

fn extend_to_box<M: SheetModel + ?Sized>(
    layout: &SheetLayout<'_, M>,
    state: &WorkbookState,
) -> Option<(OverlayBox, Option<ClipRect>)> {
    let area = state.extend_to_area()?.area();
    let rect = layout.area_rect(&area);
    let bounds = OverlayBox {
        x: rect.x,
        y: rect.y,
        width: rect.width - 1.0,
        height: rect.height - 1.0,
    };
    let clip = clip_behind_frozen(
        layout,
        bounds,
        layout.is_row_scrolled_out(area.row_start),
        layout.is_column_scrolled_out(area.column_start),
    );
    Some((bounds, clip))
}

fn editor_box<M: SheetModel + ?Sized>(
    layout: &SheetLayout<'_, M>,
    state: &WorkbookState,
) -> OverlayBox {
    match state.editing_cell() {
        Some(cell) if cell.sheet == layout.sheet() => {
            let (x, y) = layout.coordinates_by_cell(cell.row, cell.column);
            OverlayBox {
                x,
                y,
                width: cell.editor_width - 3.0,
                height: cell.editor_height - 3.0,
            }
        }
        _ => OverlayBox {
            x: PARKED_OFFSET,
            y: PARKED_OFFSET,
            width: 0.0,
            height: 0.0,
        },
    }
}

/// Canvas region of the pane holding the top-left cell of `area`: a block
/// that starts in the scrolled panes never paints over the frozen band or
/// the headers.
fn pane_clip<M: SheetModel + ?Sized>(layout: &SheetLayout<'_, M>, area: &CellArea) -> OverlayBox {
    let config = layout.config();
    let x = if area.column_start > layout.frozen_columns() {
        config.header_column_width + layout.frozen_columns_width()
    } else {
        config.header_column_width
    };
    let y = if area.row_start > layout.frozen_rows() {
        config.header_row_height + layout.frozen_rows_height()
    } else {
        config.header_row_height
    };
    OverlayBox {
        x,
        y,
        width: (layout.width() - x).max(0.0),
        height: (layout.height() - y).max(0.0),
    }
}

/// Marching-ants rectangle around cut cells on the shown sheet.
pub fn draw_cut_range<M, S>(surface: &mut S, layout: &SheetLayout<'_, M>, state: &WorkbookState)
where
    M: SheetModel + ?Sized,
    S: Surface + ?Sized,
{
    let Some(range) = state.cut_range() else {
        return;
    };
    if range.sheet != layout.sheet() {
        return;
    }
    let b = layout.area_rect(&range.area);
    let clip = pane_clip(layout, &range.area);
    surface.clip_rect(clip.x, clip.y, clip.width, clip.height);
    surface.set_line_dash(&CUT_DASH);
    surface.stroke_rect(b.x, b.y, b.width, b.height, 1.0, &layout.config().cut_range_color);
    surface.restore();
    surface.set_line_dash(&[]);
}

/// Ranges to highlight: the ones referenced by the formula being edited, plus
/// the reference currently being inserted in the next palette color.
pub fn active_ranges(state: &WorkbookState, config: &GridConfig) -> Vec<ActiveRange> {
    let mut ranges = state.active_ranges().to_vec();
    if let Some(referenced) = state.editing_cell().and_then(|c| c.referenced_range) {
        ranges.push(ActiveRange {
            sheet: referenced.sheet,
            area: referenced.area,
            color: config.active_range_color(ranges.len()).to_string(),
        });
    }
    ranges
}

/// Highlight active ranges that intersect the viewport, expanded by one
/// cell on each side so their borders stay visible at the edges.
pub fn draw_active_ranges<M, S>(surface: &mut S, layout: &SheetLayout<'_, M>, state: &WorkbookState)
where
    M: SheetModel + ?Sized,
    S: Surface + ?Sized,
{
    let top_left = layout.top_left();
    let bottom_right = layout.bottom_right();
    let min_row = top_left.row.saturating_sub(1).max(1);
    let max_row = (bottom_right.row + 1).min(LAST_ROW);
    let min_column = top_left.column.saturating_sub(1).max(1);
    let max_column = (bottom_right.column + 1).min(LAST_COLUMN);

    for range in active_ranges(state, layout.config()) {
        if range.sheet != layout.sheet() {
            continue;
        }
        let area = range.area;
        let visible = min_row <= area.row_end
            && area.row_start <= max_row
            && min_column <= area.column_end
            && area.column_start <= max_column;
        if !visible {
            continue;
        }
        let shown = CellArea {
            row_start: area.row_start.max(min_row),
            row_end: area.row_end.min(max_row),
            column_start: area.column_start.max(min_column),
            column_end: area.column_end.min(max_column),
        };
        let b = layout.area_rect(&shown);
        let clip = pane_clip(layout, &shown);
        surface.clip_rect(clip.x, clip.y, clip.width, clip.height);
        surface.set_line_dash(&CUT_DASH);
        surface.stroke_rect(b.x, b.y, b.width, b.height, 1.0, &range.color);
        surface.fill_rect(
            b.x,
            b.y,
            b.width,
            b.height,
            &with_alpha(&range.color, ACTIVE_RANGE_ALPHA),
        );
        surface.restore();
    }
    surface.set_line_dash(&[]);
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
    use crate::render::recording::{DrawOp, RecordingSurface};
    use crate::state::{CutRange, EditingCell, ReferencedRange};
    use crate::types::{AreaType, ExtendToArea, SelectedView};

    fn ctx() -> RenderContext {
        RenderContext::new(800.0, 600.0, 1.0)
    }

    fn model_with_view(view: SelectedView, frozen: (u32, u32)) -> MemoryModel {
        let mut model = MemoryModel::new();
        model.set_frozen(0, frozen.0, frozen.1).unwrap();
        model.set_view(view).unwrap();
        model
    }

    #[test]
    fn single_cell_selection_has_outline_and_handle_only() {
        let model = model_with_view(
            SelectedView {
                row: 2,
                column: 2,
                range: [2, 2, 2, 2],
                ..SelectedView::default()
            },
            (0, 0),
        );
        let config = GridConfig::default();
        let layout = SheetLayout::new(&model, &config, &ctx());
        let overlays = compute_overlays(&layout, &WorkbookState::new());
        assert_eq!(
            overlays.cell_outline,
            Some(OverlayBox {
                x: 129.0,
                y: 55.0,
                width: 99.0,
                height: 27.0
            })
        );
        assert!(overlays.area_outline.is_none());
        // Corner at (230, 84), 5px handle.
        let handle = overlays.handle.unwrap();
        assert_eq!((handle.x, handle.y), (226.5, 80.5));
        assert_eq!(overlays.editor.x, PARKED_OFFSET);
    }

    #[test]
    fn editing_hides_selection_overlays() {
        let model = MemoryModel::new();
        let config = GridConfig::default();
        let layout = SheetLayout::new(&model, &config, &ctx());
        let mut state = WorkbookState::new();
        state.start_editing(EditingCell::new(0, 1, 1, 120.0, 30.0));
        let overlays = compute_overlays(&layout, &state);
        assert!(overlays.cell_outline.is_none());
        assert!(overlays.handle.is_none());
        assert_eq!(
            overlays.editor,
            OverlayBox {
                x: 30.0,
                y: 28.0,
                width: 117.0,
                height: 27.0
            }
        );
        state.stop_editing();
        assert!(compute_overlays(&layout, &state).cell_outline.is_some());
    }

    #[test]
    fn scrolled_out_area_start_is_clipped() {
        let model = model_with_view(
            SelectedView {
                row: 2,
                column: 1,
                range: [2, 1, 12, 2],
                top_row: 5,
                ..SelectedView::default()
            },
            (1, 0),
        );
        let config = GridConfig::default();
        let layout = SheetLayout::new(&model, &config, &ctx());
        let overlays = compute_overlays(&layout, &WorkbookState::new());
        // The active cell (row 2) is scrolled out behind frozen row 1.
        assert!(overlays.cell_outline.is_none());
        let area = overlays.area_outline.unwrap();
        let clip = area.clip.unwrap();
        // Frozen band ends at 28 + 28 + 3 = 59; row 2 is drawn at 59 - 84 = -25.
        assert_eq!(area.bounds.y, -25.0);
        assert_eq!(clip.top, 84.0);
        assert_eq!(clip.left, 0.0);
        assert!(area.draw_bottom);
        assert!(overlays.handle.is_some());
    }

    #[test]
    fn straddling_selection_scrolled_past_drops_bottom_and_handle() {
        let model = model_with_view(
            SelectedView {
                row: 1,
                column: 1,
                range: [1, 1, 4, 1],
                top_row: 20,
                ..SelectedView::default()
            },
            (2, 0),
        );
        let config = GridConfig::default();
        let layout = SheetLayout::new(&model, &config, &ctx());
        let overlays = compute_overlays(&layout, &WorkbookState::new());
        let area = overlays.area_outline.unwrap();
        assert!(!area.draw_bottom);
        assert!(area.draw_right);
        assert!(overlays.handle.is_none());
        // Reaches the end of the frozen band.
        assert_eq!(area.bounds.height, 56.0 - 1.0);
    }

    #[test]
    fn extend_to_preview_box() {
        let model = MemoryModel::new();
        let config = GridConfig::default();
        let layout = SheetLayout::new(&model, &config, &ctx());
        let mut state = WorkbookState::new();
        state.set_extend_to_area(Some(ExtendToArea {
            area_type: AreaType::RowsDown,
            row_start: 3,
            row_end: 4,
            column_start: 1,
            column_end: 1,
        }));
        let b = compute_overlays(&layout, &state).extend_to.unwrap();
        assert_eq!((b.x, b.y, b.width, b.height), (30.0, 84.0, 99.0, 55.0));
    }

    #[test]
    fn cut_range_is_dashed_red() {
        let model = MemoryModel::new();
        let config = GridConfig::default();
        let layout = SheetLayout::new(&model, &config, &ctx());
        let mut state = WorkbookState::new();
        state.set_cut_range(Some(CutRange {
            sheet: 0,
            area: CellArea::from_corners(1, 1, 2, 2),
        }));
        let mut surface = RecordingSurface::new();
        draw_cut_range(&mut surface, &layout, &state);
        assert_eq!(
            surface.ops,
            vec![
                DrawOp::Clip {
                    x: 30.0,
                    y: 28.0,
                    width: 770.0,
                    height: 572.0,
                },
                DrawOp::StrokeRect {
                    x: 30.0,
                    y: 28.0,
                    width: 200.0,
                    height: 56.0,
                    line_width: 1.0,
                    color: "red".to_string(),
                    dashed: true,
                },
                DrawOp::Restore,
            ]
        );

        state.set_cut_range(Some(CutRange {
            sheet: 1,
            area: CellArea::cell(1, 1),
        }));
        surface.reset();
        draw_cut_range(&mut surface, &layout, &state);
        assert!(surface.ops.is_empty());
    }

    fn frozen_rows_scrolled_to(top_row: u32) -> MemoryModel {
        model_with_view(
            SelectedView {
                top_row,
                ..SelectedView::default()
            },
            (2, 0),
        )
    }

    fn cut_rows(model: &MemoryModel, rows: (u32, u32)) -> RecordingSurface {
        let config = GridConfig::default();
        let layout = SheetLayout::new(model, &config, &ctx());
        let mut state = WorkbookState::new();
        state.set_cut_range(Some(CutRange {
            sheet: 0,
            area: CellArea::from_corners(rows.0, 1, rows.1, 1),
        }));
        let mut surface = RecordingSurface::new();
        draw_cut_range(&mut surface, &layout, &state);
        surface
    }

    #[test]
    fn frozen_cut_range_keeps_its_size_when_scrolled() {
        let model = frozen_rows_scrolled_to(50);
        let surface = cut_rows(&model, (1, 2));
        assert_eq!(
            surface.ops[0],
            DrawOp::Clip {
                x: 30.0,
                y: 28.0,
                width: 770.0,
                height: 572.0,
            }
        );
        let DrawOp::StrokeRect { x, y, width, height, .. } = surface.ops[1] else {
            panic!("expected a rectangle, got {:?}", surface.ops[1]);
        };
        assert_eq!((x, y, width, height), (30.0, 28.0, 100.0, 56.0));
        assert_eq!(surface.ops[2], DrawOp::Restore);
    }

    #[test]
    fn scrolled_out_cut_range_is_clipped_below_frozen_band() {
        let model = frozen_rows_scrolled_to(50);
        let surface = cut_rows(&model, (10, 52));
        // Header 28 plus frozen band 2 * 28 + 3.
        assert_eq!(
            surface.ops[0],
            DrawOp::Clip {
                x: 30.0,
                y: 87.0,
                width: 770.0,
                height: 513.0,
            }
        );
        let DrawOp::StrokeRect { y, height, .. } = surface.ops[1] else {
            panic!("expected a rectangle, got {:?}", surface.ops[1]);
        };
        // Starts 40 rows above row 50 and ends after row 52.
        assert_eq!(y, 87.0 - 40.0 * 28.0);
        assert_eq!(y + height, 87.0 + 3.0 * 28.0);
        assert!(height > 0.0);
    }

    #[test]
    fn cut_range_straddling_frozen_rows_reaches_band_end() {
        let model = frozen_rows_scrolled_to(50);
        let surface = cut_rows(&model, (2, 10));
        let DrawOp::StrokeRect { y, height, .. } = surface.ops[1] else {
            panic!("expected a rectangle, got {:?}", surface.ops[1]);
        };
        assert_eq!((y, height), (56.0, 28.0));
        assert!(matches!(surface.ops[0], DrawOp::Clip { y: 28.0, .. }));
    }

    #[test]
    fn extend_to_behind_frozen_rows_is_clipped() {
        let model = frozen_rows_scrolled_to(10);
        let config = GridConfig::default();
        let layout = SheetLayout::new(&model, &config, &ctx());
        let mut state = WorkbookState::new();
        state.set_extend_to_area(Some(ExtendToArea {
            area_type: AreaType::RowsDown,
            row_start: 8,
            row_end: 12,
            column_start: 1,
            column_end: 1,
        }));
        let overlays = compute_overlays(&layout, &state);
        let b = overlays.extend_to.unwrap();
        // Row 8 sits two rows above the first scrolled row at y = 87.
        assert_eq!(b.y, 87.0 - 56.0);
        let clip = overlays.extend_to_clip.unwrap();
        assert_eq!(clip.top, 56.0);
        assert_eq!(clip.left, 0.0);

        state.set_extend_to_area(Some(ExtendToArea {
            area_type: AreaType::RowsDown,
            row_start: 11,
            row_end: 12,
            column_start: 1,
            column_end: 1,
        }));
        assert!(compute_overlays(&layout, &state).extend_to_clip.is_none());
    }

    #[test]
    fn active_ranges_are_clamped_and_tinted() {
        let model = MemoryModel::new();
        let config = GridConfig::default();
        let layout = SheetLayout::new(&model, &config, &ctx());
        let mut state = WorkbookState::new();
        let mut editing = EditingCell::new(0, 1, 1, 100.0, 28.0);
        editing.is_formula = true;
        editing.referenced_range = Some(ReferencedRange {
            sheet: 0,
            area: CellArea::from_corners(2, 2, 500, 2),
        });
        state.start_editing(editing);
        state.set_active_ranges(vec![ActiveRange {
            sheet: 0,
            area: CellArea::cell(1, 1),
            color: "#59B9BC".to_string(),
        }]);

        let ranges = active_ranges(&state, &config);
        assert_eq!(ranges[1].color, "#EC5753");

        let mut surface = RecordingSurface::new();
        draw_active_ranges(&mut surface, &layout, &state);
        let fills: Vec<_> = surface
            .ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::FillRect { height, color, .. } => Some((*height, color.clone())),
                _ => None,
            })
            .collect();
        // Rows 2..=22 only: the viewport ends at row 21.
        assert_eq!(
            fills,
            vec![
                (28.0, "rgba(89, 185, 188, 0.1)".to_string()),
                (21.0 * 28.0, "rgba(236, 87, 83, 0.1)".to_string()),
            ]
        );
    }
}
