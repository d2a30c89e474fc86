//! Text spill, border ownership and paint order of a full frame.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use common::{config, ctx, lines_at, render, SheetBuilder};
use xlgrid::render::text::compute_cells_text;
use xlgrid::render::{normalize_color, DrawOp};
use xlgrid::types::{
    Alignment, Border, BorderItem, BorderStyle, CellStyle, Fill, HorizontalAlignment,
};
use xlgrid::{RecordingSurface, SheetLayout};

const LONG: &str = "a label that is far too long to fit";

fn aligned(horizontal: HorizontalAlignment, wrap_text: bool) -> CellStyle {
    CellStyle {
        alignment: Some(Alignment {
            horizontal,
            wrap_text,
            ..Alignment::default()
        }),
        ..CellStyle::default()
    }
}

fn filled(color: &str) -> CellStyle {
    CellStyle {
        fill: Fill {
            fg_color: Some(color.to_string()),
        },
        ..CellStyle::default()
    }
}

// ============================================================================
// Text spill
// ============================================================================

#[test]
fn spill_runs_right_until_a_non_empty_cell() {
    let (surface, frame) = render(SheetBuilder::new().text(1, 1, LONG).text(1, 3, "x").build());
    assert_eq!(frame.spills, vec![(1, 2)]);
    // Row 1 loses the A|B edge but keeps B|C; row 2 keeps both.
    assert!(lines_at(&surface, 130.0, 28.0, 130.0, 56.0).is_empty());
    assert_eq!(lines_at(&surface, 230.0, 28.0, 230.0, 56.0).len(), 1);
    assert_eq!(lines_at(&surface, 130.0, 56.0, 130.0, 84.0).len(), 1);
}

#[test]
fn right_aligned_text_spills_left() {
    let model = SheetBuilder::new()
        .text(1, 3, LONG)
        .style(1, 3, aligned(HorizontalAlignment::Right, false))
        .build();
    let (_, frame) = render(model);
    // 35 chars at 7.8px reach back into column A.
    assert_eq!(frame.spills, vec![(1, 2), (1, 3)]);
}

#[test]
fn wrapped_text_never_spills() {
    let model = SheetBuilder::new()
        .text(1, 1, "aaa bbb ccc ddd eee fff")
        .style(1, 1, aligned(HorizontalAlignment::General, true))
        .build();
    let (surface, frame) = render(model);
    assert!(frame.spills.is_empty());
    // 96px of room: three words per line.
    assert!(surface.texts().any(|t| t == "aaa bbb ccc"));
    assert!(surface.texts().any(|t| t == "ddd eee fff"));
}

#[test]
fn spill_stops_at_the_frozen_boundary() {
    let config = config();
    let ctx = ctx();
    let mut surface = RecordingSurface::new();

    // Frozen text cannot flow into the scrolled pane...
    let model = SheetBuilder::new().frozen(0, 1).text(1, 1, LONG).build();
    let layout = SheetLayout::new(&model, &config, &ctx);
    let text = compute_cells_text(&layout, &mut surface);
    assert!(text.spills.is_empty());
    let a1 = text.layouts.iter().find(|t| t.column == 1).unwrap();
    assert_eq!(a1.x + a1.width, 130.0);

    // ...and scrolled text cannot flow back over the frozen columns.
    let model = SheetBuilder::new()
        .frozen(0, 1)
        .text(1, 2, LONG)
        .style(1, 2, aligned(HorizontalAlignment::Right, false))
        .build();
    let layout = SheetLayout::new(&model, &config, &ctx);
    let text = compute_cells_text(&layout, &mut surface);
    assert!(text.spills.is_empty());
    let b1 = text.layouts.iter().find(|t| t.column == 2).unwrap();
    assert_eq!(b1.x, 133.0);
}

#[test]
fn off_screen_anchor_still_spills_into_view() {
    let text = "x".repeat(50);
    let model = SheetBuilder::new().origin(1, 5).text(1, 3, &text).build();
    let (surface, frame) = render(model);
    // Column C is scrolled out; its text covers D (out of view), E and F.
    assert_eq!(frame.spills, vec![(1, 4), (1, 5), (1, 6)]);
    assert!(surface.texts().any(|t| t == text));
    assert!(lines_at(&surface, 130.0, 28.0, 130.0, 56.0).is_empty());
}

#[test]
fn numbers_align_right_by_default() {
    let config = config();
    let ctx = ctx();
    let model = SheetBuilder::new().number(1, 1, "42").text(2, 1, "ab").build();
    let layout = SheetLayout::new(&model, &config, &ctx);
    let mut surface = RecordingSurface::new();
    let text = compute_cells_text(&layout, &mut surface);
    let number = &text.layouts.iter().find(|t| t.row == 1).unwrap().lines[0];
    let label = &text.layouts.iter().find(|t| t.row == 2).unwrap().lines[0];
    // Right edge minus padding minus half the width, and left plus padding plus half.
    assert!((number.x - (130.0 - 4.0 - 7.8)).abs() < 1e-9);
    assert!((label.x - (30.0 + 4.0 + 7.8)).abs() < 1e-9);
}

// ============================================================================
// Borders
// ============================================================================

#[test]
fn every_interior_edge_is_painted_once() {
    let (surface, _) = render(SheetBuilder::new().build());
    for row in 2..=5_u32 {
        for column in 2..=5_u32 {
            let x = 30.0 + 100.0 * f64::from(column - 1);
            let y = 28.0 + 28.0 * f64::from(row - 1);
            assert_eq!(lines_at(&surface, x, y, x, y + 28.0).len(), 1, "left of {row}:{column}");
            assert_eq!(lines_at(&surface, x, y, x + 100.0, y).len(), 1, "top of {row}:{column}");
        }
    }
}

#[test]
fn neighbor_border_is_mirrored_onto_shared_edge() {
    let right = BorderItem {
        style: BorderStyle::Medium,
        color: Some("#FF0000".to_string()),
    };
    let model = SheetBuilder::new()
        .style(
            2,
            2,
            CellStyle {
                border: Border {
                    right: Some(right),
                    ..Border::default()
                },
                ..CellStyle::default()
            },
        )
        .build();
    let (surface, _) = render(model);
    // B2's right edge is C2's left edge, painted by C2.
    let lines = lines_at(&surface, 230.0, 56.0, 230.0, 84.0);
    assert_eq!(lines.len(), 1);
    match &lines[0] {
        DrawOp::Line {
            line_width, color, ..
        } => {
            assert_eq!(*line_width, 2.0);
            assert_eq!(*color, normalize_color("#FF0000"));
        }
        other => panic!("unexpected op {other:?}"),
    }
}

#[test]
fn fill_color_wins_over_grid_color() {
    let model = SheetBuilder::new().style(2, 2, filled("#FFFF00")).build();
    let (surface, _) = render(model);
    let yellow = normalize_color("#FFFF00");
    let color_of = |x1, y1, x2, y2| match lines_at(&surface, x1, y1, x2, y2).first() {
        Some(DrawOp::Line { color, .. }) => color.clone(),
        other => panic!("no line: {other:?}"),
    };
    // Own left edge, right neighbor's left edge and the cell below's top edge.
    assert_eq!(color_of(130.0, 56.0, 130.0, 84.0), yellow);
    assert_eq!(color_of(230.0, 56.0, 230.0, 84.0), yellow);
    assert_eq!(color_of(130.0, 84.0, 230.0, 84.0), yellow);
    assert_eq!(color_of(330.0, 56.0, 330.0, 84.0), config().grid_color);
}

#[test]
fn hidden_grid_lines_paint_with_the_fill() {
    let (surface, _) = render(SheetBuilder::new().hide_grid_lines().build());
    let grid_color = config().grid_color;
    let fill = config().default_fill_color;
    let cell_lines: Vec<_> = surface
        .lines()
        .filter(|(x1, y1, ..)| *x1 >= 30.0 && *y1 >= 28.0)
        .collect();
    assert!(!cell_lines.is_empty());
    assert!(cell_lines.iter().all(|(.., color)| *color != grid_color));
    assert!(cell_lines.iter().any(|(.., color)| *color == fill));
}
