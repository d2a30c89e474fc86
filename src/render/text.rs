//! Cell text layout: fonts, alignment, line wrapping and spill.
//!
//! Text is laid out for every visible cell (plus the nearest off-screen
//! cells whose text may reach into view) before anything is painted, because
//! the border pass needs to know which left edges are covered by spilled text.

use std::collections::HashSet;

use log::trace;

use crate::cell_ref::LAST_COLUMN;
use crate::config::GridConfig;
use crate::layout::{CellRect, SheetLayout};
use crate::model::SheetModel;
use crate::types::{CellStyle, CellType, HorizontalAlignment, VerticalAlignment};

use super::surface::{Surface, TextMeasure};

/// Resolved font of a cell.
#[derive(Debug, Clone, PartialEq)]
pub struct FontSpec {
    /// CSS font shorthand, e.g. `"italic bold 13px Inter, sans-serif"`
    pub css: String,
    pub size: f64,
    pub color: String,
    pub underline: bool,
    pub strike: bool,
}

pub fn font_spec(style: &CellStyle, config: &GridConfig) -> FontSpec {
    let font = &style.font;
    let size = if font.sz > 0.0 {
        font.sz
    } else {
        config.default_font_size
    };
    let weight = if font.b { "bold" } else { "400" };
    let italic = if font.i { "italic " } else { "" };
    FontSpec {
        css: format!("{italic}{weight} {size}px {}", config.cell_font_family),
        size,
        color: font
            .color
            .as_deref()
            .filter(|c| !c.is_empty())
            .unwrap_or(config.default_text_color.as_str())
            .to_string(),
        underline: font.u,
        strike: font.strike,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VAlign {
    Top,
    Center,
    Bottom,
}

/// Effective alignment. "General" follows the value type: numbers right,
/// booleans centered, everything else left.
pub fn resolve_alignment(style: &CellStyle, cell_type: CellType) -> (HAlign, VAlign) {
    let (horizontal, vertical) = style
        .alignment
        .as_ref()
        .map_or((HorizontalAlignment::General, VerticalAlignment::Bottom), |a| {
            (a.horizontal, a.vertical)
        });
    let h = match horizontal {
        HorizontalAlignment::General => match cell_type {
            CellType::Number => HAlign::Right,
            CellType::LogicalValue => HAlign::Center,
            _ => HAlign::Left,
        },
        HorizontalAlignment::Right => HAlign::Right,
        HorizontalAlignment::Center | HorizontalAlignment::CenterContinuous => HAlign::Center,
        _ => HAlign::Left,
    };
    let v = match vertical {
        VerticalAlignment::Bottom => VAlign::Bottom,
        VerticalAlignment::Center => VAlign::Center,
        _ => VAlign::Top,
    };
    (h, v)
}

/// Split text into display lines.
///
/// Explicit newlines always break. With `wrap` set, words are packed greedily
/// while the measured line stays strictly narrower than `max_width`; a single
/// word wider than that still gets a line of its own.
pub fn wrap_lines<T: TextMeasure + ?Sized>(
    measure: &mut T,
    text: &str,
    wrap: bool,
    max_width: f64,
) -> Vec<String> {
    if !wrap {
        return text.split('\n').map(str::to_string).collect();
    }
    let mut lines = Vec::new();
    for raw in text.split('\n') {
        let mut words = raw.split(' ');
        let mut current = words.next().unwrap_or_default().to_string();
        for word in words {
            let candidate = format!("{current} {word}");
            if measure.measure_text(&candidate) < max_width {
                current = candidate;
            } else {
                lines.push(std::mem::replace(&mut current, word.to_string()));
            }
        }
        lines.push(current);
    }
    lines
}

/// One laid-out line: text centered on `(x, y)`.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
}

/// Text of one cell, ready to paint.
///
/// `x` and `width` describe the clip box, which is wider than the cell when
/// the text spills into empty neighbors.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLayout {
    pub row: u32,
    pub column: u32,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub font: FontSpec,
    pub lines: Vec<TextLine>,
}

/// Cells whose left border is covered by spilled text.
///
/// Only left edges are ever painted, so a spill that crosses the shared edge
/// of columns `c` and `c + 1` is recorded against `(row, c + 1)`.
#[derive(Debug, Clone, Default)]
pub struct SpillRegistry {
    marks: HashSet<(u32, u32)>,
}

impl SpillRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark(&mut self, row: u32, column: u32) {
        self.marks.insert((row, column));
    }

    pub fn suppresses_left_border(&self, row: u32, column: u32) -> bool {
        self.marks.contains(&(row, column))
    }

    pub fn len(&self) -> usize {
        self.marks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }

    pub fn clear(&mut self) {
        self.marks.clear();
    }

    /// Marks in row-major order.
    pub fn sorted(&self) -> Vec<(u32, u32)> {
        let mut marks: Vec<_> = self.marks.iter().copied().collect();
        marks.sort_unstable();
        marks
    }
}

/// Everything the text pass produced for one frame.
#[derive(Debug, Default)]
pub struct TextFrame {
    pub layouts: Vec<TextLayout>,
    pub spills: SpillRegistry,
}

/// Lay out the text of one cell drawn at `rect`, extending its clip box over
/// empty neighbors and recording the spill.
///
/// Spill never crosses the boundary between frozen and scrolled columns, in
/// either direction. Empty cells produce no layout.
pub fn compute_cell_text<M, T>(
    layout: &SheetLayout<'_, M>,
    measure: &mut T,
    spills: &mut SpillRegistry,
    row: u32,
    column: u32,
    rect: CellRect,
) -> Option<TextLayout>
where
    M: SheetModel + ?Sized,
    T: TextMeasure + ?Sized,
{
    let model = layout.model();
    let sheet = layout.sheet();
    let config = layout.config();
    let text = model.formatted_cell_value(sheet, row, column);
    if text.is_empty() {
        return None;
    }
    let style = model.cell_style(sheet, row, column);
    let font = font_spec(&style, config);
    let (h_align, v_align) = resolve_alignment(&style, model.cell_type(sheet, row, column));

    measure.set_font(&font.css);
    let raw_lines = wrap_lines(measure, &text, style.wrap_text(), rect.width - config.cell_padding);
    let line_height = config.line_height(font.size);
    let padding = config.cell_padding;
    let v_padding = config.text_vertical_padding;
    let CellRect {
        x,
        y,
        width,
        height,
    } = rect;

    let count = raw_lines.len();
    let mut min_x = x;
    let mut max_x = x + width;
    let mut lines = Vec::with_capacity(count);
    for (index, text) in raw_lines.into_iter().enumerate() {
        let text_width = measure.measure_text(&text);
        let line = line_offset(index, count);
        let text_x = match h_align {
            HAlign::Right => x + width - padding - text_width / 2.0,
            HAlign::Center => x + width / 2.0,
            HAlign::Left => x + padding + text_width / 2.0,
        };
        let text_y = match v_align {
            VAlign::Bottom => {
                y + height - font.size / 2.0 - v_padding
                    + (line.index - line.count + 1.0) * line_height
            }
            VAlign::Center => {
                y + height / 2.0 + (line.index + (1.0 - line.count) / 2.0) * line_height
            }
            VAlign::Top => y + font.size / 2.0 + v_padding + line.index * line_height,
        };
        min_x = min_x.min(text_x - text_width / 2.0);
        max_x = max_x.max(text_x + text_width / 2.0);
        lines.push(TextLine {
            text,
            x: text_x,
            y: text_y,
            width: text_width,
        });
    }

    let is_empty = |c: u32| model.formatted_cell_value(sheet, row, c).is_empty();
    let anchor_frozen = layout.is_frozen_column(column);
    let same_side = |c: u32| layout.is_frozen_column(c) == anchor_frozen;

    let mut left_x = x;
    let mut right_x = x + width;
    if max_x > right_x && column < LAST_COLUMN && is_empty(column + 1) {
        let mut spill = column + 1;
        while right_x < max_x && spill <= LAST_COLUMN && same_side(spill) && is_empty(spill) {
            right_x += layout.column_width(spill);
            spills.mark(row, spill);
            trace!("text of {row}:{column} spills right over column {spill}");
            spill += 1;
        }
    }
    if min_x < left_x && column > 1 && is_empty(column - 1) {
        let mut spill = column - 1;
        while left_x > min_x && spill >= 1 && same_side(spill) && is_empty(spill) {
            left_x -= layout.column_width(spill);
            spills.mark(row, spill + 1);
            trace!("text of {row}:{column} spills left over column {spill}");
            spill -= 1;
        }
    }

    let frozen_columns = layout.frozen_columns();
    if frozen_columns > 0 {
        let (frozen_x, _) = layout.coordinates_by_cell(row, frozen_columns);
        let frozen_x = frozen_x + layout.column_width(frozen_columns);
        if anchor_frozen {
            right_x = right_x.min(frozen_x);
        } else {
            left_x = left_x.max(frozen_x);
        }
    }

    Some(TextLayout {
        row,
        column,
        x: left_x,
        y,
        width: (right_x - left_x).max(0.0),
        height,
        font,
        lines,
    })
}

struct LineOffset {
    index: f64,
    count: f64,
}

fn line_offset(index: usize, count: usize) -> LineOffset {
    // Line counts are bounded by the text length of a single cell.
    #[allow(clippy::cast_precision_loss)]
    LineOffset {
        index: index as f64,
        count: count as f64,
    }
}

/// Lay out the text of every cell that can appear in this frame.
///
/// For each frozen and visible scrolled row this includes the nearest
/// non-empty cell left of the viewport (unless it is frozen, in which case
/// it is already laid out) and the nearest one right of it.
pub fn compute_cells_text<M, T>(layout: &SheetLayout<'_, M>, measure: &mut T) -> TextFrame
where
    M: SheetModel + ?Sized,
    T: TextMeasure + ?Sized,
{
    let mut frame = TextFrame::default();
    let model = layout.model();
    let sheet = layout.sheet();
    let top_left = layout.top_left();
    let bottom_right = layout.bottom_right();
    let frozen_columns = layout.frozen_columns();

    let rows = (1..=layout.frozen_rows()).chain(top_left.row..=bottom_right.row);
    for row in rows {
        let before = model
            .last_non_empty_in_row_before_column(sheet, row, top_left.column)
            .filter(|&c| c > frozen_columns);
        let after = model.first_non_empty_in_row_after_column(sheet, row, bottom_right.column);
        for column in before.into_iter().chain(after) {
            let rect = layout.cell_rect(row, column);
            if let Some(text) = compute_cell_text(layout, measure, &mut frame.spills, row, column, rect)
            {
                frame.layouts.push(text);
            }
        }
    }

    for pane in layout.panes() {
        for row in pane.rows() {
            for column in pane.columns() {
                let rect = layout.cell_rect(row, column);
                if let Some(text) =
                    compute_cell_text(layout, measure, &mut frame.spills, row, column, rect)
                {
                    frame.layouts.push(text);
                }
            }
        }
    }
    frame
}

/// Paint one text layout, clipped to its (possibly spilled) box.
pub fn paint_cell_text<S: Surface + ?Sized>(surface: &mut S, text: &TextLayout) {
    let font = &text.font;
    surface.set_font(&font.css);
    surface.clip_rect(text.x, text.y, text.width, text.height);
    for line in &text.lines {
        surface.fill_text(&line.text, line.x, line.y, &font.color);
        let half = line.width / 2.0;
        if font.underline {
            let offset = (font.size / 2.0).floor();
            surface.stroke_line(
                line.x - half,
                line.y + offset,
                line.x + half,
                line.y + offset,
                1.0,
                &font.color,
            );
        }
        if font.strike {
            surface.stroke_line(line.x - half, line.y, line.x + half, line.y, 1.0, &font.color);
        }
    }
    surface.restore();
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
    use crate::types::{Alignment, Font};

    fn ctx() -> RenderContext {
        RenderContext::new(800.0, 600.0, 1.0)
    }

    fn aligned(horizontal: HorizontalAlignment, vertical: VerticalAlignment) -> CellStyle {
        CellStyle {
            alignment: Some(Alignment {
                horizontal,
                vertical,
                wrap_text: false,
            }),
            ..CellStyle::default()
        }
    }

    #[test]
    fn font_string_carries_weight_and_slant() {
        let config = GridConfig::default();
        let plain = font_spec(&CellStyle::default(), &config);
        assert_eq!(plain.css, "400 13px Inter, sans-serif");
        assert_eq!(plain.color, "#2E414D");

        let style = CellStyle {
            font: Font {
                sz: 16.0,
                b: true,
                i: true,
                color: Some("#FF0000".to_string()),
                ..Font::default()
            },
            ..CellStyle::default()
        };
        let spec = font_spec(&style, &config);
        assert_eq!(spec.css, "italic bold 16px Inter, sans-serif");
        assert_eq!(spec.color, "#FF0000");
    }

    #[test]
    fn general_alignment_follows_value_type() {
        let style = CellStyle::default();
        assert_eq!(resolve_alignment(&style, CellType::Number).0, HAlign::Right);
        assert_eq!(resolve_alignment(&style, CellType::LogicalValue).0, HAlign::Center);
        assert_eq!(resolve_alignment(&style, CellType::Text), (HAlign::Left, VAlign::Bottom));
        let style = aligned(HorizontalAlignment::CenterContinuous, VerticalAlignment::Justify);
        assert_eq!(resolve_alignment(&style, CellType::Number), (HAlign::Center, VAlign::Top));
    }

    #[test]
    fn wrapping_packs_words_greedily() {
        let mut surface = RecordingSurface::new();
        // 7.8 px per character at 13px.
        let lines = wrap_lines(&mut surface, "aa bb cc\ndd", true, 50.0);
        assert_eq!(lines, vec!["aa bb", "cc", "dd"]);
        let lines = wrap_lines(&mut surface, "aa bb cc\ndd", false, 50.0);
        assert_eq!(lines, vec!["aa bb cc", "dd"]);
        let lines = wrap_lines(&mut surface, "enormousword", true, 10.0);
        assert_eq!(lines, vec!["enormousword"]);
    }

    #[test]
    fn anchors_follow_alignment() {
        let mut model = MemoryModel::new();
        model.set_text(1, 1, "ab").unwrap();
        model
            .set_style(0, 1, 1, aligned(HorizontalAlignment::Right, VerticalAlignment::Top))
            .unwrap();
        let config = GridConfig::default();
        let layout = SheetLayout::new(&model, &config, &ctx());
        let mut surface = RecordingSurface::new();
        let mut spills = SpillRegistry::new();
        let rect = layout.cell_rect(1, 1);
        let text = compute_cell_text(&layout, &mut surface, &mut spills, 1, 1, rect).unwrap();
        let line = &text.lines[0];
        // Right: 30 + 100 - 4 - 15.6 / 2; top: 28 + 6.5 + 4.
        assert!((line.x - 118.2).abs() < 1e-9);
        assert_eq!(line.y, 38.5);
    }

    #[test]
    fn bottom_aligned_lines_stack_upwards() {
        let mut model = MemoryModel::new();
        model.set_text(1, 1, "a\nb").unwrap();
        let config = GridConfig::default();
        let layout = SheetLayout::new(&model, &config, &ctx());
        let mut surface = RecordingSurface::new();
        let mut spills = SpillRegistry::new();
        let rect = layout.cell_rect(1, 1);
        let text = compute_cell_text(&layout, &mut surface, &mut spills, 1, 1, rect).unwrap();
        // Last line sits at 28 + 28 - 6.5 - 4, the first one line height above.
        assert_eq!(text.lines[1].y, 45.5);
        assert_eq!(text.lines[0].y, 45.5 - 19.5);
    }

    #[test]
    fn empty_cells_have_no_layout() {
        let model = MemoryModel::new();
        let config = GridConfig::default();
        let layout = SheetLayout::new(&model, &config, &ctx());
        let mut surface = RecordingSurface::new();
        let mut spills = SpillRegistry::new();
        let rect = layout.cell_rect(1, 1);
        assert!(compute_cell_text(&layout, &mut surface, &mut spills, 1, 1, rect).is_none());
    }

    #[test]
    fn long_text_spills_right_over_empty_cells() {
        let mut model = MemoryModel::new();
        // 20 chars = 156 px: needs column 2 as well.
        model.set_text(1, 1, "aaaaaaaaaaaaaaaaaaaa").unwrap();
        let config = GridConfig::default();
        let layout = SheetLayout::new(&model, &config, &ctx());
        let mut surface = RecordingSurface::new();
        let frame = compute_cells_text(&layout, &mut surface);
        assert_eq!(frame.spills.sorted(), vec![(1, 2)]);
        let text = &frame.layouts[0];
        assert_eq!((text.x, text.width), (30.0, 200.0));
    }

    #[test]
    fn spill_stops_at_non_empty_cell() {
        let mut model = MemoryModel::new();
        model.set_text(1, 1, "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa").unwrap();
        model.set_text(1, 3, "x").unwrap();
        let config = GridConfig::default();
        let layout = SheetLayout::new(&model, &config, &ctx());
        let mut surface = RecordingSurface::new();
        let frame = compute_cells_text(&layout, &mut surface);
        assert_eq!(frame.spills.sorted(), vec![(1, 2)]);
    }

    #[test]
    fn right_aligned_text_spills_left() {
        let mut model = MemoryModel::new();
        model.set_number(1, 3, "12345678901234567890").unwrap();
        let config = GridConfig::default();
        let layout = SheetLayout::new(&model, &config, &ctx());
        let mut surface = RecordingSurface::new();
        let frame = compute_cells_text(&layout, &mut surface);
        // Crossing the edge between columns 2 and 3 marks column 3.
        assert_eq!(frame.spills.sorted(), vec![(1, 3)]);
        assert_eq!(frame.layouts[0].x, 130.0);
    }

    #[test]
    fn underline_and_strike_are_drawn_as_lines() {
        let mut model = MemoryModel::new();
        model.set_text(1, 1, "ab").unwrap();
        let style = CellStyle {
            font: Font {
                u: true,
                strike: true,
                ..Font::default()
            },
            ..CellStyle::default()
        };
        model.set_style(0, 1, 1, style).unwrap();
        let config = GridConfig::default();
        let layout = SheetLayout::new(&model, &config, &ctx());
        let mut surface = RecordingSurface::new();
        let frame = compute_cells_text(&layout, &mut surface);
        paint_cell_text(&mut surface, &frame.layouts[0]);
        assert!(matches!(surface.ops[0], DrawOp::Clip { .. }));
        assert_eq!(surface.texts().collect::<Vec<_>>(), vec!["ab"]);
        let ys: Vec<f64> = surface.lines().map(|l| l.1).collect();
        let baseline = frame.layouts[0].lines[0].y;
        assert_eq!(ys, vec![baseline + 6.0, baseline]);
        assert!(matches!(surface.ops.last(), Some(DrawOp::Restore)));
    }
}
