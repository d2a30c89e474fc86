//! Fit a column or row to its content (double-click on a header edge).
//!
//! Only cells with content are measured. A result of zero (nothing to
//! measure) leaves the size alone.

use log::info;

use crate::config::GridConfig;
use crate::error::Result;
use crate::model::SheetModel;
use crate::render::text::{font_spec, wrap_lines};
use crate::render::{Axis, TextMeasure};

/// Width that fits the widest line in `column`, or `None` for an empty column.
pub fn fitted_column_width<M, T>(
    model: &M,
    measure: &mut T,
    config: &GridConfig,
    sheet: u32,
    column: u32,
) -> Option<f64>
where
    M: SheetModel + ?Sized,
    T: TextMeasure + ?Sized,
{
    let mut width: f64 = 0.0;
    for row in model.rows_with_data(sheet, column) {
        let text = model.formatted_cell_value(sheet, row, column);
        if text.is_empty() {
            continue;
        }
        let font = font_spec(&model.cell_style(sheet, row, column), config);
        measure.set_font(&font.css);
        for line in text.split('\n') {
            width = width.max(measure.measure_text(line));
        }
    }
    (width > 0.0).then_some(width + config.autosize_padding)
}

/// Height that fits the tallest wrapped text in `row`, or `None` for an
/// empty row.
///
/// The height keeps the first line at the same place whatever the vertical
/// alignment: `(lines - 1) * line_height + padding + font_size`.
pub fn fitted_row_height<M, T>(
    model: &M,
    measure: &mut T,
    config: &GridConfig,
    sheet: u32,
    row: u32,
) -> Option<f64>
where
    M: SheetModel + ?Sized,
    T: TextMeasure + ?Sized,
{
    let mut height: f64 = 0.0;
    for column in model.columns_with_data(sheet, row) {
        let text = model.formatted_cell_value(sheet, row, column);
        if text.is_empty() {
            continue;
        }
        let style = model.cell_style(sheet, row, column);
        let font = font_spec(&style, config);
        measure.set_font(&font.css);
        // Same wrap width as the cell renderer, so the fitted row shows
        // exactly the lines counted here.
        let width = model.column_width(sheet, column).round() - config.cell_padding;
        let lines = wrap_lines(measure, &text, style.wrap_text(), width);
        // Line counts are bounded by the text length of a single cell.
        #[allow(clippy::cast_precision_loss)]
        let extra_lines = lines.len().saturating_sub(1) as f64;
        let text_height =
            extra_lines * config.line_height(font.size) + config.autosize_padding + font.size;
        height = height.max(text_height);
    }
    (height > 0.0).then_some(height)
}

/// Fit a row or column and commit the new size. Returns whether the model
/// changed.
pub fn autosize<M, T>(
    model: &mut M,
    measure: &mut T,
    config: &GridConfig,
    axis: Axis,
    index: u32,
) -> Result<bool>
where
    M: SheetModel + ?Sized,
    T: TextMeasure + ?Sized,
{
    let sheet = model.selected_sheet();
    let size = match axis {
        Axis::Column => fitted_column_width(model, measure, config, sheet, index),
        Axis::Row => fitted_row_height(model, measure, config, sheet, index),
    };
    let Some(size) = size else {
        return Ok(false);
    };
    match axis {
        Axis::Column => model.set_columns_width(sheet, index, index, size)?,
        Axis::Row => model.set_rows_height(sheet, index, index, size)?,
    }
    info!("autosized {axis:?} {index} on sheet {sheet} to {size}px");
    Ok(true)
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
    use crate::render::RecordingSurface;
    use crate::types::{Alignment, CellStyle, Font};

    #[test]
    fn column_fits_widest_line() {
        let mut model = MemoryModel::new();
        model.set_text(1, 2, "abc").unwrap();
        model.set_text(5, 2, "abcdefghij\nab").unwrap();
        let config = GridConfig::default();
        let mut measure = RecordingSurface::new();
        // 10 chars at 7.8px plus 8px of padding.
        let width = fitted_column_width(&model, &mut measure, &config, 0, 2).unwrap();
        assert!((width - 86.0).abs() < 1e-9);
    }

    #[test]
    fn row_counts_wrapped_lines() {
        let mut model = MemoryModel::new();
        model.set_text(1, 1, "one two three four").unwrap();
        model
            .set_style(
                0,
                1,
                1,
                CellStyle {
                    alignment: Some(Alignment {
                        wrap_text: true,
                        ..Alignment::default()
                    }),
                    font: Font {
                        sz: 20.0,
                        ..Font::default()
                    },
                    ..CellStyle::default()
                },
            )
            .unwrap();
        model.set_columns_width(0, 1, 1, 110.0).unwrap();
        let config = GridConfig::default();
        let mut measure = RecordingSurface::new();
        // 12px per char at 20px against 110px: "one two" (84) fits, "three four"
        // (120) does not. Lines: "one two", "three", "four" -> 2 * 30 + 8 + 20.
        let height = fitted_row_height(&model, &mut measure, &config, 0, 1).unwrap();
        assert_eq!(height, 88.0);
    }

    #[test]
    fn row_wraps_like_the_renderer() {
        let mut model = MemoryModel::new();
        model.set_text(1, 1, "abcd efg").unwrap();
        model
            .set_style(
                0,
                1,
                1,
                CellStyle {
                    alignment: Some(Alignment {
                        wrap_text: true,
                        ..Alignment::default()
                    }),
                    font: Font {
                        sz: 20.0,
                        ..Font::default()
                    },
                    ..CellStyle::default()
                },
            )
            .unwrap();
        let config = GridConfig::default();
        let mut measure = RecordingSurface::new();
        // 96px of text does not fit the 96px left by the padding of a 100px
        // column, so the renderer shows "abcd" and "efg".
        let height = fitted_row_height(&model, &mut measure, &config, 0, 1).unwrap();
        assert_eq!(height, 30.0 + 8.0 + 20.0);
        let rendered = wrap_lines(&mut measure, "abcd efg", true, 100.0 - config.cell_padding);
        assert_eq!(rendered, vec!["abcd", "efg"]);
    }

    #[test]
    fn empty_column_is_a_no_op() {
        let mut model = MemoryModel::new();
        let config = GridConfig::default();
        let mut measure = RecordingSurface::new();
        assert!(!autosize(&mut model, &mut measure, &config, Axis::Column, 3).unwrap());
        assert_eq!(model.column_width(0, 3), 100.0);
    }

    #[test]
    fn autosize_commits_single_row() {
        let mut model = MemoryModel::new();
        model.set_text(2, 1, "a\nb\nc").unwrap();
        let config = GridConfig::default();
        let mut measure = RecordingSurface::new();
        assert!(autosize(&mut model, &mut measure, &config, Axis::Row, 2).unwrap());
        // Without wrapping, newlines still split: 2 * 19.5 + 8 + 13.
        assert_eq!(model.row_height(0, 2), 60.0);
        assert_eq!(model.row_height(0, 3), 28.0);
    }
}
