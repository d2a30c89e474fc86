//! Row and column header rendering.
//!
//! Headers are painted on the canvas along the top and left edges:
//! - Column headers: A, B, C, ... Z, AA, AB, ... XFD
//! - Row headers: 1, 2, 3, ...
//! - Rows/columns inside the selection are highlighted with an outline
//!   marker on their inner edge
//! - Frozen headers come first, then the scrolled run after the separator
//!
//! Every painted header also places a resize handle in a [`HandlePool`].

use std::collections::HashMap;

use crate::cell_ref::column_name;
use crate::config::GridConfig;
use crate::layout::SheetLayout;
use crate::model::SheetModel;
use crate::types::CellArea;

use super::surface::Surface;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Column,
    Row,
}

/// A draggable edge at the end of a row or column header.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeHandle {
    pub axis: Axis,
    pub index: u32,
    /// Canvas x (columns) or y (rows) of the edge
    pub edge: f64,
    /// Current width or height of the row/column
    pub size: f64,
    active: bool,
}

/// What the pool was built for; any change drops every slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolKey {
    pub sheet: u32,
    pub frozen_rows: u32,
    pub frozen_columns: u32,
}

/// Index-addressed arena of resize handles.
///
/// Slots are looked up by `(axis, index)`. A slot not placed during a frame
/// goes to the free list at [`HandlePool::end_frame`] and is recycled for
/// the next new row or column, so the arena stays proportional to what fits
/// on screen no matter how far the sheet is scrolled.
#[derive(Debug, Default)]
pub struct HandlePool {
    key: Option<PoolKey>,
    slots: Vec<ResizeHandle>,
    lookup: HashMap<(Axis, u32), usize>,
    free: Vec<usize>,
}

impl HandlePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start placing handles for a frame.
    pub fn begin_frame(&mut self, key: PoolKey) {
        if self.key != Some(key) {
            self.slots.clear();
            self.lookup.clear();
            self.free.clear();
            self.key = Some(key);
        }
        for slot in &mut self.slots {
            slot.active = false;
        }
    }

    pub fn place(&mut self, axis: Axis, index: u32, edge: f64, size: f64) {
        let handle = ResizeHandle {
            axis,
            index,
            edge,
            size,
            active: true,
        };
        if let Some(slot) = self
            .lookup
            .get(&(axis, index))
            .and_then(|&i| self.slots.get_mut(i))
        {
            *slot = handle;
            return;
        }
        let i = match self.free.pop() {
            Some(i) => {
                if let Some(slot) = self.slots.get_mut(i) {
                    *slot = handle;
                }
                i
            }
            None => {
                self.slots.push(handle);
                self.slots.len() - 1
            }
        };
        self.lookup.insert((axis, index), i);
    }

    /// Release the slots nobody placed this frame.
    pub fn end_frame(&mut self) {
        let slots = &self.slots;
        let free = &mut self.free;
        self.lookup.retain(|_, i| {
            let keep = slots.get(*i).is_some_and(|s| s.active);
            if !keep {
                free.push(*i);
            }
            keep
        });
    }

    pub fn get(&self, axis: Axis, index: u32) -> Option<&ResizeHandle> {
        self.lookup
            .get(&(axis, index))
            .and_then(|&i| self.slots.get(i))
            .filter(|s| s.active)
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|s| s.active).count()
    }

    /// Slots allocated so far, active or free.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// The handle under a canvas point, if any.
    pub fn hit_test(&self, x: f64, y: f64, config: &GridConfig) -> Option<ResizeHandle> {
        let tolerance = config.resize_handle_tolerance;
        self.slots
            .iter()
            .filter(|s| s.active)
            .find(|s| match s.axis {
                Axis::Column => {
                    (0.0..config.header_row_height).contains(&y) && (x - s.edge).abs() <= tolerance
                }
                Axis::Row => {
                    (0.0..config.header_column_width).contains(&x) && (y - s.edge).abs() <= tolerance
                }
            })
            .copied()
    }
}

fn header_font(config: &GridConfig) -> String {
    format!(
        "bold {}px {}",
        config.header_font_size, config.header_font_family
    )
}

/// Render column headers (A, B, C, ...) and place their resize handles.
pub fn render_column_headers<M, S>(
    surface: &mut S,
    layout: &SheetLayout<'_, M>,
    selection: &CellArea,
    pool: &mut HandlePool,
) where
    M: SheetModel + ?Sized,
    S: Surface + ?Sized,
{
    let config = layout.config();
    let height = config.header_row_height;
    surface.set_font(&header_font(config));

    let frozen = 1..=layout.frozen_columns();
    let scrolled = layout.top_left().column..=layout.bottom_right().column;
    let mut x = config.header_column_width;
    for (run, columns) in [frozen, scrolled].into_iter().enumerate() {
        if run == 1 && layout.frozen_columns() > 0 {
            x += config.frozen_separator_width;
        }
        for column in columns {
            let width = layout.column_width(column);
            let selected = selection.contains_column(column);
            surface.fill_rect(x, 0.0, width, height, &config.header_border_color);
            surface.fill_rect(
                x + 1.0,
                1.0,
                width - 1.0,
                height - 1.0,
                header_background(config, selected),
            );
            if selected {
                surface.fill_rect(x, height - 1.0, width, 1.0, &config.outline_color);
            }
            surface.fill_text(
                &column_name(column),
                x + width / 2.0,
                height / 2.0,
                header_text_color(config, selected),
            );
            x += width;
            pool.place(Axis::Column, column, x, width);
        }
    }
}

/// Render row headers (1, 2, 3, ...) and place their resize handles.
pub fn render_row_headers<M, S>(
    surface: &mut S,
    layout: &SheetLayout<'_, M>,
    selection: &CellArea,
    pool: &mut HandlePool,
) where
    M: SheetModel + ?Sized,
    S: Surface + ?Sized,
{
    let config = layout.config();
    let width = config.header_column_width;
    surface.set_font(&header_font(config));

    let frozen = 1..=layout.frozen_rows();
    let scrolled = layout.top_left().row..=layout.bottom_right().row;
    let mut y = config.header_row_height;
    for (run, rows) in [frozen, scrolled].into_iter().enumerate() {
        if run == 1 && layout.frozen_rows() > 0 {
            y += config.frozen_separator_width;
        }
        for row in rows {
            let height = layout.row_height(row);
            let selected = selection.contains_row(row);
            surface.fill_rect(0.0, y, width, height, &config.header_border_color);
            surface.fill_rect(
                0.0,
                y + 1.0,
                width,
                height - 1.0,
                header_background(config, selected),
            );
            if selected {
                surface.fill_rect(width - 1.0, y, 1.0, height, &config.outline_color);
            }
            surface.fill_text(
                &row.to_string(),
                width / 2.0,
                y + height / 2.0,
                header_text_color(config, selected),
            );
            y += height;
            pool.place(Axis::Row, row, y, height);
        }
    }
}

fn header_background(config: &GridConfig, selected: bool) -> &str {
    if selected {
        &config.header_selected_background
    } else {
        &config.header_background
    }
}

fn header_text_color(config: &GridConfig, selected: bool) -> &str {
    if selected {
        &config.header_selected_color
    } else {
        &config.header_text_color
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
    use crate::config::RenderContext;
    use crate::model::MemoryModel;
    use crate::render::recording::RecordingSurface;

    const KEY: PoolKey = PoolKey {
        sheet: 0,
        frozen_rows: 0,
        frozen_columns: 0,
    };

    #[test]
    fn pool_reuses_slots_across_frames() {
        let mut pool = HandlePool::new();
        pool.begin_frame(KEY);
        pool.place(Axis::Column, 1, 130.0, 100.0);
        pool.place(Axis::Column, 2, 230.0, 100.0);
        pool.end_frame();
        assert_eq!(pool.capacity(), 2);

        // Scrolled by one column: column 1 leaves, column 3 takes its slot.
        pool.begin_frame(KEY);
        pool.place(Axis::Column, 2, 130.0, 100.0);
        pool.end_frame();
        pool.begin_frame(KEY);
        pool.place(Axis::Column, 2, 130.0, 100.0);
        pool.place(Axis::Column, 3, 230.0, 100.0);
        pool.end_frame();
        assert_eq!(pool.capacity(), 2);
        assert_eq!(pool.active_count(), 2);
        assert!(pool.get(Axis::Column, 1).is_none());
        assert_eq!(pool.get(Axis::Column, 3).unwrap().edge, 230.0);
    }

    #[test]
    fn pool_is_dropped_when_freeze_changes() {
        let mut pool = HandlePool::new();
        pool.begin_frame(KEY);
        pool.place(Axis::Row, 1, 56.0, 28.0);
        pool.end_frame();
        pool.begin_frame(PoolKey {
            frozen_rows: 1,
            ..KEY
        });
        assert_eq!(pool.capacity(), 0);
    }

    #[test]
    fn hit_test_uses_tolerance_inside_header_strip() {
        let config = GridConfig::default();
        let mut pool = HandlePool::new();
        pool.begin_frame(KEY);
        pool.place(Axis::Column, 1, 130.0, 100.0);
        pool.place(Axis::Row, 1, 56.0, 28.0);
        pool.end_frame();
        let hit = pool.hit_test(132.0, 10.0, &config).unwrap();
        assert_eq!((hit.axis, hit.index), (Axis::Column, 1));
        assert!(pool.hit_test(134.0, 10.0, &config).is_none());
        // Same x but below the header strip: a cell, not a handle.
        assert!(pool.hit_test(130.0, 40.0, &config).is_none());
        let hit = pool.hit_test(10.0, 55.0, &config).unwrap();
        assert_eq!((hit.axis, hit.index, hit.size), (Axis::Row, 1, 28.0));
    }

    #[test]
    fn headers_skip_the_frozen_separator() {
        let mut model = MemoryModel::new();
        model.set_frozen(0, 0, 1).unwrap();
        let config = GridConfig::default();
        let ctx = RenderContext::new(800.0, 600.0, 1.0);
        let layout = SheetLayout::with_origin(&model, &config, &ctx, 1, 5);
        let mut surface = RecordingSurface::new();
        let mut pool = HandlePool::new();
        pool.begin_frame(KEY);
        render_column_headers(&mut surface, &layout, &CellArea::cell(1, 5), &mut pool);
        pool.end_frame();
        let labels: Vec<_> = surface.texts().take(3).collect();
        assert_eq!(labels, vec!["A", "E", "F"]);
        assert_eq!(pool.get(Axis::Column, 1).unwrap().edge, 130.0);
        assert_eq!(pool.get(Axis::Column, 5).unwrap().edge, 233.0);
        // Selected column gets the outline marker.
        let markers = surface.count(|op| {
            matches!(op, crate::render::recording::DrawOp::FillRect { color, .. } if color == "#F2994A")
        });
        assert_eq!(markers, 1);
    }

    #[test]
    fn row_headers_number_frozen_then_scrolled() {
        let mut model = MemoryModel::new();
        model.set_frozen(0, 2, 0).unwrap();
        let config = GridConfig::default();
        let ctx = RenderContext::new(800.0, 200.0, 1.0);
        let layout = SheetLayout::with_origin(&model, &config, &ctx, 40, 1);
        let mut surface = RecordingSurface::new();
        let mut pool = HandlePool::new();
        pool.begin_frame(KEY);
        render_row_headers(&mut surface, &layout, &CellArea::cell(1, 1), &mut pool);
        let labels: Vec<_> = surface.texts().collect();
        assert_eq!(labels[..3], ["1", "2", "40"]);
        assert_eq!(pool.get(Axis::Row, 40).unwrap().edge, 28.0 + 56.0 + 3.0 + 28.0);
    }
}
