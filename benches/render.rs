//! Benchmarks for the per-frame layout and render pass.
//!
//! Run with: cargo bench
//!
//! Results are saved to `target/criterion/` with HTML reports.
#![allow(clippy::expect_used, clippy::unwrap_used)]

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use xlgrid::types::SelectedView;
use xlgrid::{GridConfig, GridView, MemoryModel, RecordingSurface, RenderContext, SheetLayout};

/// A sheet with text in every visible cell, some of it long enough to spill.
fn dense_model() -> MemoryModel {
    let mut model = MemoryModel::new();
    for row in 1..=120 {
        for column in 1..=30 {
            if (row + column) % 7 == 0 {
                model
                    .set_text(row, column, "a rather long label that spills")
                    .unwrap();
            } else if column % 3 != 0 {
                model.set_number(row, column, &(row * column).to_string()).unwrap();
            }
        }
    }
    model.set_frozen(0, 2, 1).unwrap();
    model
        .set_view(SelectedView {
            row: 10,
            column: 4,
            range: [10, 4, 20, 8],
            top_row: 5,
            left_column: 3,
            ..SelectedView::default()
        })
        .unwrap();
    model
}

fn bench_visible_range(c: &mut Criterion) {
    let model = dense_model();
    let config = GridConfig::default();
    let ctx = RenderContext::new(1920.0, 1080.0, 2.0);

    c.bench_function("visible_range_1080p", |b| {
        b.iter(|| {
            let layout = SheetLayout::new(black_box(&model), &config, &ctx);
            black_box(layout.visible_cells())
        })
    });
}

fn bench_render(c: &mut Criterion) {
    let mut grid = GridView::new(
        dense_model(),
        GridConfig::default(),
        RenderContext::new(1920.0, 1080.0, 2.0),
    );
    let mut surface = RecordingSurface::new();

    c.bench_function("render_frame_1080p", |b| {
        b.iter(|| {
            surface.reset();
            black_box(grid.render(&mut surface))
        })
    });
}

fn bench_scroll_and_render(c: &mut Criterion) {
    let mut grid = GridView::new(
        dense_model(),
        GridConfig::default(),
        RenderContext::new(1280.0, 800.0, 1.0),
    );
    let mut surface = RecordingSurface::new();
    let mut offset = 0.0;

    c.bench_function("scroll_then_render", |b| {
        b.iter(|| {
            offset = (offset + 37.0) % 2000.0;
            grid.scroll_to(offset, offset).unwrap();
            surface.reset();
            black_box(grid.render(&mut surface))
        })
    });
}

criterion_group!(benches, bench_visible_range, bench_render, bench_scroll_and_render);
criterion_main!(benches);
