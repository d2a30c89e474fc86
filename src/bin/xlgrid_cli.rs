//! CLI tool for xlgrid - renders a JSON sheet model headlessly
//!
//! Usage:
//!   xlgrid_cli <model.json>                         # 1280x800 at dpr 1
//!   xlgrid_cli <model.json> --config cfg.json --width 800 --height 600
//!
//! Prints the visible range, spill marks, overlay boxes and how many draw
//! operations of each kind the frame issued. `RUST_LOG=debug` shows the
//! per-frame log lines.

#![allow(clippy::exit)]

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::process;

use xlgrid::render::DrawOp;
use xlgrid::{GridConfig, GridView, MemoryModel, RecordingSurface, RenderContext};

struct Args {
    model: String,
    config: Option<String>,
    width: f64,
    height: f64,
}

fn usage() -> ! {
    eprintln!("Usage: xlgrid_cli <model.json> [--config cfg.json] [--width W] [--height H]");
    process::exit(1);
}

fn parse_args() -> Args {
    let mut args = env::args().skip(1);
    let mut model = None;
    let mut config = None;
    let mut width = 1280.0;
    let mut height = 800.0;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => config = Some(args.next().unwrap_or_else(|| usage())),
            "--width" => {
                width = args
                    .next()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or_else(|| usage());
            }
            "--height" => {
                height = args
                    .next()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or_else(|| usage());
            }
            _ if model.is_none() => model = Some(arg),
            _ => usage(),
        }
    }
    Args {
        model: model.unwrap_or_else(|| usage()),
        config,
        width,
        height,
    }
}

fn read(path: &str) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading {path}: {e}");
        process::exit(1);
    })
}

fn op_name(op: &DrawOp) -> &'static str {
    match op {
        DrawOp::Clear { .. } => "clear",
        DrawOp::FillRect { .. } => "fill_rect",
        DrawOp::Line { .. } => "line",
        DrawOp::StrokeRect { .. } => "stroke_rect",
        DrawOp::Text { .. } => "text",
        DrawOp::Clip { .. } => "clip",
        DrawOp::Restore => "restore",
    }
}

fn main() {
    env_logger::init();
    let args = parse_args();

    let model = MemoryModel::from_json(&read(&args.model)).unwrap_or_else(|e| {
        eprintln!("Error loading model: {e}");
        process::exit(1);
    });
    let config = match &args.config {
        Some(path) => GridConfig::from_json(&read(path)).unwrap_or_else(|e| {
            eprintln!("Error loading config: {e}");
            process::exit(1);
        }),
        None => GridConfig::default(),
    };

    let mut grid = GridView::new(model, config, RenderContext::new(args.width, args.height, 1.0));
    let mut surface = RecordingSurface::new();
    let frame = grid.render(&mut surface);

    let v = frame.visible;
    println!(
        "visible: rows {}..={} columns {}..={} ({} panes, {} cells)",
        v.top_left.row, v.bottom_right.row, v.top_left.column, v.bottom_right.column, frame.panes,
        frame.cells_painted
    );
    println!("text layouts: {}", frame.text_layouts);
    for (row, column) in &frame.spills {
        println!("spill: {}", xlgrid::cell_ref::cell_name(*row, *column));
    }

    let o = frame.overlays;
    println!("cell outline: {:?}", o.cell_outline);
    println!("area outline: {:?}", o.area_outline);
    println!("handle: {:?}", o.handle);
    println!("extend to: {:?}", o.extend_to);
    println!("editor: {:?}", o.editor);

    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for op in &surface.ops {
        *counts.entry(op_name(op)).or_default() += 1;
    }
    for (name, count) in counts {
        println!("{name}: {count}");
    }
}
