//! Cell fills and borders.
//!
//! Each cell paints its background and only its left and top edges; the
//! right and bottom edges belong to the neighbors. An edge takes the first
//! available of:
//! 1. the cell's own border on that side
//! 2. the neighbor's border on the mirrored side
//! 3. the cell's fill color
//! 4. the neighbor's fill color
//! 5. the grid color (or the cell's fill when grid lines are hidden)

use crate::config::GridConfig;
use crate::layout::{CellRect, SheetLayout};
use crate::model::SheetModel;
use crate::types::{Border, BorderItem, BorderStyle, CellStyle};

use super::colors::{normalize_color, palette, CssColor};
use super::surface::Surface;
use super::text::SpillRegistry;

/// Stroke width class of a border.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EdgeWidth {
    #[default]
    Thin,
    Medium,
    Thick,
}

impl EdgeWidth {
    /// Only medium and thick are wider than a hairline; every other style
    /// paints as thin.
    pub fn from_style(style: BorderStyle) -> Self {
        match style {
            BorderStyle::Medium => Self::Medium,
            BorderStyle::Thick => Self::Thick,
            _ => Self::Thin,
        }
    }

    pub fn pixels(self) -> f64 {
        match self {
            Self::Thin => 1.0,
            Self::Medium => 2.0,
            Self::Thick => 3.0,
        }
    }
}

/// One side of a cell's border, normalized.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Edge {
    pub present: bool,
    pub color: CssColor,
    pub width: EdgeWidth,
}

impl Edge {
    fn from_item(item: Option<&BorderItem>) -> Self {
        item.map_or_else(Self::default, |item| Self {
            present: true,
            color: item
                .color
                .as_deref()
                .filter(|c| !c.is_empty())
                .map_or_else(|| palette::BLACK.to_string(), normalize_color),
            width: EdgeWidth::from_style(item.style),
        })
    }
}

/// All four edges of a cell.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CellEdges {
    pub left: Edge,
    pub right: Edge,
    pub top: Edge,
    pub bottom: Edge,
}

impl From<&Border> for CellEdges {
    fn from(border: &Border) -> Self {
        Self {
            left: Edge::from_item(border.left.as_ref()),
            right: Edge::from_item(border.right.as_ref()),
            top: Edge::from_item(border.top.as_ref()),
            bottom: Edge::from_item(border.bottom.as_ref()),
        }
    }
}

/// The parts of a cell style the border pass needs.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PaintStyle {
    pub fill: Option<CssColor>,
    pub edges: CellEdges,
}

impl From<&CellStyle> for PaintStyle {
    fn from(style: &CellStyle) -> Self {
        Self {
            fill: style.fill_color().map(normalize_color),
            edges: CellEdges::from(&style.border),
        }
    }
}

/// Color and pixel width of an edge as painted.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedEdge {
    pub color: CssColor,
    pub width: f64,
}

/// Pick the paint for one shared edge.
///
/// `own` is this cell's edge on the shared side and `mirrored` the
/// neighbor's edge on the opposite side.
pub fn resolve_edge(
    own: &Edge,
    own_fill: Option<&str>,
    mirrored: &Edge,
    neighbor_fill: Option<&str>,
    fallback: &str,
) -> ResolvedEdge {
    let explicit = [own, mirrored].into_iter().find(|edge| edge.present);
    if let Some(edge) = explicit {
        return ResolvedEdge {
            color: edge.color.clone(),
            width: edge.width.pixels(),
        };
    }
    ResolvedEdge {
        color: own_fill.or(neighbor_fill).unwrap_or(fallback).to_string(),
        width: EdgeWidth::Thin.pixels(),
    }
}

/// What one cell paints: its background and its left (unless covered by
/// spilled text) and top edges.
#[derive(Debug, Clone, PartialEq)]
pub struct CellPaint {
    pub fill: CssColor,
    pub left: Option<ResolvedEdge>,
    pub top: ResolvedEdge,
}

fn paint_style<M: SheetModel + ?Sized>(model: &M, sheet: u32, row: u32, column: u32) -> PaintStyle {
    if row == 0 || column == 0 {
        return PaintStyle::default();
    }
    PaintStyle::from(&*model.cell_style(sheet, row, column))
}

pub fn cell_paint<M: SheetModel + ?Sized>(
    layout: &SheetLayout<'_, M>,
    spills: &SpillRegistry,
    row: u32,
    column: u32,
) -> CellPaint {
    let model = layout.model();
    let sheet = layout.sheet();
    let config: &GridConfig = layout.config();
    let own = paint_style(model, sheet, row, column);
    let own_fill = own.fill.as_deref();
    let fill = own_fill.unwrap_or(config.default_fill_color.as_str()).to_string();
    let fallback = if model.show_grid_lines(sheet) {
        config.grid_color.as_str()
    } else {
        fill.as_str()
    };

    let left = if spills.suppresses_left_border(row, column) {
        None
    } else {
        let neighbor = paint_style(model, sheet, row, column.saturating_sub(1));
        Some(resolve_edge(
            &own.edges.left,
            own_fill,
            &neighbor.edges.right,
            neighbor.fill.as_deref(),
            fallback,
        ))
    };
    let neighbor = paint_style(model, sheet, row.saturating_sub(1), column);
    let top = resolve_edge(
        &own.edges.top,
        own_fill,
        &neighbor.edges.bottom,
        neighbor.fill.as_deref(),
        fallback,
    );
    CellPaint { fill, left, top }
}

/// Paint the background and the owned edges of one cell.
pub fn paint_cell_style<M, S>(
    surface: &mut S,
    layout: &SheetLayout<'_, M>,
    spills: &SpillRegistry,
    row: u32,
    column: u32,
    rect: CellRect,
) where
    M: SheetModel + ?Sized,
    S: Surface + ?Sized,
{
    let paint = cell_paint(layout, spills, row, column);
    let CellRect {
        x,
        y,
        width,
        height,
    } = rect;
    surface.fill_rect(x, y, width, height, &paint.fill);
    if let Some(left) = &paint.left {
        surface.stroke_line(x, y, x, y + height, left.width, &left.color);
    }
    surface.stroke_line(x, y, x + width, y, paint.top.width, &paint.top.color);
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
    use crate::types::Fill;

    fn bordered(right: Option<BorderItem>, left: Option<BorderItem>) -> CellStyle {
        CellStyle {
            border: Border {
                left,
                right,
                ..Border::default()
            },
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

    fn item(style: BorderStyle, color: Option<&str>) -> Option<BorderItem> {
        Some(BorderItem {
            style,
            color: color.map(str::to_string),
        })
    }

    #[test]
    fn widths_by_style() {
        assert_eq!(EdgeWidth::from_style(BorderStyle::Thin).pixels(), 1.0);
        assert_eq!(EdgeWidth::from_style(BorderStyle::Medium).pixels(), 2.0);
        assert_eq!(EdgeWidth::from_style(BorderStyle::Thick).pixels(), 3.0);
        assert_eq!(EdgeWidth::from_style(BorderStyle::Double).pixels(), 1.0);
        assert_eq!(EdgeWidth::from_style(BorderStyle::Unknown).pixels(), 1.0);
    }

    #[test]
    fn colorless_border_is_black() {
        let edges = CellEdges::from(&bordered(item(BorderStyle::Thick, None), None).border);
        assert!(edges.right.present);
        assert_eq!(edges.right.color, "#000000");
        assert!(!edges.left.present);
    }

    #[test]
    fn neighbor_right_border_paints_our_left_edge() {
        let mut model = MemoryModel::new();
        model
            .set_style(0, 2, 2, bordered(item(BorderStyle::Medium, Some("#FF0000")), None))
            .unwrap();
        let config = GridConfig::default();
        let ctx = RenderContext::new(800.0, 600.0, 1.0);
        let layout = SheetLayout::new(&model, &config, &ctx);
        let paint = cell_paint(&layout, &SpillRegistry::new(), 2, 3);
        assert_eq!(
            paint.left,
            Some(ResolvedEdge {
                color: "#FF0000".to_string(),
                width: 2.0
            })
        );
        assert_eq!(paint.top.color, "#E0E0E0");
    }

    #[test]
    fn own_border_wins_over_neighbor() {
        let mut model = MemoryModel::new();
        model
            .set_style(0, 2, 2, bordered(item(BorderStyle::Medium, Some("#FF0000")), None))
            .unwrap();
        model
            .set_style(0, 2, 3, bordered(None, item(BorderStyle::Thin, Some("#0000FF"))))
            .unwrap();
        let config = GridConfig::default();
        let ctx = RenderContext::new(800.0, 600.0, 1.0);
        let layout = SheetLayout::new(&model, &config, &ctx);
        let left = cell_paint(&layout, &SpillRegistry::new(), 2, 3).left.unwrap();
        assert_eq!((left.color.as_str(), left.width), ("#0000FF", 1.0));
    }

    #[test]
    fn fills_color_edges_before_grid() {
        let mut model = MemoryModel::new();
        model.set_style(0, 2, 2, filled("#FFEEDD")).unwrap();
        let config = GridConfig::default();
        let ctx = RenderContext::new(800.0, 600.0, 1.0);
        let layout = SheetLayout::new(&model, &config, &ctx);
        let spills = SpillRegistry::new();
        // Own fill.
        assert_eq!(cell_paint(&layout, &spills, 2, 2).top.color, "#FFEEDD");
        // Neighbor fill, on both sides of the filled cell.
        assert_eq!(cell_paint(&layout, &spills, 2, 3).left.unwrap().color, "#FFEEDD");
        assert_eq!(cell_paint(&layout, &spills, 3, 2).top.color, "#FFEEDD");
    }

    #[test]
    fn hidden_grid_lines_blend_into_fill() {
        let mut model = MemoryModel::new();
        model.set_show_grid_lines(0, false).unwrap();
        let config = GridConfig::default();
        let ctx = RenderContext::new(800.0, 600.0, 1.0);
        let layout = SheetLayout::new(&model, &config, &ctx);
        let paint = cell_paint(&layout, &SpillRegistry::new(), 4, 4);
        assert_eq!(paint.fill, "#FFFFFF");
        assert_eq!(paint.top.color, "#FFFFFF");
    }

    #[test]
    fn spill_suppresses_left_edge_only() {
        let model = MemoryModel::new();
        let config = GridConfig::default();
        let ctx = RenderContext::new(800.0, 600.0, 1.0);
        let layout = SheetLayout::new(&model, &config, &ctx);
        let mut spills = SpillRegistry::new();
        spills.mark(1, 2);
        let rect = layout.cell_rect(1, 2);
        let mut surface = RecordingSurface::new();
        paint_cell_style(&mut surface, &layout, &spills, 1, 2, rect);
        let lines: Vec<_> = surface.lines().collect();
        assert_eq!(lines, vec![(130.0, 28.0, 230.0, 28.0, "#E0E0E0")]);
    }

    #[test]
    fn first_row_and_column_use_default_neighbor() {
        let model = MemoryModel::new();
        let config = GridConfig::default();
        let ctx = RenderContext::new(800.0, 600.0, 1.0);
        let layout = SheetLayout::new(&model, &config, &ctx);
        let paint = cell_paint(&layout, &SpillRegistry::new(), 1, 1);
        assert_eq!(paint.left.unwrap().color, "#E0E0E0");
        assert_eq!(paint.top.color, "#E0E0E0");
    }
}
