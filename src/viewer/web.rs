//! Browser binding: a [`GridView`] over a JS model, painted on a canvas.
//!
//! The host hands over the canvas, a positioned element for the DOM
//! overlays and its model object. Pointer listeners are installed on the
//! canvas (moves and releases on the window, so drags survive leaving the
//! grid). Committed gestures invoke the refresh callback so the rest of the
//! application can re-read the model.

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::{Function, Reflect};
use log::warn;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{Document, HtmlCanvasElement, HtmlDivElement, MouseEvent};

use crate::config::{GridConfig, RenderContext};
use crate::error::GridError;
use crate::interaction::{PointerEvent, Refresh};
use crate::model::JsModel;
use crate::render::{Axis, CanvasSurface, OverlayBox, Overlays};
use crate::state::{ActiveRange, CutRange, EditingCell};
use crate::types::{CellArea, CellCoord};

use super::GridView;

fn scroll_left_f64(element: &HtmlDivElement) -> f64 {
    Reflect::get(element.as_ref(), &JsValue::from_str("scrollLeft"))
        .ok()
        .and_then(|value| value.as_f64())
        .unwrap_or_else(|| f64::from(element.scroll_left()))
}

fn scroll_top_f64(element: &HtmlDivElement) -> f64 {
    Reflect::get(element.as_ref(), &JsValue::from_str("scrollTop"))
        .ok()
        .and_then(|value| value.as_f64())
        .unwrap_or_else(|| f64::from(element.scroll_top()))
}

fn px(v: f64) -> String {
    format!("{v}px")
}

/// Absolutely positioned overlay elements, created once.
struct OverlayDom {
    cell_outline: HtmlDivElement,
    area_outline: HtmlDivElement,
    handle: HtmlDivElement,
    extend_to: HtmlDivElement,
    editor: HtmlDivElement,
    column_guide: HtmlDivElement,
    row_guide: HtmlDivElement,
}

impl OverlayDom {
    fn new(document: &Document, root: &HtmlDivElement, config: &GridConfig) -> Result<Self, JsValue> {
        let create = |css: &[(&str, &str)]| -> Result<HtmlDivElement, JsValue> {
            let div = document.create_element("div")?.dyn_into::<HtmlDivElement>()?;
            let style = div.style();
            style.set_property("position", "absolute")?;
            style.set_property("box-sizing", "border-box")?;
            style.set_property("pointer-events", "none")?;
            style.set_property("display", "none")?;
            for (name, value) in css {
                style.set_property(name, value)?;
            }
            root.append_child(&div)?;
            Ok(div)
        };
        let outline = &config.outline_color;
        let dom = Self {
            cell_outline: create(&[("border", &format!("2px solid {outline}"))])?,
            area_outline: create(&[
                ("border", &format!("1px solid {outline}")),
                ("background", &format!("{outline}1a")),
            ])?,
            handle: create(&[("background", outline), ("border", "1px solid #FFFFFF")])?,
            extend_to: create(&[
                ("border", &format!("1px dashed {outline}")),
                ("border-radius", "3px"),
            ])?,
            editor: create(&[("pointer-events", "auto")])?,
            column_guide: create(&[("width", "1px"), ("background", outline)])?,
            row_guide: create(&[("height", "1px"), ("background", outline)])?,
        };
        Ok(dom)
    }

    fn place(element: &HtmlDivElement, bounds: Option<OverlayBox>) {
        let style = element.style();
        match bounds {
            Some(b) => {
                let _ = style.set_property("display", "block");
                let _ = style.set_property("left", &px(b.x));
                let _ = style.set_property("top", &px(b.y));
                let _ = style.set_property("width", &px(b.width));
                let _ = style.set_property("height", &px(b.height));
            }
            None => {
                let _ = style.set_property("display", "none");
            }
        }
    }

    fn apply(&self, overlays: &Overlays, guide: Option<(Axis, f64)>, size: (f64, f64)) {
        Self::place(&self.cell_outline, overlays.cell_outline);
        Self::place(&self.handle, overlays.handle);
        Self::place(&self.extend_to, overlays.extend_to);
        if overlays.extend_to.is_some() {
            let clip = overlays
                .extend_to_clip
                .map_or_else(|| "auto".to_string(), |c| c.to_css());
            let _ = self.extend_to.style().set_property("clip", &clip);
        }

        Self::place(&self.area_outline, overlays.area_outline.map(|a| a.bounds));
        if let Some(area) = overlays.area_outline {
            let style = self.area_outline.style();
            let clip = area.clip.map_or_else(|| "auto".to_string(), |c| c.to_css());
            let _ = style.set_property("clip", &clip);
            let bottom = if area.draw_bottom { "solid" } else { "none" };
            let right = if area.draw_right { "solid" } else { "none" };
            let _ = style.set_property("border-bottom-style", bottom);
            let _ = style.set_property("border-right-style", right);
        }

        let editor = overlays.editor;
        let style = self.editor.style();
        let _ = style.set_property("display", "block");
        let _ = style.set_property("left", &px(editor.x));
        let _ = style.set_property("top", &px(editor.y));
        let _ = style.set_property("min-width", &px(editor.width));
        let _ = style.set_property("min-height", &px(editor.height));

        let (width, height) = size;
        let (column_guide, row_guide) = match guide {
            Some((Axis::Column, x)) => (
                Some(OverlayBox { x, y: 0.0, width: 1.0, height }),
                None,
            ),
            Some((Axis::Row, y)) => (
                None,
                Some(OverlayBox { x: 0.0, y, width, height: 1.0 }),
            ),
            None => (None, None),
        };
        Self::place(&self.column_guide, column_guide);
        Self::place(&self.row_guide, row_guide);
    }
}

/// Everything the event closures share with the exported handle.
struct Shared {
    grid: GridView<JsModel>,
    surface: CanvasSurface,
    overlays: OverlayDom,
    scroller: Option<(HtmlDivElement, HtmlDivElement)>,
    refresh_callback: Option<Function>,
}

impl Shared {
    fn paint(&mut self) {
        let summary = self.grid.render(&mut self.surface);
        let ctx = self.grid.render_context();
        self.overlays
            .apply(&summary.overlays, self.grid.resize_guide(), (ctx.width, ctx.height));
    }

    fn event(&self, event: &MouseEvent) -> PointerEvent {
        let rect = self.surface.canvas().get_bounding_client_rect();
        PointerEvent::from_client(
            f64::from(event.client_x()),
            f64::from(event.client_y()),
            (rect.left(), rect.top(), rect.width(), rect.height()),
            self.grid.render_context(),
        )
        .with_shift(event.shift_key())
    }

    /// Repaint as asked. Returns the callback to invoke once the borrow on
    /// the shared state is released.
    fn settle(&mut self, refresh: Refresh) -> Option<Function> {
        match refresh {
            Refresh::None => None,
            Refresh::Repaint => {
                self.paint();
                None
            }
            Refresh::Committed => {
                self.paint();
                self.refresh_callback.clone()
            }
            Refresh::Resized => {
                self.sync_spacer();
                self.paint();
                self.refresh_callback.clone()
            }
        }
    }

    fn sync_spacer(&mut self) {
        if let Some((_, spacer)) = &self.scroller {
            let (width, height) = self.grid.sheet_dimensions();
            let style = spacer.style();
            let _ = style.set_property("width", &px(width));
            let _ = style.set_property("height", &px(height));
        }
    }
}

fn invoke(callback: Option<Function>) {
    if let Some(callback) = callback {
        if let Err(e) = callback.call0(&JsValue::NULL) {
            warn!("grid refresh callback threw: {e:?}");
        }
    }
}

type Handler = fn(&mut Shared, PointerEvent) -> Refresh;

fn on_down(s: &mut Shared, e: PointerEvent) -> Refresh {
    s.grid.pointer_down(e)
}

fn on_move(s: &mut Shared, e: PointerEvent) -> Refresh {
    s.grid.pointer_move(e)
}

fn on_up(s: &mut Shared, e: PointerEvent) -> Refresh {
    s.grid.pointer_up(e)
}

fn on_double_click(s: &mut Shared, e: PointerEvent) -> Refresh {
    let Shared { grid, surface, .. } = s;
    grid.double_click(surface, e)
}

/// The grid exported to JavaScript.
#[wasm_bindgen]
pub struct XlGrid {
    shared: Rc<RefCell<Shared>>,
    #[allow(dead_code)]
    closures: Vec<Closure<dyn FnMut(MouseEvent)>>,
    #[allow(dead_code)]
    scroll_closure: Option<Closure<dyn FnMut(web_sys::Event)>>,
}

#[wasm_bindgen]
impl XlGrid {
    /// Attach to `canvas`, placing overlays inside `overlay_root`.
    ///
    /// `config` is an optional JSON object; missing fields take defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(
        canvas: HtmlCanvasElement,
        overlay_root: HtmlDivElement,
        model: JsModel,
        config: Option<String>,
        dpr: f64,
    ) -> Result<XlGrid, JsValue> {
        console_error_panic_hook::set_once();

        let config = match config {
            Some(json) => GridConfig::from_json(&json)?,
            None => GridConfig::default(),
        };
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| GridError::Other("No document".into()))?;
        let dpr = if dpr > 0.0 { dpr } else { 1.0 };
        let render = RenderContext::new(
            f64::from(canvas.width().max(1)) / dpr,
            f64::from(canvas.height().max(1)) / dpr,
            dpr,
        );
        let surface = CanvasSurface::new(canvas.clone(), &render)?;
        let overlays = OverlayDom::new(&document, &overlay_root, &config)?;
        let shared = Rc::new(RefCell::new(Shared {
            grid: GridView::new(model, config, render),
            surface,
            overlays,
            scroller: None,
            refresh_callback: None,
        }));

        let window = web_sys::window().ok_or_else(|| GridError::Other("No window".into()))?;
        let mut closures = Vec::new();
        let listeners: [(&web_sys::EventTarget, &str, Handler); 4] = [
            (canvas.as_ref(), "mousedown", on_down),
            (window.as_ref(), "mousemove", on_move),
            (window.as_ref(), "mouseup", on_up),
            (canvas.as_ref(), "dblclick", on_double_click),
        ];
        for (target, name, handler) in listeners {
            let shared = Rc::clone(&shared);
            let closure = Closure::wrap(Box::new(move |event: MouseEvent| {
                let callback = {
                    let Ok(mut s) = shared.try_borrow_mut() else {
                        return;
                    };
                    let pointer = s.event(&event);
                    let refresh = handler(&mut s, pointer);
                    s.settle(refresh)
                };
                invoke(callback);
            }) as Box<dyn FnMut(MouseEvent)>);
            target.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref())?;
            closures.push(closure);
        }

        shared.borrow_mut().paint();
        Ok(XlGrid {
            shared,
            closures,
            scroll_closure: None,
        })
    }

    /// Drive scrolling from a native scroll container. `spacer` is sized to
    /// the sheet so the container's scrollbars span all of it.
    #[wasm_bindgen(js_name = attachScroller)]
    pub fn attach_scroller(&mut self, container: HtmlDivElement, spacer: HtmlDivElement) -> Result<(), JsValue> {
        let shared = Rc::clone(&self.shared);
        let source = container.clone();
        let closure = Closure::wrap(Box::new(move |_event: web_sys::Event| {
            let Ok(mut s) = shared.try_borrow_mut() else {
                return;
            };
            match s.grid.scroll_to(scroll_left_f64(&source), scroll_top_f64(&source)) {
                Ok(true) => s.paint(),
                Ok(false) => {}
                Err(e) => warn!("scroll failed: {e}"),
            }
        }) as Box<dyn FnMut(web_sys::Event)>);
        container.add_event_listener_with_callback("scroll", closure.as_ref().unchecked_ref())?;
        self.scroll_closure = Some(closure);

        let mut s = self.shared.borrow_mut();
        s.scroller = Some((container, spacer));
        s.sync_spacer();
        Ok(())
    }

    /// Register a JS callback invoked after every committed model change.
    #[wasm_bindgen(js_name = setRefreshCallback)]
    pub fn set_refresh_callback(&mut self, callback: Option<Function>) {
        self.shared.borrow_mut().refresh_callback = callback;
    }

    pub fn render(&self) {
        self.shared.borrow_mut().paint();
    }

    /// Row heights, column widths or freeze counts changed in the model
    /// outside a grid gesture.
    #[wasm_bindgen(js_name = geometryChanged)]
    pub fn geometry_changed(&self) {
        let mut s = self.shared.borrow_mut();
        s.grid.invalidate_dimensions();
        s.sync_spacer();
        s.paint();
    }

    /// New logical size and pixel ratio of the canvas.
    pub fn resize(&self, width: f64, height: f64, dpr: f64) -> Result<(), JsValue> {
        let mut s = self.shared.borrow_mut();
        s.grid.resize(width, height, dpr);
        let render = *s.grid.render_context();
        s.surface.resize(&render)?;
        s.paint();
        Ok(())
    }

    /// Scroll so the cell is fully visible.
    #[wasm_bindgen(js_name = scrollIntoView)]
    pub fn scroll_into_view(&self, row: u32, column: u32) {
        let (viewport, container) = {
            let s = self.shared.borrow();
            let Some((container, _)) = s.scroller.clone() else {
                return;
            };
            let Some(viewport) = s.grid.reveal(CellCoord::new(row, column)) else {
                return;
            };
            (viewport, container)
        };
        // Setting the offsets fires the scroll listener, which repaints.
        // Scroll offsets are bounded by the sheet size, far below i32::MAX.
        #[allow(clippy::cast_possible_truncation)]
        {
            container.set_scroll_left(viewport.scroll_left.round() as i32);
            container.set_scroll_top(viewport.scroll_top.round() as i32);
        }
    }

    /// The element hosting the cell editor; the grid only positions it.
    #[wasm_bindgen(getter)]
    pub fn editor(&self) -> HtmlDivElement {
        self.shared.borrow().overlays.editor.clone()
    }

    #[wasm_bindgen(js_name = startEditing)]
    pub fn start_editing(&self, row: u32, column: u32, is_formula: bool) {
        let mut s = self.shared.borrow_mut();
        let sheet = s.grid.model().selected_sheet();
        let (width, height) = {
            let layout = s.grid.layout();
            (layout.column_width(column), layout.row_height(row))
        };
        let mut cell = EditingCell::new(sheet, row, column, width, height);
        cell.is_formula = is_formula;
        s.grid.state_mut().start_editing(cell);
        s.paint();
    }

    /// The edit text switched between plain text and a formula.
    #[wasm_bindgen(js_name = setEditingFormula)]
    pub fn set_editing_formula(&self, is_formula: bool) {
        let mut s = self.shared.borrow_mut();
        if let Some(cell) = s.grid.state_mut().editing_cell_mut() {
            cell.is_formula = is_formula;
            if !is_formula {
                cell.referenced_range = None;
            }
        }
    }

    /// A1 text of the reference being dragged into the formula, if any.
    #[wasm_bindgen(js_name = referencedRange)]
    pub fn referenced_range(&self) -> Option<String> {
        let s = self.shared.borrow();
        s.grid
            .state()
            .editing_cell()
            .and_then(|c| c.referenced_range)
            .map(|r| r.text())
    }

    #[wasm_bindgen(js_name = stopEditing)]
    pub fn stop_editing(&self) {
        let mut s = self.shared.borrow_mut();
        s.grid.state_mut().stop_editing();
        s.paint();
    }

    /// Ranges referenced by the formula being edited, as
    /// `[{sheet, area: {rowStart, columnStart, rowEnd, columnEnd}, color}]`.
    #[wasm_bindgen(js_name = setActiveRanges)]
    pub fn set_active_ranges(&self, ranges: JsValue) -> Result<(), JsValue> {
        let ranges: Vec<ActiveRange> = serde_wasm_bindgen::from_value(ranges)?;
        let mut s = self.shared.borrow_mut();
        s.grid.state_mut().set_active_ranges(ranges);
        s.paint();
        Ok(())
    }

    #[wasm_bindgen(js_name = setCutRange)]
    pub fn set_cut_range(&self, row_start: u32, column_start: u32, row_end: u32, column_end: u32) {
        let mut s = self.shared.borrow_mut();
        let sheet = s.grid.model().selected_sheet();
        let area = CellArea::from_corners(row_start, column_start, row_end, column_end);
        s.grid.state_mut().set_cut_range(Some(CutRange { sheet, area }));
        s.paint();
    }

    #[wasm_bindgen(js_name = clearCutRange)]
    pub fn clear_cut_range(&self) {
        let mut s = self.shared.borrow_mut();
        s.grid.state_mut().set_cut_range(None);
        s.paint();
    }

    /// Abandon the drag in progress (e.g. on Escape).
    #[wasm_bindgen(js_name = cancelGesture)]
    pub fn cancel_gesture(&self) {
        let mut s = self.shared.borrow_mut();
        s.grid.cancel_gesture();
        s.paint();
    }
}
