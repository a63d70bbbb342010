//! DOM implementations of the engine's surfaces, plus the scrollbar DOM.

use js_sys::Reflect;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement};

use crate::error::{Result, TripaneError};
use crate::sync::{PaneSet, PaneSurface, RowSurface};
use crate::types::GridOptions;

/// Selector for body rows inside a pane.
const ROW_SELECTOR: &str = "tbody tr, .tripane-row";
/// Selector for cells inside a row.
const CELL_SELECTOR: &str = "td, .tripane-cell";
/// Selector for the header row inside a pane.
const HEADER_ROW_SELECTOR: &str = "thead tr, .tripane-header-row";

fn scroll_top_f64(element: &HtmlElement) -> f64 {
    Reflect::get(element.as_ref(), &JsValue::from_str("scrollTop"))
        .ok()
        .and_then(|value| value.as_f64())
        .unwrap_or_else(|| f64::from(element.scroll_top()))
}

fn scroll_left_f64(element: &HtmlElement) -> f64 {
    Reflect::get(element.as_ref(), &JsValue::from_str("scrollLeft"))
        .ok()
        .and_then(|value| value.as_f64())
        .unwrap_or_else(|| f64::from(element.scroll_left()))
}

fn set_scroll_f64(element: &HtmlElement, prop: &str, value: f64) {
    let _ = Reflect::set(
        element.as_ref(),
        &JsValue::from_str(prop),
        &JsValue::from_f64(value),
    );
}

/// A scrollable pane element. Fractional positions go through `Reflect` so
/// nothing truncates to whole pixels.
#[derive(Clone)]
pub(crate) struct DomPane {
    el: HtmlElement,
}

impl DomPane {
    pub(crate) fn new(el: HtmlElement) -> Self {
        Self { el }
    }

    pub(crate) fn element(&self) -> &HtmlElement {
        &self.el
    }
}

impl PaneSurface for DomPane {
    fn scroll_top(&self) -> f64 {
        scroll_top_f64(&self.el)
    }

    fn set_scroll_top(&self, top: f64) {
        set_scroll_f64(&self.el, "scrollTop", top);
    }

    fn scroll_left(&self) -> f64 {
        scroll_left_f64(&self.el)
    }

    fn set_scroll_left(&self, left: f64) {
        set_scroll_f64(&self.el, "scrollLeft", left);
    }

    fn scroll_height(&self) -> f64 {
        f64::from(self.el.scroll_height())
    }

    fn client_height(&self) -> f64 {
        f64::from(self.el.client_height())
    }

    fn scroll_width(&self) -> f64 {
        f64::from(self.el.scroll_width())
    }

    fn client_width(&self) -> f64 {
        f64::from(self.el.client_width())
    }
}

/// Find a pane by explicit id first, then by class inside the container.
fn find_pane(
    document: &Document,
    container: &HtmlElement,
    id: Option<&str>,
    class: &str,
) -> Option<DomPane> {
    if let Some(id) = id {
        if let Some(el) = document.get_element_by_id(id) {
            if let Ok(el) = el.dyn_into::<HtmlElement>() {
                return Some(DomPane::new(el));
            }
        }
    }
    let selector = format!(".{class}");
    container
        .query_selector(&selector)
        .ok()
        .flatten()
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        .map(DomPane::new)
}

/// Discover whichever panes exist. Missing panes stay `None` and are skipped
/// by the engine.
pub(crate) fn discover_panes(
    document: &Document,
    container: &HtmlElement,
    options: &GridOptions,
) -> PaneSet<DomPane> {
    PaneSet {
        main: find_pane(
            document,
            container,
            options.main_id.as_deref(),
            &options.main_class,
        ),
        left: find_pane(
            document,
            container,
            options.left_id.as_deref(),
            &options.left_class,
        ),
        right: find_pane(
            document,
            container,
            options.right_id.as_deref(),
            &options.right_class,
        ),
        header: find_pane(
            document,
            container,
            options.header_id.as_deref(),
            &options.header_class,
        ),
    }
}

fn collect_elements(root: &Element, selector: &str) -> Vec<HtmlElement> {
    let mut out = Vec::new();
    if let Ok(list) = root.query_selector_all(selector) {
        for i in 0..list.length() {
            if let Some(node) = list.item(i) {
                if let Ok(el) = node.dyn_into::<HtmlElement>() {
                    out.push(el);
                }
            }
        }
    }
    out
}

fn set_pinned_height(el: &HtmlElement, height: f64) {
    let px = format!("{height}px");
    let style = el.style();
    let _ = style.set_property("height", &px);
    let _ = style.set_property("min-height", &px);
    let _ = style.set_property("max-height", &px);
}

fn clear_pinned_height(el: &HtmlElement) {
    let style = el.style();
    let _ = style.remove_property("height");
    let _ = style.remove_property("min-height");
    let _ = style.remove_property("max-height");
}

/// One pane's row elements, snapshotted at measurement time.
pub(crate) struct DomRows {
    rows: Vec<HtmlElement>,
}

impl DomRows {
    pub(crate) fn collect(pane: &DomPane) -> Self {
        Self {
            rows: collect_elements(pane.element().as_ref(), ROW_SELECTOR),
        }
    }
}

impl RowSurface for DomRows {
    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn clear_row_height(&self, row: usize) {
        let Some(el) = self.rows.get(row) else {
            return;
        };
        clear_pinned_height(el);
        for cell in collect_elements(el.as_ref(), CELL_SELECTOR) {
            clear_pinned_height(&cell);
        }
    }

    fn natural_row_height(&self, row: usize) -> Option<f64> {
        let el = self.rows.get(row)?;
        let height = f64::from(el.offset_height());
        (height > 0.0).then_some(height)
    }

    fn pin_row_height(&self, row: usize, height: f64) {
        let Some(el) = self.rows.get(row) else {
            return;
        };
        set_pinned_height(el, height);
        for cell in collect_elements(el.as_ref(), CELL_SELECTOR) {
            set_pinned_height(&cell, height);
        }
    }
}

/// Header rows across the given pane roots (one per pane that has one).
pub(crate) fn header_rows(roots: &[&HtmlElement]) -> Vec<HtmlElement> {
    roots
        .iter()
        .filter_map(|root| {
            root.query_selector(HEADER_ROW_SELECTOR)
                .ok()
                .flatten()
                .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        })
        .collect()
}

pub(crate) fn measure_heights(rows: &[HtmlElement]) -> Vec<f64> {
    rows.iter().map(|el| f64::from(el.offset_height())).collect()
}

pub(crate) fn pin_heights(rows: &[HtmlElement], height: f64) {
    for el in rows {
        set_pinned_height(el, height);
    }
}

/// The injected horizontal scrollbar: a track pinned to the container's
/// bottom edge with a draggable handle.
pub(crate) struct ScrollbarDom {
    track: HtmlElement,
    handle: HtmlElement,
}

impl ScrollbarDom {
    pub(crate) fn create(document: &Document, container: &HtmlElement) -> Result<Self> {
        // The track positions against the container.
        let position = container.style().get_property_value("position").ok();
        if position.as_deref().unwrap_or("").is_empty() {
            let _ = container.style().set_property("position", "relative");
        }

        let track = document
            .create_element("div")
            .map_err(|_| TripaneError::Dom("failed to create scrollbar track".to_string()))?
            .dyn_into::<HtmlElement>()
            .map_err(|_| TripaneError::Dom("scrollbar track is not an HtmlElement".to_string()))?;
        track.set_class_name("tripane-scrollbar");
        let style = track.style();
        let _ = style.set_property("position", "absolute");
        let _ = style.set_property("left", "0");
        let _ = style.set_property("right", "0");
        let _ = style.set_property("bottom", "0");
        let _ = style.set_property("height", "8px");
        let _ = style.set_property("z-index", "10");
        let _ = style.set_property("opacity", "0");
        let _ = style.set_property("transition", "opacity 0.25s");
        let _ = style.set_property("pointer-events", "none");

        let handle = document
            .create_element("div")
            .map_err(|_| TripaneError::Dom("failed to create scrollbar handle".to_string()))?
            .dyn_into::<HtmlElement>()
            .map_err(|_| TripaneError::Dom("scrollbar handle is not an HtmlElement".to_string()))?;
        handle.set_class_name("tripane-scrollbar__handle");
        let style = handle.style();
        let _ = style.set_property("position", "absolute");
        let _ = style.set_property("top", "1px");
        let _ = style.set_property("height", "6px");
        let _ = style.set_property("border-radius", "3px");
        let _ = style.set_property("background", "rgba(144, 147, 153, 0.45)");

        track
            .append_child(handle.as_ref())
            .map_err(|_| TripaneError::Dom("failed to attach scrollbar handle".to_string()))?;
        container
            .append_child(track.as_ref())
            .map_err(|_| TripaneError::Dom("failed to attach scrollbar track".to_string()))?;

        Ok(Self { track, handle })
    }

    pub(crate) fn track(&self) -> &HtmlElement {
        &self.track
    }

    pub(crate) fn handle(&self) -> &HtmlElement {
        &self.handle
    }

    pub(crate) fn track_width(&self) -> f64 {
        f64::from(self.track.client_width())
    }

    pub(crate) fn handle_width(&self) -> f64 {
        f64::from(self.handle.offset_width())
    }

    pub(crate) fn apply_geometry(&self, width: f64, offset: f64) {
        let style = self.handle.style();
        let _ = style.set_property("width", &format!("{width}px"));
        let _ = style.set_property("transform", &format!("translateX({offset}px)"));
    }

    pub(crate) fn set_visible(&self, visible: bool) {
        let style = self.track.style();
        if visible {
            let _ = self.track.class_list().add_1("is-visible");
            let _ = style.set_property("opacity", "1");
            let _ = style.set_property("pointer-events", "auto");
        } else {
            let _ = self.track.class_list().remove_1("is-visible");
            let _ = style.set_property("opacity", "0");
            let _ = style.set_property("pointer-events", "none");
        }
    }
}

/// Kill text selection for the duration of a scrollbar drag.
pub(crate) fn suppress_text_selection(document: &Document, suppress: bool) {
    let Some(body) = document.body() else {
        return;
    };
    let style = body.style();
    if suppress {
        let _ = style.set_property("user-select", "none");
        let _ = style.set_property("-webkit-user-select", "none");
    } else {
        let _ = style.remove_property("user-select");
        let _ = style.remove_property("-webkit-user-select");
    }
}

/// Row index for a tap: nearest `[data-row-index]` ancestor of the target.
pub(crate) fn row_index_of(target: Option<web_sys::EventTarget>) -> Option<usize> {
    let el = target?.dyn_into::<Element>().ok()?;
    let row = el.closest("[data-row-index]").ok().flatten()?;
    row.get_attribute("data-row-index")?.parse().ok()
}

/// Toggle the fixed-pane shadow classes on the container.
pub(crate) fn apply_shadow_classes(container: &HtmlElement, left: bool, right: bool) {
    let classes = container.class_list();
    if left {
        let _ = classes.add_1("tripane--shadow-left");
    } else {
        let _ = classes.remove_1("tripane--shadow-left");
    }
    if right {
        let _ = classes.add_1("tripane--shadow-right");
    } else {
        let _ = classes.remove_1("tripane--shadow-right");
    }
}
