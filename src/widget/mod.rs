//! The wasm widget shell.
//!
//! `TriPaneGrid` binds the pure engine to real DOM panes: it discovers the
//! pane elements, wires scroll/wheel/touch/drag listeners, schedules frames
//! and timers, and forwards engine events to host callbacks. All methods are
//! exported to JavaScript via `wasm-bindgen`.

mod dom;
mod events;

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use js_sys::{Function, Reflect};
use serde::Serialize;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{Document, HtmlElement, MouseEvent, TouchEvent, WheelEvent};

use crate::error::TripaneError;
use crate::layout::ColumnLayout;
use crate::sync::{
    global_max_scroll_left, handle_geometry, shadow_state, DragTracker, HeaderHeight,
    LoadMoreState, RetryPolicy, RetryState, RowHeightMap, ScrollbarVisibility, ShadowInput,
    ShadowState, SmoothScroll, SyncEngine, TouchTracker,
};
use crate::types::{ColumnSpec, GridEvent, GridOptions, ScrollPosition};

use dom::{DomPane, ScrollbarDom};

/// Timing helper; falls back to `Date.now()` outside a window context.
pub(crate) fn now_ms() -> f64 {
    if let Some(window) = web_sys::window() {
        if let Some(perf) = window.performance() {
            return perf.now();
        }
    }
    js_sys::Date::now()
}

/// Load-more restoration progresses in two steps after the unconstrained
/// write: one frame for the DOM to lay out the appended rows, then a short
/// settle delay before the constrained re-sync.
#[derive(Debug, Clone, Copy)]
pub(crate) enum RestoreStage {
    AwaitFrame(ScrollPosition),
    AwaitSettle(ScrollPosition),
}

/// Shared state reachable from event handlers.
pub(crate) struct SharedState {
    pub(crate) options: GridOptions,
    pub(crate) document: Document,
    pub(crate) container: HtmlElement,
    pub(crate) engine: SyncEngine<DomPane>,
    pub(crate) columns: Vec<ColumnSpec>,
    pub(crate) layout: ColumnLayout,
    pub(crate) row_count: usize,
    pub(crate) header: HeaderHeight,
    pub(crate) row_heights: RowHeightMap,
    pub(crate) load_more: LoadMoreState,
    pub(crate) touch: TouchTracker,
    pub(crate) drag: Option<DragTracker>,
    pub(crate) visibility: ScrollbarVisibility,
    pub(crate) shadow: ShadowState,
    pub(crate) scrollbar: Option<ScrollbarDom>,
    pub(crate) callbacks: HashMap<String, Function>,
    pub(crate) smooth: Option<SmoothScroll>,
    pub(crate) restore: Option<RestoreStage>,
    pub(crate) measure_requested: bool,
    pub(crate) measure_retry: RetryState,
    pub(crate) retry_policy: RetryPolicy,
    pub(crate) measure_timer: Option<i32>,
    pub(crate) measure_closure: Option<Closure<dyn FnMut()>>,
    pub(crate) raf_pending: bool,
    pub(crate) raf_closure: Option<Closure<dyn FnMut()>>,
    pub(crate) hide_timer: Option<i32>,
    pub(crate) hide_closure: Option<Closure<dyn FnMut()>>,
    pub(crate) settle_timer: Option<i32>,
    pub(crate) settle_closure: Option<Closure<dyn FnMut()>>,
}

/// Serialized form of `get_scroll_debug`, also exposed as JSON.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DebugSnapshot {
    scroll_top: f64,
    scroll_left: f64,
    max_scroll_top: f64,
    max_scroll_left: f64,
    shadow_left: bool,
    shadow_right: bool,
    header_height: f64,
    header_locked: bool,
    row_count: usize,
    measured_rows: usize,
    loading_more: bool,
    syncing: bool,
    total_columns_width: f64,
    container_width: f64,
}

impl SharedState {
    fn debug_snapshot(&self) -> DebugSnapshot {
        let metrics = self.engine.metrics();
        DebugSnapshot {
            scroll_top: metrics.scroll_top,
            scroll_left: metrics.scroll_left,
            max_scroll_top: self.engine.max_top(),
            max_scroll_left: self.engine.max_left(),
            shadow_left: self.shadow.left,
            shadow_right: self.shadow.right,
            header_height: self.header.value(),
            header_locked: self.header.is_locked(),
            row_count: self.row_count,
            measured_rows: self.row_heights.len(),
            loading_more: self.load_more.is_loading(),
            syncing: self.engine.is_syncing(),
            total_columns_width: self.layout.total_width(),
            container_width: f64::from(self.container.client_width()),
        }
    }
}

/// The exported grid. Keeps the listener closures alive for the lifetime of
/// the widget.
#[wasm_bindgen]
pub struct TriPaneGrid {
    state: Rc<RefCell<SharedState>>,
    #[allow(dead_code)]
    scroll_closures: Vec<Closure<dyn FnMut(web_sys::Event)>>,
    #[allow(dead_code)]
    wheel_closure: Option<Closure<dyn FnMut(WheelEvent)>>,
    #[allow(dead_code)]
    touch_start_closure: Option<Closure<dyn FnMut(TouchEvent)>>,
    #[allow(dead_code)]
    touch_move_closure: Option<Closure<dyn FnMut(TouchEvent)>>,
    #[allow(dead_code)]
    touch_end_closure: Option<Closure<dyn FnMut(TouchEvent)>>,
    #[allow(dead_code)]
    touch_cancel_closure: Option<Closure<dyn FnMut(TouchEvent)>>,
    #[allow(dead_code)]
    handle_down_closure: Option<Closure<dyn FnMut(MouseEvent)>>,
    #[allow(dead_code)]
    track_down_closure: Option<Closure<dyn FnMut(MouseEvent)>>,
    #[allow(dead_code)]
    window_move_closure: Option<Closure<dyn FnMut(MouseEvent)>>,
    #[allow(dead_code)]
    window_up_closure: Option<Closure<dyn FnMut(MouseEvent)>>,
}

fn parse_options(options: &JsValue) -> Result<GridOptions, TripaneError> {
    if options.is_undefined() || options.is_null() {
        return Ok(GridOptions::default());
    }
    serde_wasm_bindgen::from_value::<GridOptions>(options.clone())
        .map(GridOptions::sanitized)
        .map_err(|e| TripaneError::Options(e.to_string()))
}

#[wasm_bindgen]
impl TriPaneGrid {
    /// Bind to the container and wire every listener. Pane elements are
    /// discovered by explicit id when configured, else by class inside the
    /// container; missing panes are skipped.
    #[wasm_bindgen(constructor)]
    pub fn new(container_id: &str, options: JsValue) -> Result<TriPaneGrid, JsValue> {
        console_error_panic_hook::set_once();

        let options = parse_options(&options)?;
        let window =
            web_sys::window().ok_or_else(|| TripaneError::Dom("no window".to_string()))?;
        let document = window
            .document()
            .ok_or_else(|| TripaneError::Dom("no document".to_string()))?;
        let container = document
            .get_element_by_id(container_id)
            .ok_or_else(|| TripaneError::Dom(format!("container #{container_id} not found")))?
            .dyn_into::<HtmlElement>()
            .map_err(|_| {
                TripaneError::Dom(format!("container #{container_id} is not an HtmlElement"))
            })?;

        let panes = dom::discover_panes(&document, &container, &options);
        let engine = SyncEngine::new(panes, options.edge_tolerance);
        let scrollbar = ScrollbarDom::create(&document, &container).ok();

        let state = Rc::new(RefCell::new(SharedState {
            header: HeaderHeight::new(options.header_height),
            load_more: LoadMoreState::new(options.load_more_offset),
            visibility: ScrollbarVisibility::new(f64::from(options.auto_hide_ms)),
            options,
            document,
            container,
            engine,
            columns: Vec::new(),
            layout: ColumnLayout::default(),
            row_count: 0,
            row_heights: RowHeightMap::default(),
            touch: TouchTracker::default(),
            drag: None,
            shadow: ShadowState::default(),
            scrollbar,
            callbacks: HashMap::new(),
            smooth: None,
            restore: None,
            measure_requested: false,
            measure_retry: RetryState::default(),
            retry_policy: RetryPolicy::default(),
            measure_timer: None,
            measure_closure: None,
            raf_pending: false,
            raf_closure: None,
            hide_timer: None,
            hide_closure: None,
            settle_timer: None,
            settle_closure: None,
        }));

        let mut grid = TriPaneGrid {
            state,
            scroll_closures: Vec::new(),
            wheel_closure: None,
            touch_start_closure: None,
            touch_move_closure: None,
            touch_end_closure: None,
            touch_cancel_closure: None,
            handle_down_closure: None,
            track_down_closure: None,
            window_move_closure: None,
            window_up_closure: None,
        };
        grid.wire_listeners();
        Self::refresh_geometry(&grid.state);
        Self::sync_header_heights(&grid.state, false);
        Ok(grid)
    }

    /// Register a callback for one event name (`scroll`, `scroll-to-top`,
    /// `scroll-to-bottom`, `scroll-to-left`, `scroll-to-right`, `load-more`,
    /// `row-click`). One callback per event; a second call replaces it.
    pub fn on(&self, event: &str, callback: Function) {
        self.state
            .borrow_mut()
            .callbacks
            .insert(event.to_string(), callback);
    }

    pub fn off(&self, event: &str) {
        self.state.borrow_mut().callbacks.remove(event);
    }

    /// Replace the column set and re-derive widths, bounds, and indicators.
    pub fn set_columns(&self, columns: JsValue) -> Result<(), JsValue> {
        let columns: Vec<ColumnSpec> = serde_wasm_bindgen::from_value(columns)
            .map_err(|e| TripaneError::Columns(e.to_string()))?;
        self.state.borrow_mut().columns = columns;
        Self::refresh_geometry(&self.state);
        Ok(())
    }

    /// Tell the grid how many rows the host rendered, then re-measure them.
    pub fn set_row_count(&self, count: u32) {
        self.state.borrow_mut().row_count = count as usize;
        Self::request_row_measure(&self.state);
    }

    /// `false` silences the load-more trigger entirely.
    pub fn set_has_more(&self, has_more: bool) {
        self.state.borrow_mut().load_more.set_has_more(has_more);
    }

    /// Host callback once appended rows are in the DOM. Restores the
    /// trigger-time scroll position (buffered back from the new bottom) and
    /// schedules a fresh row measurement.
    pub fn notify_load_complete(&self, new_row_count: u32) {
        events::complete_load_more(&self.state, new_row_count as usize);
    }

    /// Abandon an in-flight load (host error path); the trigger re-arms.
    pub fn cancel_load_more(&self) {
        self.state.borrow_mut().load_more.cancel();
    }

    /// Jump both axes immediately (clamped).
    pub fn scroll_to(&self, top: f64, left: f64) {
        events::programmatic_scroll(&self.state, ScrollPosition::new(top, left));
    }

    /// Animate both axes with ease-out-quart.
    pub fn smooth_scroll_to(&self, top: f64, left: f64, duration_ms: Option<f64>) {
        Self::start_smooth(&self.state, ScrollPosition::new(top, left), duration_ms);
    }

    /// Animate to the horizontal start.
    pub fn scroll_to_left(&self) {
        let top = self.state.borrow().engine.metrics().scroll_top;
        Self::start_smooth(&self.state, ScrollPosition::new(top, 0.0), None);
    }

    /// Animate to the horizontal end.
    pub fn scroll_to_right(&self) {
        let (top, left) = {
            let s = self.state.borrow();
            (s.engine.metrics().scroll_top, s.engine.max_left())
        };
        Self::start_smooth(&self.state, ScrollPosition::new(top, left), None);
    }

    /// Animate until the column's left edge meets the scrollable region
    /// (just past the left-fixed pane). Out-of-range indexes are ignored.
    pub fn scroll_to_column(&self, index: u32) {
        let target = {
            let s = self.state.borrow();
            s.layout.offset_of(index as usize).map(|x| {
                ScrollPosition::new(
                    s.engine.metrics().scroll_top,
                    (x - s.layout.left_fixed_width()).max(0.0),
                )
            })
        };
        if let Some(target) = target {
            Self::start_smooth(&self.state, target, None);
        }
    }

    /// Re-measure the header across panes even if a height is locked in.
    pub fn force_header_sync(&self) {
        Self::sync_header_heights(&self.state, true);
    }

    /// Two-phase row re-measurement: clear pinned heights now, resolve and
    /// pin on the next frame (retrying briefly while panes mount).
    pub fn measure_row_heights(&self) {
        Self::request_row_measure(&self.state);
    }

    /// Re-resolve the column layout and every indicator against current
    /// container geometry. Call on container resize.
    pub fn refresh(&self) {
        Self::refresh_geometry(&self.state);
        Self::sync_header_heights(&self.state, false);
    }

    /// Re-discover pane elements after the host re-rendered them, keeping
    /// the scroll position.
    pub fn reattach(&self) {
        let position = {
            let mut s = self.state.borrow_mut();
            let position = s.engine.position();
            let panes = dom::discover_panes(&s.document, &s.container, &s.options);
            s.engine = SyncEngine::new(panes, s.options.edge_tolerance);
            position
        };
        Self::refresh_geometry(&self.state);
        events::programmatic_scroll(&self.state, position);
        Self::sync_header_heights(&self.state, false);
        Self::request_row_measure(&self.state);
    }

    pub fn scroll_top(&self) -> f64 {
        self.state.borrow().engine.metrics().scroll_top
    }

    pub fn scroll_left(&self) -> f64 {
        self.state.borrow().engine.metrics().scroll_left
    }

    /// Locked header height currently pinned across panes.
    pub fn header_height(&self) -> f64 {
        self.state.borrow().header.value()
    }

    /// Engine snapshot as a plain JS object.
    pub fn get_scroll_debug(&self) -> JsValue {
        let snapshot = self.state.borrow().debug_snapshot();
        let obj = js_sys::Object::new();
        let set = |key: &str, value: JsValue| {
            let _ = Reflect::set(&obj, &JsValue::from_str(key), &value);
        };
        set("scrollTop", JsValue::from_f64(snapshot.scroll_top));
        set("scrollLeft", JsValue::from_f64(snapshot.scroll_left));
        set("maxScrollTop", JsValue::from_f64(snapshot.max_scroll_top));
        set("maxScrollLeft", JsValue::from_f64(snapshot.max_scroll_left));
        set("shadowLeft", JsValue::from_bool(snapshot.shadow_left));
        set("shadowRight", JsValue::from_bool(snapshot.shadow_right));
        set("headerHeight", JsValue::from_f64(snapshot.header_height));
        set("headerLocked", JsValue::from_bool(snapshot.header_locked));
        set("rowCount", JsValue::from_f64(snapshot.row_count as f64));
        set("measuredRows", JsValue::from_f64(snapshot.measured_rows as f64));
        set("loadingMore", JsValue::from_bool(snapshot.loading_more));
        set("syncing", JsValue::from_bool(snapshot.syncing));
        set(
            "totalColumnsWidth",
            JsValue::from_f64(snapshot.total_columns_width),
        );
        set(
            "containerWidth",
            JsValue::from_f64(snapshot.container_width),
        );
        obj.into()
    }

    /// Engine snapshot as a JSON string, for logging.
    pub fn debug_json(&self) -> String {
        let snapshot = self.state.borrow().debug_snapshot();
        serde_json::to_string(&snapshot).unwrap_or_else(|_| "{}".to_string())
    }
}

impl TriPaneGrid {
    /// Resolve column widths against the container and push the horizontal
    /// bound into the engine, then repaint indicators.
    pub(crate) fn refresh_geometry(state: &Rc<RefCell<SharedState>>) {
        let mut s = state.borrow_mut();
        let container_width = f64::from(s.container.client_width());
        s.layout = ColumnLayout::resolve(&s.columns, container_width);
        s.engine.set_max_left(global_max_scroll_left(
            s.layout.total_width(),
            container_width,
            s.layout.left_fixed_width(),
            s.layout.right_fixed_width(),
        ));
        let now = now_ms();
        Self::update_indicators(&mut s, now);
    }

    /// Recompute shadows and scrollbar geometry/visibility from live
    /// metrics. Caller holds the borrow.
    pub(crate) fn update_indicators(s: &mut SharedState, now: f64) {
        let metrics = s.engine.metrics();
        let shadow = shadow_state(&ShadowInput {
            has_left_fixed: s.layout.has_left_fixed(),
            has_right_fixed: s.layout.has_right_fixed(),
            total_columns_width: s.layout.total_width(),
            container_width: f64::from(s.container.client_width()),
            left_fixed_width: s.layout.left_fixed_width(),
            right_fixed_width: s.layout.right_fixed_width(),
            scroll_left: metrics.scroll_left,
            tolerance: s.options.edge_tolerance,
        });
        if shadow != s.shadow {
            s.shadow = shadow;
            dom::apply_shadow_classes(&s.container, shadow.left, shadow.right);
        }

        if let Some(bar) = &s.scrollbar {
            let geometry = handle_geometry(
                bar.track_width(),
                metrics.client_width,
                metrics.scroll_width,
                metrics.scroll_left,
            );
            bar.apply_geometry(geometry.width, geometry.offset);
            let overflows = metrics.scroll_width > metrics.client_width;
            bar.set_visible(s.visibility.is_visible(now, overflows));
        }
    }

    /// Measure header rows across panes and pin the max when it wins.
    pub(crate) fn sync_header_heights(state: &Rc<RefCell<SharedState>>, force: bool) {
        let mut s = state.borrow_mut();
        let roots: Vec<&HtmlElement> = [
            s.engine.panes().main.as_ref(),
            s.engine.panes().left.as_ref(),
            s.engine.panes().right.as_ref(),
            s.engine.panes().header.as_ref(),
        ]
        .into_iter()
        .flatten()
        .map(DomPane::element)
        .collect();
        let rows = dom::header_rows(&roots);
        let measured = dom::measure_heights(&rows);
        if let Some(height) = s.header.measure(measured, force) {
            dom::pin_heights(&rows, height);
        }
    }

    /// Phase 1 of row measurement; phase 2 runs on the next frame.
    pub(crate) fn request_row_measure(state: &Rc<RefCell<SharedState>>) {
        {
            let mut s = state.borrow_mut();
            let surfaces = events::row_surfaces(&s);
            crate::sync::clear_row_heights(&surfaces.iter().collect::<Vec<_>>());
            s.measure_requested = true;
        }
        events::ensure_raf(state);
    }

    pub(crate) fn start_smooth(
        state: &Rc<RefCell<SharedState>>,
        to: ScrollPosition,
        duration_ms: Option<f64>,
    ) {
        {
            let mut s = state.borrow_mut();
            let from = s.engine.metrics().position();
            let duration = duration_ms.unwrap_or(s.options.smooth_duration_ms).max(0.0);
            s.smooth = Some(SmoothScroll::new(from, to, now_ms(), duration));
        }
        events::ensure_raf(state);
    }

    /// Invoke host callbacks for `events`. Callbacks run with no state
    /// borrow held, so they can call back into the grid.
    pub(crate) fn dispatch(state: &Rc<RefCell<SharedState>>, events: Vec<GridEvent>) {
        if events.is_empty() {
            return;
        }
        let calls: Vec<(Function, JsValue)> = {
            let s = state.borrow();
            events
                .iter()
                .filter_map(|event| {
                    s.callbacks
                        .get(event.name())
                        .map(|cb| (cb.clone(), event_payload(event)))
                })
                .collect()
        };
        for (callback, payload) in calls {
            let _ = callback.call1(&JsValue::NULL, &payload);
        }
    }
}

fn event_payload(event: &GridEvent) -> JsValue {
    match event {
        GridEvent::RowClick { row } => {
            let obj = js_sys::Object::new();
            let _ = Reflect::set(
                &obj,
                &JsValue::from_str("row"),
                &JsValue::from_f64(*row as f64),
            );
            obj.into()
        }
        other => other
            .metrics()
            .and_then(|metrics| serde_wasm_bindgen::to_value(metrics).ok())
            .unwrap_or(JsValue::NULL),
    }
}
