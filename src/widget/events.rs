//! Browser event handlers and scheduling.
//!
//! Handlers follow one borrow discipline: engine syncs run under a shared
//! borrow (the engine is interior-mutable and its own lock drops re-entrant
//! calls), and `after_sync` takes the mutable borrow only once the sync
//! borrow is released. Scroll handlers use `try_borrow` so a scroll event
//! fired during a programmatic write degrades to a drop instead of a panic.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{AddEventListenerOptions, HtmlElement, MouseEvent, TouchEvent, WheelEvent};

use crate::sync::{
    handle_geometry, plan_wheel, resolve_row_heights, surfaces_ready, DragTracker, PaneKind,
    RetryStep, SyncOutcome, SyncReport, TouchMove,
};
use crate::types::{GridEvent, ScrollPosition};

use super::dom::{self, DomPane, DomRows};
use super::{now_ms, RestoreStage, SharedState, TriPaneGrid};

/// Row surfaces for every present vertical pane, snapshotted now.
pub(crate) fn row_surfaces(s: &SharedState) -> Vec<DomRows> {
    let panes = s.engine.panes();
    [panes.main.as_ref(), panes.left.as_ref(), panes.right.as_ref()]
        .into_iter()
        .flatten()
        .map(DomRows::collect)
        .collect()
}

impl TriPaneGrid {
    pub(crate) fn wire_listeners(&mut self) {
        let state = &self.state;

        // Native scroll on every vertical pane; the header never scrolls
        // itself, it only follows.
        for kind in [PaneKind::Main, PaneKind::LeftFixed, PaneKind::RightFixed] {
            let target = {
                let s = state.borrow();
                s.engine
                    .panes()
                    .get(kind)
                    .map(|pane| pane.element().clone())
            };
            let Some(target) = target else {
                continue;
            };
            let state_clone = Rc::clone(state);
            let closure = Closure::wrap(Box::new(move |_event: web_sys::Event| {
                handle_pane_scroll(&state_clone, kind);
            }) as Box<dyn FnMut(web_sys::Event)>);
            let _ = target
                .add_event_listener_with_callback("scroll", closure.as_ref().unchecked_ref());
            self.scroll_closures.push(closure);
        }

        // Fixed panes keep overflow hidden, so wheel and touch are emulated
        // there. Non-passive: the handlers call `prevent_default`.
        let fixed_panes: Vec<HtmlElement> = {
            let s = state.borrow();
            [PaneKind::LeftFixed, PaneKind::RightFixed]
                .into_iter()
                .filter_map(|kind| s.engine.panes().get(kind).map(DomPane::element).cloned())
                .collect()
        };
        if !fixed_panes.is_empty() {
            let non_passive = AddEventListenerOptions::new();
            non_passive.set_passive(false);

            let state_clone = Rc::clone(state);
            let closure = Closure::wrap(Box::new(move |event: WheelEvent| {
                handle_wheel(&state_clone, &event);
            }) as Box<dyn FnMut(WheelEvent)>);
            for pane in &fixed_panes {
                let _ = pane.add_event_listener_with_callback_and_add_event_listener_options(
                    "wheel",
                    closure.as_ref().unchecked_ref(),
                    &non_passive,
                );
            }
            self.wheel_closure = Some(closure);

            let state_clone = Rc::clone(state);
            let closure = Closure::wrap(Box::new(move |event: TouchEvent| {
                handle_touch_start(&state_clone, &event);
            }) as Box<dyn FnMut(TouchEvent)>);
            for pane in &fixed_panes {
                let _ = pane.add_event_listener_with_callback(
                    "touchstart",
                    closure.as_ref().unchecked_ref(),
                );
            }
            self.touch_start_closure = Some(closure);

            let state_clone = Rc::clone(state);
            let closure = Closure::wrap(Box::new(move |event: TouchEvent| {
                handle_touch_move(&state_clone, &event);
            }) as Box<dyn FnMut(TouchEvent)>);
            for pane in &fixed_panes {
                let _ = pane.add_event_listener_with_callback_and_add_event_listener_options(
                    "touchmove",
                    closure.as_ref().unchecked_ref(),
                    &non_passive,
                );
            }
            self.touch_move_closure = Some(closure);

            let state_clone = Rc::clone(state);
            let closure = Closure::wrap(Box::new(move |event: TouchEvent| {
                handle_touch_end(&state_clone, &event);
            }) as Box<dyn FnMut(TouchEvent)>);
            for pane in &fixed_panes {
                let _ = pane.add_event_listener_with_callback(
                    "touchend",
                    closure.as_ref().unchecked_ref(),
                );
            }
            self.touch_end_closure = Some(closure);

            let state_clone = Rc::clone(state);
            let closure = Closure::wrap(Box::new(move |_event: TouchEvent| {
                handle_touch_cancel(&state_clone);
            }) as Box<dyn FnMut(TouchEvent)>);
            for pane in &fixed_panes {
                let _ = pane.add_event_listener_with_callback(
                    "touchcancel",
                    closure.as_ref().unchecked_ref(),
                );
            }
            self.touch_cancel_closure = Some(closure);
        }

        // Injected scrollbar: drag on the handle, paging on the track.
        let bar = {
            let s = state.borrow();
            s.scrollbar
                .as_ref()
                .map(|bar| (bar.handle().clone(), bar.track().clone()))
        };
        if let Some((handle, track)) = bar {
            let state_clone = Rc::clone(state);
            let closure = Closure::wrap(Box::new(move |event: MouseEvent| {
                handle_handle_down(&state_clone, &event);
            }) as Box<dyn FnMut(MouseEvent)>);
            let _ = handle
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            self.handle_down_closure = Some(closure);

            let state_clone = Rc::clone(state);
            let closure = Closure::wrap(Box::new(move |event: MouseEvent| {
                handle_track_down(&state_clone, &event);
            }) as Box<dyn FnMut(MouseEvent)>);
            let _ = track
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            self.track_down_closure = Some(closure);
        }

        // Drags continue outside the container, so movement tracks on the
        // window. The handlers no-op unless a drag is active.
        if let Some(window) = web_sys::window() {
            let state_clone = Rc::clone(state);
            let closure = Closure::wrap(Box::new(move |event: MouseEvent| {
                handle_window_move(&state_clone, &event);
            }) as Box<dyn FnMut(MouseEvent)>);
            let _ = window
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            self.window_move_closure = Some(closure);

            let state_clone = Rc::clone(state);
            let closure = Closure::wrap(Box::new(move |_event: MouseEvent| {
                handle_window_up(&state_clone);
            }) as Box<dyn FnMut(MouseEvent)>);
            let _ = window
                .add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref());
            self.window_up_closure = Some(closure);
        }
    }
}

/// Shared tail for every applied sync: indicators, the load-more trigger,
/// the auto-hide timer, then host callbacks with no borrow held.
pub(crate) fn after_sync(state: &Rc<RefCell<SharedState>>, report: SyncReport) {
    let moved_down = report.moved_down();
    let moved_horizontally = (report.position.left - report.previous.left).abs() > f64::EPSILON;
    let SyncReport {
        metrics,
        mut events,
        ..
    } = report;

    let triggered = {
        let mut s = state.borrow_mut();
        let now = now_ms();
        if moved_horizontally || s.visibility.is_dragging() {
            s.visibility.touch(now);
        }
        TriPaneGrid::update_indicators(&mut s, now);
        let row_count = s.row_count;
        s.load_more.on_scroll(&metrics, moved_down, row_count)
    };
    if triggered {
        events.push(GridEvent::LoadMore(metrics));
    }

    schedule_auto_hide(state);
    TriPaneGrid::dispatch(state, events);
}

fn handle_pane_scroll(state: &Rc<RefCell<SharedState>>, kind: PaneKind) {
    let outcome = {
        let Ok(s) = state.try_borrow() else {
            return;
        };
        s.engine.sync_from(kind)
    };
    if let SyncOutcome::Applied(report) = outcome {
        after_sync(state, report);
    }
}

fn handle_wheel(state: &Rc<RefCell<SharedState>>, event: &WheelEvent) {
    event.prevent_default();
    let outcome = {
        let s = state.borrow();
        let target = plan_wheel(
            s.engine.position(),
            event.delta_y(),
            s.options.wheel_sensitivity,
        );
        s.engine.sync_to(target)
    };
    if let SyncOutcome::Applied(report) = outcome {
        after_sync(state, report);
    }
}

fn handle_touch_start(state: &Rc<RefCell<SharedState>>, event: &TouchEvent) {
    let Some(touch) = event.touches().get(0) else {
        return;
    };
    let mut s = state.borrow_mut();
    let origin = s.engine.position();
    s.touch.begin(
        f64::from(touch.client_x()),
        f64::from(touch.client_y()),
        now_ms(),
        origin,
    );
}

fn handle_touch_move(state: &Rc<RefCell<SharedState>>, event: &TouchEvent) {
    let Some(touch) = event.touches().get(0) else {
        return;
    };
    let outcome = {
        let s = state.borrow();
        if !s.touch.is_active() {
            return;
        }
        let plan = s.touch.on_move(
            f64::from(touch.client_x()),
            f64::from(touch.client_y()),
            s.engine.position(),
            &s.engine.bounds(),
        );
        match plan {
            TouchMove::Ignore | TouchMove::PassThrough => None,
            TouchMove::Scroll(target) => {
                event.prevent_default();
                Some(s.engine.sync_to(target))
            }
        }
    };
    if let Some(SyncOutcome::Applied(report)) = outcome {
        after_sync(state, report);
    }
}

fn handle_touch_end(state: &Rc<RefCell<SharedState>>, event: &TouchEvent) {
    let Some(touch) = event.changed_touches().get(0) else {
        state.borrow_mut().touch.cancel();
        return;
    };
    let tap = state.borrow_mut().touch.end(
        f64::from(touch.client_x()),
        f64::from(touch.client_y()),
        now_ms(),
    );
    if tap.is_some() {
        if let Some(row) = dom::row_index_of(event.target()) {
            TriPaneGrid::dispatch(state, vec![GridEvent::RowClick { row }]);
        }
    }
}

fn handle_touch_cancel(state: &Rc<RefCell<SharedState>>) {
    state.borrow_mut().touch.cancel();
}

fn handle_handle_down(state: &Rc<RefCell<SharedState>>, event: &MouseEvent) {
    event.prevent_default();
    // The track's paging listener sits underneath.
    event.stop_propagation();
    let mut s = state.borrow_mut();
    let drag = {
        let Some(bar) = &s.scrollbar else {
            return;
        };
        let metrics = s.engine.metrics();
        DragTracker::begin(
            f64::from(event.client_x()),
            metrics.scroll_left,
            bar.track_width(),
            bar.handle_width(),
            metrics.scroll_width,
            metrics.client_width,
        )
    };
    s.drag = Some(drag);
    s.visibility.begin_drag(now_ms());
    dom::suppress_text_selection(&s.document, true);
}

fn handle_track_down(state: &Rc<RefCell<SharedState>>, event: &MouseEvent) {
    event.prevent_default();
    let target = {
        let s = state.borrow();
        let Some(bar) = &s.scrollbar else {
            return;
        };
        let metrics = s.engine.metrics();
        let geometry = handle_geometry(
            bar.track_width(),
            metrics.client_width,
            metrics.scroll_width,
            metrics.scroll_left,
        );
        let track_left = bar.track().get_bounding_client_rect().left();
        let handle_center = track_left + geometry.offset + geometry.width / 2.0;
        // Page one viewport toward the click.
        let left = if f64::from(event.client_x()) < handle_center {
            metrics.scroll_left - metrics.client_width
        } else {
            metrics.scroll_left + metrics.client_width
        };
        ScrollPosition::new(metrics.scroll_top, left.max(0.0))
    };
    TriPaneGrid::start_smooth(state, target, None);
}

fn handle_window_move(state: &Rc<RefCell<SharedState>>, event: &MouseEvent) {
    let outcome = {
        let s = state.borrow();
        let Some(drag) = s.drag else {
            return;
        };
        let top = s.engine.position().top;
        let left = drag.target_left(f64::from(event.client_x()));
        s.engine.sync_to(ScrollPosition::new(top, left))
    };
    if let SyncOutcome::Applied(report) = outcome {
        after_sync(state, report);
    }
}

fn handle_window_up(state: &Rc<RefCell<SharedState>>) {
    {
        let mut s = state.borrow_mut();
        if s.drag.take().is_none() {
            return;
        }
        s.visibility.end_drag(now_ms());
        dom::suppress_text_selection(&s.document, false);
    }
    schedule_auto_hide(state);
}

/// Jump both axes now, cancelling any animation in flight.
pub(crate) fn programmatic_scroll(state: &Rc<RefCell<SharedState>>, target: ScrollPosition) {
    state.borrow_mut().smooth = None;
    let outcome = state.borrow().engine.sync_to(target);
    if let SyncOutcome::Applied(report) = outcome {
        after_sync(state, report);
    }
}

/// Finish an in-flight load: restore the trigger-time position against the
/// post-append geometry, then re-measure rows on the next frame.
///
/// The restore write is unconstrained and emits nothing, so it cannot
/// re-trigger the load-more edge while the DOM is still settling. A
/// constrained re-sync follows one frame plus a settle delay later.
pub(crate) fn complete_load_more(state: &Rc<RefCell<SharedState>>, new_row_count: usize) {
    {
        let mut s = state.borrow_mut();
        s.row_count = new_row_count;
        let row_height = s
            .row_heights
            .typical()
            .unwrap_or(s.options.min_row_height);
        let new_max_top = s.engine.max_top();
        let Some(plan) = s.load_more.complete(new_max_top, row_height) else {
            return;
        };
        let left = s.engine.position().left;
        let target = ScrollPosition::new(plan.target_top, left);
        let _ = s.engine.sync_unconstrained(target);
        s.restore = Some(RestoreStage::AwaitFrame(target));

        // Appended rows measure on the same frame, before the settle.
        let surfaces = row_surfaces(&s);
        crate::sync::clear_row_heights(&surfaces.iter().collect::<Vec<_>>());
        s.measure_requested = true;
    }
    ensure_raf(state);
}

pub(crate) fn ensure_raf(state: &Rc<RefCell<SharedState>>) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let mut s = state.borrow_mut();
    if s.raf_pending {
        return;
    }
    if s.raf_closure.is_none() {
        let weak_state = Rc::downgrade(state);
        let closure = Closure::wrap(Box::new(move || {
            if let Some(state) = weak_state.upgrade() {
                on_frame(&state);
            }
        }) as Box<dyn FnMut()>);
        s.raf_closure = Some(closure);
    }
    let Some(callback) = s.raf_closure.as_ref() else {
        return;
    };
    s.raf_pending = window
        .request_animation_frame(callback.as_ref().unchecked_ref())
        .is_ok();
}

fn on_frame(state: &Rc<RefCell<SharedState>>) {
    state.borrow_mut().raf_pending = false;
    let now = now_ms();

    run_pending_measure(state);

    // Animation step.
    let step = {
        let mut s = state.borrow_mut();
        match s.smooth {
            Some(animation) => {
                let (position, done) = animation.position_at(now);
                if done {
                    s.smooth = None;
                }
                Some((position, done))
            }
            None => None,
        }
    };
    if let Some((position, done)) = step {
        let outcome = state.borrow().engine.sync_to(position);
        if let SyncOutcome::Applied(report) = outcome {
            after_sync(state, report);
        }
        if !done {
            ensure_raf(state);
        }
    }

    // One frame after the unconstrained restore write, arm the settle timer.
    let arm_settle = {
        let mut s = state.borrow_mut();
        match s.restore {
            Some(RestoreStage::AwaitFrame(target)) => {
                s.restore = Some(RestoreStage::AwaitSettle(target));
                true
            }
            _ => false,
        }
    };
    if arm_settle {
        schedule_settle(state);
    }
}

/// Phase 2 of row measurement. Rows resolve when every present pane reports
/// them; otherwise a short retry runs until the policy gives up.
fn run_pending_measure(state: &Rc<RefCell<SharedState>>) {
    let retry_after = {
        let mut s = state.borrow_mut();
        if !s.measure_requested {
            return;
        }
        let surfaces = row_surfaces(&s);
        let refs: Vec<&DomRows> = surfaces.iter().collect();
        let policy = s.retry_policy;
        if surfaces_ready(&refs) {
            let resolved = resolve_row_heights(&refs, s.options.min_row_height);
            s.row_heights = resolved;
            let _ = s.measure_retry.step(policy, true);
            s.measure_requested = false;
            None
        } else {
            match s.measure_retry.step(policy, false) {
                RetryStep::RetryAfter(delay) => Some(delay),
                RetryStep::GaveUp => {
                    web_sys::console::warn_1(&JsValue::from_str(
                        "tripane: row measurement gave up, no pane reported laid-out rows",
                    ));
                    s.measure_requested = false;
                    None
                }
                RetryStep::Ready => None,
            }
        }
    };
    if let Some(delay) = retry_after {
        schedule_measure_retry(state, delay);
    }
}

fn schedule_measure_retry(state: &Rc<RefCell<SharedState>>, delay_ms: u32) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let mut s = state.borrow_mut();
    if let Some(timer_id) = s.measure_timer.take() {
        window.clear_timeout_with_handle(timer_id);
    }
    if s.measure_closure.is_none() {
        let weak_state = Rc::downgrade(state);
        let closure = Closure::wrap(Box::new(move || {
            if let Some(state) = weak_state.upgrade() {
                handle_measure_retry(&state);
            }
        }) as Box<dyn FnMut()>);
        s.measure_closure = Some(closure);
    }
    let Some(callback) = s.measure_closure.as_ref() else {
        return;
    };
    match window.set_timeout_with_callback_and_timeout_and_arguments_0(
        callback.as_ref().unchecked_ref(),
        i32::try_from(delay_ms).unwrap_or(i32::MAX),
    ) {
        Ok(id) => s.measure_timer = Some(id),
        Err(_) => s.measure_timer = None,
    }
}

fn handle_measure_retry(state: &Rc<RefCell<SharedState>>) {
    state.borrow_mut().measure_timer = None;
    TriPaneGrid::request_row_measure(state);
}

pub(crate) fn schedule_auto_hide(state: &Rc<RefCell<SharedState>>) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let mut s = state.borrow_mut();
    if let Some(timer_id) = s.hide_timer.take() {
        window.clear_timeout_with_handle(timer_id);
    }
    if s.hide_closure.is_none() {
        let weak_state = Rc::downgrade(state);
        let closure = Closure::wrap(Box::new(move || {
            if let Some(state) = weak_state.upgrade() {
                handle_auto_hide(&state);
            }
        }) as Box<dyn FnMut()>);
        s.hide_closure = Some(closure);
    }
    let Some(callback) = s.hide_closure.as_ref() else {
        return;
    };
    match window.set_timeout_with_callback_and_timeout_and_arguments_0(
        callback.as_ref().unchecked_ref(),
        i32::try_from(s.options.auto_hide_ms).unwrap_or(i32::MAX),
    ) {
        Ok(id) => s.hide_timer = Some(id),
        Err(_) => s.hide_timer = None,
    }
}

fn handle_auto_hide(state: &Rc<RefCell<SharedState>>) {
    let reschedule = {
        let mut s = state.borrow_mut();
        s.hide_timer = None;
        let metrics = s.engine.metrics();
        let overflows = metrics.scroll_width > metrics.client_width;
        if s.visibility.is_visible(now_ms(), overflows) {
            // Activity since scheduling (or a drag in progress); check again.
            true
        } else {
            if let Some(bar) = &s.scrollbar {
                bar.set_visible(false);
            }
            false
        }
    };
    if reschedule {
        schedule_auto_hide(state);
    }
}

fn schedule_settle(state: &Rc<RefCell<SharedState>>) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let mut s = state.borrow_mut();
    if let Some(timer_id) = s.settle_timer.take() {
        window.clear_timeout_with_handle(timer_id);
    }
    if s.settle_closure.is_none() {
        let weak_state = Rc::downgrade(state);
        let closure = Closure::wrap(Box::new(move || {
            if let Some(state) = weak_state.upgrade() {
                handle_settle(&state);
            }
        }) as Box<dyn FnMut()>);
        s.settle_closure = Some(closure);
    }
    let Some(callback) = s.settle_closure.as_ref() else {
        return;
    };
    match window.set_timeout_with_callback_and_timeout_and_arguments_0(
        callback.as_ref().unchecked_ref(),
        i32::try_from(crate::types::RESTORE_SETTLE_MS).unwrap_or(i32::MAX),
    ) {
        Ok(id) => s.settle_timer = Some(id),
        Err(_) => s.settle_timer = None,
    }
}

/// The settle re-sync: same target, constrained this time, so the position
/// lands inside the final bounds and the usual events fire.
fn handle_settle(state: &Rc<RefCell<SharedState>>) {
    let target = {
        let mut s = state.borrow_mut();
        s.settle_timer = None;
        match s.restore.take() {
            Some(RestoreStage::AwaitSettle(target)) => Some(target),
            other => {
                s.restore = other;
                None
            }
        }
    };
    let Some(target) = target else {
        return;
    };
    let outcome = state.borrow().engine.sync_to(target);
    if let SyncOutcome::Applied(report) = outcome {
        after_sync(state, report);
    }
}
