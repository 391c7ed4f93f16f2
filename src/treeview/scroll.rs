use crate::config::TreeViewConfig;
use crate::util::now_ms;
use leptos::html;
use leptos::logging::log;
use leptos::prelude::*;
use leptos_dom::helpers::{request_animation_frame, set_timeout};
use std::time::Duration;
use wasm_bindgen::JsCast;

/// `scrollTop` that brings an element into view, leaving a margin above it.
///
/// All offsets are in the same coordinate space (viewport or document); only
/// their differences matter.
pub(crate) fn scroll_target(
    element_top: f64,
    container_scroll_top: f64,
    container_top: f64,
    container_height: f64,
    margin_divisor: f64,
) -> f64 {
    let diff = (element_top + container_scroll_top) - container_top;
    let margin = container_height.trunc() / margin_divisor;
    diff - margin
}

/// jQuery-style "swing" easing.
pub(crate) fn swing(p: f64) -> f64 {
    0.5 - (p * std::f64::consts::PI).cos() / 2.0
}

/// Scroll position `elapsed_ms` into an animation from `from` to `to`.
pub(crate) fn animated_position(from: f64, to: f64, elapsed_ms: f64, duration_ms: f64) -> f64 {
    if duration_ms <= 0.0 || elapsed_ms >= duration_ms {
        return to;
    }
    let p = (elapsed_ms / duration_ms).max(0.0);
    from + (to - from) * swing(p)
}

/// Attribute selector matching an element whose id is `key`.
///
/// Keys may contain characters (`:` `/`) that are not valid in an `#id`
/// selector, so the id is matched as a quoted attribute value.
pub(crate) fn id_selector(key: &str) -> String {
    let escaped = key.replace('\\', "\\\\").replace('"', "\\\"");
    format!("[id=\"{escaped}\"]")
}

fn animate_scroll_top(
    container: web_sys::HtmlElement,
    from: f64,
    to: f64,
    started: f64,
    duration_ms: f64,
) {
    request_animation_frame(move || {
        let elapsed = now_ms() as f64 - started;
        let pos = animated_position(from, to, elapsed, duration_ms);
        container.set_scroll_top(pos.round() as i32);
        if elapsed < duration_ms {
            animate_scroll_top(container, from, to, started, duration_ms);
        }
    });
}

/// Scroll the panel so its element with id `key` is in view.
///
/// Runs on the next tick so the current render has been applied. Not
/// cancellable; a later call simply overrides the final position.
pub(crate) fn scroll_to_selected(
    container_ref: NodeRef<html::Div>,
    key: String,
    config: TreeViewConfig,
) {
    set_timeout(
        move || {
            // Unmounted panels have released the container.
            let Some(container) = container_ref.try_get_untracked().flatten() else {
                return;
            };
            let container: web_sys::HtmlElement = container.unchecked_into();

            let Some(target) = container.query_selector(&id_selector(&key)).ok().flatten() else {
                log!("tree view: selected key {key} is not in the panel");
                return;
            };

            let container_rect = container.get_bounding_client_rect();
            let target_top = target.get_bounding_client_rect().top();
            let to = scroll_target(
                target_top,
                container.scroll_top() as f64,
                container_rect.top(),
                container_rect.height(),
                config.scroll_margin_divisor,
            );

            let from = container.scroll_top() as f64;
            animate_scroll_top(
                container,
                from,
                to,
                now_ms() as f64,
                config.scroll_duration_ms as f64,
            );
        },
        Duration::ZERO,
    );
}
