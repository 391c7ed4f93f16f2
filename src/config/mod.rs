use crate::graph::DEMO_PAGE_MODEL;
use wasm_bindgen::JsValue;

pub(crate) const DEFAULT_SCROLL_DURATION_MS: u32 = 300;
pub(crate) const DEFAULT_SCROLL_MARGIN_DIVISOR: f64 = 5.0;
pub(crate) const DEFAULT_PAGE_PATH: &str = "/";

/// Runtime settings, overridable through `window.ENV`.
#[derive(Clone, Debug, PartialEq)]
pub struct TreeViewConfig {
    pub scroll_duration_ms: u32,
    pub scroll_margin_divisor: f64,
}

impl Default for TreeViewConfig {
    fn default() -> Self {
        Self {
            scroll_duration_ms: DEFAULT_SCROLL_DURATION_MS,
            scroll_margin_divisor: DEFAULT_SCROLL_MARGIN_DIVISOR,
        }
    }
}

impl TreeViewConfig {
    pub fn load() -> Self {
        let mut cfg = Self::default();
        let Some(env) = window_env() else {
            return cfg;
        };

        if let Some(ms) = env_number(&env, "TREEVIEW_SCROLL_MS") {
            cfg.scroll_duration_ms = sanitize_duration(ms);
        }
        if let Some(d) = env_number(&env, "TREEVIEW_SCROLL_MARGIN_DIVISOR") {
            cfg.scroll_margin_divisor = sanitize_divisor(d);
        }
        cfg
    }
}

/// Page-model JSON: `window.ENV.PAGE_MODEL` if present, else the demo document.
pub(crate) fn page_model_source() -> String {
    window_env()
        .and_then(|env| js_sys::Reflect::get(&env, &"PAGE_MODEL".into()).ok())
        .and_then(|v| v.as_string())
        .unwrap_or_else(|| DEMO_PAGE_MODEL.to_string())
}

fn window_env() -> Option<JsValue> {
    let env = web_sys::window()?.get("ENV")?;
    if env.is_undefined() || !env.is_object() {
        return None;
    }
    Some(env.into())
}

// Accepts both numbers and numeric strings.
fn env_number(env: &JsValue, key: &str) -> Option<f64> {
    let v = js_sys::Reflect::get(env, &key.into()).ok()?;
    v.as_f64()
        .or_else(|| v.as_string().and_then(|s| s.trim().parse::<f64>().ok()))
}

fn sanitize_duration(ms: f64) -> u32 {
    if ms.is_finite() && ms >= 0.0 {
        ms.min(10_000.0).round() as u32
    } else {
        DEFAULT_SCROLL_DURATION_MS
    }
}

fn sanitize_divisor(d: f64) -> f64 {
    if d.is_finite() && d >= 1.0 {
        d
    } else {
        DEFAULT_SCROLL_MARGIN_DIVISOR
    }
}
