pub(crate) fn now_ms() -> i64 {
    js_sys::Date::now().round() as i64
}

/// Page path carried in a route segment (`/page/%2Fabout` -> `/about`).
pub(crate) fn page_path_from_param(param: Option<&str>, fallback: &str) -> String {
    let Some(raw) = param.map(str::trim).filter(|s| !s.is_empty()) else {
        return fallback.to_string();
    };
    let decoded = urlencoding::decode(raw)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| raw.to_string());
    if decoded.starts_with('/') {
        decoded
    } else {
        format!("/{decoded}")
    }
}

pub(crate) fn page_href(path: &str) -> String {
    format!("/page/{}", urlencoding::encode(path))
}
