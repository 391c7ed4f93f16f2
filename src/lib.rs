mod app;
pub mod components;
mod config;
pub mod graph;
pub mod models;
pub mod state;
pub mod treeview;
mod util;

pub use app::App;
pub use components::PageTreeViewPanel;
pub use config::TreeViewConfig;
pub use graph::{GraphApi, GraphError, GraphErrorKind, GraphResult, PageGraph};
pub use state::TreeViewState;
pub use treeview::{CallbackActions, PageTreeActions};

use leptos::prelude::*;

// Needed for `#[wasm_bindgen(start)]` on the wasm entrypoint.
#[cfg(all(target_arch = "wasm32", not(test)))]
use wasm_bindgen::prelude::wasm_bindgen;

// Only register the WASM start function for normal builds (not for tests),
// otherwise wasm-bindgen-test will end up with multiple entry symbols.
#[cfg_attr(all(target_arch = "wasm32", not(test)), wasm_bindgen(start))]
pub fn main() {
    console_error_panic_hook::set_once();
    mount_to_body(App);
}
