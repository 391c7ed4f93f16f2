use crate::graph::{ClipboardState, GraphApi, GraphResult, PageGraph};
use crate::models::{ClipboardMode, DeskPageModel, GraphNode, QuickAppendMode, SelectedKeys};
use crate::treeview::{CallbackActions, PanelProps};
use leptos::logging::{log, warn};
use leptos::prelude::*;

/// Read-only view of host state injected into the tree view panel.
#[derive(Clone, Copy)]
pub struct TreeViewState {
    pub desk_page_model: Signal<DeskPageModel>,
    pub current_selected_keys: Signal<SelectedKeys>,
    pub is_insertion_mode_on: Signal<bool>,
    pub clipboard_mode: Signal<ClipboardMode>,
}

impl TreeViewState {
    /// Tracked snapshot; subscribes the caller to every field.
    pub fn props(&self) -> PanelProps {
        PanelProps {
            desk_page_model: self.desk_page_model.get(),
            selected_keys: self.current_selected_keys.get(),
            insertion_mode: self.is_insertion_mode_on.get(),
            clipboard_mode: self.clipboard_mode.get(),
        }
    }

    pub fn props_untracked(&self) -> PanelProps {
        PanelProps {
            desk_page_model: self.desk_page_model.get_untracked(),
            selected_keys: self.current_selected_keys.get_untracked(),
            insertion_mode: self.is_insertion_mode_on.get_untracked(),
            clipboard_mode: self.clipboard_mode.get_untracked(),
        }
    }
}

/// Reactive page graph that wraps with the host's current marks.
#[derive(Clone, Copy)]
pub struct SharedPageGraph {
    pub graph: RwSignal<PageGraph>,
    pub selected: RwSignal<SelectedKeys>,
    pub clipboard: RwSignal<ClipboardState>,
}

impl GraphApi for SharedPageGraph {
    fn get_wrapped_model_by_page_path(&self, path: &str) -> Option<GraphNode> {
        let selected = self.selected.get_untracked();
        let clipboard = self.clipboard.get_untracked();
        self.graph
            .with_untracked(|g| g.wrap(path, &selected, &clipboard))
    }
}

/// Last paste / quick-append request, shown by the demo host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum PendingRequest {
    Paste { kind: &'static str, key: String },
    QuickAppend { mode: QuickAppendMode, key: String },
}

impl std::fmt::Display for PendingRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PendingRequest::Paste { kind, key } => write!(f, "{kind} requested at {key}"),
            PendingRequest::QuickAppend { mode, key } => {
                write!(f, "quick append ({mode}) requested at {key}")
            }
        }
    }
}

/// Demo host store: owns the page graph, selection, clipboard and counters.
#[derive(Clone, Copy)]
pub(crate) struct HostState {
    pub page_graph: SharedPageGraph,
    pub desk_page_model: RwSignal<DeskPageModel>,
    pub insertion_mode: RwSignal<bool>,
    pub highlighted_key: RwSignal<Option<String>>,
    pub last_request: RwSignal<Option<PendingRequest>>,
    pub load_error: RwSignal<Option<String>>,
}

impl HostState {
    pub fn new(graph: GraphResult<PageGraph>, page_path: &str) -> Self {
        let (graph, load_error) = match graph {
            Ok(g) => (g, None),
            Err(e) => {
                warn!("page model failed to load: {e}");
                (PageGraph::default(), Some(e.to_string()))
            }
        };

        Self {
            page_graph: SharedPageGraph {
                graph: RwSignal::new(graph),
                selected: RwSignal::new(SelectedKeys::default()),
                clipboard: RwSignal::new(ClipboardState::default()),
            },
            desk_page_model: RwSignal::new(DeskPageModel::for_path(page_path)),
            insertion_mode: RwSignal::new(false),
            highlighted_key: RwSignal::new(None),
            last_request: RwSignal::new(None),
            load_error: RwSignal::new(load_error),
        }
    }

    pub fn tree_view_state(&self) -> TreeViewState {
        let clipboard = self.page_graph.clipboard;
        TreeViewState {
            desk_page_model: self.desk_page_model.into(),
            current_selected_keys: self.page_graph.selected.into(),
            is_insertion_mode_on: self.insertion_mode.into(),
            clipboard_mode: Signal::derive(move || clipboard.get().mode),
        }
    }

    fn bump_marked(&self) {
        self.desk_page_model
            .update(|d| d.marked_update_counter += 1);
    }

    fn bump_model(&self) {
        self.desk_page_model
            .update(|d| d.model_update_counter += 1);
    }

    pub fn set_page_path(&self, path: &str) {
        if self.desk_page_model.get_untracked().current_page_path == path {
            return;
        }
        self.desk_page_model
            .update(|d| d.current_page_path = path.to_string());
    }

    pub fn set_selected_key(&self, key: String) {
        self.page_graph.selected.set(SelectedKeys::new(vec![key]));
        self.bump_marked();
    }

    pub fn set_highlight_selected_key(&self, key: String, on: bool) {
        self.highlighted_key.update(|h| {
            if on {
                *h = Some(key);
            } else if h.as_deref() == Some(key.as_str()) {
                *h = None;
            }
        });
    }

    pub fn change_text(&self, text: String, key: String) {
        let res = self
            .page_graph
            .graph
            .try_update(|g| g.change_text(&key, &text));
        match res {
            Some(Ok(())) => self.bump_model(),
            Some(Err(e)) => warn!("change text rejected: {e}"),
            None => {}
        }
    }

    pub fn toggle_insertion_mode(&self) {
        self.insertion_mode.update(|on| *on = !*on);
    }

    pub fn reload_page(&self) {
        self.desk_page_model
            .update(|d| d.reload_page_counter += 1);
    }

    /// Put the current selection on the clipboard in `mode`.
    pub fn mark_clipboard(&self, mode: ClipboardMode) {
        let keys = self.page_graph.selected.get_untracked().keys().to_vec();
        self.page_graph
            .clipboard
            .set(ClipboardState::new(mode, keys));
        self.bump_marked();
    }

    pub fn record_request(&self, req: PendingRequest) {
        log!("tree view request: {req}");
        self.last_request.set(Some(req));
    }

    pub fn actions(&self) -> CallbackActions {
        let host = *self;
        CallbackActions {
            set_selected_key: Callback::new(move |key: String| host.set_selected_key(key)),
            set_highlight_selected_key: Callback::new(move |(key, on): (String, bool)| {
                host.set_highlight_selected_key(key, on)
            }),
            change_text: Callback::new(move |(text, key): (String, String)| {
                host.change_text(text, key)
            }),
            paste_after: Callback::new(move |key: String| {
                host.record_request(PendingRequest::Paste { kind: "paste after", key })
            }),
            paste_before: Callback::new(move |key: String| {
                host.record_request(PendingRequest::Paste { kind: "paste before", key })
            }),
            paste_replace: Callback::new(move |key: String| {
                host.record_request(PendingRequest::Paste { kind: "paste replace", key })
            }),
            show_quick_append: Callback::new(move |(mode, key): (QuickAppendMode, String)| {
                host.record_request(PendingRequest::QuickAppend { mode, key })
            }),
        }
    }
}

#[derive(Clone, Copy)]
pub(crate) struct AppContext(pub HostState);
