use crate::components::ui::{
    InlineInput, TreeViewBadge, TreeViewItemRow, TreeViewList, TREE_LIST_SELECTED,
};
use crate::config::TreeViewConfig;
use crate::graph::GraphApi;
use crate::models::{ClipboardMode, PlaceholderKind};
use crate::state::TreeViewState;
use crate::treeview::scroll::scroll_to_selected;
use crate::treeview::{
    build_root, dispatch_placeholder_click, PageTreeActions, PanelController, Placeholder,
    RootTree, TreeEntry, TreeItem,
};
use icons::{Plus, RefreshCw};
use leptos::html;
use leptos::logging::warn;
use leptos::prelude::*;
use std::sync::Arc;
use tw_merge::tw_merge;

/// Action bindings shared by every node of one panel.
#[derive(Clone)]
pub(crate) struct TreeHandlers {
    actions: Arc<dyn PageTreeActions>,
    clipboard_mode: Signal<ClipboardMode>,
}

impl TreeHandlers {
    fn select(&self, key: &str) {
        self.actions.set_selected_key(key);
    }

    fn highlight(&self, key: &str, on: bool) {
        self.actions.set_highlight_selected_key(key, on);
    }

    fn change_text(&self, text: &str, key: &str) {
        self.actions.change_text(text, key);
    }

    fn placeholder_click(&self, kind: PlaceholderKind, key: &str) {
        dispatch_placeholder_click(
            self.actions.as_ref(),
            self.clipboard_mode.get_untracked(),
            kind,
            key,
        );
    }
}

/// Scrollable panel showing the component tree of the current page.
///
/// Re-renders only when the page counters, the page path or the insertion
/// mode change; a replaced selection list scrolls the last selected node into
/// view after the next render.
#[component]
pub fn PageTreeViewPanel(
    graph_api: Arc<dyn GraphApi>,
    state: TreeViewState,
    actions: Arc<dyn PageTreeActions>,
    #[prop(optional)] config: Option<TreeViewConfig>,
    #[prop(into, optional)] class: String,
) -> impl IntoView {
    let config = config.unwrap_or_default();
    let panel_ref: NodeRef<html::Div> = NodeRef::new();

    let controller = StoredValue::new(PanelController::new(state.props_untracked()));
    let render_tick = RwSignal::new(0u64);

    // Update check: runs on every change of any injected signal.
    Effect::new(move |_| {
        let next = state.props();
        let rerender = controller
            .try_update_value(|c| c.should_update(next))
            .unwrap_or(false);
        if rerender {
            render_tick.update(|t| *t += 1);
        }
    });

    let handlers = TreeHandlers {
        actions,
        clipboard_mode: state.clipboard_mode,
    };

    let tree = move || {
        render_tick.track();

        let Some((path, insertion_mode)) = controller.try_with_value(|c| {
            let p = c.props();
            (p.desk_page_model.current_page_path.clone(), p.insertion_mode)
        }) else {
            return ().into_any();
        };

        let graph = graph_api.get_wrapped_model_by_page_path(&path);
        let root = build_root(&path, graph.as_ref(), insertion_mode);

        // The scroll itself is deferred past this render.
        if let Some(key) = controller.try_update_value(|c| c.after_commit()).flatten() {
            scroll_to_selected(panel_ref, key, config.clone());
        }

        render_root(root, &handlers)
    };

    let merged_class = tw_merge!(
        "relative h-full overflow-auto rounded-[3px] border border-[#DBDBDB] pt-8 pr-4 pb-4 pl-8",
        class
    );

    view! {
        <div data-name="PageTreeViewPanel" class=merged_class node_ref=panel_ref>
            {tree}
        </div>
    }
}

fn render_root(root: RootTree, h: &TreeHandlers) -> AnyView {
    match root {
        RootTree::Missing { page_path } => {
            warn!("tree view: no page graph for path {page_path}");
            view! {
                <ul class="umy-treeview-list border-0" />
                <div class="text-xs text-muted-foreground">
                    {format!("No page at {page_path}")}
                </div>
            }
            .into_any()
        }
        RootTree::Page { entries } => {
            let entries = render_entries(entries, h);
            view! { <TreeViewList class="border-0 pl-0">{entries}</TreeViewList> }.into_any()
        }
    }
}

// Collected up front: list children must own their handlers.
fn render_entries(entries: Vec<TreeEntry>, h: &TreeHandlers) -> Vec<AnyView> {
    entries.into_iter().map(|e| render_entry(e, h)).collect()
}

fn render_entry(entry: TreeEntry, h: &TreeHandlers) -> AnyView {
    match entry {
        TreeEntry::Item(item) => render_item(item, h),
        TreeEntry::Placeholder(p) => view! {
            <PageTreeViewPlaceholder placeholder=p handlers=h.clone() />
        }
        .into_any(),
    }
}

fn render_item(item: TreeItem, h: &TreeHandlers) -> AnyView {
    let label = item.label();
    let TreeItem {
        key,
        selected,
        for_cutting,
        for_copying,
        model_props,
        text,
        list,
        replace_placeholder,
        padded,
        ..
    } = item;

    let text_view = text.map(|t| {
        view! { <PageTreeViewItemText item_key=key.clone() text_value=t handlers=h.clone() /> }
    });

    let list_view = list.map(|l| {
        let class = if l.selected { TREE_LIST_SELECTED } else { "" };
        let entries = render_entries(l.entries, h);
        view! { <TreeViewList class=class>{entries}</TreeViewList> }
    });

    view! {
        <PageTreeViewItem
            item_key=key
            label=label
            model_props=model_props
            is_selected=selected
            is_for_cutting=for_cutting
            is_for_copying=for_copying
            is_padding=padded
            replace_placeholder=replace_placeholder
            handlers=h.clone()
        >
            {text_view}
            {list_view}
        </PageTreeViewItem>
    }
    .into_any()
}

#[component]
pub(crate) fn PageTreeViewItem(
    item_key: String,
    label: String,
    model_props: serde_json::Map<String, serde_json::Value>,
    is_selected: bool,
    is_for_cutting: bool,
    is_for_copying: bool,
    is_padding: bool,
    replace_placeholder: Option<Placeholder>,
    handlers: TreeHandlers,
    children: Children,
) -> impl IntoView {
    let props_title = if model_props.is_empty() {
        String::new()
    } else {
        serde_json::to_string(&model_props).unwrap_or_default()
    };

    let row_class = tw_merge!(
        if is_selected { "bg-primary/10 text-primary font-medium" } else { "" },
        if is_for_cutting { "opacity-50 line-through" } else { "" },
        if is_for_copying { "italic" } else { "" },
        if is_padding { "py-1.5" } else { "" }
    );

    let h_select = handlers.clone();
    let key_select = item_key.clone();
    let h_enter = handlers.clone();
    let key_enter = item_key.clone();
    let h_leave = handlers.clone();
    let key_leave = item_key.clone();

    let circle = replace_placeholder.map(|p| {
        view! { <PlaceholderCircle placeholder=p handlers=handlers.clone() /> }
    });

    view! {
        <li
            id=item_key.clone()
            data-key=item_key
            data-selected=is_selected.to_string()
            class="umy-treeview-item list-none"
            on:mouseenter=move |_| h_enter.highlight(&key_enter, true)
            on:mouseleave=move |_| h_leave.highlight(&key_leave, false)
        >
            <TreeViewItemRow
                class=row_class
                attr:title=props_title
                on:click=move |_| h_select.select(&key_select)
            >
                {circle}
                <span class="truncate">{label}</span>
                {is_for_cutting.then(|| view! { <TreeViewBadge>"cut"</TreeViewBadge> })}
                {is_for_copying.then(|| view! { <TreeViewBadge>"copy"</TreeViewBadge> })}
            </TreeViewItemRow>
            {children()}
        </li>
    }
}

/// Literal text of a leaf node; click to edit.
#[component]
pub(crate) fn PageTreeViewItemText(
    item_key: String,
    text_value: String,
    handlers: TreeHandlers,
) -> impl IntoView {
    let editing = RwSignal::new(false);
    let draft = RwSignal::new(text_value.clone());
    let input_ref: NodeRef<html::Input> = NodeRef::new();

    Effect::new(move |_| {
        if !editing.get() {
            return;
        }
        if let Some(el) = input_ref.get() {
            let _ = el.focus();
        }
    });

    let key_sv = StoredValue::new(item_key);
    let original_sv = StoredValue::new(text_value);
    let handlers_sv = StoredValue::new(handlers);

    let on_commit = Callback::new(move |_: ()| {
        editing.set(false);
        let next = draft.get_untracked();
        if next != original_sv.get_value() {
            handlers_sv.with_value(|h| key_sv.with_value(|k| h.change_text(&next, k)));
        }
    });

    let on_cancel = Callback::new(move |_: ()| {
        editing.set(false);
        draft.set(original_sv.get_value());
    });

    view! {
        <div class="pl-6 text-xs text-muted-foreground">
            {move || {
                if editing.get() {
                    view! {
                        <InlineInput
                            bind_value=draft
                            on_commit=on_commit
                            on_cancel=on_cancel
                            node_ref=input_ref
                        />
                    }
                    .into_any()
                } else {
                    let shown = draft.get();
                    let shown = if shown.is_empty() { "\u{00a0}".to_string() } else { shown };
                    view! {
                        <span
                            class="block cursor-text truncate rounded px-1 hover:bg-muted/60"
                            title="Click to edit text"
                            on:click=move |ev: web_sys::MouseEvent| {
                                ev.stop_propagation();
                                editing.set(true);
                            }
                        >
                            {shown}
                        </span>
                    }
                    .into_any()
                }
            }}
        </div>
    }
}

/// Insert-before / insert-after drop line between items.
#[component]
pub(crate) fn PageTreeViewPlaceholder(
    placeholder: Placeholder,
    handlers: TreeHandlers,
) -> impl IntoView {
    let Placeholder {
        kind,
        item_key,
        top_level,
    } = placeholder;

    let class = tw_merge!(
        "umy-treeview-placeholder group/ph flex h-3 list-none items-center rounded text-muted-foreground/60 hover:bg-primary/10 hover:text-primary cursor-pointer",
        if top_level { "ml-0" } else { "ml-2" }
    );

    let h_click = handlers.clone();
    let key_click = item_key.clone();
    let h_enter = handlers.clone();
    let key_enter = item_key.clone();
    let h_leave = handlers;
    let key_leave = item_key.clone();

    view! {
        <li
            class=class
            title=kind.title()
            data-key=item_key
            data-placement=kind.as_ref().to_string()
            on:click=move |ev: web_sys::MouseEvent| {
                ev.stop_propagation();
                h_click.placeholder_click(kind, &key_click);
            }
            on:mouseenter=move |_| h_enter.highlight(&key_enter, true)
            on:mouseleave=move |_| h_leave.highlight(&key_leave, false)
        >
            <span class="h-px flex-1 bg-current opacity-0 group-hover/ph:opacity-100" />
            <Plus class="size-3" />
        </li>
    }
}

/// Replace affordance shown before the item name.
#[component]
pub(crate) fn PlaceholderCircle(placeholder: Placeholder, handlers: TreeHandlers) -> impl IntoView {
    let Placeholder { kind, item_key, .. } = placeholder;

    let h_click = handlers.clone();
    let key_click = item_key.clone();
    let h_enter = handlers.clone();
    let key_enter = item_key.clone();
    let h_leave = handlers;
    let key_leave = item_key;

    view! {
        <span
            class="inline-flex size-4 items-center justify-center rounded-full border text-muted-foreground hover:border-primary hover:text-primary"
            title=kind.title()
            data-placement=kind.as_ref().to_string()
            on:click=move |ev: web_sys::MouseEvent| {
                ev.stop_propagation();
                h_click.placeholder_click(kind, &key_click);
            }
            on:mouseenter=move |_| h_enter.highlight(&key_enter, true)
            on:mouseleave=move |_| h_leave.highlight(&key_leave, false)
        >
            <RefreshCw class="size-2.5" />
        </span>
    }
}
