use crate::components::ui::{Button, ButtonSize, ButtonVariant};
use crate::components::PageTreeViewPanel;
use crate::config::{page_model_source, TreeViewConfig, DEFAULT_PAGE_PATH};
use crate::graph::{GraphApi, PageGraph};
use crate::models::ClipboardMode;
use crate::state::{AppContext, HostState};
use crate::treeview::PageTreeActions;
use crate::util::{page_href, page_path_from_param};
use leptos::prelude::*;
use leptos_router::components::{Route, Router, Routes};
use leptos_router::params::Params;
use leptos_router::path;
use std::sync::Arc;

#[derive(Params, PartialEq, Clone, Debug)]
pub struct PageRouteParams {
    pub page_path: Option<String>,
}

#[component]
pub fn App() -> impl IntoView {
    let host = HostState::new(PageGraph::from_json(&page_model_source()), DEFAULT_PAGE_PATH);
    provide_context(AppContext(host));
    provide_context(TreeViewConfig::load());

    view! {
        <Router>
            <Routes fallback=|| view! { <div class="px-4 py-8 text-xs text-muted-foreground">"Not found"</div> }>
                <Route path=path!("page/:page_path") view=EditorPage />
                <Route path=path!("") view=EditorPage />
            </Routes>
        </Router>
    }
}

#[component]
fn EditorPage() -> impl IntoView {
    let AppContext(host) = expect_context::<AppContext>();
    let config = expect_context::<TreeViewConfig>();
    let params = leptos_router::hooks::use_params::<PageRouteParams>();

    // Keep the host's current page in sync with the route.
    Effect::new(move |_| {
        let raw = params.get().ok().and_then(|p| p.page_path);
        host.set_page_path(&page_path_from_param(raw.as_deref(), DEFAULT_PAGE_PATH));
    });

    let graph_api: Arc<dyn GraphApi> = Arc::new(host.page_graph);
    let actions: Arc<dyn PageTreeActions> = Arc::new(host.actions());

    view! {
        <div class="flex h-screen flex-col gap-3 p-4">
            <PageLinks />
            <EditorToolbar />

            <Show when=move || host.load_error.get().is_some() fallback=|| ().into_view()>
                {move || host.load_error.get().map(|e| view! {
                    <div class="text-xs text-destructive">{e}</div>
                })}
            </Show>

            <PageTreeViewPanel
                graph_api=graph_api
                state=host.tree_view_state()
                actions=actions
                config=config
                class="flex-1 min-h-0"
            />

            <div class="flex gap-4 text-xs text-muted-foreground">
                <span>
                    {move || match host.highlighted_key.get() {
                        Some(k) => format!("Highlighted: {k}"),
                        None => "Highlighted: none".to_string(),
                    }}
                </span>
                <span>
                    {move || host.last_request.get().map(|r| r.to_string()).unwrap_or_default()}
                </span>
            </div>
        </div>
    }
}

#[component]
fn PageLinks() -> impl IntoView {
    let AppContext(host) = expect_context::<AppContext>();

    let links = move || {
        let current = host.desk_page_model.get().current_page_path;
        host.page_graph.graph.with(|g| {
            g.pages()
                .iter()
                .map(|p| {
                    let class = if p.path == current {
                        "text-sm font-medium text-foreground"
                    } else {
                        "text-sm text-muted-foreground hover:text-foreground"
                    };
                    let name = if p.name.trim().is_empty() { p.path.clone() } else { p.name.clone() };
                    view! { <a class=class href=page_href(&p.path)>{name}</a> }
                })
                .collect_view()
        })
    };

    view! { <nav class="flex items-center gap-3">{links}</nav> }
}

#[component]
fn EditorToolbar() -> impl IntoView {
    let AppContext(host) = expect_context::<AppContext>();

    let insertion_variant = move || {
        if host.insertion_mode.get() {
            ButtonVariant::Active
        } else {
            ButtonVariant::Outline
        }
    };
    let nothing_selected = move || host.page_graph.selected.get().is_empty();
    let clipboard_empty = move || host.page_graph.clipboard.get().mode.is_empty();

    view! {
        <div class="flex flex-wrap items-center gap-2">
            {move || view! {
                <Button
                    variant=insertion_variant()
                    size=ButtonSize::Sm
                    attr:title="Show insertion placeholders"
                    on:click=move |_| host.toggle_insertion_mode()
                >
                    "Insertion mode"
                </Button>
            }}
            <Button
                variant=ButtonVariant::Outline
                size=ButtonSize::Sm
                attr:disabled=nothing_selected
                on:click=move |_| host.mark_clipboard(ClipboardMode::Copy)
            >
                "Copy"
            </Button>
            <Button
                variant=ButtonVariant::Outline
                size=ButtonSize::Sm
                attr:disabled=nothing_selected
                on:click=move |_| host.mark_clipboard(ClipboardMode::Cut)
            >
                "Cut"
            </Button>
            <Button
                variant=ButtonVariant::Ghost
                size=ButtonSize::Sm
                attr:disabled=clipboard_empty
                on:click=move |_| host.mark_clipboard(ClipboardMode::Empty)
            >
                "Clear clipboard"
            </Button>
            <Button
                variant=ButtonVariant::Ghost
                size=ButtonSize::Sm
                on:click=move |_| host.reload_page()
            >
                "Reload"
            </Button>
            <span class="text-xs text-muted-foreground">
                {move || format!("Clipboard: {}", host.page_graph.clipboard.get().mode)}
            </span>
        </div>
    }
}
