use leptos::html;
use leptos::prelude::*;
use tw_merge::tw_merge;
use wasm_bindgen::JsCast;

/// Single-line input committed on Enter/blur, cancelled on Escape.
#[component]
pub fn InlineInput(
    #[prop(into, optional)] class: String,
    #[prop(into)] bind_value: RwSignal<String>,
    #[prop(into)] on_commit: Callback<()>,
    #[prop(into)] on_cancel: Callback<()>,
    #[prop(optional)] node_ref: NodeRef<html::Input>,
) -> impl IntoView {
    let merged_class = tw_merge!(
        "placeholder:text-muted-foreground border-input h-6 w-full min-w-0 rounded border bg-transparent px-1.5 text-sm outline-none",
        "focus-visible:border-ring focus-visible:ring-ring/50 focus-visible:ring-2",
        class
    );

    // Enter and blur both end editing; only commit once.
    let done = StoredValue::new(false);
    let finish = move |commit: bool| {
        if done.get_value() {
            return;
        }
        done.set_value(true);
        if commit {
            on_commit.run(());
        } else {
            on_cancel.run(());
        }
    };

    let on_input = move |ev: web_sys::Event| {
        if let Some(target) = ev.target() {
            if let Some(input) = target.dyn_ref::<web_sys::HtmlInputElement>() {
                bind_value.set(input.value());
            }
        }
    };

    let on_keydown = move |ev: web_sys::KeyboardEvent| match ev.key().as_str() {
        "Enter" => {
            ev.prevent_default();
            finish(true);
        }
        "Escape" => {
            ev.prevent_default();
            finish(false);
        }
        _ => {}
    };

    view! {
        <input
            data-name="InlineInput"
            type="text"
            class=merged_class
            prop:value=move || bind_value.get()
            on:input=on_input
            on:keydown=on_keydown
            on:blur=move |_| finish(true)
            on:click=|ev: web_sys::MouseEvent| ev.stop_propagation()
            node_ref=node_ref
        />
    }
}
