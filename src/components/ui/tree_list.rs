use leptos::prelude::*;
use leptos_ui::clx;

mod components {
    use super::*;
    clx! {TreeViewList, ul, "umy-treeview-list flex flex-col gap-0.5 border-l border-border pl-4"}
    clx! {TreeViewItemRow, div, "group/row flex items-center gap-1.5 rounded px-1 py-0.5 text-sm cursor-pointer hover:bg-muted/60"}
    clx! {TreeViewBadge, span, "rounded border px-1 text-[10px] uppercase leading-4 tracking-wide text-muted-foreground"}
}

pub use components::*;

/// Extra classes for the list of a selected node.
pub const TREE_LIST_SELECTED: &str = "umy-treeview-list-selected border-l-2 border-primary";
