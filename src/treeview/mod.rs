pub(crate) mod scroll;

use crate::models::{
    ClipboardMode, DeskPageModel, GraphNode, PlaceholderKind, QuickAppendMode, SelectedKeys,
};
use leptos::prelude::*;

/* ========================================================== */
/*                      TREE BUILDER                          */
/* ========================================================== */

#[derive(Clone, Debug, PartialEq)]
pub struct Placeholder {
    pub kind: PlaceholderKind,
    /// Key of the node the placeholder is placed relative to.
    pub item_key: String,
    pub top_level: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub enum TreeEntry {
    Item(TreeItem),
    Placeholder(Placeholder),
}

#[derive(Clone, Debug, PartialEq)]
pub struct TreeList {
    pub selected: bool,
    pub entries: Vec<TreeEntry>,
}

/// View model of one graph node, ready to be turned into markup.
#[derive(Clone, Debug, PartialEq)]
pub struct TreeItem {
    pub key: String,
    pub selected: bool,
    pub for_cutting: bool,
    pub for_copying: bool,
    pub type_name: String,
    pub namespace: Option<String>,
    pub model_props: serde_json::Map<String, serde_json::Value>,
    pub text: Option<String>,
    pub list: Option<TreeList>,
    pub replace_placeholder: Option<Placeholder>,
    pub padded: bool,
}

impl TreeItem {
    /// Name shown in the tree: `namespace.Type`, or just `Type`.
    pub fn label(&self) -> String {
        match self.namespace.as_deref() {
            Some(ns) if !ns.trim().is_empty() => format!("{ns}.{}", self.type_name),
            _ => self.type_name.clone(),
        }
    }
}

fn placeholder(kind: PlaceholderKind, item_key: &str, top_level: bool) -> TreeEntry {
    TreeEntry::Placeholder(Placeholder {
        kind,
        item_key: item_key.to_string(),
        top_level,
    })
}

/// Build the view model of `node` and everything below it.
///
/// Entries of the inner list are ordered: prop nodes, the insert-before
/// placeholder, then children each followed by an insert-after placeholder.
/// Text is only shown for nodes without children and without prop nodes.
pub fn build_node(node: &GraphNode, insertion_mode: bool) -> TreeItem {
    let mut entries = node
        .props
        .iter()
        .map(|(_, prop)| TreeEntry::Item(build_node(prop, insertion_mode)))
        .collect::<Vec<_>>();

    let mut text = None;
    if let Some(first) = node.children.first() {
        if insertion_mode {
            entries.push(placeholder(PlaceholderKind::PasteBefore, &first.key, false));
        }
        for child in &node.children {
            entries.push(TreeEntry::Item(build_node(child, insertion_mode)));
            if insertion_mode {
                entries.push(placeholder(PlaceholderKind::PasteAfter, &child.key, false));
            }
        }
    } else if node.props.is_empty() {
        text = node.model.text.clone();
    }

    let list = (!entries.is_empty()).then(|| TreeList {
        selected: node.selected,
        entries,
    });

    let replace_placeholder = insertion_mode.then(|| Placeholder {
        kind: PlaceholderKind::PasteReplace,
        item_key: node.key.clone(),
        top_level: false,
    });

    TreeItem {
        key: node.key.clone(),
        selected: node.selected,
        for_cutting: node.is_for_cutting,
        for_copying: node.is_for_copying,
        type_name: node.model.type_name.clone(),
        namespace: node.model.namespace.clone(),
        model_props: node.model.props.clone(),
        text,
        list,
        replace_placeholder,
        padded: insertion_mode,
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum RootTree {
    /// No graph exists for the page path; rendered as an empty panel.
    Missing { page_path: String },
    Page { entries: Vec<TreeEntry> },
}

pub fn build_root(page_path: &str, graph: Option<&GraphNode>, insertion_mode: bool) -> RootTree {
    let Some(graph) = graph else {
        return RootTree::Missing {
            page_path: page_path.to_string(),
        };
    };

    let mut entries = vec![];
    if let Some(first) = graph.children.first() {
        if insertion_mode {
            entries.push(placeholder(PlaceholderKind::PasteBefore, &first.key, true));
        }
    }
    for child in &graph.children {
        entries.push(TreeEntry::Item(build_node(child, insertion_mode)));
        if insertion_mode {
            entries.push(placeholder(PlaceholderKind::PasteAfter, &child.key, true));
        }
    }

    RootTree::Page { entries }
}

/* ========================================================== */
/*                 RE-RENDER GATE + SCROLL SYNC               */
/* ========================================================== */

/// The inputs whose change warrants a new render of the panel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderStamp {
    pub reload_page_counter: u64,
    pub current_page_path: String,
    pub marked_update_counter: u64,
    pub model_update_counter: u64,
    pub insertion_mode: bool,
}

/// Snapshot of the host state the panel is driven by.
#[derive(Clone, Debug, Default)]
pub struct PanelProps {
    pub desk_page_model: DeskPageModel,
    pub selected_keys: SelectedKeys,
    pub insertion_mode: bool,
    pub clipboard_mode: ClipboardMode,
}

impl PanelProps {
    pub fn stamp(&self) -> RenderStamp {
        let d = &self.desk_page_model;
        RenderStamp {
            reload_page_counter: d.reload_page_counter,
            current_page_path: d.current_page_path.clone(),
            marked_update_counter: d.marked_update_counter,
            model_update_counter: d.model_update_counter,
            insertion_mode: self.insertion_mode,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrollSync {
    Armed,
    Idle,
}

/// Per-panel state machine: decides when to re-render and when to scroll.
#[derive(Clone, Debug)]
pub struct PanelController {
    current: PanelProps,
    scroll: ScrollSync,
}

impl PanelController {
    pub fn new(props: PanelProps) -> Self {
        Self {
            current: props,
            scroll: ScrollSync::Armed,
        }
    }

    pub fn props(&self) -> &PanelProps {
        &self.current
    }

    pub fn scroll_state(&self) -> ScrollSync {
        self.scroll
    }

    /// Adopt `next` and report whether the panel must re-render.
    ///
    /// Every call arms the scroll synchronizer when the selection list was
    /// replaced, whatever the render decision.
    pub fn should_update(&mut self, next: PanelProps) -> bool {
        if self.scroll == ScrollSync::Idle
            && !next.selected_keys.same_identity(&self.current.selected_keys)
        {
            self.scroll = ScrollSync::Armed;
        }

        let rerender = self.current.stamp() != next.stamp();
        self.current = next;
        rerender
    }

    /// Called once per committed render (and on mount). Returns the key to
    /// scroll to, leaving the synchronizer idle.
    pub fn after_commit(&mut self) -> Option<String> {
        if self.scroll == ScrollSync::Idle {
            return None;
        }
        self.scroll = ScrollSync::Idle;
        self.current.selected_keys.last().map(|k| k.to_string())
    }
}

/* ========================================================== */
/*                      ACTIONS                               */
/* ========================================================== */

/// Host actions the tree view dispatches. All are fire-and-forget.
pub trait PageTreeActions: Send + Sync {
    fn set_selected_key(&self, key: &str);
    fn set_highlight_selected_key(&self, key: &str, highlighted: bool);
    fn change_text(&self, text: &str, key: &str);
    fn paste_after(&self, key: &str);
    fn paste_before(&self, key: &str);
    fn paste_replace(&self, key: &str);
    fn show_quick_append(&self, mode: QuickAppendMode, key: &str);
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlaceholderAction {
    Paste(PlaceholderKind, String),
    QuickAppend(QuickAppendMode, String),
}

pub fn resolve_placeholder_click(
    clipboard: ClipboardMode,
    kind: PlaceholderKind,
    key: &str,
) -> PlaceholderAction {
    if clipboard.is_empty() {
        PlaceholderAction::QuickAppend(kind.quick_append_mode(), key.to_string())
    } else {
        PlaceholderAction::Paste(kind, key.to_string())
    }
}

pub fn dispatch_placeholder_click(
    actions: &dyn PageTreeActions,
    clipboard: ClipboardMode,
    kind: PlaceholderKind,
    key: &str,
) {
    match resolve_placeholder_click(clipboard, kind, key) {
        PlaceholderAction::Paste(PlaceholderKind::PasteAfter, k) => actions.paste_after(&k),
        PlaceholderAction::Paste(PlaceholderKind::PasteBefore, k) => actions.paste_before(&k),
        PlaceholderAction::Paste(PlaceholderKind::PasteReplace, k) => actions.paste_replace(&k),
        PlaceholderAction::QuickAppend(mode, k) => actions.show_quick_append(mode, &k),
    }
}

/// [`PageTreeActions`] backed by Leptos callbacks, for hosts that wire
/// their store through `Callback`s.
#[derive(Clone, Copy)]
pub struct CallbackActions {
    pub set_selected_key: Callback<String>,
    pub set_highlight_selected_key: Callback<(String, bool)>,
    pub change_text: Callback<(String, String)>,
    pub paste_after: Callback<String>,
    pub paste_before: Callback<String>,
    pub paste_replace: Callback<String>,
    pub show_quick_append: Callback<(QuickAppendMode, String)>,
}

impl PageTreeActions for CallbackActions {
    fn set_selected_key(&self, key: &str) {
        self.set_selected_key.run(key.to_string());
    }

    fn set_highlight_selected_key(&self, key: &str, highlighted: bool) {
        self.set_highlight_selected_key
            .run((key.to_string(), highlighted));
    }

    fn change_text(&self, text: &str, key: &str) {
        self.change_text.run((text.to_string(), key.to_string()));
    }

    fn paste_after(&self, key: &str) {
        self.paste_after.run(key.to_string());
    }

    fn paste_before(&self, key: &str) {
        self.paste_before.run(key.to_string());
    }

    fn paste_replace(&self, key: &str) {
        self.paste_replace.run(key.to_string());
    }

    fn show_quick_append(&self, mode: QuickAppendMode, key: &str) {
        self.show_quick_append.run((mode, key.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ModelNode;
    use std::sync::Mutex;

    fn leaf(key: &str, text: Option<&str>) -> GraphNode {
        let mut m = ModelNode::new("span");
        m.text = text.map(|t| t.to_string());
        GraphNode::new(key, m)
    }

    fn page() -> GraphNode {
        GraphNode::new("root", ModelNode::new("Page")).with_children(vec![
            GraphNode::new("a", ModelNode::new("div").with_text("ignored")).with_children(vec![
                leaf("a1", Some("one")),
                GraphNode::new("a2", ModelNode::new("ul"))
                    .with_children(vec![leaf("a2x", Some("deep"))]),
            ]),
            leaf("b", Some("bee")),
        ])
    }

    fn items(entries: &[TreeEntry]) -> Vec<&TreeItem> {
        entries
            .iter()
            .filter_map(|e| match e {
                TreeEntry::Item(i) => Some(i),
                TreeEntry::Placeholder(_) => None,
            })
            .collect()
    }

    fn count_placeholders(entries: &[TreeEntry]) -> (usize, usize) {
        let mut before = 0;
        let mut after = 0;
        for e in entries {
            match e {
                TreeEntry::Placeholder(p) if p.kind == PlaceholderKind::PasteBefore => before += 1,
                TreeEntry::Placeholder(p) if p.kind == PlaceholderKind::PasteAfter => after += 1,
                TreeEntry::Placeholder(_) => {}
                TreeEntry::Item(i) => {
                    if let Some(l) = &i.list {
                        let (b, a) = count_placeholders(&l.entries);
                        before += b;
                        after += a;
                    }
                }
            }
        }
        (before, after)
    }

    #[test]
    fn test_children_take_precedence_over_text() {
        let item = build_node(&page().children[0], false);
        assert!(item.text.is_none());
        assert_eq!(items(&item.list.expect("list").entries).len(), 2);
    }

    #[test]
    fn test_text_leaf_for_childless_node() {
        let item = build_node(&leaf("t", Some("hi")), false);
        assert_eq!(item.text.as_deref(), Some("hi"));
        assert!(item.list.is_none());
    }

    #[test]
    fn test_text_hidden_when_node_has_prop_nodes() {
        let node = leaf("t", Some("hi")).with_prop("icon", leaf("i", None));
        let item = build_node(&node, false);
        assert!(item.text.is_none());
        assert_eq!(items(&item.list.expect("list").entries)[0].key, "i");
    }

    #[test]
    fn test_label_includes_namespace() {
        let mut m = ModelNode::new("Button");
        m.namespace = Some("react-bootstrap".to_string());
        assert_eq!(build_node(&GraphNode::new("b", m), false).label(), "react-bootstrap.Button");
        assert_eq!(build_node(&leaf("s", None), false).label(), "span");
    }

    #[test]
    fn test_empty_node_has_no_inner_list() {
        let item = build_node(&leaf("e", None), false);
        assert!(item.list.is_none());
        assert!(item.text.is_none());
        assert_eq!(item.key, "e");
    }

    #[test]
    fn test_props_precede_placeholder_and_children() {
        let node = GraphNode::new("n", ModelNode::new("Navbar"))
            .with_prop("brand", leaf("p1", Some("b")))
            .with_prop("toggle", leaf("p2", None))
            .with_children(vec![leaf("c1", None)]);

        let item = build_node(&node, true);
        let entries = item.list.expect("list").entries;
        let order = entries
            .iter()
            .map(|e| match e {
                TreeEntry::Item(i) => i.key.clone(),
                TreeEntry::Placeholder(p) => format!("{}:{}", p.kind, p.item_key),
            })
            .collect::<Vec<_>>();
        assert_eq!(
            order,
            vec!["p1", "p2", "pasteBefore:c1", "c1", "pasteAfter:c1"]
        );
    }

    #[test]
    fn test_selected_node_uses_selected_list() {
        let mut node = page().children[0].clone();
        node.selected = true;
        let item = build_node(&node, false);
        assert!(item.selected);
        assert!(item.list.expect("list").selected);
    }

    #[test]
    fn test_insertion_mode_adds_expected_placeholders() {
        let graph = page();

        let RootTree::Page { entries: off } = build_root("/", Some(&graph), false) else {
            panic!("page expected");
        };
        assert_eq!(count_placeholders(&off), (0, 0));

        let RootTree::Page { entries: on } = build_root("/", Some(&graph), true) else {
            panic!("page expected");
        };
        // Levels with children: root, a, a2 -> one before each.
        // Children overall: a, b, a1, a2, a2x -> one after each.
        assert_eq!(count_placeholders(&on), (3, 5));

        // Same items in the same order.
        let keys_off = items(&off).iter().map(|i| i.key.clone()).collect::<Vec<_>>();
        let keys_on = items(&on).iter().map(|i| i.key.clone()).collect::<Vec<_>>();
        assert_eq!(keys_off, keys_on);
    }

    #[test]
    fn test_insertion_mode_adds_replace_placeholder_and_padding() {
        let item = build_node(&leaf("x", None), true);
        let p = item.replace_placeholder.expect("replace placeholder");
        assert_eq!(p.kind, PlaceholderKind::PasteReplace);
        assert_eq!(p.item_key, "x");
        assert!(item.padded);
    }

    #[test]
    fn test_root_placeholders_are_top_level() {
        let RootTree::Page { entries } = build_root("/", Some(&page()), true) else {
            panic!("page expected");
        };
        match &entries[0] {
            TreeEntry::Placeholder(p) => {
                assert_eq!(p.kind, PlaceholderKind::PasteBefore);
                assert_eq!(p.item_key, "a");
                assert!(p.top_level);
            }
            TreeEntry::Item(_) => panic!("placeholder expected first"),
        }
        match entries.last() {
            Some(TreeEntry::Placeholder(p)) => {
                assert_eq!(p.kind, PlaceholderKind::PasteAfter);
                assert_eq!(p.item_key, "b");
                assert!(p.top_level);
            }
            _ => panic!("placeholder expected last"),
        }
    }

    #[test]
    fn test_empty_page_has_no_placeholders() {
        let empty = GraphNode::new("root", ModelNode::new("Page"));
        assert_eq!(
            build_root("/", Some(&empty), true),
            RootTree::Page { entries: vec![] }
        );
    }

    #[test]
    fn test_missing_graph_is_explicit_state() {
        assert_eq!(
            build_root("/gone", None, true),
            RootTree::Missing {
                page_path: "/gone".to_string()
            }
        );
    }

    fn props(path: &str, counters: (u64, u64, u64), insertion: bool, keys: &SelectedKeys) -> PanelProps {
        PanelProps {
            desk_page_model: DeskPageModel {
                reload_page_counter: counters.0,
                current_page_path: path.to_string(),
                marked_update_counter: counters.1,
                model_update_counter: counters.2,
            },
            selected_keys: keys.clone(),
            insertion_mode: insertion,
            clipboard_mode: ClipboardMode::Empty,
        }
    }

    #[test]
    fn test_gate_ignores_unrelated_changes() {
        let keys = SelectedKeys::new(vec!["a".to_string()]);
        let mut c = PanelController::new(props("/", (1, 2, 3), false, &keys));

        let mut next = props("/", (1, 2, 3), false, &keys);
        next.clipboard_mode = ClipboardMode::Copy;
        assert!(!c.should_update(next));

        // A new selection list alone does not re-render either.
        let next = props("/", (1, 2, 3), false, &SelectedKeys::new(vec!["b".to_string()]));
        assert!(!c.should_update(next));
    }

    #[test]
    fn test_gate_rerenders_on_each_tracked_input() {
        let keys = SelectedKeys::default();
        let base = props("/", (1, 1, 1), false, &keys);
        let changed = [
            props("/", (2, 1, 1), false, &keys),
            props("/other", (1, 1, 1), false, &keys),
            props("/", (1, 2, 1), false, &keys),
            props("/", (1, 1, 2), false, &keys),
            props("/", (1, 1, 1), true, &keys),
        ];
        for next in changed {
            let mut c = PanelController::new(base.clone());
            assert!(c.should_update(next));
        }
    }

    #[test]
    fn test_gate_compares_against_last_received_props() {
        let keys = SelectedKeys::default();
        let mut c = PanelController::new(props("/", (1, 1, 1), false, &keys));
        assert!(c.should_update(props("/", (1, 1, 2), false, &keys)));
        assert!(!c.should_update(props("/", (1, 1, 2), false, &keys)));
    }

    #[test]
    fn test_scroll_is_armed_on_mount() {
        let keys = SelectedKeys::new(vec!["x".to_string(), "y".to_string()]);
        let mut c = PanelController::new(props("/", (0, 0, 0), false, &keys));
        assert_eq!(c.after_commit().as_deref(), Some("y"));
        assert_eq!(c.scroll_state(), ScrollSync::Idle);
        assert_eq!(c.after_commit(), None);
    }

    #[test]
    fn test_scroll_disarms_even_without_selection() {
        let mut c = PanelController::new(props("/", (0, 0, 0), false, &SelectedKeys::default()));
        assert_eq!(c.after_commit(), None);
        assert_eq!(c.scroll_state(), ScrollSync::Idle);
    }

    #[test]
    fn test_new_selection_arms_and_targets_last_key() {
        let first = SelectedKeys::new(vec!["a".to_string()]);
        let mut c = PanelController::new(props("/", (0, 0, 0), false, &first));
        let _ = c.after_commit();

        let next = SelectedKeys::new(vec!["a".to_string(), "b".to_string()]);
        let _ = c.should_update(props("/", (0, 1, 0), false, &next));
        assert_eq!(c.scroll_state(), ScrollSync::Armed);
        assert_eq!(c.after_commit().as_deref(), Some("b"));
    }

    #[test]
    fn test_same_selection_identity_does_not_arm() {
        let keys = SelectedKeys::new(vec!["a".to_string()]);
        let mut c = PanelController::new(props("/", (0, 0, 0), false, &keys));
        let _ = c.after_commit();

        let _ = c.should_update(props("/", (0, 0, 1), false, &keys.clone()));
        assert_eq!(c.scroll_state(), ScrollSync::Idle);

        // Equal contents, different list: still arms.
        let _ = c.should_update(props("/", (0, 0, 1), false, &SelectedKeys::new(vec!["a".to_string()])));
        assert_eq!(c.scroll_state(), ScrollSync::Armed);
    }

    #[derive(Default)]
    struct Recorder(Mutex<Vec<String>>);

    impl Recorder {
        fn push(&self, s: String) {
            if let Ok(mut calls) = self.0.lock() {
                calls.push(s);
            }
        }

        fn calls(&self) -> Vec<String> {
            self.0.lock().map(|c| c.clone()).unwrap_or_default()
        }
    }

    impl PageTreeActions for Recorder {
        fn set_selected_key(&self, key: &str) {
            self.push(format!("select {key}"));
        }
        fn set_highlight_selected_key(&self, key: &str, highlighted: bool) {
            self.push(format!("highlight {key} {highlighted}"));
        }
        fn change_text(&self, text: &str, key: &str) {
            self.push(format!("text {key} {text}"));
        }
        fn paste_after(&self, key: &str) {
            self.push(format!("pasteAfter {key}"));
        }
        fn paste_before(&self, key: &str) {
            self.push(format!("pasteBefore {key}"));
        }
        fn paste_replace(&self, key: &str) {
            self.push(format!("pasteReplace {key}"));
        }
        fn show_quick_append(&self, mode: QuickAppendMode, key: &str) {
            self.push(format!("quickAppend {mode} {key}"));
        }
    }

    #[test]
    fn test_placeholder_click_with_empty_clipboard_opens_quick_append() {
        let r = Recorder::default();
        dispatch_placeholder_click(&r, ClipboardMode::Empty, PlaceholderKind::PasteAfter, "n1");
        dispatch_placeholder_click(&r, ClipboardMode::Empty, PlaceholderKind::PasteBefore, "n2");
        dispatch_placeholder_click(&r, ClipboardMode::Empty, PlaceholderKind::PasteReplace, "n3");
        assert_eq!(
            r.calls(),
            vec![
                "quickAppend addAfter n1",
                "quickAppend addBefore n2",
                "quickAppend replace n3"
            ]
        );
    }

    #[test]
    fn test_placeholder_click_with_clipboard_pastes() {
        let r = Recorder::default();
        dispatch_placeholder_click(&r, ClipboardMode::Copy, PlaceholderKind::PasteAfter, "n1");
        dispatch_placeholder_click(&r, ClipboardMode::Cut, PlaceholderKind::PasteBefore, "n2");
        dispatch_placeholder_click(&r, ClipboardMode::Copy, PlaceholderKind::PasteReplace, "n3");
        assert_eq!(
            r.calls(),
            vec!["pasteAfter n1", "pasteBefore n2", "pasteReplace n3"]
        );
    }

    #[test]
    fn test_resolve_placeholder_click() {
        assert_eq!(
            resolve_placeholder_click(ClipboardMode::Empty, PlaceholderKind::PasteAfter, "n1"),
            PlaceholderAction::QuickAppend(QuickAppendMode::AddAfter, "n1".to_string())
        );
        assert_eq!(
            resolve_placeholder_click(ClipboardMode::Cut, PlaceholderKind::PasteAfter, "n1"),
            PlaceholderAction::Paste(PlaceholderKind::PasteAfter, "n1".to_string())
        );
    }
}
