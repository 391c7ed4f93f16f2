use std::sync::Arc;

/// Domain object wrapped by a [`GraphNode`].
///
/// `props` is the plain property bag; component-valued props are lifted into
/// [`GraphNode::props`] when the page graph is built.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ModelNode {
    pub type_name: String,
    pub namespace: Option<String>,
    pub text: Option<String>,
    pub props: serde_json::Map<String, serde_json::Value>,
}

impl ModelNode {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            ..Default::default()
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }
}

/// One rendered element instance of a page.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphNode {
    pub key: String,
    pub model: ModelNode,
    pub children: Vec<GraphNode>,

    /// Nodes embedded as named props, in mapping order.
    pub props: Vec<(String, GraphNode)>,

    pub selected: bool,
    pub is_for_cutting: bool,
    pub is_for_copying: bool,
}

impl GraphNode {
    pub fn new(key: impl Into<String>, model: ModelNode) -> Self {
        Self {
            key: key.into(),
            model,
            ..Default::default()
        }
    }

    pub fn with_children(mut self, children: Vec<GraphNode>) -> Self {
        self.children = children;
        self
    }

    pub fn with_prop(mut self, name: impl Into<String>, node: GraphNode) -> Self {
        self.props.push((name.into(), node));
        self
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Depth-first lookup by key, through children and prop nodes.
    pub fn find(&self, key: &str) -> Option<&GraphNode> {
        if self.key == key {
            return Some(self);
        }
        self.props
            .iter()
            .map(|(_, n)| n)
            .chain(self.children.iter())
            .find_map(|n| n.find(key))
    }

    pub fn find_mut(&mut self, key: &str) -> Option<&mut GraphNode> {
        if self.key == key {
            return Some(self);
        }
        for (_, n) in self.props.iter_mut() {
            if let Some(found) = n.find_mut(key) {
                return Some(found);
            }
        }
        for n in self.children.iter_mut() {
            if let Some(found) = n.find_mut(key) {
                return Some(found);
            }
        }
        None
    }
}

/// Page-level counters owned by the host store.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DeskPageModel {
    pub reload_page_counter: u64,
    pub current_page_path: String,
    pub marked_update_counter: u64,
    pub model_update_counter: u64,
}

impl DeskPageModel {
    pub fn for_path(path: impl Into<String>) -> Self {
        Self {
            current_page_path: path.into(),
            ..Default::default()
        }
    }
}

/// Ordered selection; the last key is the most recent one.
///
/// Cloning shares the list. Two values are the *same selection* only when they
/// point at the same allocation, which is what arms scroll-to-selection.
#[derive(Clone, Debug, Default)]
pub struct SelectedKeys(Arc<Vec<String>>);

impl SelectedKeys {
    pub fn new(keys: Vec<String>) -> Self {
        Self(Arc::new(keys))
    }

    pub fn keys(&self) -> &[String] {
        &self.0
    }

    pub fn last(&self) -> Option<&str> {
        self.0.last().map(|s| s.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.iter().any(|k| k == key)
    }

    pub fn same_identity(&self, other: &SelectedKeys) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "camelCase")]
pub enum ClipboardMode {
    #[default]
    Empty,
    Cut,
    Copy,
}

impl ClipboardMode {
    pub fn is_empty(self) -> bool {
        self == ClipboardMode::Empty
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "camelCase")]
pub enum QuickAppendMode {
    AddBefore,
    AddAfter,
    Replace,
}

/// Placement of an insertion-mode placeholder relative to its item key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "camelCase")]
pub enum PlaceholderKind {
    PasteAfter,
    PasteBefore,
    PasteReplace,
}

impl PlaceholderKind {
    pub fn quick_append_mode(self) -> QuickAppendMode {
        match self {
            PlaceholderKind::PasteAfter => QuickAppendMode::AddAfter,
            PlaceholderKind::PasteBefore => QuickAppendMode::AddBefore,
            PlaceholderKind::PasteReplace => QuickAppendMode::Replace,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            PlaceholderKind::PasteAfter => "Place component after selected",
            PlaceholderKind::PasteBefore => "Place component before selected",
            PlaceholderKind::PasteReplace => "Replace selected component",
        }
    }
}
