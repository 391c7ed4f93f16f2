use crate::models::{ClipboardMode, GraphNode, ModelNode, SelectedKeys};
use serde::Deserialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GraphErrorKind {
    Parse,
    NotFound,
    InvalidTarget,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GraphError {
    pub kind: GraphErrorKind,
    pub message: String,
}

impl std::fmt::Display for GraphError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for GraphError {}

impl GraphError {
    fn parse(e: impl std::fmt::Display) -> Self {
        Self {
            kind: GraphErrorKind::Parse,
            message: format!("invalid page model: {e}"),
        }
    }

    fn not_found(key: &str) -> Self {
        Self {
            kind: GraphErrorKind::NotFound,
            message: format!("no node with key `{key}`"),
        }
    }

    fn invalid_target(key: &str, why: &str) -> Self {
        Self {
            kind: GraphErrorKind::InvalidTarget,
            message: format!("node `{key}` {why}"),
        }
    }
}

pub type GraphResult<T> = Result<T, GraphError>;

/// Read side of the page graph consumed by the tree view.
///
/// Implementations must reflect model mutations synchronously: a render that
/// follows a mutation sees the mutated graph.
pub trait GraphApi: Send + Sync {
    fn get_wrapped_model_by_page_path(&self, path: &str) -> Option<GraphNode>;
}

/// Clipboard marks applied while wrapping.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClipboardState {
    pub mode: ClipboardMode,
    pub keys: Vec<String>,
}

impl ClipboardState {
    pub fn new(mode: ClipboardMode, keys: Vec<String>) -> Self {
        if mode.is_empty() {
            return Self::default();
        }
        Self { mode, keys }
    }

    fn marks(&self, key: &str) -> (bool, bool) {
        if !self.keys.iter().any(|k| k == key) {
            return (false, false);
        }
        match self.mode {
            ClipboardMode::Cut => (true, false),
            ClipboardMode::Copy => (false, true),
            ClipboardMode::Empty => (false, false),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Page {
    pub path: String,
    pub name: String,
    pub root: GraphNode,
}

/// In-memory page graph loaded from a page-model document.
///
/// Keys are assigned once at load time and survive every later `wrap`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PageGraph {
    pages: Vec<Page>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageDocument {
    pages: Vec<PageEntry>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageEntry {
    page_path: String,
    #[serde(default)]
    page_name: String,
    #[serde(default)]
    children: Vec<NodeEntry>,
}

#[derive(Deserialize)]
struct NodeEntry {
    #[serde(rename = "type")]
    type_name: String,
    #[serde(default)]
    namespace: Option<String>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    props: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    children: Vec<NodeEntry>,
}

struct KeyGen(u64);

impl KeyGen {
    fn next(&mut self) -> String {
        self.0 += 1;
        format!("n{}", self.0)
    }
}

/// A prop value that is itself a component (an object with a string `type`).
fn is_component_value(v: &serde_json::Value) -> bool {
    v.get("type").map(|t| t.is_string()).unwrap_or(false)
}

fn build_graph_node(entry: NodeEntry, keys: &mut KeyGen) -> GraphResult<GraphNode> {
    let key = keys.next();

    let mut plain = serde_json::Map::new();
    let mut prop_nodes = vec![];
    for (name, value) in entry.props {
        if is_component_value(&value) {
            let nested: NodeEntry = serde_json::from_value(value).map_err(GraphError::parse)?;
            prop_nodes.push((name, build_graph_node(nested, keys)?));
        } else {
            plain.insert(name, value);
        }
    }

    let children = entry
        .children
        .into_iter()
        .map(|c| build_graph_node(c, keys))
        .collect::<GraphResult<Vec<_>>>()?;

    Ok(GraphNode {
        key,
        model: ModelNode {
            type_name: entry.type_name,
            namespace: entry.namespace,
            text: entry.text,
            props: plain,
        },
        children,
        props: prop_nodes,
        ..Default::default()
    })
}

fn apply_marks(node: &mut GraphNode, selected: &SelectedKeys, clipboard: &ClipboardState) {
    node.selected = selected.contains(&node.key);
    let (cut, copy) = clipboard.marks(&node.key);
    node.is_for_cutting = cut;
    node.is_for_copying = copy;

    for (_, p) in node.props.iter_mut() {
        apply_marks(p, selected, clipboard);
    }
    for c in node.children.iter_mut() {
        apply_marks(c, selected, clipboard);
    }
}

impl PageGraph {
    pub fn from_json(json: &str) -> GraphResult<Self> {
        let doc: PageDocument = serde_json::from_str(json).map_err(GraphError::parse)?;

        let mut keys = KeyGen(0);
        let mut pages = Vec::with_capacity(doc.pages.len());
        for entry in doc.pages {
            let children = entry
                .children
                .into_iter()
                .map(|c| build_graph_node(c, &mut keys))
                .collect::<GraphResult<Vec<_>>>()?;

            let root = GraphNode::new(
                format!("page:{}", entry.page_path),
                ModelNode::new("Page"),
            )
            .with_children(children);

            pages.push(Page {
                path: entry.page_path,
                name: entry.page_name,
                root,
            });
        }

        Ok(Self { pages })
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn page(&self, path: &str) -> Option<&Page> {
        self.pages.iter().find(|p| p.path == path)
    }

    /// Copy of the page graph with selection and clipboard marks applied.
    pub fn wrap(
        &self,
        path: &str,
        selected: &SelectedKeys,
        clipboard: &ClipboardState,
    ) -> Option<GraphNode> {
        let mut root = self.page(path)?.root.clone();
        for c in root.children.iter_mut() {
            apply_marks(c, selected, clipboard);
        }
        Some(root)
    }

    pub fn find(&self, key: &str) -> Option<&GraphNode> {
        self.pages.iter().find_map(|p| p.root.find(key))
    }

    /// Replace the literal text of a text node.
    pub fn change_text(&mut self, key: &str, text: &str) -> GraphResult<()> {
        let node = self
            .pages
            .iter_mut()
            .find_map(|p| p.root.find_mut(key))
            .ok_or_else(|| GraphError::not_found(key))?;

        if node.has_children() {
            return Err(GraphError::invalid_target(key, "has children and no text"));
        }

        node.model.text = Some(text.to_string());
        Ok(())
    }
}

impl GraphApi for PageGraph {
    fn get_wrapped_model_by_page_path(&self, path: &str) -> Option<GraphNode> {
        self.wrap(path, &SelectedKeys::default(), &ClipboardState::default())
    }
}

pub const DEMO_PAGE_MODEL: &str = r##"{
  "pages": [
    {
      "pagePath": "/",
      "pageName": "Home",
      "children": [
        {
          "type": "Navbar",
          "namespace": "react-bootstrap",
          "props": { "inverse": true, "brand": { "type": "span", "text": "Page builder" } },
          "children": [
            { "type": "NavItem", "namespace": "react-bootstrap", "props": { "href": "#" }, "text": "Docs" },
            { "type": "NavItem", "namespace": "react-bootstrap", "props": { "href": "#" }, "text": "Gallery" }
          ]
        },
        {
          "type": "Grid",
          "namespace": "react-bootstrap",
          "children": [
            {
              "type": "Row",
              "namespace": "react-bootstrap",
              "children": [
                { "type": "h1", "text": "Hello" },
                { "type": "p", "text": "Select a component in the tree to edit it." },
                { "type": "Button", "namespace": "react-bootstrap", "props": { "bsStyle": "primary" }, "text": "Start" }
              ]
            }
          ]
        },
        { "type": "hr" },
        { "type": "footer", "text": "Footer" }
      ]
    },
    {
      "pagePath": "/empty",
      "pageName": "Empty",
      "children": []
    }
  ]
}"##;
