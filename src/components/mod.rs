pub mod tree_view;
pub mod ui;

pub use tree_view::PageTreeViewPanel;
