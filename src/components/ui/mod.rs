pub mod button;
pub mod input;
pub mod tree_list;

// Re-export component symbols so callers can `use crate::components::ui::Button` etc.
pub use button::*;
pub use input::*;
pub use tree_list::*;
