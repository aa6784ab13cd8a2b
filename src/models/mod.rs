//! Domain logic that sits on top of the raw entities.

pub mod attribute_value;
pub mod layout;

pub use attribute_value::{AttributeValue, ValueColumns, ValueError};
pub use layout::{build_category_tree, creates_cycle, display_order, sorted_groups, CategoryNode};
