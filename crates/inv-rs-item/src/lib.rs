//! Item data model shared by the container and transaction layers.

pub mod item_stack;

pub use item_stack::ItemStack;
