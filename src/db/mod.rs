//! Record storage for uploaded items.

pub mod file_items;

pub use file_items::{FileItemRepository, MemoryFileItemRepository};
