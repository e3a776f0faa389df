//! Business logic services.

pub mod file_store;

pub use file_store::{FileStore, MultipartFile, generate_store_name};
