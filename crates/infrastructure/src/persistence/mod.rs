//! File-based persistence adapters.

mod file_storage;
mod history_storage;

pub use file_storage::FileStorage;
