//! Key-value store implementations
//!
//! - `FileKeyValueStore`: one JSON file per key under a storage directory
//! - `MemoryKeyValueStore`: process-local map, for tests and dry runs

mod file;
mod memory;

pub use file::{default_storage_dir, FileKeyValueStore};
pub use memory::MemoryKeyValueStore;
