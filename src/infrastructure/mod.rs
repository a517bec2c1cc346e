//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//! This layer handles all I/O operations.
//!
//! ## Structure
//!
//! - `storage/` - Key-value stores (file, memory)
//! - `repositories/` - The JSON form repository
//! - `events/` - Fill event sinks
//! - `logging` - Logger bootstrap for the binary

pub mod events;
pub mod logging;
pub mod repositories;
pub mod storage;

// Re-export for convenience
pub use events::JsonEventSink;
pub use repositories::{JsonFormRepository, DEFAULT_FORMS_KEY};
pub use storage::{FileKeyValueStore, MemoryKeyValueStore};
