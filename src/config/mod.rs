//! Configuration module for formsmith
//!
//! Configuration hierarchy:
//! 1. CLI flags (highest priority)
//! 2. Environment variables (FORMSMITH_*)
//! 3. Project config (.formsmith/config.toml)
//! 4. User config (~/.config/formsmith/config.toml)
//! 5. Built-in defaults (lowest priority)

mod loader;
mod types;

pub use loader::ConfigWarning;
pub use types::{Config, OutputConfig, SessionConfig, StorageConfig, Verbosity};
