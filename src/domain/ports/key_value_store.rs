//! KeyValueStore port
//!
//! The flat string store forms are persisted into. One key holds one blob.

#[derive(Debug, thiserror::Error)]
pub enum KeyValueError {
    #[error("failed to access store at {location}: {source}")]
    Io {
        location: String,
        #[source]
        source: std::io::Error,
    },

    #[error("store key '{key}' is not usable: {reason}")]
    InvalidKey { key: String, reason: String },
}

pub trait KeyValueStore: Send + Sync {
    /// Current blob under `key`, `None` if never written
    fn get(&self, key: &str) -> Result<Option<String>, KeyValueError>;

    /// Replace the blob under `key`
    fn set(&self, key: &str, value: &str) -> Result<(), KeyValueError>;
}
