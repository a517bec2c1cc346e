//! Event Sink Implementations
//!
//! Provides concrete implementations of FillEventSink:
//! - JsonEventSink: NDJSON output for scripting

mod json;

pub use json::JsonEventSink;
