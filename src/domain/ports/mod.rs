//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the domain layer.
//! Infrastructure layer provides concrete implementations.

pub mod fill_events;
pub mod form_repository;
pub mod key_value_store;

pub use fill_events::{FillEvent, FillEventSink, NoopEventSink};
pub use form_repository::{FormRepository, StoreError};
pub use key_value_store::{KeyValueError, KeyValueStore};
