//! Repository Implementations
//!
//! Concrete implementations of domain repository ports.

mod forms;

pub use forms::{decode_forms, JsonFormRepository, DEFAULT_FORMS_KEY};
