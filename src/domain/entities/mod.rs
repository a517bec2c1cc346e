//! Domain Entities
//!
//! - `FieldSpec` - One field of a form, with its rules and derivation
//! - `FormSchema` - An ordered set of fields, draft or persisted

mod field;
mod form;

pub use field::{DerivedSpec, FieldSpec, ValidationRule, DEFAULT_OPTIONS};
pub use form::FormSchema;
