//! Domain Value Objects
//!
//! Immutable value types that represent domain concepts.

mod field_type;
mod ids;
mod value;

pub use field_type::FieldType;
pub use ids::{FieldId, FormId};
pub use value::{format_number, Value, ValueMap};
