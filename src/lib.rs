//! formsmith - typed form schemas with validation and derived fields
//!
//! Define a form as an ordered list of typed fields with validation rules and
//! fields computed from other fields, edit it safely, persist it, and fill in
//! instances of it.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;

// Re-exports for convenience
pub use application::{
    BuilderError, FieldPatch, FillSession, FormBuilder, FormsUseCase, SubmitOutcome,
};
pub use config::Config;
pub use domain::entities::{DerivedSpec, FieldSpec, FormSchema, ValidationRule};
pub use domain::services::{check_invariants, recompute, validate, Violation};
pub use domain::value_objects::{FieldId, FieldType, FormId, Value, ValueMap};
pub use error::{FormsmithError, FormsmithResult};
