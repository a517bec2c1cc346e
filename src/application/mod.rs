//! Application Layer
//!
//! Use cases that orchestrate the business flow.
//! This layer:
//! - Depends on Domain layer (entities, services, ports)
//! - Does NOT contain business rules (those are in Domain)
//! - Coordinates between Infrastructure and Domain
//!
//! ## Use Cases
//!
//! - `FormBuilder` - Edits a draft schema, rejecting edits that break invariants
//! - `FillSession` - Live values, recompute and validation for one form instance
//! - `FormsUseCase` - Persist-readiness gate in front of the form repository

pub mod builder;
pub mod fill_session;
pub mod forms;

pub use builder::{BuilderError, FieldPatch, FormBuilder};
pub use fill_session::{
    ErrorMap, FillSession, SessionError, SessionOptions, SessionPolicy, SubmitOutcome,
};
pub use forms::{FormsUseCase, PersistError};
