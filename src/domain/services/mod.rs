//! Domain Services
//!
//! Pure business logic over form schemas and value maps.
//! These services have no I/O dependencies and are easily testable.

pub mod derived;
pub mod expression;
mod invariants;
mod validator;

pub use derived::{
    evaluation_order, recompute, DerivedEngine, DerivedError, DerivedPlan, ExpressionDiagnostic,
    ExpressionFailure, Recomputation,
};
pub use invariants::{check_invariants, check_persist_ready, Violation};
pub use validator::{
    is_email, is_strong_password, validate, validate_rule, ValidationFailure,
};
