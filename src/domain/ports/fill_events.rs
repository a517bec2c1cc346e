//! Fill Event Port
//!
//! Observable interface for fill sessions. Enables JSON event streams and
//! debugging without coupling the session to any output.

use crate::domain::value_objects::{FieldId, Value};

/// Event emitted while a form is being filled
#[derive(Debug, Clone, PartialEq)]
pub enum FillEvent {
    /// Session opened with seeded values
    Started { form: String, field_count: usize },

    /// A field was edited
    FieldChanged {
        field: FieldId,
        value: Value,
        /// Derived fields whose value moved as a consequence
        recomputed: Vec<FieldId>,
        error: Option<String>,
    },

    /// A derived expression failed and its field was blanked
    ExpressionFailed {
        field: FieldId,
        expression: String,
        message: String,
    },

    /// Submission finished
    Submitted { accepted: bool, error_count: usize },
}

/// Trait for receiving fill events
pub trait FillEventSink: Send + Sync {
    fn on_event(&self, event: FillEvent);
}

/// No-op event sink for silent operation
pub struct NoopEventSink;

impl FillEventSink for NoopEventSink {
    fn on_event(&self, _event: FillEvent) {}
}
