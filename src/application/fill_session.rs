//! Fill Session
//!
//! Runtime state of one person filling one instance of a schema: the live
//! value map, the per-field error map, and the compiled derived-field plan.
//! Every edit triggers exactly one recompute pass.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;

use crate::domain::entities::FormSchema;
use crate::domain::ports::{FillEvent, FillEventSink, NoopEventSink};
use crate::domain::services::{
    check_invariants, validate, DerivedEngine, DerivedError, DerivedPlan, ExpressionDiagnostic,
    Violation,
};
use crate::domain::value_objects::{FieldId, Value, ValueMap};

/// Error message per field id
pub type ErrorMap = BTreeMap<FieldId, String>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("form has no field '{id}'")]
    UnknownField { id: FieldId },

    #[error("form is not valid: {0}")]
    Invalid(Violation),

    #[error(transparent)]
    Derived(#[from] DerivedError),
}

/// Which fields `on_change` revalidates
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionPolicy {
    /// Also revalidate derived fields whose value changed
    pub revalidate_derived: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Success(ValueMap),
    Rejected(ErrorMap),
}

impl SubmitOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SubmitOutcome::Success(_))
    }
}

/// How a session is opened
#[derive(Clone)]
pub struct SessionOptions {
    pub policy: SessionPolicy,
    pub engine: DerivedEngine,
    pub events: Arc<dyn FillEventSink>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            policy: SessionPolicy::default(),
            engine: DerivedEngine::new(),
            events: Arc::new(NoopEventSink),
        }
    }
}

impl SessionOptions {
    pub fn with_policy(mut self, policy: SessionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.engine = self.engine.with_today(today);
        self
    }

    pub fn with_events(mut self, events: Arc<dyn FillEventSink>) -> Self {
        self.events = events;
        self
    }
}

pub struct FillSession {
    schema: FormSchema,
    plan: DerivedPlan,
    options: SessionOptions,
    values: ValueMap,
    errors: ErrorMap,
    diagnostics: Vec<ExpressionDiagnostic>,
}

impl FillSession {
    pub fn start(schema: FormSchema) -> Result<Self, SessionError> {
        Self::start_with(schema, SessionOptions::default())
    }

    /// Seed values from field defaults and run the first recompute
    ///
    /// A schema that breaks any structural invariant is rejected before the
    /// derived plan is built.
    pub fn start_with(schema: FormSchema, options: SessionOptions) -> Result<Self, SessionError> {
        if let Some(violation) = check_invariants(&schema).into_iter().next() {
            return Err(SessionError::Invalid(violation));
        }
        let plan = options.engine.plan(&schema)?;
        let seeded: ValueMap = schema
            .fields
            .iter()
            .map(|field| (field.id.clone(), field.initial_value()))
            .collect();

        options.events.on_event(FillEvent::Started {
            form: schema.name.clone(),
            field_count: schema.len(),
        });

        let mut session = Self {
            schema,
            plan,
            options,
            values: seeded,
            errors: ErrorMap::new(),
            diagnostics: Vec::new(),
        };
        session.recompute();
        Ok(session)
    }

    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    pub fn values(&self) -> &ValueMap {
        &self.values
    }

    pub fn value(&self, id: &str) -> Option<&Value> {
        self.values.get(id)
    }

    pub fn errors(&self) -> &ErrorMap {
        &self.errors
    }

    pub fn error(&self, id: &str) -> Option<&str> {
        self.errors.get(id).map(String::as_str)
    }

    /// Expression failures from the latest recompute
    pub fn diagnostics(&self) -> &[ExpressionDiagnostic] {
        &self.diagnostics
    }

    /// Apply one user edit
    pub fn on_change(&mut self, id: &str, value: impl Into<Value>) -> Result<(), SessionError> {
        let field_id = self
            .schema
            .field(id)
            .map(|f| f.id.clone())
            .ok_or_else(|| SessionError::UnknownField { id: id.into() })?;
        let value = value.into();

        self.values.insert(field_id.clone(), value.clone());
        let recomputed = self.recompute();

        self.revalidate(&field_id);
        if self.options.policy.revalidate_derived {
            for derived in &recomputed {
                self.revalidate(derived);
            }
        }

        self.options.events.on_event(FillEvent::FieldChanged {
            error: self.errors.get(&field_id).cloned(),
            field: field_id,
            value,
            recomputed,
        });
        Ok(())
    }

    /// Validate every field; succeed only with an empty error map
    pub fn submit(&mut self) -> SubmitOutcome {
        self.errors = self
            .schema
            .fields
            .iter()
            .filter_map(|field| {
                let value = self.values.get(&field.id).unwrap_or(&Value::Null);
                validate(field, value).map(|failure| (field.id.clone(), failure.to_string()))
            })
            .collect();

        self.options.events.on_event(FillEvent::Submitted {
            accepted: self.errors.is_empty(),
            error_count: self.errors.len(),
        });
        log::debug!(
            "submit of '{}': {} error(s)",
            self.schema.name,
            self.errors.len()
        );

        if self.errors.is_empty() {
            SubmitOutcome::Success(self.values.clone())
        } else {
            SubmitOutcome::Rejected(self.errors.clone())
        }
    }

    fn recompute(&mut self) -> Vec<FieldId> {
        let result = self
            .plan
            .evaluate(&self.values, self.options.engine.today());
        for diagnostic in &result.diagnostics {
            self.options.events.on_event(FillEvent::ExpressionFailed {
                field: diagnostic.field.clone(),
                expression: diagnostic.expression.clone(),
                message: diagnostic.failure.to_string(),
            });
        }
        self.values = result.values;
        self.diagnostics = result.diagnostics;
        result.changed
    }

    fn revalidate(&mut self, id: &FieldId) {
        let Some(field) = self.schema.field(id.as_str()) else {
            return;
        };
        let value = self.values.get(id).unwrap_or(&Value::Null);
        match validate(field, value) {
            Some(failure) => {
                self.errors.insert(id.clone(), failure.to_string());
            }
            None => {
                self.errors.remove(id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{DerivedSpec, FieldSpec, ValidationRule};
    use crate::domain::value_objects::FieldType;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSink {
        events: Mutex<Vec<FillEvent>>,
    }

    impl FillEventSink for RecordingSink {
        fn on_event(&self, event: FillEvent) {
            self.events.lock().unwrap().push(event);
        }
    }

    fn required(id: &str) -> FieldSpec {
        FieldSpec::new(id, FieldType::Text).with_validation(ValidationRule {
            not_empty: true,
            ..Default::default()
        })
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn doubling_schema() -> FormSchema {
        FormSchema::draft("calc")
            .with_field(FieldSpec::new("A", FieldType::Number).with_default(10.0))
            .with_field(
                FieldSpec::new("B", FieldType::Number)
                    .with_derived(DerivedSpec::new(["A"], "fields['A'] * 2")),
            )
    }

    #[test]
    fn start_seeds_defaults_and_derives() {
        let schema = doubling_schema().with_field(FieldSpec::new("ok", FieldType::Checkbox));
        let session = FillSession::start(schema).unwrap();
        assert_eq!(session.value("A"), Some(&Value::Number(10.0)));
        assert_eq!(session.value("B"), Some(&Value::Number(20.0)));
        assert_eq!(session.value("ok"), Some(&Value::Bool(false)));
        assert!(session.errors().is_empty());
    }

    #[test]
    fn start_rejects_cyclic_schema() {
        let schema = FormSchema::draft("cycle")
            .with_field(
                FieldSpec::new("B", FieldType::Number)
                    .with_derived(DerivedSpec::new(["C"], "fields.C")),
            )
            .with_field(
                FieldSpec::new("C", FieldType::Number)
                    .with_derived(DerivedSpec::new(["B"], "fields.B")),
            );
        assert!(matches!(
            FillSession::start(schema),
            Err(SessionError::Invalid(Violation::CyclicDependency { .. }))
        ));
    }

    #[test]
    fn start_rejects_duplicate_field_ids() {
        let schema = FormSchema::draft("dupes")
            .with_field(FieldSpec::new("a", FieldType::Text).with_default("first"))
            .with_field(required("a"));
        let err = FillSession::start(schema).err().unwrap();
        assert_eq!(
            err,
            SessionError::Invalid(Violation::DuplicateFieldId {
                id: FieldId::from("a")
            })
        );
    }

    #[test]
    fn start_rejects_dangling_parent() {
        let schema = FormSchema::draft("dangling").with_field(
            FieldSpec::new("B", FieldType::Number)
                .with_derived(DerivedSpec::new(["ghost"], "fields.ghost")),
        );
        assert!(matches!(
            FillSession::start(schema),
            Err(SessionError::Invalid(Violation::DanglingParentReference { .. }))
        ));
    }

    #[test]
    fn on_change_recomputes_and_validates_edited_field() {
        let schema = doubling_schema().with_field(required("name"));
        let mut session = FillSession::start(schema).unwrap();

        session.on_change("A", 4.0).unwrap();
        assert_eq!(session.value("B"), Some(&Value::Number(8.0)));
        assert!(session.error("name").is_none());

        session.on_change("name", "").unwrap();
        assert_eq!(session.error("name"), Some("Required"));
        session.on_change("name", "Ada").unwrap();
        assert!(session.error("name").is_none());
    }

    #[test]
    fn on_change_unknown_field() {
        let mut session = FillSession::start(doubling_schema()).unwrap();
        assert_eq!(
            session.on_change("zzz", 1.0),
            Err(SessionError::UnknownField { id: "zzz".into() })
        );
    }

    #[test]
    fn derived_fields_revalidate_only_when_policy_says_so() {
        let schema = FormSchema::draft("p")
            .with_field(FieldSpec::new("A", FieldType::Text))
            .with_field(
                FieldSpec::new("B", FieldType::Text)
                    .with_derived(DerivedSpec::new(["A"], "fields.A"))
                    .with_validation(ValidationRule {
                        min_length: Some(3),
                        ..Default::default()
                    }),
            );

        let mut lenient = FillSession::start(schema.clone()).unwrap();
        lenient.on_change("A", "x").unwrap();
        assert!(lenient.error("B").is_none());

        let options = SessionOptions::default().with_policy(SessionPolicy {
            revalidate_derived: true,
        });
        let mut strict = FillSession::start_with(schema, options).unwrap();
        strict.on_change("A", "x").unwrap();
        assert_eq!(strict.error("B"), Some("Min length 3"));
    }

    #[test]
    fn submit_rejects_then_succeeds() {
        let schema = FormSchema::draft("s")
            .with_field(required("name"))
            .with_field(FieldSpec::new("note", FieldType::Textarea));
        let mut session = FillSession::start(schema).unwrap();

        match session.submit() {
            SubmitOutcome::Rejected(errors) => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors.get("name").map(String::as_str), Some("Required"));
            }
            other => panic!("expected rejection, got {:?}", other),
        }

        session.on_change("name", "Ada").unwrap();
        let SubmitOutcome::Success(values) = session.submit() else {
            panic!("expected success");
        };
        assert_eq!(values.len(), 2);
        assert_eq!(values["name"], Value::Text("Ada".into()));
        assert!(session.errors().is_empty());
    }

    #[test]
    fn events_are_emitted() {
        let sink = Arc::new(RecordingSink::default());
        let schema = FormSchema::draft("ev")
            .with_field(FieldSpec::new("A", FieldType::Number))
            .with_field(
                FieldSpec::new("B", FieldType::Number)
                    .with_derived(DerivedSpec::new(["A"], "fields.A / 0")),
            );
        let options = SessionOptions::default()
            .with_today(today())
            .with_events(sink.clone());
        let mut session = FillSession::start_with(schema, options).unwrap();
        session.on_change("A", 2.0).unwrap();
        session.submit();

        let events = sink.events.lock().unwrap();
        assert!(matches!(events[0], FillEvent::Started { field_count: 2, .. }));
        assert!(events
            .iter()
            .any(|e| matches!(e, FillEvent::ExpressionFailed { field, .. } if field.as_str() == "B")));
        assert!(events
            .iter()
            .any(|e| matches!(e, FillEvent::FieldChanged { field, .. } if field.as_str() == "A")));
        assert!(matches!(
            events.last(),
            Some(FillEvent::Submitted { accepted: true, .. })
        ));
        assert_eq!(session.value("B"), Some(&Value::Text(String::new())));
        assert_eq!(session.diagnostics().len(), 1);
    }
}
