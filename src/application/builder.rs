//! Form Builder
//!
//! Mutation API over a draft schema. Every edit is applied to a copy, checked
//! against the structural invariants, and only then committed, so a rejected
//! edit leaves the previous draft untouched.

use crate::domain::entities::{DerivedSpec, FieldSpec, FormSchema, ValidationRule};
use crate::domain::services::expression::Expression;
use crate::domain::services::{check_invariants, Violation};
use crate::domain::value_objects::{FieldId, FieldType, Value};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuilderError {
    #[error("no field with id '{id}'")]
    FieldNotFound { id: FieldId },

    #[error("index {index} is out of range for {len} field(s)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error(transparent)]
    Rejected(#[from] Violation),
}

/// Partial update for one field; `None` leaves the attribute alone
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldPatch {
    pub label: Option<String>,
    pub field_type: Option<FieldType>,
    pub required: Option<bool>,
    /// `Some(None)` clears the default
    pub default_value: Option<Option<Value>>,
    pub options: Option<Vec<String>>,
    /// `Some(None)` drops the rule set
    pub validation: Option<Option<ValidationRule>>,
    pub derived: Option<DerivedSpec>,
}

impl FieldPatch {
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn field_type(mut self, field_type: FieldType) -> Self {
        self.field_type = Some(field_type);
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    pub fn default_value(mut self, value: Option<Value>) -> Self {
        self.default_value = Some(value);
        self
    }

    pub fn options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = Some(options.into_iter().map(Into::into).collect());
        self
    }

    pub fn validation(mut self, rule: Option<ValidationRule>) -> Self {
        self.validation = Some(rule);
        self
    }

    pub fn derived(mut self, derived: DerivedSpec) -> Self {
        self.derived = Some(derived);
        self
    }

    pub fn is_empty(&self) -> bool {
        self == &FieldPatch::default()
    }

    fn apply(self, field: &mut FieldSpec) {
        if let Some(label) = self.label {
            field.label = label;
        }
        if let Some(field_type) = self.field_type {
            field.field_type = field_type;
        }
        if let Some(required) = self.required {
            field.required = required;
        }
        if let Some(default_value) = self.default_value {
            // `null` does not survive storage as a present default
            field.default_value = default_value.filter(|v| *v != Value::Null);
        }
        if let Some(options) = self.options {
            field.options = Some(options);
        }
        if let Some(validation) = self.validation {
            field.validation = validation;
        }
        if let Some(derived) = self.derived {
            field.derived = Some(derived);
        }
    }
}

/// Owns one draft and keeps it structurally valid
#[derive(Debug, Clone, Default)]
pub struct FormBuilder {
    draft: FormSchema,
}

impl FormBuilder {
    /// Start from a blank, unnamed draft
    pub fn new() -> Self {
        Self::default()
    }

    /// Load an existing schema for editing
    pub fn edit(schema: FormSchema) -> Result<Self, BuilderError> {
        if let Some(violation) = check_invariants(&schema).into_iter().next() {
            return Err(violation.into());
        }
        Ok(Self { draft: schema })
    }

    /// Throw the draft away and start blank
    pub fn reset(&mut self) {
        self.draft = FormSchema::default();
    }

    pub fn draft(&self) -> &FormSchema {
        &self.draft
    }

    pub fn into_schema(self) -> FormSchema {
        self.draft
    }

    /// Append a fresh field of `field_type` and return it
    pub fn add_field(&mut self, field_type: FieldType) -> FieldSpec {
        let mut id = FieldId::generate();
        while self.draft.contains(id.as_str()) {
            id = FieldId::generate();
        }
        let field = FieldSpec::new(id, field_type)
            .with_default(Value::empty_for(field_type))
            .with_validation(ValidationRule::default())
            .with_derived(DerivedSpec::disabled());
        log::debug!("adding {} field '{}'", field_type, field.id);
        self.draft.fields.push(field.clone());
        field
    }

    /// Merge `patch` into the field with `id`
    pub fn update_field(&mut self, id: &str, patch: FieldPatch) -> Result<(), BuilderError> {
        let index = self.index_of(id)?;
        let mut candidate = self.draft.clone();
        patch.apply(&mut candidate.fields[index]);
        self.commit(candidate)
    }

    /// Remove the field with `id` and every reference to it
    ///
    /// Derivations that read the removed field are disabled.
    pub fn remove_field(&mut self, id: &str) -> Result<(), BuilderError> {
        let index = self.index_of(id)?;
        let mut candidate = self.draft.clone();
        let removed = candidate.fields.remove(index).id;

        for field in &mut candidate.fields {
            let Some(derived) = field.derived.as_mut() else {
                continue;
            };
            let before = derived.parents.len();
            derived.parents.retain(|parent| parent != &removed);
            if derived.parents.len() == before {
                continue;
            }
            let reads_removed = Expression::parse(&derived.expression)
                .map(|expr| expr.field_refs().contains(&removed))
                .unwrap_or(false);
            if derived.enabled && (reads_removed || derived.parents.is_empty()) {
                log::debug!(
                    "disabling derivation of '{}' after removing '{}'",
                    field.id,
                    removed
                );
                derived.enabled = false;
            }
        }

        self.commit(candidate)
    }

    /// Move the field at `from` so it ends up at `to`
    pub fn reorder_field(&mut self, from: usize, to: usize) -> Result<(), BuilderError> {
        let len = self.draft.fields.len();
        for index in [from, to] {
            if index >= len {
                return Err(BuilderError::IndexOutOfRange { index, len });
            }
        }
        let field = self.draft.fields.remove(from);
        self.draft.fields.insert(to, field);
        Ok(())
    }

    /// Rename the draft; emptiness is only checked when persisting
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.draft.name = name.into();
    }

    fn index_of(&self, id: &str) -> Result<usize, BuilderError> {
        self.draft
            .position(id)
            .ok_or_else(|| BuilderError::FieldNotFound { id: id.into() })
    }

    fn commit(&mut self, candidate: FormSchema) -> Result<(), BuilderError> {
        if let Some(violation) = check_invariants(&candidate).into_iter().next() {
            log::debug!("rejected edit: {}", violation);
            return Err(violation.into());
        }
        self.draft = candidate;
        Ok(())
    }
}
