//! Field entity
//!
//! A `FieldSpec` is one ordered entry of a form schema: its input kind, label,
//! optional rule set and, for derived fields, the expression that computes it.

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{FieldId, FieldType, Value};

/// Options given to a freshly added select/radio field
pub const DEFAULT_OPTIONS: [&str; 2] = ["Option 1", "Option 2"];

/// Optional rule set attached to a field
///
/// Length limits of `0` are treated as unset.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationRule {
    #[serde(default, skip_serializing_if = "is_false")]
    pub not_empty: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub email: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub custom_password: bool,
}

impl ValidationRule {
    /// True when no rule is switched on
    pub fn is_empty(&self) -> bool {
        !self.not_empty
            && self.min_length.unwrap_or(0) == 0
            && self.max_length.unwrap_or(0) == 0
            && !self.email
            && !self.custom_password
    }
}

/// Helper for serde skip_serializing_if
fn is_false(b: &bool) -> bool {
    !*b
}

/// How a derived field computes its value
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DerivedSpec {
    #[serde(default)]
    pub enabled: bool,
    /// Fields the expression may read, in declaration order
    #[serde(default)]
    pub parents: Vec<FieldId>,
    #[serde(default)]
    pub expression: String,
}

impl DerivedSpec {
    /// An enabled spec over the given parents
    pub fn new<I, S>(parents: I, expression: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<FieldId>,
    {
        Self {
            enabled: true,
            parents: parents.into_iter().map(Into::into).collect(),
            expression: expression.into(),
        }
    }

    /// The disabled placeholder every new field starts with
    pub fn disabled() -> Self {
        Self::default()
    }
}

/// One field of a form schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSpec {
    pub id: FieldId,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationRule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub derived: Option<DerivedSpec>,
}

impl FieldSpec {
    /// A bare field with no rules and no derivation
    pub fn new(id: impl Into<FieldId>, field_type: FieldType) -> Self {
        Self {
            id: id.into(),
            field_type,
            label: field_type.default_label(),
            required: false,
            default_value: None,
            options: field_type
                .requires_options()
                .then(|| DEFAULT_OPTIONS.iter().map(|o| o.to_string()).collect()),
            validation: None,
            derived: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// A null default is stored as absent, the only shape JSON can keep
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into()).filter(|v| *v != Value::Null);
        self
    }

    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = Some(options.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_validation(mut self, rule: ValidationRule) -> Self {
        self.validation = Some(rule);
        self
    }

    pub fn with_derived(mut self, derived: DerivedSpec) -> Self {
        self.derived = Some(derived);
        self
    }

    /// True when the value is computed rather than entered
    pub fn is_derived(&self) -> bool {
        self.derived.as_ref().is_some_and(|d| d.enabled)
    }

    /// Declared parents of an enabled derivation (empty otherwise)
    pub fn derived_parents(&self) -> &[FieldId] {
        match &self.derived {
            Some(d) if d.enabled => &d.parents,
            _ => &[],
        }
    }

    /// Option list, empty when absent
    pub fn options(&self) -> &[String] {
        self.options.as_deref().unwrap_or_default()
    }

    /// Value the field holds when a fill session opens
    pub fn initial_value(&self) -> Value {
        self.default_value
            .clone()
            .unwrap_or_else(|| Value::empty_for(self.field_type))
    }
}
