//! FormSchema entity
//!
//! The declarative definition of a form. A schema starts life as a draft
//! (`id` and `created_at` unset); persistence assigns both exactly once.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::FieldSpec;
use crate::domain::value_objects::{FieldId, FormId};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSchema {
    #[serde(default)]
    pub id: Option<FormId>,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Display order, also the tie-break order for derived evaluation
    #[serde(default)]
    pub fields: Vec<FieldSpec>,
}

impl FormSchema {
    /// A blank draft
    pub fn draft(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    /// True until persistence assigns an id
    pub fn is_draft(&self) -> bool {
        self.id.is_none()
    }

    pub fn field(&self, id: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.id.as_str() == id)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.id.as_str() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    pub fn field_ids(&self) -> impl Iterator<Item = &FieldId> {
        self.fields.iter().map(|f| &f.id)
    }

    /// Fields whose derivation is enabled, in schema order
    pub fn derived_fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter().filter(|f| f.is_derived())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
