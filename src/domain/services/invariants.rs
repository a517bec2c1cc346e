//! Structural invariants of a form schema
//!
//! Pure checks, no side effects. An empty violation list means the schema is
//! structurally valid. The builder runs these after every edit; the derived
//! engine re-checks the dependency graph before its first recompute.

use std::collections::HashSet;

use thiserror::Error;

use super::derived::{evaluation_order, DerivedError};
use crate::domain::entities::FormSchema;
use crate::domain::value_objects::{FieldId, FieldType};

/// A broken structural invariant
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    #[error("duplicate field id '{id}'")]
    DuplicateFieldId { id: FieldId },

    #[error("field '{field}' ({field_type}) needs at least one option")]
    EmptyOptions {
        field: FieldId,
        field_type: FieldType,
    },

    #[error("field '{field}' depends on unknown field '{parent}'")]
    DanglingParentReference { field: FieldId, parent: FieldId },

    #[error("cyclic dependency between derived fields: {}", join_ids(.fields))]
    CyclicDependency { fields: Vec<FieldId> },

    #[error("form name must not be empty")]
    EmptyName,
}

impl Violation {
    /// Field the violation is reported against, if any
    pub fn field(&self) -> Option<&FieldId> {
        match self {
            Violation::DuplicateFieldId { id } => Some(id),
            Violation::EmptyOptions { field, .. }
            | Violation::DanglingParentReference { field, .. } => Some(field),
            Violation::CyclicDependency { fields } => fields.first(),
            Violation::EmptyName => None,
        }
    }
}

pub(crate) fn join_ids(ids: &[FieldId]) -> String {
    ids.iter()
        .map(FieldId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Structural checks every draft must pass: unique ids, options on choice
/// fields, known parents, acyclic derivations
pub fn check_invariants(schema: &FormSchema) -> Vec<Violation> {
    let mut violations = Vec::new();

    let mut seen = HashSet::new();
    for field in &schema.fields {
        if !seen.insert(field.id.as_str()) {
            violations.push(Violation::DuplicateFieldId {
                id: field.id.clone(),
            });
        }
    }

    for field in &schema.fields {
        if field.field_type.requires_options() && field.options().is_empty() {
            violations.push(Violation::EmptyOptions {
                field: field.id.clone(),
                field_type: field.field_type,
            });
        }
    }

    for field in &schema.fields {
        let Some(derived) = &field.derived else {
            continue;
        };
        for parent in &derived.parents {
            if !seen.contains(parent.as_str()) {
                violations.push(Violation::DanglingParentReference {
                    field: field.id.clone(),
                    parent: parent.clone(),
                });
            }
        }
    }

    if let Err(DerivedError::CyclicDependency { fields }) = evaluation_order(schema) {
        violations.push(Violation::CyclicDependency { fields });
    }

    violations
}

/// Structural checks plus a non-empty name: a draft that may be handed to
/// storage
pub fn check_persist_ready(schema: &FormSchema) -> Vec<Violation> {
    let mut violations = Vec::new();
    if schema.name.trim().is_empty() {
        violations.push(Violation::EmptyName);
    }
    violations.extend(check_invariants(schema));
    violations
}
