//! Forms Use Case
//!
//! Application-layer orchestration between drafts and the form repository.

use std::sync::Arc;

use crate::domain::entities::FormSchema;
use crate::domain::ports::{FormRepository, StoreError};
use crate::domain::services::{check_persist_ready, Violation};
use crate::domain::value_objects::FormId;

#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("form is not ready to save: {}", describe(.0))]
    NotReady(Vec<Violation>),

    #[error(transparent)]
    Store(#[from] StoreError),
}

fn describe(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(Violation::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

pub struct FormsUseCase {
    repository: Arc<dyn FormRepository>,
}

impl FormsUseCase {
    pub fn new(repository: Arc<dyn FormRepository>) -> Self {
        Self { repository }
    }

    /// Persist a draft once it satisfies every invariant, including a name
    ///
    /// Drafts go through `save`; schemas that already carry an id overwrite
    /// their stored copy.
    pub fn save_draft(&self, schema: &FormSchema) -> Result<FormSchema, PersistError> {
        let violations = check_persist_ready(schema);
        if !violations.is_empty() {
            return Err(PersistError::NotReady(violations));
        }
        let stored = if schema.is_draft() {
            self.repository.save(schema)?
        } else {
            self.repository.replace(schema)?
        };
        log::info!(
            "saved form '{}' ({} field(s))",
            stored.name,
            stored.fields.len()
        );
        Ok(stored)
    }

    pub fn list(&self) -> Vec<FormSchema> {
        self.repository.load_all()
    }

    pub fn load(&self, id: &FormId) -> Option<FormSchema> {
        self.repository.load_by_id(id)
    }

    /// Most recently saved form
    pub fn latest(&self) -> Option<FormSchema> {
        self.repository.load_all().pop()
    }
}
