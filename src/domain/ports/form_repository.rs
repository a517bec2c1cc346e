//! FormRepository port
//!
//! The persistence gateway for form schemas. Stored forms are an ordered,
//! append-only list; `replace` is the one explicit overwrite path.

use crate::domain::entities::FormSchema;
use crate::domain::value_objects::FormId;

use super::KeyValueError;

pub trait FormRepository: Send + Sync {
    /// Persist a draft, assigning `id` and `createdAt` if absent
    fn save(&self, schema: &FormSchema) -> Result<FormSchema, StoreError>;

    /// All stored forms in storage order; unreadable storage reads as empty
    fn load_all(&self) -> Vec<FormSchema>;

    /// First stored form with this id
    fn load_by_id(&self, id: &FormId) -> Option<FormSchema> {
        self.load_all()
            .into_iter()
            .find(|form| form.id.as_ref() == Some(id))
    }

    /// Overwrite the stored copy with the same id, keeping its position
    fn replace(&self, schema: &FormSchema) -> Result<FormSchema, StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("a form with id '{id}' is already stored")]
    DuplicateId { id: FormId },

    #[error("no stored form with id '{id}'")]
    NotFound { id: FormId },

    #[error("form has no id; save it before replacing")]
    MissingId,

    #[error("failed to serialize forms: {message}")]
    Serialization { message: String },

    #[error(transparent)]
    Backend(#[from] KeyValueError),
}
