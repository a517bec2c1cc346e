//! JSON Form Repository
//!
//! Stores every form as one JSON array under a single key of a
//! `KeyValueStore` (`forms_v1` by default). The array has no version field;
//! readers take it exactly as written.

use chrono::Utc;

use crate::domain::entities::FormSchema;
use crate::domain::ports::{FormRepository, KeyValueStore, StoreError};
use crate::domain::value_objects::FormId;

pub const DEFAULT_FORMS_KEY: &str = "forms_v1";

pub struct JsonFormRepository<S> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> JsonFormRepository<S> {
    pub fn new(store: S) -> Self {
        Self::with_key(store, DEFAULT_FORMS_KEY)
    }

    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Stored forms for a read-modify-write; unlike `load_all`, a failed
    /// read is an error
    fn read_all(&self) -> Result<Vec<FormSchema>, StoreError> {
        match self.store.get(&self.key)? {
            Some(raw) => Ok(decode_forms(&raw)),
            None => {
                log::debug!("no forms stored under '{}'", self.key);
                Ok(Vec::new())
            }
        }
    }

    fn write_all(&self, forms: &[FormSchema]) -> Result<(), StoreError> {
        let json = serde_json::to_string(forms).map_err(|e| StoreError::Serialization {
            message: e.to_string(),
        })?;
        self.store.set(&self.key, &json)?;
        Ok(())
    }
}

/// Decode the stored blob; anything unreadable counts as no forms
pub fn decode_forms(raw: &str) -> Vec<FormSchema> {
    match serde_json::from_str::<Vec<FormSchema>>(raw) {
        Ok(forms) => forms,
        Err(e) => {
            log::warn!("ignoring unreadable stored forms: {}", e);
            Vec::new()
        }
    }
}

impl<S: KeyValueStore> FormRepository for JsonFormRepository<S> {
    fn save(&self, schema: &FormSchema) -> Result<FormSchema, StoreError> {
        let mut forms = self.read_all()?;
        if let Some(id) = &schema.id {
            if forms.iter().any(|f| f.id.as_ref() == Some(id)) {
                return Err(StoreError::DuplicateId { id: id.clone() });
            }
        }

        let mut stored = schema.clone();
        if stored.id.is_none() {
            let mut id = FormId::generate();
            while forms.iter().any(|f| f.id.as_ref() == Some(&id)) {
                id = FormId::generate();
            }
            stored.id = Some(id);
        }
        stored.created_at.get_or_insert_with(Utc::now);

        forms.push(stored.clone());
        self.write_all(&forms)?;
        Ok(stored)
    }

    fn load_all(&self) -> Vec<FormSchema> {
        self.read_all().unwrap_or_else(|e| {
            log::warn!("cannot read stored forms: {}", e);
            Vec::new()
        })
    }

    fn replace(&self, schema: &FormSchema) -> Result<FormSchema, StoreError> {
        let id = schema.id.clone().ok_or(StoreError::MissingId)?;
        let mut forms = self.read_all()?;
        let Some(slot) = forms.iter_mut().find(|f| f.id.as_ref() == Some(&id)) else {
            return Err(StoreError::NotFound { id });
        };

        let mut stored = schema.clone();
        if stored.created_at.is_none() {
            stored.created_at = slot.created_at;
        }
        *slot = stored.clone();
        self.write_all(&forms)?;
        Ok(stored)
    }
}
