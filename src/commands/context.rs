//! Shared wiring for command handlers: storage and draft files

use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use formsmith::config::Config;
use formsmith::infrastructure::{FileKeyValueStore, JsonFormRepository};
use formsmith::{FormSchema, FormsUseCase, FormsmithError};

pub fn forms_use_case(config: &Config) -> FormsUseCase {
    let store = FileKeyValueStore::with_dir(config.storage.dir());
    let repository = JsonFormRepository::with_key(store, config.storage.key.clone());
    FormsUseCase::new(Arc::new(repository))
}

pub fn read_draft(path: &Path) -> Result<FormSchema> {
    let raw = fs::read_to_string(path).with_context(|| {
        format!(
            "cannot read draft {} (start one with `formsmith draft new <name>`)",
            path.display()
        )
    })?;
    let schema = serde_json::from_str(&raw).map_err(|e| FormsmithError::InvalidDraft {
        file: path.to_path_buf(),
        message: e.to_string(),
    })?;
    Ok(schema)
}

pub fn write_draft(path: &Path, schema: &FormSchema) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(schema)?;
    fs::write(path, json + "\n").with_context(|| format!("cannot write {}", path.display()))?;
    Ok(())
}
