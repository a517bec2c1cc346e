//! File-backed key-value store
//!
//! Each key maps to `<dir>/<key>.json`. Writes go to a temp file in the same
//! directory and are renamed into place while holding `<dir>/<key>.lock`.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tempfile::NamedTempFile;

use crate::domain::ports::{KeyValueError, KeyValueStore};

#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    dir: PathBuf,
}

impl FileKeyValueStore {
    pub fn new() -> Self {
        Self {
            dir: default_storage_dir(),
        }
    }

    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File a key is stored in
    pub fn path_for(&self, key: &str) -> Result<PathBuf, KeyValueError> {
        check_key(key)?;
        Ok(self.dir.join(format!("{}.json", key)))
    }

    fn lock_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.lock", key))
    }

    fn io_error(&self, source: std::io::Error) -> KeyValueError {
        KeyValueError::Io {
            location: self.dir.display().to_string(),
            source,
        }
    }
}

impl Default for FileKeyValueStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, KeyValueError> {
        let path = self.path_for(key)?;
        if !path.exists() {
            return Ok(None);
        }
        fs::read_to_string(&path)
            .map(Some)
            .map_err(|e| self.io_error(e))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), KeyValueError> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir).map_err(|e| self.io_error(e))?;

        let lock_file = fs::File::create(self.lock_path(key)).map_err(|e| self.io_error(e))?;
        lock_file.lock_exclusive().map_err(|e| self.io_error(e))?;

        let result = write_atomic(&self.dir, &path, value).map_err(|e| self.io_error(e));

        let _ = lock_file.unlock();
        result
    }
}

fn write_atomic(dir: &Path, path: &Path, value: &str) -> std::io::Result<()> {
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(value.as_bytes())?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

fn check_key(key: &str) -> Result<(), KeyValueError> {
    let reason = if key.is_empty() {
        Some("key is empty")
    } else if key.starts_with('.') {
        Some("key must not start with '.'")
    } else if !key
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
    {
        Some("only ASCII letters, digits, '_', '-' and '.' are allowed")
    } else {
        None
    };
    match reason {
        Some(reason) => Err(KeyValueError::InvalidKey {
            key: key.to_string(),
            reason: reason.to_string(),
        }),
        None => Ok(()),
    }
}

/// `~/.formsmith`
pub fn default_storage_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".formsmith"))
        .unwrap_or_else(|| PathBuf::from(".formsmith"))
}
