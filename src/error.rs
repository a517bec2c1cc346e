//! Error types for formsmith
//!
//! Each layer has its own `thiserror` enum; `FormsmithError` wraps them for
//! callers that drive several layers at once.

use std::path::PathBuf;
use thiserror::Error;

use crate::application::{BuilderError, PersistError, SessionError};
use crate::domain::ports::StoreError;
use crate::domain::value_objects::FormId;

/// Result type alias for formsmith operations
pub type FormsmithResult<T> = Result<T, FormsmithError>;

/// Main error type for formsmith operations
#[derive(Error, Debug)]
pub enum FormsmithError {
    /// Config file that exists but cannot be parsed
    #[error("invalid config in {file}: {message}")]
    InvalidConfig { file: PathBuf, message: String },

    /// Draft file that exists but cannot be parsed
    #[error("invalid draft in {file}: {message}")]
    InvalidDraft { file: PathBuf, message: String },

    #[error("no saved form with id '{id}'")]
    FormNotFound { id: FormId },

    #[error(transparent)]
    Builder(#[from] BuilderError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Persist(#[from] PersistError),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::services::Violation;

    #[test]
    fn test_error_display_invalid_config() {
        let err = FormsmithError::InvalidConfig {
            file: PathBuf::from(".formsmith/config.toml"),
            message: "expected a table".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid config in .formsmith/config.toml: expected a table"
        );
    }

    #[test]
    fn test_error_display_form_not_found() {
        let err = FormsmithError::FormNotFound { id: "abc".into() };
        assert_eq!(err.to_string(), "no saved form with id 'abc'");
    }

    #[test]
    fn test_builder_error_is_transparent() {
        let err: FormsmithError = BuilderError::from(Violation::EmptyName).into();
        assert_eq!(err.to_string(), "form name must not be empty");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: FormsmithError = io_err.into();
        assert!(err.to_string().contains("IO error"));
    }
}
