#![deny(missing_docs)]

//! # Error Handling
//!
//! Provides the unified `AppError` enum used across the crate.
//!
//! Document-level failures (read, parse, validation) abort a generation run.
//! Emission-level failures are wrapped in an [`EmitFailure`](crate::generator::EmitFailure)
//! by the pipeline and reported alongside the files that did succeed.

use derive_more::Display;
use std::path::PathBuf;

/// Boxed cause carried by parse errors (JSON or YAML parser error).
pub type BoxedCause = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The Global Error Enum.
#[derive(Debug, Display)]
pub enum AppError {
    /// The document file is missing or unreadable.
    #[display("Failed to read '{}': {source}", path.display())]
    Read {
        /// Absolute path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The document is not well-formed JSON / YAML.
    #[display("Failed to parse '{}': {source}", path.display())]
    Parse {
        /// Absolute path of the document (or `<memory>`).
        path: PathBuf,
        /// Underlying parser error.
        source: BoxedCause,
    },

    /// The file extension is not one of `.json`, `.yaml`, `.yml`.
    #[display("Unsupported file extension for '{}'. Use .json, .yaml or .yml", path.display())]
    UnsupportedFormat {
        /// Absolute path of the rejected file.
        path: PathBuf,
    },

    /// The document violates the minimal OpenAPI 3.x contract.
    #[display("Invalid OpenAPI document: '{field}' {message}")]
    Validation {
        /// The field that failed (e.g. `openapi`, `info.title`).
        field: String,
        /// What is wrong with it.
        message: String,
    },

    /// A `$ref` does not resolve within the document.
    #[display("Unresolved reference '{reference}' in {context}")]
    UnresolvedReference {
        /// The raw `$ref` value.
        reference: String,
        /// Where the reference was found (e.g. `UserEntity.address`).
        context: String,
    },

    /// Two canonical records would emit the same identifier or file name.
    #[display("Naming collision on '{name}' between {first} and {second}")]
    NamingCollision {
        /// The colliding identifier or path.
        name: String,
        /// The record that claimed the name first.
        first: String,
        /// The record that tried to claim it again.
        second: String,
    },
}

impl AppError {
    /// Shorthand for a [`AppError::Validation`].
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        AppError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Returns the failing field name for validation errors.
    pub fn field(&self) -> Option<&str> {
        match self {
            AppError::Validation { field, .. } => Some(field),
            _ => None,
        }
    }
}

/// Manual implementation of the standard Error trait.
impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Read { source, .. } => Some(source),
            AppError::Parse { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

/// Helper type alias for Result using AppError.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;
    use std::io::ErrorKind;

    #[test]
    fn test_read_error_exposes_cause() {
        let err = AppError::Read {
            path: PathBuf::from("/tmp/missing.yaml"),
            source: std::io::Error::new(ErrorKind::NotFound, "gone"),
        };
        assert!(err.to_string().contains("/tmp/missing.yaml"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_validation_field_accessor() {
        let err = AppError::validation("openapi", "is missing");
        assert_eq!(err.field(), Some("openapi"));
        assert_eq!(
            err.to_string(),
            "Invalid OpenAPI document: 'openapi' is missing"
        );
        assert!(err.source().is_none());
    }

    #[test]
    fn test_collision_display() {
        let err = AppError::NamingCollision {
            name: "getUsersId".into(),
            first: "GET /users/:id".into(),
            second: "GET /users/id".into(),
        };
        assert_eq!(
            err.to_string(),
            "Naming collision on 'getUsersId' between GET /users/:id and GET /users/id"
        );
    }
}
