#![deny(missing_docs)]

//! # Document Loader
//!
//! Reads an OpenAPI document from disk (or memory), dispatches the parser on
//! the file extension and validates the result before handing back the typed
//! [`OpenApiDocument`].

use crate::error::{AppError, AppResult};
use crate::oas::document::OpenApiDocument;
use crate::oas::validation::validate_openapi_root;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Placeholder path reported for in-memory documents.
pub const MEMORY_PATH: &str = "<memory>";

/// Supported document encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// `.json`
    Json,
    /// `.yaml` / `.yml`
    Yaml,
}

impl DocumentFormat {
    /// Chooses the parser from the file extension (case-insensitive).
    ///
    /// Any other extension is an [`AppError::UnsupportedFormat`].
    pub fn from_path(path: &Path) -> AppResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("json") => Ok(DocumentFormat::Json),
            Some("yaml") | Some("yml") => Ok(DocumentFormat::Yaml),
            _ => Err(AppError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }
}

/// Resolves `path` against the current directory.
pub(crate) fn absolute_path(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Reads `path` and parses it as `T` according to its extension.
///
/// The file is read first, so a missing file is a `Read` error whatever its
/// extension. An unsupported extension is rejected without touching the
/// parser.
pub(crate) fn read_structured<T: DeserializeOwned>(path: &Path) -> AppResult<T> {
    let abs = absolute_path(path);
    let content = std::fs::read_to_string(&abs).map_err(|source| AppError::Read {
        path: abs.clone(),
        source,
    })?;
    let format = DocumentFormat::from_path(&abs)?;

    debug!(path = %abs.display(), ?format, "read structured file");
    parse_structured(&content, format, &abs)
}

fn parse_structured<T: DeserializeOwned>(
    content: &str,
    format: DocumentFormat,
    path: &Path,
) -> AppResult<T> {
    match format {
        DocumentFormat::Json => serde_json::from_str(content).map_err(|e| AppError::Parse {
            path: path.to_path_buf(),
            source: Box::new(e),
        }),
        DocumentFormat::Yaml => serde_yaml::from_str(content).map_err(|e| AppError::Parse {
            path: path.to_path_buf(),
            source: Box::new(e),
        }),
    }
}

/// Reads, parses and validates the OpenAPI document at `path`.
pub fn load_document(path: impl AsRef<Path>) -> AppResult<OpenApiDocument> {
    let raw: Value = read_structured(path.as_ref())?;
    finish(raw)
}

impl OpenApiDocument {
    /// Parses and validates a document that is already in memory.
    pub fn from_str(content: &str, format: DocumentFormat) -> AppResult<Self> {
        let raw: Value = parse_structured(content, format, Path::new(MEMORY_PATH))?;
        finish(raw)
    }
}

fn finish(raw: Value) -> AppResult<OpenApiDocument> {
    validate_openapi_root(&raw)?;
    let doc = OpenApiDocument::from_validated_value(raw)?;
    debug!(
        title = %doc.info.title,
        version = %doc.info.version,
        paths = doc.paths.len(),
        schemas = doc.components.schemas.len(),
        "loaded OpenAPI document"
    );
    Ok(doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const MINIMAL_YAML: &str = r#"
openapi: 3.0.0
info:
  title: Pets
  version: "1.0.0"
paths:
  /pets:
    get: {}
"#;

    #[test]
    fn test_extension_dispatch() {
        assert_eq!(
            DocumentFormat::from_path(Path::new("a.JSON")).unwrap(),
            DocumentFormat::Json
        );
        assert_eq!(
            DocumentFormat::from_path(Path::new("a.yml")).unwrap(),
            DocumentFormat::Yaml
        );
        assert!(matches!(
            DocumentFormat::from_path(Path::new("a.txt")),
            Err(AppError::UnsupportedFormat { .. })
        ));
        assert!(DocumentFormat::from_path(Path::new("noext")).is_err());
    }

    #[test]
    fn test_load_yaml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("openapi.yaml");
        fs::write(&path, MINIMAL_YAML).unwrap();

        let doc = load_document(&path).unwrap();
        assert_eq!(doc.info.title, "Pets");
        assert_eq!(doc.paths.len(), 1);
    }

    #[test]
    fn test_load_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("openapi.json");
        fs::write(
            &path,
            r#"{"openapi":"3.1.0","info":{"title":"J","version":"2"},"paths":{}}"#,
        )
        .unwrap();

        let doc = load_document(&path).unwrap();
        assert_eq!(doc.openapi, "3.1.0");
        assert!(doc.paths.is_empty());
    }

    #[test]
    fn test_missing_file_is_read_error_with_absolute_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.yaml");
        match load_document(&path) {
            Err(AppError::Read { path: p, source }) => {
                assert!(p.is_absolute());
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("expected read error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_file_is_read_error_before_extension_check() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("openapi.txt");
        assert!(matches!(
            load_document(&path),
            Err(AppError::Read { .. })
        ));
    }

    #[test]
    fn test_unsupported_extension_not_parsed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("openapi.txt");
        fs::write(&path, "this is not parsed").unwrap();
        assert!(matches!(
            load_document(&path),
            Err(AppError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();
        match load_document(&path) {
            Err(err @ AppError::Parse { .. }) => {
                use std::error::Error;
                assert!(err.source().is_some());
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_validation_runs_after_parse() {
        let err = OpenApiDocument::from_str(
            "info: {title: T, version: '1'}\npaths: {}\n",
            DocumentFormat::Yaml,
        )
        .unwrap_err();
        assert_eq!(err.field(), Some("openapi"));
    }

    #[test]
    fn test_bad_section_shape_is_validation_error() {
        let err = OpenApiDocument::from_str(
            r#"
openapi: 3.0.0
info: {title: T, version: "1"}
paths:
  /a:
    get:
      parameters: 12
"#,
            DocumentFormat::Yaml,
        )
        .unwrap_err();
        assert_eq!(err.field(), Some("paths"));
    }
}
