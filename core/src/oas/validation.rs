#![deny(missing_docs)]

//! # OpenAPI Validation
//!
//! Enforces the minimal structural contract of an OpenAPI 3.x document on the
//! raw parsed value, before it is converted into the typed model:
//!
//! - the root is a key-value object (not an array or scalar);
//! - `openapi` is a string starting with `3.`;
//! - `info` is an object with string `title` and `version`;
//! - `paths` is an object (possibly empty).

use crate::error::{AppError, AppResult};
use serde_json::{Map, Value};

/// Validates required root-level fields for an OpenAPI document.
pub fn validate_openapi_root(doc: &Value) -> AppResult<()> {
    let root = doc
        .as_object()
        .ok_or_else(|| AppError::validation("document", "is not a key-value object"))?;

    validate_version(root)?;
    validate_info(root)?;

    match root.get("paths") {
        Some(Value::Object(_)) => Ok(()),
        Some(_) => Err(AppError::validation("paths", "must be an object")),
        None => Err(AppError::validation("paths", "is missing")),
    }
}

fn validate_version(root: &Map<String, Value>) -> AppResult<()> {
    match root.get("openapi") {
        None => Err(AppError::validation("openapi", "is missing")),
        Some(Value::String(v)) if v.starts_with("3.") => Ok(()),
        Some(Value::String(v)) => Err(AppError::validation(
            "openapi",
            format!("must be a 3.x version, found '{}'", v),
        )),
        Some(_) => Err(AppError::validation("openapi", "must be a string")),
    }
}

fn validate_info(root: &Map<String, Value>) -> AppResult<()> {
    let info = match root.get("info") {
        Some(Value::Object(info)) => info,
        Some(_) => return Err(AppError::validation("info", "must be an object")),
        None => return Err(AppError::validation("info", "is missing")),
    };

    for key in ["title", "version"] {
        match info.get(key) {
            Some(Value::String(_)) => {}
            Some(_) => {
                return Err(AppError::validation(
                    format!("info.{}", key),
                    "must be a string",
                ))
            }
            None => return Err(AppError::validation(format!("info.{}", key), "is missing")),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn field_of(doc: Value) -> String {
        validate_openapi_root(&doc)
            .unwrap_err()
            .field()
            .unwrap()
            .to_string()
    }

    #[test]
    fn test_minimal_document_passes() {
        let doc = json!({
            "openapi": "3.0.3",
            "info": {"title": "T", "version": "1"},
            "paths": {}
        });
        assert!(validate_openapi_root(&doc).is_ok());
    }

    #[test]
    fn test_root_must_be_object() {
        assert_eq!(field_of(json!([1, 2])), "document");
        assert_eq!(field_of(json!("openapi")), "document");
    }

    #[test]
    fn test_missing_openapi_is_named() {
        let doc = json!({"info": {"title": "T", "version": "1"}, "paths": {}});
        assert_eq!(field_of(doc), "openapi");
    }

    #[test]
    fn test_swagger_two_rejected() {
        let doc = json!({"openapi": "2.0", "info": {"title": "T", "version": "1"}, "paths": {}});
        let err = validate_openapi_root(&doc).unwrap_err();
        assert!(err.to_string().contains("3.x"));
    }

    #[test]
    fn test_info_fields() {
        let doc = json!({"openapi": "3.1.0", "paths": {}});
        assert_eq!(field_of(doc), "info");

        let doc = json!({"openapi": "3.1.0", "info": {"version": "1"}, "paths": {}});
        assert_eq!(field_of(doc), "info.title");

        let doc = json!({"openapi": "3.1.0", "info": {"title": "T", "version": 1.0}, "paths": {}});
        assert_eq!(field_of(doc), "info.version");
    }

    #[test]
    fn test_paths_required_and_object() {
        let doc = json!({"openapi": "3.1.0", "info": {"title": "T", "version": "1"}});
        assert_eq!(field_of(doc), "paths");

        let doc = json!({"openapi": "3.1.0", "info": {"title": "T", "version": "1"}, "paths": []});
        assert_eq!(field_of(doc), "paths");
    }
}
