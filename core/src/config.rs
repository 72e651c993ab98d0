#![deny(missing_docs)]

//! # Generator Configuration
//!
//! Options handed in by the orchestration layer. Every field has a default,
//! so an empty JSON/YAML object is a valid configuration.
//!
//! ```
//! use scaffold_core::config::{ExportType, GeneratorOptions};
//!
//! let opts: GeneratorOptions =
//!     serde_json::from_str(r#"{"entities": {"exportType": "default"}}"#).unwrap();
//! assert_eq!(opts.entities.export_type, ExportType::Default);
//! assert!(opts.entities.use_classes);
//! ```

use crate::error::AppResult;
use crate::oas::loader::read_structured;
use crate::oas::routes::DEFAULT_BEARER_SCHEME;
use serde::Deserialize;
use std::path::Path;

/// Top-level options for one generation run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GeneratorOptions {
    /// Entity emission options.
    pub entities: EntityOptions,
    /// Which file families to emit.
    pub artifacts: Artifacts,
    /// What to do with entity property references that do not resolve.
    pub unresolved_entity_refs: RefPolicy,
    /// Scheme name treated as bearer when the document declares no security schemes.
    pub bearer_scheme: String,
    /// Extension appended to every emitted path, without the dot.
    pub file_extension: String,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            entities: EntityOptions::default(),
            artifacts: Artifacts::default(),
            unresolved_entity_refs: RefPolicy::default(),
            bearer_scheme: DEFAULT_BEARER_SCHEME.to_string(),
            file_extension: "ts".to_string(),
        }
    }
}

impl GeneratorOptions {
    /// Loads options from a `.json`, `.yaml` or `.yml` file.
    pub fn from_path(path: impl AsRef<Path>) -> AppResult<Self> {
        read_structured(path.as_ref())
    }

    /// Appends the configured extension to a path stem.
    pub fn file_name(&self, stem: &str) -> String {
        if self.file_extension.is_empty() {
            stem.to_string()
        } else {
            format!("{}.{}", stem, self.file_extension)
        }
    }
}

/// Entity emission options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EntityOptions {
    /// Emit `class` declarations instead of `interface`.
    pub use_classes: bool,
    /// Attach `class-validator` decorators (class form only).
    pub include_validation: bool,
    /// Attach TypeORM decorators (class form only).
    pub include_type_orm: bool,
    /// Export form of each declaration.
    pub export_type: ExportType,
}

impl Default for EntityOptions {
    fn default() -> Self {
        Self {
            use_classes: true,
            include_validation: false,
            include_type_orm: false,
            export_type: ExportType::Named,
        }
    }
}

/// `export class X` vs `export default class X`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportType {
    /// `export class X`
    #[default]
    Named,
    /// `export default class X`
    Default,
}

/// File families to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Artifacts {
    /// `<module>/index.routes` and the aggregate `routes` file.
    pub routes: bool,
    /// `<module>/controllers/<module>.controller`.
    pub controllers: bool,
    /// `<module>/services/<module>.service`.
    pub services: bool,
    /// `<module>/schemas/<module>.schema`.
    pub schemas: bool,
    /// `<entity>.entity` files and the aggregate `index`.
    pub entities: bool,
}

impl Default for Artifacts {
    fn default() -> Self {
        Self {
            routes: true,
            controllers: true,
            services: true,
            schemas: true,
            entities: true,
        }
    }
}

/// Policy for entity property `$ref`s that do not resolve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RefPolicy {
    /// Fail extraction with `UnresolvedReference`.
    #[default]
    Error,
    /// Type the property as `any` and log a warning.
    Untyped,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let opts = GeneratorOptions::default();
        assert!(opts.entities.use_classes);
        assert!(!opts.entities.include_validation);
        assert!(!opts.entities.include_type_orm);
        assert_eq!(opts.entities.export_type, ExportType::Named);
        assert!(opts.artifacts.routes && opts.artifacts.entities);
        assert_eq!(opts.unresolved_entity_refs, RefPolicy::Error);
        assert_eq!(opts.bearer_scheme, "bearerAuth");
        assert_eq!(opts.file_name("users/index.routes"), "users/index.routes.ts");
    }

    #[test]
    fn test_partial_yaml() {
        let opts: GeneratorOptions = serde_yaml::from_str(
            r#"
entities:
  useClasses: false
  includeValidation: true
artifacts:
  services: false
unresolvedEntityRefs: untyped
fileExtension: ""
"#,
        )
        .unwrap();
        assert!(!opts.entities.use_classes);
        assert!(opts.entities.include_validation);
        assert!(!opts.artifacts.services);
        assert!(opts.artifacts.controllers);
        assert_eq!(opts.unresolved_entity_refs, RefPolicy::Untyped);
        assert_eq!(opts.file_name("index"), "index");
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"bearerScheme": "jwt"}}"#).unwrap();
        let opts = GeneratorOptions::from_path(file.path()).unwrap();
        assert_eq!(opts.bearer_scheme, "jwt");

        let toml = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        assert!(matches!(
            GeneratorOptions::from_path(toml.path()),
            Err(AppError::UnsupportedFormat { .. })
        ));
    }
}
