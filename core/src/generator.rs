#![deny(missing_docs)]

//! # Generator
//!
//! Runs the whole pipeline on one document and returns the generated files
//! in memory, keyed by their path relative to the output root.
//!
//! Document-level failures (load, parse, validation, route and entity
//! extraction) abort the run before any file is produced. Emission failures
//! are local: the module or entity that failed is skipped, the failure is
//! recorded, and everything else is still generated.

use crate::codegen::{
    entity::entity_file_stem, generate_entities_index, generate_entity_code,
    generate_main_router, generate_module_controller, generate_module_router,
    generate_module_schemas, generate_module_service, module_handlers,
    naming::{module_identifier, type_identifier},
};
use crate::config::GeneratorOptions;
use crate::error::{AppError, AppResult};
use crate::oas::document::OpenApiDocument;
use crate::oas::entities::extract_entities;
use crate::oas::loader::load_document;
use crate::oas::models::{EntitySchema, ModuleRoutes};
use crate::oas::routes::extract_module_routes_with;
use indexmap::IndexMap;
use std::path::Path;
use tracing::{debug, info, warn};

/// Stem of the aggregate router file.
pub const MAIN_ROUTER_STEM: &str = "routes";
/// Stem of the aggregate entity index.
pub const ENTITY_INDEX_STEM: &str = "index";

/// An item that could not be emitted.
#[derive(Debug)]
pub struct EmitFailure {
    /// What failed, e.g. `module users` or `entity User`.
    pub item: String,
    /// Why.
    pub error: AppError,
}

/// Files produced by one run, plus the items that failed.
#[derive(Debug, Default)]
pub struct GeneratedOutput {
    /// Relative path to file content, in generation order.
    pub files: IndexMap<String, String>,
    /// Per-item failures that did not abort the run.
    pub failures: Vec<EmitFailure>,
    /// Path to the item that produced it.
    owners: IndexMap<String, String>,
}

impl GeneratedOutput {
    /// True when no item failed.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Content of a generated file.
    pub fn file(&self, path: &str) -> Option<&str> {
        self.files.get(path).map(String::as_str)
    }

    /// Records a failure and logs it.
    fn fail(&mut self, item: impl Into<String>, error: AppError) {
        let item = item.into();
        warn!(item = %item, error = %error, "skipping item");
        self.failures.push(EmitFailure { item, error });
    }

    /// Checks that no other item already emitted `ident`.
    ///
    /// A taken identifier is a `NamingCollision` recorded against `item`.
    fn identifier_free(
        &mut self,
        claimed: &IndexMap<String, String>,
        ident: &str,
        item: &str,
    ) -> bool {
        let Some(first) = claimed.get(ident) else {
            return true;
        };
        let error = AppError::NamingCollision {
            name: ident.to_string(),
            first: first.clone(),
            second: item.to_string(),
        };
        self.fail(item, error);
        false
    }

    /// Claims every path of a batch or none of them.
    ///
    /// A path that is already taken (or repeated within the batch) is a
    /// `NamingCollision` recorded against `item`.
    fn insert_all(&mut self, item: &str, batch: Vec<(String, String)>) -> bool {
        for (i, (path, _)) in batch.iter().enumerate() {
            let first = if batch[..i].iter().any(|(p, _)| p == path) {
                Some(item.to_string())
            } else {
                self.owners.get(path).cloned()
            };
            if let Some(first) = first {
                let error = AppError::NamingCollision {
                    name: path.clone(),
                    first,
                    second: item.to_string(),
                };
                self.fail(item, error);
                return false;
            }
        }
        for (path, content) in batch {
            debug!(path = %path, bytes = content.len(), "emitted file");
            self.owners.insert(path.clone(), item.to_string());
            self.files.insert(path, content);
        }
        true
    }
}

/// Loads the document at `path` and generates from it.
pub fn generate_from_path(
    path: impl AsRef<Path>,
    options: &GeneratorOptions,
) -> AppResult<GeneratedOutput> {
    let doc = load_document(path)?;
    generate(&doc, options)
}

/// Generates every enabled artifact for a validated document.
pub fn generate(doc: &OpenApiDocument, options: &GeneratorOptions) -> AppResult<GeneratedOutput> {
    let artifacts = options.artifacts;
    let module_files =
        artifacts.routes || artifacts.controllers || artifacts.services || artifacts.schemas;

    let modules = if module_files {
        extract_module_routes_with(doc, &options.bearer_scheme)?
    } else {
        Vec::new()
    };
    let entities = if artifacts.entities {
        extract_entities(doc, options.unresolved_entity_refs)?
    } else {
        Vec::new()
    };

    let mut output = GeneratedOutput::default();

    // module identifier -> module that emitted it
    let mut module_idents = IndexMap::new();
    let mut mounted = Vec::new();
    for module in &modules {
        let item = format!("module {}", module.module);
        let ident = module_identifier(&module.module);
        if !output.identifier_free(&module_idents, &ident, &item) {
            continue;
        }
        if emit_module(&mut output, module, options) {
            module_idents.insert(ident, item);
            mounted.push(module.module.clone());
        }
    }
    if artifacts.routes && !modules.is_empty() {
        let path = options.file_name(MAIN_ROUTER_STEM);
        output.insert_all("main router", vec![(path, generate_main_router(&mounted))]);
    }

    if artifacts.entities {
        emit_entities(&mut output, &entities, options);
    }

    info!(
        files = output.files.len(),
        failures = output.failures.len(),
        "generation finished"
    );
    Ok(output)
}

/// Emits the files of one module. Returns false when the module was skipped.
fn emit_module(
    output: &mut GeneratedOutput,
    module: &ModuleRoutes,
    options: &GeneratorOptions,
) -> bool {
    let item = format!("module {}", module.module);
    let name = &module.module;
    let artifacts = options.artifacts;

    let handlers = match module_handlers(module) {
        Ok(handlers) => handlers,
        Err(err) => {
            output.fail(item, err);
            return false;
        }
    };

    let mut batch = Vec::new();
    if artifacts.routes {
        batch.push((
            options.file_name(&format!("{}/index.routes", name)),
            generate_module_router(name, &handlers),
        ));
    }
    if artifacts.controllers {
        batch.push((
            options.file_name(&format!("{0}/controllers/{0}.controller", name)),
            generate_module_controller(name, &handlers),
        ));
    }
    if artifacts.services {
        match generate_module_service(&handlers) {
            Ok(code) => batch.push((
                options.file_name(&format!("{0}/services/{0}.service", name)),
                code,
            )),
            Err(err) => {
                output.fail(item, err);
                return false;
            }
        }
    }
    if artifacts.schemas {
        batch.push((
            options.file_name(&format!("{0}/schemas/{0}.schema", name)),
            generate_module_schemas(&handlers),
        ));
    }

    output.insert_all(&item, batch)
}

fn emit_entities(
    output: &mut GeneratedOutput,
    entities: &[EntitySchema],
    options: &GeneratorOptions,
) {
    let mut idents = IndexMap::new();
    let mut exported = Vec::new();

    for entity in entities {
        let item = format!("entity {}", entity.original_name);
        let ident = type_identifier(&entity.name);
        if !output.identifier_free(&idents, &ident, &item) {
            continue;
        }
        let path = options.file_name(&entity_file_stem(entity));
        let code = generate_entity_code(entity, &options.entities);
        if output.insert_all(&item, vec![(path, code)]) {
            idents.insert(ident, item);
            exported.push(entity.clone());
        }
    }

    if !entities.is_empty() {
        let path = options.file_name(ENTITY_INDEX_STEM);
        let index = generate_entities_index(&exported, options.entities.export_type);
        output.insert_all("entity index", vec![(path, index)]);
    }
}
