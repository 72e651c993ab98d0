#![deny(missing_docs)]

//! # Scaffold Core
//!
//! OpenAPI 3.x to TypeScript (Fastify + zod + TypeORM) source synthesizer.
//!
//! The front end loads and validates a document and builds a canonical
//! representation of its modules, routes and entities. The back end turns
//! that representation into source text. Nothing is written to disk: a run
//! returns relative paths mapped to file contents.
//!
//! ```no_run
//! use scaffold_core::{generate_from_path, GeneratorOptions};
//!
//! let output = generate_from_path("openapi.yaml", &GeneratorOptions::default())?;
//! for (path, content) in &output.files {
//!     println!("{} ({} bytes)", path, content.len());
//! }
//! # Ok::<(), scaffold_core::AppError>(())
//! ```

/// Shared error types.
pub mod error;

/// Generator configuration.
pub mod config;

/// OpenAPI loading, validation and extraction.
pub mod oas;

/// TypeScript emitters.
pub mod codegen;

/// End-to-end generation pipeline.
pub mod generator;

pub use config::{Artifacts, EntityOptions, ExportType, GeneratorOptions, RefPolicy};
pub use error::{AppError, AppResult};
pub use generator::{generate, generate_from_path, EmitFailure, GeneratedOutput};
pub use oas::{
    extract_entities, extract_module_routes, find_entity, list_entity_names, load_document,
    DocumentFormat, OpenApiDocument,
};
