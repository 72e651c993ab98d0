#![deny(missing_docs)]

//! # OpenAPI Front End
//!
//! - **document**: typed, insertion-ordered document model.
//! - **loader**: file reading, extension dispatch and parsing.
//! - **validation**: the minimal OpenAPI 3.x structural contract.
//! - **refs**: `$ref` pointer handling.
//! - **models**: Canonical Intermediate Representation.
//! - **resolver**: schema type mapping, request bodies and parameters.
//! - **routes**: module and route extraction.
//! - **entities**: entity extraction.

pub mod document;
pub mod entities;
pub mod loader;
pub mod models;
pub mod refs;
pub mod resolver;
pub mod routes;
pub mod validation;

pub use document::{HttpMethod, OpenApiDocument, ParamLocation, SchemaKind, SchemaNode};
pub use entities::{extract_entities, find_entity, list_entity_names, ENTITY_SUFFIX};
pub use loader::{load_document, DocumentFormat};
pub use models::{
    EntityProperty, EntitySchema, Method, ModuleRoutes, Parameter, RequestBody, Route,
};
pub use resolver::{flatten_request_body, map_schema_type};
pub use routes::{
    discover_modules, extract_module_routes, extract_module_routes_with, translate_path_template,
};
