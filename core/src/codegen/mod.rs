#![deny(missing_docs)]

//! # Code Generation Module
//!
//! Pure emitters turning the canonical records into TypeScript source text.
//! Nothing here touches the file system or keeps state between calls.
//!
//! - **naming**: identifiers derived from verbs, routes and schema names.
//! - **entity**: entity classes/interfaces and their index.
//! - **router**: module routers and the aggregate router.
//! - **controller**: request handlers.
//! - **service**: service stubs and body types.
//! - **schema**: zod request schemas.

pub mod controller;
pub mod entity;
pub mod naming;
pub mod router;
pub mod schema;
pub mod service;

pub use controller::generate_module_controller;
pub use entity::{generate_entities_code, generate_entities_index, generate_entity_code};
pub use naming::{handler_name, module_handlers, route_name, Handler};
pub use router::{generate_main_router, generate_module_router};
pub use schema::generate_module_schemas;
pub use service::generate_module_service;
