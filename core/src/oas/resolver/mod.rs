#![deny(missing_docs)]

//! # Resolver Module
//!
//! Schema Type Mapper and the resolution helpers built on it.
//!
//! - **types**: schema node -> target type string.
//! - **body**: request body flattening into [`RequestBody`](crate::oas::models::RequestBody).
//! - **params**: parameter mapping.

pub mod body;
pub mod params;
pub mod types;

pub use body::{extract_request_body, flatten_request_body, MAX_SCHEMA_DEPTH};
pub use params::{map_parameter, resolve_parameters};
pub use types::{literal_union, map_schema_type, render_literal};
