#![deny(missing_docs)]

//! # OpenAPI Models
//!
//! Canonical Intermediate Representation (IR) built from a validated document.
//!
//! These structs transport parsed data from the document into the emitters.
//! They are independent of any output syntax and are rebuilt on every run.

use crate::oas::document::{HttpMethod, ParamLocation, SchemaKind};
use indexmap::IndexMap;
use serde_json::Value;

/// A parameter bound to one operation.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    /// Parameter name.
    pub name: String,
    /// Where the parameter is read from.
    pub location: ParamLocation,
    /// Declared kind (`String` when the schema does not say).
    pub kind: SchemaKind,
    /// Mapped target type (e.g. `number`, `string[]`).
    pub ty: String,
    /// Element kind for array parameters.
    pub item_kind: Option<SchemaKind>,
    /// Enum literals, when declared.
    pub literals: Vec<Value>,
    /// Whether the parameter is mandatory (defaults to `false`).
    pub required: bool,
}

/// Flattened request body.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// A leaf value (primitive, enum, untyped, or a reference cut short by a cycle).
    Generic {
        /// Mapped target type.
        ty: String,
        /// Declared kind of the leaf.
        kind: SchemaKind,
        /// Enum literals, when declared.
        literals: Vec<Value>,
        /// Declared nullable.
        nullable: bool,
        /// Description.
        description: Option<String>,
    },
    /// An object with named properties.
    Object {
        /// Schema name when the object came from a `$ref`.
        name: Option<String>,
        /// Required property names.
        required: Vec<String>,
        /// Properties in declaration order.
        properties: IndexMap<String, RequestBody>,
        /// The `$ref` this object was resolved from.
        source_ref: Option<String>,
    },
    /// A list of items.
    Array {
        /// Item shape.
        items: Box<RequestBody>,
    },
}

impl RequestBody {
    /// Schema name of a referenced object body.
    pub fn name(&self) -> Option<&str> {
        match self {
            RequestBody::Object { name, .. } => name.as_deref(),
            _ => None,
        }
    }
}

/// One HTTP verb declared on a path.
#[derive(Debug, Clone, PartialEq)]
pub struct Method {
    /// The verb.
    pub verb: HttpMethod,
    /// Parameters in declaration order.
    pub parameters: Vec<Parameter>,
    /// Resolved `application/json` body, if any.
    pub request_body: Option<RequestBody>,
    /// True when a security requirement names the bearer scheme.
    pub requires_auth: bool,
}

impl Method {
    /// Parameters read from the given location.
    pub fn params_in(&self, location: ParamLocation) -> impl Iterator<Item = &Parameter> {
        self.parameters
            .iter()
            .filter(move |p| p.location == location)
    }

    /// True when at least one path parameter is declared.
    pub fn has_path_params(&self) -> bool {
        self.params_in(ParamLocation::Path).next().is_some()
    }

    /// True when at least one query parameter is declared.
    pub fn has_query_params(&self) -> bool {
        self.params_in(ParamLocation::Query).next().is_some()
    }
}

/// A path with its methods.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    /// Translated template, e.g. `/users/:id`.
    pub route: String,
    /// The untouched document key, e.g. `/users/{id}`.
    pub source_path: String,
    /// One entry per declared verb, in document order.
    pub methods: Vec<Method>,
}

/// Routes grouped under their first path segment.
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleRoutes {
    /// Module name (first path segment).
    pub module: String,
    /// Routes in document order.
    pub routes: Vec<Route>,
}

/// Flattened projection of one schema property.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityProperty {
    /// Property name, unique within its level.
    pub name: String,
    /// Mapped target type.
    pub ty: String,
    /// Kind of the value, or of each element for arrays.
    pub base_kind: SchemaKind,
    /// Listed in the owner's `required`.
    pub required: bool,
    /// Declared nullable.
    pub nullable: bool,
    /// Format hint (taken from `items` for arrays when absent).
    pub format: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// `type: array`.
    pub is_array: bool,
    /// `type: object`.
    pub is_object: bool,
    /// Schema referenced by the value (or by each element), when it resolves.
    pub reference: Option<String>,
    /// Inline object properties (objects or arrays of objects).
    pub nested_properties: Vec<EntityProperty>,
    /// Enum literals (taken from `items` for arrays when absent).
    pub enum_values: Vec<Value>,
    /// Default value.
    pub default: Option<Value>,
    /// Example value.
    pub example: Option<Value>,
}

/// An entity extracted from `components.schemas`.
#[derive(Debug, Clone, PartialEq)]
pub struct EntitySchema {
    /// Schema name without the entity suffix.
    pub name: String,
    /// Schema name as declared.
    pub original_name: String,
    /// Properties in declaration order.
    pub properties: Vec<EntityProperty>,
}
