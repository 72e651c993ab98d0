#![deny(missing_docs)]

//! # Body Resolution
//!
//! Flattens the `application/json` schema of a request body into a
//! [`RequestBody`] tree.
//!
//! Request bodies are optional, so an unresolved top-level reference yields
//! `None` instead of an error. Recursion is bounded twice: a stack of schema
//! names currently being resolved cuts reference cycles (the re-entered
//! reference becomes a `Generic` typed by name when it points back to an
//! object, untyped otherwise), and [`MAX_SCHEMA_DEPTH`] caps inline nesting.

use crate::oas::document::{OpenApiDocument, RefOr, RequestBodyObject, SchemaKind, SchemaNode};
use crate::oas::models::RequestBody;
use crate::oas::refs::{classify, component_name, REQUEST_BODIES, SCHEMAS};
use crate::oas::resolver::types::{map_schema_type, UNTYPED};
use indexmap::IndexMap;
use tracing::{debug, warn};

/// Maximum nesting depth followed while flattening a body.
pub const MAX_SCHEMA_DEPTH: usize = 64;

/// Media type whose schema is used for the body.
pub const JSON_MEDIA_TYPE: &str = "application/json";

/// Resolves an operation's `requestBody` (inline or `#/components/requestBodies/..`).
pub fn extract_request_body(
    body: &RefOr<RequestBodyObject>,
    doc: &OpenApiDocument,
) -> Option<RequestBody> {
    let body = match body {
        RefOr::Item(body) => body,
        RefOr::Ref { reference } => {
            let found = component_name(reference, REQUEST_BODIES)
                .and_then(|name| doc.components.request_bodies.get(&name));
            match found {
                Some(body) => body,
                None => {
                    warn!(reference = %reference, kind = ?classify(reference), "request body reference does not resolve; skipping body");
                    return None;
                }
            }
        }
    };

    let schema = body.content.get(JSON_MEDIA_TYPE)?.schema.as_ref()?;
    flatten_request_body(schema, doc)
}

/// Flattens a schema node into a request body tree.
pub fn flatten_request_body(node: &SchemaNode, doc: &OpenApiDocument) -> Option<RequestBody> {
    let mut resolving = Vec::new();
    flatten(node, doc, &mut resolving, 0, None)
}

/// Name and `$ref` of the schema an object was resolved from.
struct Origin {
    name: String,
    reference: String,
}

fn flatten(
    node: &SchemaNode,
    doc: &OpenApiDocument,
    resolving: &mut Vec<String>,
    depth: usize,
    origin: Option<Origin>,
) -> Option<RequestBody> {
    if depth > MAX_SCHEMA_DEPTH {
        warn!(depth, "request body nesting exceeds limit; truncating");
        return Some(untyped(node.description.clone()));
    }

    if let Some(reference) = &node.reference {
        let Some(name) = component_name(reference, SCHEMAS) else {
            warn!(reference = %reference, kind = ?classify(reference), "unresolved request body reference");
            return None;
        };
        let Some(target) = doc.schema(&name) else {
            warn!(reference = %reference, "request body reference names a missing schema");
            return None;
        };

        if resolving.contains(&name) {
            // Only named objects get a declaration to point back to.
            if target.kind() != SchemaKind::Object {
                warn!(schema = %name, "recursive non-object request body schema typed as '{}'", UNTYPED);
                return Some(untyped(node.description.clone()));
            }
            debug!(schema = %name, "recursive request body reference cut at re-entry");
            return Some(RequestBody::Generic {
                ty: name,
                kind: SchemaKind::Reference,
                literals: Vec::new(),
                nullable: node.is_nullable(),
                description: node.description.clone(),
            });
        }

        resolving.push(name.clone());
        let origin = Origin {
            name,
            reference: reference.clone(),
        };
        let body = flatten(target, doc, resolving, depth + 1, Some(origin));
        resolving.pop();
        return body;
    }

    let body = match node.kind() {
        SchemaKind::Object => {
            let mut properties = IndexMap::new();
            for (prop_name, prop) in &node.properties {
                // Nested references are not optional: degrade to untyped.
                let flattened = flatten(prop, doc, resolving, depth + 1, None)
                    .unwrap_or_else(|| untyped(prop.description.clone()));
                properties.insert(prop_name.clone(), flattened);
            }
            let (name, source_ref) = match origin {
                Some(o) => (Some(o.name), Some(o.reference)),
                None => (None, None),
            };
            RequestBody::Object {
                name,
                required: node.required.clone(),
                properties,
                source_ref,
            }
        }
        SchemaKind::Array => {
            let items = node
                .items
                .as_deref()
                .and_then(|items| flatten(items, doc, resolving, depth + 1, None))
                .unwrap_or_else(|| untyped(None));
            RequestBody::Array {
                items: Box::new(items),
            }
        }
        kind => RequestBody::Generic {
            ty: map_schema_type(node),
            kind,
            literals: node.enum_values().map(<[_]>::to_vec).unwrap_or_default(),
            nullable: node.is_nullable(),
            description: node.description.clone(),
        },
    };
    Some(body)
}

fn untyped(description: Option<String>) -> RequestBody {
    RequestBody::Generic {
        ty: UNTYPED.to_string(),
        kind: SchemaKind::Unknown,
        literals: Vec::new(),
        nullable: false,
        description,
    }
}
