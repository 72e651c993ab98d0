#![deny(missing_docs)]

//! # Entity Extraction
//!
//! Collects `components.schemas` entries whose name ends with [`ENTITY_SUFFIX`]
//! and flattens their properties into [`EntityProperty`] records.
//!
//! Property flattening never follows a `$ref`: a referenced property is typed
//! by the referenced schema's name. The reference is only checked for
//! resolution, and what happens when it does not resolve is decided by the
//! [`RefPolicy`].

use crate::config::RefPolicy;
use crate::error::{AppError, AppResult};
use crate::oas::document::{OpenApiDocument, SchemaKind, SchemaNode};
use crate::oas::models::{EntityProperty, EntitySchema};
use crate::oas::refs::{component_name, SCHEMAS};
use crate::oas::resolver::map_schema_type;
use crate::oas::resolver::types::{array_type, UNTYPED};
use tracing::{debug, warn};

/// Case-sensitive suffix marking a schema as an entity.
pub const ENTITY_SUFFIX: &str = "Entity";

/// Extracts every entity in `components.schemas` order.
///
/// Stripping a fixed suffix from distinct keys cannot produce duplicates, so
/// the only rejected name is one spelled exactly [`ENTITY_SUFFIX`].
pub fn extract_entities(doc: &OpenApiDocument, policy: RefPolicy) -> AppResult<Vec<EntitySchema>> {
    let mut entities = Vec::new();

    for (original_name, schema) in &doc.components.schemas {
        let Some(name) = original_name.strip_suffix(ENTITY_SUFFIX) else {
            continue;
        };
        if name.is_empty() {
            return Err(AppError::validation(
                format!("components.schemas.{}", original_name),
                "strips to an empty entity name",
            ));
        }

        let properties = flatten_properties(schema, doc, policy, original_name)?;
        entities.push(EntitySchema {
            name: name.to_string(),
            original_name: original_name.clone(),
            properties,
        });
    }

    debug!(count = entities.len(), "extracted entities");
    Ok(entities)
}

/// Original schema names of every entity, in declaration order.
pub fn list_entity_names(doc: &OpenApiDocument, policy: RefPolicy) -> AppResult<Vec<String>> {
    Ok(extract_entities(doc, policy)?
        .into_iter()
        .map(|e| e.original_name)
        .collect())
}

/// Finds the entity whose name or original name equals `name`.
///
/// Returns `Ok(None)` on no match. More than one match (`FooEntity` is the
/// stripped name of `FooEntityEntity` and the original name of another
/// entity) is a collision.
pub fn find_entity(
    doc: &OpenApiDocument,
    name: &str,
    policy: RefPolicy,
) -> AppResult<Option<EntitySchema>> {
    let mut matches = extract_entities(doc, policy)?
        .into_iter()
        .filter(|e| e.name == name || e.original_name == name);

    match (matches.next(), matches.next()) {
        (Some(first), Some(second)) => Err(AppError::NamingCollision {
            name: name.to_string(),
            first: first.original_name,
            second: second.original_name,
        }),
        (found, _) => Ok(found),
    }
}

/// Flattens an object schema's properties, seeded with its own `required` list.
pub fn flatten_properties(
    schema: &SchemaNode,
    doc: &OpenApiDocument,
    policy: RefPolicy,
    owner: &str,
) -> AppResult<Vec<EntityProperty>> {
    schema
        .properties
        .iter()
        .map(|(prop_name, prop)| {
            let context = format!("{}.{}", owner, prop_name);
            flatten_property(prop_name, prop, schema.is_required(prop_name), doc, policy, &context)
        })
        .collect()
}

fn flatten_property(
    name: &str,
    node: &SchemaNode,
    required: bool,
    doc: &OpenApiDocument,
    policy: RefPolicy,
    context: &str,
) -> AppResult<EntityProperty> {
    let kind = node.kind();
    let is_array = kind == SchemaKind::Array;
    let items = node.items.as_deref().filter(|_| is_array);

    let mut ty = map_schema_type(node);
    let mut resolved = None;
    if let Some(reference) = node.reference.as_deref() {
        if check_reference(reference, doc, policy, context)? {
            resolved = component_name(reference, SCHEMAS);
        } else {
            ty = UNTYPED.to_string();
        }
    }
    if let Some(reference) = items.and_then(|i| i.reference.as_deref()) {
        if check_reference(reference, doc, policy, context)? {
            resolved = component_name(reference, SCHEMAS);
        } else {
            ty = array_type(UNTYPED);
        }
    }

    let nested_source = match items {
        Some(items) => items,
        None => node,
    };
    let nested_properties = if nested_source.kind() == SchemaKind::Object {
        flatten_properties(nested_source, doc, policy, context)?
    } else {
        Vec::new()
    };

    let base_kind = match (is_array, items) {
        (true, Some(items)) => items.kind(),
        (true, None) => SchemaKind::Unknown,
        (false, _) => kind,
    };
    let format = node
        .format
        .clone()
        .or_else(|| items.and_then(|i| i.format.clone()));
    let enum_values = node
        .enum_values()
        .or_else(|| items.and_then(|i| i.enum_values()))
        .map(<[_]>::to_vec)
        .unwrap_or_default();

    Ok(EntityProperty {
        name: name.to_string(),
        ty,
        base_kind,
        required,
        nullable: node.is_nullable(),
        format,
        description: node.description.clone(),
        is_array,
        is_object: kind == SchemaKind::Object,
        reference: resolved,
        nested_properties,
        enum_values,
        default: node.default.clone(),
        example: node.example.clone(),
    })
}

/// Returns `Ok(true)` when the reference resolves, `Ok(false)` when it does
/// not and the policy degrades it.
fn check_reference(
    reference: &str,
    doc: &OpenApiDocument,
    policy: RefPolicy,
    context: &str,
) -> AppResult<bool> {
    let resolves = component_name(reference, SCHEMAS).is_some_and(|n| doc.schema(&n).is_some());
    if resolves {
        return Ok(true);
    }
    match policy {
        RefPolicy::Error => Err(AppError::UnresolvedReference {
            reference: reference.to_string(),
            context: context.to_string(),
        }),
        RefPolicy::Untyped => {
            warn!(reference = %reference, property = %context, "unresolved entity reference typed as '{}'", UNTYPED);
            Ok(false)
        }
    }
}
