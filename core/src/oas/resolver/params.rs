#![deny(missing_docs)]

//! # Parameter Resolution
//!
//! Maps OpenAPI Parameter objects (inline or `#/components/parameters/..`)
//! onto the canonical [`Parameter`] shape.

use crate::error::{AppError, AppResult};
use crate::oas::document::{OpenApiDocument, ParameterObject, RefOr, SchemaKind};
use crate::oas::models::Parameter;
use crate::oas::refs::{component_name, PARAMETERS};
use crate::oas::resolver::types::map_schema_type;

/// Resolves an operation's parameter list, preserving order.
///
/// A parameter reference that does not resolve is an error: unlike request
/// bodies, a dropped parameter silently changes the handler signature.
pub fn resolve_parameters(
    params: &[RefOr<ParameterObject>],
    doc: &OpenApiDocument,
    context: &str,
) -> AppResult<Vec<Parameter>> {
    params
        .iter()
        .map(|p| match p {
            RefOr::Item(param) => Ok(map_parameter(param)),
            RefOr::Ref { reference } => component_name(reference, PARAMETERS)
                .and_then(|name| doc.components.parameters.get(&name))
                .map(map_parameter)
                .ok_or_else(|| AppError::UnresolvedReference {
                    reference: reference.clone(),
                    context: context.to_string(),
                }),
        })
        .collect()
}

/// Maps a single parameter.
///
/// The type defaults to `string` when the schema (or its `type`) is missing,
/// and `required` defaults to `false`.
pub fn map_parameter(param: &ParameterObject) -> Parameter {
    let schema = param.schema.as_ref().filter(|s| s.kind() != SchemaKind::Unknown);
    let Some(schema) = schema else {
        return Parameter {
            name: param.name.clone(),
            location: param.location,
            kind: SchemaKind::String,
            ty: "string".to_string(),
            item_kind: None,
            literals: Vec::new(),
            required: param.required.unwrap_or(false),
        };
    };

    let items = schema.items.as_deref();
    Parameter {
        name: param.name.clone(),
        location: param.location,
        kind: schema.kind(),
        ty: map_schema_type(schema),
        item_kind: items.map(|i| i.kind()),
        literals: schema
            .enum_values()
            .or_else(|| items.and_then(|i| i.enum_values()))
            .map(<[_]>::to_vec)
            .unwrap_or_default(),
        required: param.required.unwrap_or(false),
    }
}
