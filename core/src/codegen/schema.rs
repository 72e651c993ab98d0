#![deny(missing_docs)]

//! # Request Schema Emitter
//!
//! Generates `<module>/schemas/<module>.schema`: one zod schema per handler
//! plus the matching `FastifyRequest` type.
//!
//! ```text
//! export const getUsersIdSchema = {
//!   schema: {
//!     params: z.object({
//!       id: z.coerce.number(),
//!     }),
//!   },
//! };
//! export type GetUsersIdSchema = {
//!   Params: z.infer<typeof getUsersIdSchema.schema.params>;
//! };
//! ```
//!
//! Path and query values arrive as strings, so their numbers and booleans
//! are coerced. Body values are parsed JSON and are not.

use crate::codegen::naming::{property_key, Handler};
use crate::oas::document::{ParamLocation, SchemaKind};
use crate::oas::models::{Parameter, RequestBody};
use crate::oas::resolver::render_literal;
use crate::oas::resolver::types::DATE_TYPE;
use serde_json::Value;

const INDENT: &str = "  ";

/// Generates the schema file for one module.
pub fn generate_module_schemas(handlers: &[Handler<'_>]) -> String {
    let mut code = String::from("import z from \"zod\";\n");

    for handler in handlers {
        code.push('\n');
        code.push_str(&handler_schema(handler));
    }

    code
}

/// Generates the schema constant and request type of one handler.
pub fn handler_schema(handler: &Handler<'_>) -> String {
    let method = handler.method;
    let constant = handler.schema_const();
    // (zod key, Fastify generic, schema)
    let mut parts: Vec<(&str, &str, String)> = Vec::new();

    let path: Vec<_> = method.params_in(ParamLocation::Path).collect();
    if !path.is_empty() {
        parts.push(("params", "Params", params_object(&path, 3)));
    }
    let query: Vec<_> = method.params_in(ParamLocation::Query).collect();
    if !query.is_empty() {
        parts.push(("querystring", "Querystring", params_object(&query, 3)));
    }
    if let Some(body) = &method.request_body {
        parts.push(("body", "Body", body_schema(body, 2)));
    }

    let mut code = format!("export const {} = {{\n", constant);
    if parts.is_empty() {
        code.push_str("  schema: {},\n");
    } else {
        code.push_str("  schema: {\n");
        for (key, _, schema) in &parts {
            code.push_str(&format!("    {}: {},\n", key, schema));
        }
        code.push_str("  },\n");
    }
    code.push_str("};\n");

    if parts.is_empty() {
        code.push_str(&format!("export type {} = {{}};\n", handler.schema_type()));
    } else {
        code.push_str(&format!("export type {} = {{\n", handler.schema_type()));
        for (key, generic, _) in &parts {
            code.push_str(&format!(
                "  {}: z.infer<typeof {}.schema.{}>;\n",
                generic, constant, key
            ));
        }
        code.push_str("};\n");
    }

    code
}

fn params_object(params: &[&Parameter], depth: usize) -> String {
    let mut code = String::from("z.object({\n");
    for param in params {
        let mut schema = param_schema(param);
        if !param.required {
            schema.push_str(".optional()");
        }
        code.push_str(&format!(
            "{}{}: {},\n",
            INDENT.repeat(depth),
            property_key(&param.name),
            schema
        ));
    }
    code.push_str(&format!("{}}})", INDENT.repeat(depth - 1)));
    code
}

fn param_schema(param: &Parameter) -> String {
    match param.kind {
        SchemaKind::Array => {
            let item = param.item_kind.unwrap_or(SchemaKind::String);
            format!("z.array({})", coerced(item, &param.literals))
        }
        kind => coerced(kind, &param.literals),
    }
}

/// Scalar schema for a value that arrives as a string.
fn coerced(kind: SchemaKind, literals: &[Value]) -> String {
    if !literals.is_empty() {
        return literal_schema(literals);
    }
    match kind {
        SchemaKind::Number => "z.coerce.number()".to_string(),
        SchemaKind::Integer => "z.coerce.number().int()".to_string(),
        SchemaKind::Boolean => "z.coerce.boolean()".to_string(),
        _ => "z.string()".to_string(),
    }
}

/// `z.enum([...])` for string literals, a union of `z.literal` otherwise.
fn literal_schema(literals: &[Value]) -> String {
    let rendered: Vec<String> = literals.iter().map(render_literal).collect();
    if literals.iter().all(Value::is_string) {
        return format!("z.enum([{}])", rendered.join(", "));
    }
    match rendered.as_slice() {
        [single] => format!("z.literal({})", single),
        _ => format!(
            "z.union([{}])",
            rendered
                .iter()
                .map(|l| format!("z.literal({})", l))
                .collect::<Vec<_>>()
                .join(", ")
        ),
    }
}

/// Body schema. `depth` is the indentation level of the line the schema starts on.
fn body_schema(body: &RequestBody, depth: usize) -> String {
    match body {
        RequestBody::Generic {
            ty,
            kind,
            literals,
            nullable,
            ..
        } => {
            let mut schema = if !literals.is_empty() {
                literal_schema(literals)
            } else {
                match kind {
                    SchemaKind::String if ty.starts_with(DATE_TYPE) => {
                        "z.coerce.date()".to_string()
                    }
                    SchemaKind::String => "z.string()".to_string(),
                    SchemaKind::Number => "z.number()".to_string(),
                    SchemaKind::Integer => "z.number().int()".to_string(),
                    SchemaKind::Boolean => "z.boolean()".to_string(),
                    _ => "z.any()".to_string(),
                }
            };
            if *nullable {
                schema.push_str(".nullable()");
            }
            schema
        }
        RequestBody::Object {
            required,
            properties,
            ..
        } => {
            if properties.is_empty() {
                return "z.object({})".to_string();
            }
            let mut code = String::from("z.object({\n");
            for (name, prop) in properties {
                let mut schema = body_schema(prop, depth + 1);
                if !required.contains(name) {
                    schema.push_str(".optional()");
                }
                code.push_str(&format!(
                    "{}{}: {},\n",
                    INDENT.repeat(depth + 1),
                    property_key(name),
                    schema
                ));
            }
            code.push_str(&format!("{}}})", INDENT.repeat(depth)));
            code
        }
        RequestBody::Array { items } => format!("z.array({})", body_schema(items, depth)),
    }
}
