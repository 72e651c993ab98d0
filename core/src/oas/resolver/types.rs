#![deny(missing_docs)]

//! # Type Mapping
//!
//! Maps OpenAPI schema nodes to TypeScript type strings.
//!
//! Precedence:
//! 1. `$ref` -> the referenced schema's name.
//! 2. `enum` -> union of its literals.
//! 3. declared kind: `string` (`Date` for `date`/`date-time`), `number`,
//!    `boolean`, `T[]`, `object`, or the untyped fallback.
//!
//! Nullable nodes get a `| null` union unless they are enums or arrays.

use crate::oas::document::{SchemaKind, SchemaNode};
use crate::oas::refs::display_name;
use serde_json::Value;

/// Fallback type for unknown or missing kinds.
pub const UNTYPED: &str = "any";
/// Target type for `date` / `date-time` strings.
pub const DATE_TYPE: &str = "Date";
/// Suffix marking array types.
pub const ARRAY_SUFFIX: &str = "[]";
/// Suffix appended to nullable types.
pub const NULL_UNION: &str = " | null";

/// Maps a schema node to its target type string.
pub fn map_schema_type(node: &SchemaNode) -> String {
    if let Some(reference) = &node.reference {
        return with_null(display_name(reference), node);
    }

    if let Some(values) = node.enum_values() {
        return literal_union(values);
    }

    match node.kind() {
        SchemaKind::Array => array_of(node.items.as_deref()),
        kind => with_null(map_kind(kind, node.format.as_deref()).to_string(), node),
    }
}

/// Maps a bare kind (with optional format) to its target primitive.
pub fn map_kind(kind: SchemaKind, format: Option<&str>) -> &'static str {
    match kind {
        SchemaKind::String if is_date_format(format) => DATE_TYPE,
        SchemaKind::String => "string",
        SchemaKind::Number | SchemaKind::Integer => "number",
        SchemaKind::Boolean => "boolean",
        SchemaKind::Object => "object",
        SchemaKind::Array => "any[]",
        SchemaKind::Reference | SchemaKind::Unknown => UNTYPED,
    }
}

/// True for the `date` and `date-time` formats.
pub fn is_date_format(format: Option<&str>) -> bool {
    matches!(format, Some("date") | Some("date-time"))
}

/// Renders an enum literal: strings quoted, everything else verbatim.
pub fn render_literal(value: &Value) -> String {
    // serde_json quotes and escapes strings and prints other scalars as-is.
    serde_json::to_string(value).unwrap_or_else(|_| value.to_string())
}

/// Joins literals into a union type, e.g. `"ADMIN" | "USER"`.
pub fn literal_union(values: &[Value]) -> String {
    values
        .iter()
        .map(render_literal)
        .collect::<Vec<_>>()
        .join(" | ")
}

/// Appends the array suffix, parenthesizing union item types.
pub fn array_type(item: &str) -> String {
    if item.contains(" | ") {
        format!("({}){}", item, ARRAY_SUFFIX)
    } else {
        format!("{}{}", item, ARRAY_SUFFIX)
    }
}

fn array_of(items: Option<&SchemaNode>) -> String {
    match items {
        Some(items) => array_type(&map_schema_type(items)),
        None => format!("{}{}", UNTYPED, ARRAY_SUFFIX),
    }
}

fn with_null(ty: String, node: &SchemaNode) -> String {
    if node.is_nullable() {
        format!("{}{}", ty, NULL_UNION)
    } else {
        ty
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(yaml: &str) -> String {
        let node: SchemaNode = serde_yaml::from_str(yaml).unwrap();
        map_schema_type(&node)
    }

    #[test]
    fn test_map_primitives() {
        assert_eq!(map("type: string"), "string");
        assert_eq!(map("type: integer"), "number");
        assert_eq!(map("type: number"), "number");
        assert_eq!(map("type: boolean"), "boolean");
        assert_eq!(map("type: object"), "object");
        assert_eq!(map("description: nothing"), "any");
        assert_eq!(map("type: file"), "any");
    }

    #[test]
    fn test_map_dates() {
        assert_eq!(map("{type: string, format: date}"), "Date");
        assert_eq!(map("{type: string, format: date-time}"), "Date");
        assert_eq!(map("{type: string, format: email}"), "string");
    }

    #[test]
    fn test_reference_wins_over_everything() {
        assert_eq!(
            map("{$ref: '#/components/schemas/Address', type: string, enum: [a]}"),
            "Address"
        );
    }

    #[test]
    fn test_enum_union() {
        assert_eq!(map("{type: string, enum: [ADMIN, USER]}"), r#""ADMIN" | "USER""#);
        assert_eq!(map("{type: integer, enum: [1, 2, 3]}"), "1 | 2 | 3");
        // enums never get the null union
        assert_eq!(map("{type: string, nullable: true, enum: [a]}"), r#""a""#);
    }

    #[test]
    fn test_arrays() {
        assert_eq!(map("{type: array, items: {type: string}}"), "string[]");
        assert_eq!(map("{type: array}"), "any[]");
        assert_eq!(
            map("{type: array, items: {type: array, items: {type: integer}}}"),
            "number[][]"
        );
        assert_eq!(
            map("{type: array, items: {type: string, enum: [x, y]}}"),
            r#"("x" | "y")[]"#
        );
        assert_eq!(
            map("{type: array, items: {$ref: '#/components/schemas/Tag'}}"),
            "Tag[]"
        );
    }

    #[test]
    fn test_nullable() {
        assert_eq!(map("{type: string, nullable: true}"), "string | null");
        assert_eq!(map("{type: [integer, 'null']}"), "number | null");
        // arrays keep the bare suffix
        assert_eq!(
            map("{type: array, nullable: true, items: {type: string}}"),
            "string[]"
        );
    }

    #[test]
    fn test_array_items_nullable_parenthesized() {
        assert_eq!(
            map("{type: array, items: {type: string, nullable: true}}"),
            "(string | null)[]"
        );
    }
}
