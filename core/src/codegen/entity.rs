#![deny(missing_docs)]

//! # Entity Emitter
//!
//! Generates one TypeScript declaration per [`EntitySchema`], as a class or
//! an interface, optionally decorated with TypeORM and `class-validator`
//! annotations.
//!
//! Per property, output order is: doc comment, persistence decorator,
//! validation decorators, declaration. Decorators are only legal on class
//! members, so they are never emitted in interface form.
//!
//! Referenced entities are imported type-only under their original schema
//! name, which is how property types spell them.

use crate::codegen::naming::{property_key, type_identifier};
use crate::config::{EntityOptions, ExportType};
use crate::oas::document::SchemaKind;
use crate::oas::entities::ENTITY_SUFFIX;
use crate::oas::models::{EntityProperty, EntitySchema};
use crate::oas::resolver::render_literal;
use crate::oas::resolver::types::{array_type, NULL_UNION};
use serde_json::Value;

const INDENT: &str = "  ";

/// Primary key property name.
pub const PRIMARY_KEY: &str = "id";

/// TypeORM decorators, in import order.
const TYPEORM_DECORATORS: [&str; 3] = ["Entity", "PrimaryGeneratedColumn", "Column"];

/// `class-validator` decorators, in import order.
const VALIDATION_DECORATORS: [&str; 9] = [
    "IsNotEmpty",
    "IsOptional",
    "IsString",
    "IsNumber",
    "IsBoolean",
    "IsEmail",
    "IsDate",
    "IsArray",
    "IsEnum",
];

/// Generates the source of one entity.
pub fn generate_entity_code(entity: &EntitySchema, options: &EntityOptions) -> String {
    let decorate = options.use_classes;
    let type_orm = decorate && options.include_type_orm;
    let validation = decorate && options.include_validation;
    let name = type_identifier(&entity.name);

    let members: Vec<String> = entity
        .properties
        .iter()
        .map(|p| property_block(p, type_orm, validation))
        .collect();

    let mut referenced = Vec::new();
    referenced_entities(&entity.properties, &mut referenced);
    let self_referenced = referenced.contains(&entity.original_name.as_str());
    referenced.retain(|r| *r != entity.original_name);

    let mut code = String::new();
    let mut header = imports(&members, type_orm, validation);
    header.push_str(&entity_imports(&referenced, options.export_type));
    if !header.is_empty() {
        code.push_str(&header);
        code.push('\n');
    }
    if self_referenced {
        code.push_str(&format!("type {} = {};\n\n", entity.original_name, name));
    }

    if type_orm {
        code.push_str(&format!(
            "@Entity(\"{}s\")\n",
            entity.name.to_lowercase()
        ));
    }
    let keyword = if options.use_classes {
        "class"
    } else {
        "interface"
    };
    let export = match options.export_type {
        ExportType::Named => "export",
        ExportType::Default => "export default",
    };
    code.push_str(&format!("{} {} {} {{\n", export, keyword, name));
    code.push_str(&members.join("\n"));
    code.push_str("}\n");

    code
}

/// Generates every entity as `(file name stem, source)` pairs, in order.
///
/// The stem is the lowercased entity name followed by `.entity`.
pub fn generate_entities_code(
    entities: &[EntitySchema],
    options: &EntityOptions,
) -> Vec<(String, String)> {
    entities
        .iter()
        .map(|e| (entity_file_stem(e), generate_entity_code(e, options)))
        .collect()
}

/// `user.entity` for entity `User`.
pub fn entity_file_stem(entity: &EntitySchema) -> String {
    file_stem(&entity.name)
}

fn file_stem(name: &str) -> String {
    format!("{}.entity", name.to_lowercase())
}

/// Original names of the entities referenced at any nesting level, in
/// first-use order.
fn referenced_entities<'a>(properties: &'a [EntityProperty], found: &mut Vec<&'a str>) {
    for property in properties {
        if let Some(reference) = property.reference.as_deref() {
            let is_entity = reference
                .strip_suffix(ENTITY_SUFFIX)
                .is_some_and(|name| !name.is_empty());
            if is_entity && !found.contains(&reference) {
                found.push(reference);
            }
        }
        referenced_entities(&property.nested_properties, found);
    }
}

/// Type-only imports of other entities, bound to the original schema name
/// that property types use.
fn entity_imports(referenced: &[&str], export_type: ExportType) -> String {
    let mut code = String::new();
    for &original in referenced {
        let name = original.strip_suffix(ENTITY_SUFFIX).unwrap_or(original);
        let binding = match export_type {
            ExportType::Named => format!("{{ {} as {} }}", type_identifier(name), original),
            ExportType::Default => original.to_string(),
        };
        code.push_str(&format!(
            "import type {} from \"./{}\";\n",
            binding,
            file_stem(name)
        ));
    }
    code
}

/// Generates the aggregate index re-exporting every entity.
pub fn generate_entities_index(entities: &[EntitySchema], export_type: ExportType) -> String {
    let mut code = String::new();
    for entity in entities {
        let name = type_identifier(&entity.name);
        let spec = match export_type {
            ExportType::Named => name,
            ExportType::Default => format!("default as {}", name),
        };
        code.push_str(&format!(
            "export {{ {} }} from \"./{}\";\n",
            spec,
            entity_file_stem(entity)
        ));
    }
    code
}

/// Doc comment, decorators and declaration of one property.
fn property_block(property: &EntityProperty, type_orm: bool, validation: bool) -> String {
    let mut code = String::new();

    if let Some(description) = &property.description {
        code.push_str(&format!("{}/**\n", INDENT));
        for line in description.lines() {
            code.push_str(&format!("{} * {}\n", INDENT, line.replace("*/", "*\\/")));
        }
        code.push_str(&format!("{} */\n", INDENT));
    }

    if type_orm {
        code.push_str(&format!("{}{}\n", INDENT, column_decorator(property)));
    }
    if validation {
        for decorator in validation_decorators(property) {
            code.push_str(&format!("{}{}\n", INDENT, decorator));
        }
    }

    let optional = if property.required { "" } else { "?" };
    code.push_str(&format!(
        "{}{}{}: {};\n",
        INDENT,
        property_key(&property.name),
        optional,
        property_type(property, 1)
    ));
    code
}

/// Declared type of a property; inline objects render as type literals.
fn property_type(property: &EntityProperty, depth: usize) -> String {
    if property.nested_properties.is_empty() {
        return property.ty.clone();
    }

    let mut literal = String::from("{\n");
    for nested in &property.nested_properties {
        let optional = if nested.required { "" } else { "?" };
        literal.push_str(&format!(
            "{}{}{}: {};\n",
            INDENT.repeat(depth + 1),
            property_key(&nested.name),
            optional,
            property_type(nested, depth + 1)
        ));
    }
    literal.push_str(&INDENT.repeat(depth));
    literal.push('}');

    if property.is_array {
        array_type(&literal)
    } else if property.nullable {
        format!("{}{}", literal, NULL_UNION)
    } else {
        literal
    }
}

/// TypeORM column decorator.
fn column_decorator(property: &EntityProperty) -> String {
    if property.name == PRIMARY_KEY {
        return "@PrimaryGeneratedColumn()".to_string();
    }

    let mut options = Vec::new();
    if property.nullable {
        options.push("nullable: true".to_string());
    }
    if let Some(default) = &property.default {
        options.push(format!("default: {}", render_literal(default)));
    }

    if !property.enum_values.is_empty() {
        options.push("type: \"enum\"".to_string());
        options.push(format!("enum: [{}]", literal_list(&property.enum_values)));
        if property.is_array {
            options.push("array: true".to_string());
        }
    } else if property.is_array
        || property.is_object
        || property.base_kind == SchemaKind::Reference
    {
        options.push("type: \"json\"".to_string());
    } else {
        match property.format.as_deref() {
            Some("date-time") => options.push("type: \"timestamp\"".to_string()),
            Some("date") => options.push("type: \"date\"".to_string()),
            _ => {}
        }
    }

    if options.is_empty() {
        "@Column()".to_string()
    } else {
        format!("@Column({{ {} }})", options.join(", "))
    }
}

/// `class-validator` decorators, composed additively.
///
/// Array properties validate their elements with `{ each: true }`.
fn validation_decorators(property: &EntityProperty) -> Vec<String> {
    let each = property.is_array;
    let mut decorators = Vec::new();

    decorators.push(if property.required {
        "@IsNotEmpty()".to_string()
    } else {
        "@IsOptional()".to_string()
    });

    match property.base_kind {
        SchemaKind::String => {
            decorators.push(with_each("IsString", "", each));
            match property.format.as_deref() {
                Some("email") => decorators.push(with_each("IsEmail", "{}", each)),
                Some("date") | Some("date-time") => {
                    decorators.push(with_each("IsDate", "", each))
                }
                _ => {}
            }
        }
        SchemaKind::Number | SchemaKind::Integer => {
            decorators.push(with_each("IsNumber", "{}", each))
        }
        SchemaKind::Boolean => decorators.push(with_each("IsBoolean", "", each)),
        _ => {}
    }

    if property.is_array {
        decorators.push("@IsArray()".to_string());
    }
    if !property.enum_values.is_empty() {
        let values = format!("[{}]", literal_list(&property.enum_values));
        decorators.push(with_each("IsEnum", &values, each));
    }

    decorators
}

/// `@Name(leading)` or, for arrays, `@Name(leading, { each: true })`.
fn with_each(name: &str, leading: &str, each: bool) -> String {
    match (leading.is_empty(), each) {
        (_, false) => format!("@{}({})", name, leading),
        (true, true) => format!("@{}({{ each: true }})", name),
        (false, true) => format!("@{}({}, {{ each: true }})", name, leading),
    }
}

fn literal_list(values: &[Value]) -> String {
    values
        .iter()
        .map(render_literal)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Import lines for the decorators actually used, in a fixed order.
fn imports(members: &[String], type_orm: bool, validation: bool) -> String {
    let used = |name: &str| members.iter().any(|m| m.contains(&format!("@{}(", name)));
    let mut code = String::new();

    if type_orm {
        let names: Vec<&str> = TYPEORM_DECORATORS
            .iter()
            .copied()
            .filter(|n| *n == "Entity" || used(*n))
            .collect();
        code.push_str(&format!(
            "import {{ {} }} from \"typeorm\";\n",
            names.join(", ")
        ));
    }
    if validation {
        let names: Vec<&str> = VALIDATION_DECORATORS
            .iter()
            .copied()
            .filter(|n| used(*n))
            .collect();
        if !names.is_empty() {
            code.push_str(&format!(
                "import {{ {} }} from \"class-validator\";\n",
                names.join(", ")
            ));
        }
    }

    code
}
