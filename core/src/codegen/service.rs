#![deny(missing_docs)]

//! # Service Emitter
//!
//! Generates `<module>/services/<module>.service`: a stub per handler taking
//! typed `params`, `body` and `query` arguments.
//!
//! Named object bodies (those resolved from `components.schemas`) are
//! declared once per file under their schema name, including the ones nested
//! inside other bodies. Inline bodies get a `<Handler>Body` alias.

use crate::codegen::controller::default_export;
use crate::codegen::naming::{property_key, type_identifier, Handler};
use crate::error::{AppError, AppResult};
use crate::oas::document::{ParamLocation, SchemaKind};
use crate::oas::models::{Parameter, RequestBody};
use crate::oas::resolver::types::array_type;
use indexmap::IndexMap;

const INDENT: &str = "  ";

/// A named body type declared once per file.
struct Declaration {
    schema: String,
    text: String,
}

/// Collects named declarations while rendering body types.
#[derive(Default)]
struct Declarations {
    by_ident: IndexMap<String, Declaration>,
}

impl Declarations {
    /// Renders a body as a type expression; `depth` is the indentation of
    /// the line the expression starts on.
    fn render(&mut self, body: &RequestBody, depth: usize) -> AppResult<String> {
        match body {
            RequestBody::Generic { ty, kind, .. } => Ok(match kind {
                SchemaKind::Reference => type_identifier(ty),
                _ => ty.clone(),
            }),
            RequestBody::Array { items } => Ok(array_type(&self.render(items, depth)?)),
            RequestBody::Object {
                name: Some(name), ..
            } => self.declare(name, body),
            RequestBody::Object {
                name: None,
                required,
                properties,
                ..
            } => self.object_literal(required, properties, depth),
        }
    }

    fn declare(&mut self, name: &str, body: &RequestBody) -> AppResult<String> {
        let ident = type_identifier(name);
        if let Some(existing) = self.by_ident.get(&ident) {
            if existing.schema != name {
                return Err(AppError::NamingCollision {
                    name: ident,
                    first: format!("components.schemas.{}", existing.schema),
                    second: format!("components.schemas.{}", name),
                });
            }
            return Ok(ident);
        }

        let RequestBody::Object {
            required,
            properties,
            ..
        } = body
        else {
            return Ok(ident);
        };
        let literal = self.object_literal(required, properties, 0)?;
        self.by_ident.insert(
            ident.clone(),
            Declaration {
                schema: name.to_string(),
                text: format!("type {} = {};\n", ident, literal),
            },
        );
        Ok(ident)
    }

    fn object_literal(
        &mut self,
        required: &[String],
        properties: &IndexMap<String, RequestBody>,
        depth: usize,
    ) -> AppResult<String> {
        if properties.is_empty() {
            return Ok("object".to_string());
        }
        let mut code = String::from("{\n");
        for (name, prop) in properties {
            let optional = if required.contains(name) { "" } else { "?" };
            let ty = self.render(prop, depth + 1)?;
            code.push_str(&format!(
                "{}{}{}: {};\n",
                INDENT.repeat(depth + 1),
                property_key(name),
                optional,
                ty
            ));
        }
        code.push_str(&INDENT.repeat(depth));
        code.push('}');
        Ok(code)
    }
}

/// Generates the service file for one module.
///
/// Fails with `NamingCollision` when a declared schema name clashes with a
/// synthesized alias or with another schema sanitized to the same identifier.
pub fn generate_module_service(handlers: &[Handler<'_>]) -> AppResult<String> {
    let mut decls = Declarations::default();
    // synthesized alias -> handler that owns it
    let mut aliases: IndexMap<String, String> = IndexMap::new();
    let mut functions = Vec::new();

    for handler in handlers {
        let method = handler.method;
        let mut types = Vec::new();
        let mut args = Vec::new();

        let path: Vec<_> = method.params_in(ParamLocation::Path).collect();
        if !path.is_empty() {
            let alias = format!("{}Params", handler.type_name);
            types.push(format!("type {} = {};\n", alias, params_literal(&path)));
            args.push(format!("params: {}", alias));
            aliases.insert(alias, handler.describe());
        }

        if let Some(body) = &method.request_body {
            let ty = match body {
                RequestBody::Object { name: Some(_), .. } => decls.render(body, 0)?,
                _ => {
                    let alias = format!("{}Body", handler.type_name);
                    let expr = decls.render(body, 0)?;
                    types.push(format!("type {} = {};\n", alias, expr));
                    aliases.insert(alias.clone(), handler.describe());
                    alias
                }
            };
            args.push(format!("body: {}", ty));
        }

        let query: Vec<_> = method.params_in(ParamLocation::Query).collect();
        if !query.is_empty() {
            let alias = format!("{}Query", handler.type_name);
            types.push(format!("type {} = {};\n", alias, params_literal(&query)));
            args.push(format!("query: {}", alias));
            aliases.insert(alias, handler.describe());
        }

        let mut code = String::new();
        for ty in types {
            code.push_str(&ty);
            code.push('\n');
        }
        code.push_str(&format!(
            "async function {}({}) {{\n  return null;\n}}\n",
            handler.name,
            args.join(", ")
        ));
        functions.push(code);
    }

    for (ident, decl) in &decls.by_ident {
        if let Some(owner) = aliases.get(ident) {
            return Err(AppError::NamingCollision {
                name: ident.clone(),
                first: format!("components.schemas.{}", decl.schema),
                second: owner.clone(),
            });
        }
    }

    let mut chunks: Vec<String> = decls.by_ident.into_values().map(|d| d.text).collect();
    chunks.extend(functions);
    let mut code = chunks.join("\n");
    code.push_str(&default_export(handlers));
    Ok(code)
}

fn params_literal(params: &[&Parameter]) -> String {
    let mut code = String::from("{\n");
    for param in params {
        let optional = if param.required { "" } else { "?" };
        code.push_str(&format!(
            "{}{}{}: {};\n",
            INDENT,
            property_key(&param.name),
            optional,
            param.ty
        ));
    }
    code.push('}');
    code
}
