#![deny(missing_docs)]

//! # Routes Module
//!
//! Groups the document's `paths` into modules (first path segment) and builds
//! one [`Method`] record per declared verb.
//!
//! Everything here iterates insertion-ordered maps, so the same document
//! always yields the same modules, routes and methods in the same order.

use crate::error::AppResult;
use crate::oas::document::{HttpMethod, OpenApiDocument, Operation};
use crate::oas::models::{Method, ModuleRoutes, Route};
use crate::oas::resolver::{extract_request_body, resolve_parameters};
use indexmap::IndexSet;
use tracing::{debug, warn};

/// Scheme name treated as bearer when the document declares no security schemes.
pub const DEFAULT_BEARER_SCHEME: &str = "bearerAuth";

/// First non-empty `/`-separated segment of a path template.
pub fn module_of(path: &str) -> Option<&str> {
    path.split('/').find(|segment| !segment.is_empty())
}

/// Module names in first-seen order, without duplicates.
pub fn discover_modules(doc: &OpenApiDocument) -> Vec<String> {
    let mut modules = IndexSet::new();
    for path in doc.paths.keys() {
        match module_of(path) {
            Some(module) => {
                modules.insert(module.to_string());
            }
            None => warn!(path = %path, "path has no module segment; skipping"),
        }
    }
    modules.into_iter().collect()
}

/// Rewrites `{param}` placeholders to `:param`.
///
/// This is literal brace stripping: `{` becomes `:` and `}` is dropped.
pub fn translate_path_template(path: &str) -> String {
    path.replace('{', ":").replace('}', "")
}

/// Extracts every module with its routes, using [`DEFAULT_BEARER_SCHEME`].
pub fn extract_module_routes(doc: &OpenApiDocument) -> AppResult<Vec<ModuleRoutes>> {
    extract_module_routes_with(doc, DEFAULT_BEARER_SCHEME)
}

/// Extracts every module with its routes.
///
/// # Arguments
///
/// * `doc` - The validated document.
/// * `bearer_scheme` - Security requirement key treated as bearer when the
///   document does not declare `components.securitySchemes`.
pub fn extract_module_routes_with(
    doc: &OpenApiDocument,
    bearer_scheme: &str,
) -> AppResult<Vec<ModuleRoutes>> {
    let modules = discover_modules(doc);
    debug!(?modules, "discovered modules");

    modules
        .into_iter()
        .map(|module| {
            let routes = doc
                .paths
                .iter()
                .filter(|(path, _)| module_of(path) == Some(module.as_str()))
                .map(|(path, item)| {
                    let methods = item
                        .operations
                        .iter()
                        .map(|(verb, op)| build_method(*verb, op, path, doc, bearer_scheme))
                        .collect::<AppResult<Vec<_>>>()?;
                    Ok(Route {
                        route: translate_path_template(path),
                        source_path: path.clone(),
                        methods,
                    })
                })
                .collect::<AppResult<Vec<_>>>()?;
            Ok(ModuleRoutes { module, routes })
        })
        .collect()
}

/// Builds the canonical record for one operation.
pub fn build_method(
    verb: HttpMethod,
    op: &Operation,
    path: &str,
    doc: &OpenApiDocument,
    bearer_scheme: &str,
) -> AppResult<Method> {
    let context = format!("{} {}", verb.as_str().to_uppercase(), path);

    let parameters = match &op.parameters {
        Some(params) => resolve_parameters(params, doc, &context)?,
        None => Vec::new(),
    };
    let request_body = op
        .request_body
        .as_ref()
        .and_then(|body| extract_request_body(body, doc));
    let requires_auth = requires_bearer(op, doc, bearer_scheme);

    debug!(
        operation = %context,
        parameters = parameters.len(),
        has_body = request_body.is_some(),
        requires_auth,
        "extracted method"
    );

    Ok(Method {
        verb,
        parameters,
        request_body,
        requires_auth,
    })
}

/// True when one of the operation's security requirements names the bearer scheme.
fn requires_bearer(op: &Operation, doc: &OpenApiDocument, bearer_scheme: &str) -> bool {
    let Some(requirements) = &op.security else {
        return false;
    };
    let schemes = &doc.components.security_schemes;

    requirements.iter().flat_map(|req| req.keys()).any(|name| {
        if schemes.is_empty() {
            name == bearer_scheme
        } else {
            schemes.get(name).is_some_and(|s| s.is_bearer())
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::oas::document::ParamLocation;
    use crate::oas::loader::DocumentFormat;
    use crate::oas::models::RequestBody;

    fn doc(yaml: &str) -> OpenApiDocument {
        OpenApiDocument::from_str(yaml, DocumentFormat::Yaml).unwrap()
    }

    #[test]
    fn test_translate_path_template() {
        assert_eq!(
            translate_path_template("/users/{id}/orders/{orderId}"),
            "/users/:id/orders/:orderId"
        );
        assert_eq!(translate_path_template("/health"), "/health");
    }

    #[test]
    fn test_module_of() {
        assert_eq!(module_of("/users/{id}"), Some("users"));
        assert_eq!(module_of("users"), Some("users"));
        assert_eq!(module_of("//double/slash"), Some("double"));
        assert_eq!(module_of("/"), None);
    }

    #[test]
    fn test_minimal_single_module() {
        let d = doc(
            r#"
openapi: 3.0.0
info: {title: T, version: "1"}
paths:
  /users:
    get:
      responses: {'200': {description: ok}}
"#,
        );
        let modules = extract_module_routes(&d).unwrap();
        assert_eq!(modules.len(), 1);
        assert_eq!(modules[0].module, "users");
        assert_eq!(modules[0].routes.len(), 1);
        assert_eq!(modules[0].routes[0].route, "/users");
        assert_eq!(modules[0].routes[0].methods.len(), 1);
        assert_eq!(modules[0].routes[0].methods[0].verb, HttpMethod::Get);
        assert!(modules[0].routes[0].methods[0].parameters.is_empty());
    }

    #[test]
    fn test_modules_deduplicated_in_first_seen_order() {
        let d = doc(
            r#"
openapi: 3.0.0
info: {title: T, version: "1"}
paths:
  /users: {get: {}}
  /orders: {get: {}}
  /users/{id}: {get: {}, delete: {}}
  /userstats: {get: {}}
  /: {get: {}}
"#,
        );
        assert_eq!(discover_modules(&d), vec!["users", "orders", "userstats"]);

        let modules = extract_module_routes(&d).unwrap();
        let users = &modules[0];
        let routes: Vec<_> = users.routes.iter().map(|r| r.route.as_str()).collect();
        // `/userstats` shares the prefix but not the segment
        assert_eq!(routes, vec!["/users", "/users/:id"]);
        let verbs: Vec<_> = users.routes[1].methods.iter().map(|m| m.verb).collect();
        assert_eq!(verbs, vec![HttpMethod::Get, HttpMethod::Delete]);
    }

    #[test]
    fn test_method_record() {
        let d = doc(
            r#"
openapi: 3.0.0
info: {title: T, version: "1"}
components:
  securitySchemes:
    jwt: {type: http, scheme: bearer}
    key: {type: apiKey, in: header, name: X-Key}
  schemas:
    NewPet:
      type: object
      properties:
        name: {type: string}
paths:
  /pets/{petId}:
    parameters:
      - {name: shared, in: query}
    put:
      security: [{jwt: []}]
      parameters:
        - {name: petId, in: path, required: true, schema: {type: integer}}
        - {name: dryRun, in: query, schema: {type: boolean}}
      requestBody:
        content:
          application/json:
            schema: {$ref: '#/components/schemas/NewPet'}
    get:
      security: [{key: []}]
"#,
        );
        let modules = extract_module_routes(&d).unwrap();
        let route = &modules[0].routes[0];
        assert_eq!(route.route, "/pets/:petId");
        assert_eq!(route.source_path, "/pets/{petId}");

        let put = &route.methods[0];
        assert_eq!(put.verb, HttpMethod::Put);
        // path-level parameters are not merged into the operation
        assert_eq!(put.parameters.len(), 2);
        assert_eq!(put.parameters[0].location, ParamLocation::Path);
        assert_eq!(put.parameters[0].ty, "number");
        assert!(put.has_path_params());
        assert!(put.has_query_params());
        assert!(matches!(
            put.request_body,
            Some(RequestBody::Object { ref name, .. }) if name.as_deref() == Some("NewPet")
        ));
        assert!(put.requires_auth);

        let get = &route.methods[1];
        assert!(!get.requires_auth);
        assert!(get.request_body.is_none());
        assert!(get.parameters.is_empty());
    }

    #[test]
    fn test_bearer_fallback_without_schemes() {
        let d = doc(
            r#"
openapi: 3.0.0
info: {title: T, version: "1"}
paths:
  /me:
    get: {security: [{bearerAuth: []}]}
    post: {security: [{apiKey: []}]}
"#,
        );
        let modules = extract_module_routes(&d).unwrap();
        let methods = &modules[0].routes[0].methods;
        assert!(methods[0].requires_auth);
        assert!(!methods[1].requires_auth);

        let custom = extract_module_routes_with(&d, "apiKey").unwrap();
        assert!(custom[0].routes[0].methods[1].requires_auth);
    }

    #[test]
    fn test_unresolved_parameter_reference_fails() {
        let d = doc(
            r#"
openapi: 3.0.0
info: {title: T, version: "1"}
paths:
  /items:
    get:
      parameters:
        - $ref: '#/components/parameters/limit'
"#,
        );
        match extract_module_routes(&d) {
            Err(AppError::UnresolvedReference { context, .. }) => {
                assert_eq!(context, "GET /items")
            }
            other => panic!("expected unresolved reference, got {:?}", other),
        }
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let d = doc(
            r#"
openapi: 3.0.0
info: {title: T, version: "1"}
paths:
  /b/{id}: {patch: {}, get: {}}
  /a: {post: {}}
  /b: {get: {}}
"#,
        );
        let first = extract_module_routes(&d).unwrap();
        let second = extract_module_routes(&d).unwrap();
        assert_eq!(first, second);
        assert_eq!(first[0].module, "b");
    }
}
