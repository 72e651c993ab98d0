#![deny(missing_docs)]

//! # Naming
//!
//! Deterministic identifiers derived from verbs, routes, module names and
//! schema names.
//!
//! Handler names concatenate the verb with the capitalized pieces of the
//! route (`get` + `/users/:id` -> `getUsersId`). That scheme is not
//! injective (`/users/{id}` and `/users/id` both give `UsersId`), so
//! [`module_handlers`] checks every module for collisions and fails hard.

use crate::error::{AppError, AppResult};
use crate::oas::models::{Method, ModuleRoutes, Route};
use crate::oas::routes::translate_path_template;
use heck::ToLowerCamelCase;
use indexmap::IndexMap;
use regex::Regex;
use std::sync::OnceLock;

fn separator_re() -> &'static Regex {
    static SEPARATOR_RE: OnceLock<Regex> = OnceLock::new();
    SEPARATOR_RE.get_or_init(|| Regex::new(r"[^A-Za-z0-9]+").expect("Invalid regex"))
}

fn identifier_re() -> &'static Regex {
    static IDENTIFIER_RE: OnceLock<Regex> = OnceLock::new();
    IDENTIFIER_RE
        .get_or_init(|| Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").expect("Invalid regex"))
}

/// Upper-cases the first character.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Capitalized concatenation of a route's alphanumeric pieces.
///
/// e.g. `/users/:id/orders` -> `UsersIdOrders`
pub fn route_name(route: &str) -> String {
    separator_re()
        .split(route)
        .filter(|piece| !piece.is_empty())
        .map(capitalize)
        .collect()
}

/// Handler identifier for a verb on a translated route.
///
/// e.g. `get` + `/users/:id` -> `getUsersId`
pub fn handler_name(verb: &str, route: &str) -> String {
    format!("{}{}", verb.to_lowercase(), route_name(route))
}

/// Lower camel case identifier for a module, e.g. `user-profiles` -> `userProfiles`.
///
/// A module name starting with a digit is prefixed with `_`.
pub fn module_identifier(module: &str) -> String {
    let ident = module.to_lower_camel_case();
    match ident.chars().next() {
        Some(c) if c.is_ascii_digit() => format!("_{}", ident),
        Some(_) => ident,
        None => "_".to_string(),
    }
}

/// True when `name` can be used as a bare identifier or property key.
pub fn is_identifier(name: &str) -> bool {
    identifier_re().is_match(name)
}

/// Type identifier for a schema or entity name.
///
/// Valid identifiers are kept untouched; anything else is rebuilt from its
/// capitalized alphanumeric pieces (`user-dto` -> `UserDto`).
pub fn type_identifier(name: &str) -> String {
    if is_identifier(name) {
        return name.to_string();
    }
    let rebuilt = route_name(name);
    match rebuilt.chars().next() {
        Some(c) if c.is_ascii_digit() => format!("_{}", rebuilt),
        Some(_) => rebuilt,
        None => "_".to_string(),
    }
}

/// Object literal key: bare when it is an identifier, quoted otherwise.
pub fn property_key(name: &str) -> String {
    if is_identifier(name) {
        name.to_string()
    } else {
        serde_json::Value::from(name).to_string()
    }
}

/// Route relative to its module prefix.
///
/// `/users/:id` under `users` -> `/:id`; `/users` -> `/`.
pub fn relative_route(module: &str, route: &str) -> String {
    let prefix = translate_path_template(module);
    let rest = route
        .trim_start_matches('/')
        .strip_prefix(prefix.as_str())
        .filter(|rest| rest.is_empty() || rest.starts_with('/'));

    match rest {
        Some("") => "/".to_string(),
        Some(rest) => rest.to_string(),
        None => route.to_string(),
    }
}

/// One method of a module with its derived names.
#[derive(Debug, Clone)]
pub struct Handler<'a> {
    /// Function name, e.g. `getUsersId`.
    pub name: String,
    /// Capitalized form used for type names, e.g. `GetUsersId`.
    pub type_name: String,
    /// Route registered under the module prefix, e.g. `/:id`.
    pub relative_route: String,
    /// The route the method belongs to.
    pub route: &'a Route,
    /// The method itself.
    pub method: &'a Method,
}

impl Handler<'_> {
    /// Name of the request schema constant, e.g. `getUsersIdSchema`.
    pub fn schema_const(&self) -> String {
        format!("{}Schema", self.name)
    }

    /// Name of the request schema type, e.g. `GetUsersIdSchema`.
    pub fn schema_type(&self) -> String {
        format!("{}Schema", self.type_name)
    }

    /// `GET /users/{id}`, used in diagnostics.
    pub fn describe(&self) -> String {
        format!(
            "{} {}",
            self.method.verb.as_str().to_uppercase(),
            self.route.source_path
        )
    }
}

/// Derives the handlers of a module, in route then method order.
///
/// Two methods deriving the same handler name is a `NamingCollision`.
pub fn module_handlers(module: &ModuleRoutes) -> AppResult<Vec<Handler<'_>>> {
    let mut handlers: IndexMap<String, Handler<'_>> = IndexMap::new();

    for route in &module.routes {
        for method in &route.methods {
            let name = handler_name(method.verb.as_str(), &route.route);
            let handler = Handler {
                type_name: capitalize(&name),
                relative_route: relative_route(&module.module, &route.route),
                name: name.clone(),
                route,
                method,
            };
            if let Some(existing) = handlers.get(&name) {
                return Err(AppError::NamingCollision {
                    name,
                    first: existing.describe(),
                    second: handler.describe(),
                });
            }
            handlers.insert(name, handler);
        }
    }

    Ok(handlers.into_values().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oas::document::HttpMethod;

    fn method(verb: HttpMethod) -> Method {
        Method {
            verb,
            parameters: vec![],
            request_body: None,
            requires_auth: false,
        }
    }

    fn route(source: &str, verbs: &[HttpMethod]) -> Route {
        Route {
            route: translate_path_template(source),
            source_path: source.to_string(),
            methods: verbs.iter().copied().map(method).collect(),
        }
    }

    #[test]
    fn test_route_name() {
        assert_eq!(route_name("/:id"), "Id");
        assert_eq!(route_name("/users/:id/orders"), "UsersIdOrders");
        assert_eq!(route_name("/user-profiles/:profile_id"), "UserProfilesProfileId");
        assert_eq!(route_name("/"), "");
    }

    #[test]
    fn test_handler_name() {
        assert_eq!(handler_name("get", "/:id"), "getId");
        assert_eq!(handler_name("GET", "/users/:id"), "getUsersId");
        assert_eq!(handler_name("post", "/users"), "postUsers");
    }

    #[test]
    fn test_module_identifier() {
        assert_eq!(module_identifier("users"), "users");
        assert_eq!(module_identifier("user-profiles"), "userProfiles");
        assert_eq!(module_identifier("user_profiles"), "userProfiles");
        assert_eq!(module_identifier("v1"), "v1");
        assert_eq!(module_identifier("2fa"), "_2fa");
    }

    #[test]
    fn test_type_identifier_and_keys() {
        assert_eq!(type_identifier("CreateUser"), "CreateUser");
        assert_eq!(type_identifier("user-dto"), "UserDto");
        assert_eq!(type_identifier("v1.User"), "V1User");
        assert_eq!(property_key("name"), "name");
        assert_eq!(property_key("$meta"), "$meta");
        assert_eq!(property_key("x-request-id"), r#""x-request-id""#);
    }

    #[test]
    fn test_relative_route() {
        assert_eq!(relative_route("users", "/users"), "/");
        assert_eq!(relative_route("users", "/users/:id"), "/:id");
        assert_eq!(relative_route("users", "/users/:id/orders"), "/:id/orders");
        assert_eq!(relative_route("{tenant}", "/:tenant/users"), "/users");
        // prefix must end on a segment boundary
        assert_eq!(relative_route("user", "/users"), "/users");
    }

    #[test]
    fn test_module_handlers() {
        let module = ModuleRoutes {
            module: "users".into(),
            routes: vec![
                route("/users", &[HttpMethod::Get, HttpMethod::Post]),
                route("/users/{id}", &[HttpMethod::Delete]),
            ],
        };
        let handlers = module_handlers(&module).unwrap();
        let names: Vec<_> = handlers.iter().map(|h| h.name.as_str()).collect();
        assert_eq!(names, vec!["getUsers", "postUsers", "deleteUsersId"]);
        assert_eq!(handlers[2].type_name, "DeleteUsersId");
        assert_eq!(handlers[2].relative_route, "/:id");
        assert_eq!(handlers[2].schema_const(), "deleteUsersIdSchema");
        assert_eq!(handlers[2].schema_type(), "DeleteUsersIdSchema");
    }

    #[test]
    fn test_collision_is_reported() {
        let module = ModuleRoutes {
            module: "a".into(),
            routes: vec![
                route("/a/{b}", &[HttpMethod::Get]),
                route("/a/b", &[HttpMethod::Get]),
            ],
        };
        match module_handlers(&module) {
            Err(AppError::NamingCollision {
                name,
                first,
                second,
            }) => {
                assert_eq!(name, "getAB");
                assert_eq!(first, "GET /a/{b}");
                assert_eq!(second, "GET /a/b");
            }
            other => panic!("expected collision, got {:?}", other),
        }
    }
}
