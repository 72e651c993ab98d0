#![deny(missing_docs)]

//! # Router Emitter
//!
//! Generates the Fastify plugin registering a module's routes
//! (`<module>/index.routes`) and the aggregate router mounting every module
//! under its `/<module>` prefix.

use crate::codegen::naming::{module_identifier, Handler};
use crate::oas::document::HttpMethod;

/// Import line of the zod type provider plugin type.
const PLUGIN_IMPORT: &str =
    "import type { FastifyPluginAsyncZod } from \"fastify-type-provider-zod\";";

/// Import line of the bearer middleware.
const JWT_IMPORT: &str = "import { jwtMiddleware } from \"@/shared/jwt-middleware.js\";";

/// Generates `<module>/index.routes` for one module.
pub fn generate_module_router(module: &str, handlers: &[Handler<'_>]) -> String {
    let ident = module_identifier(module);
    let controller = format!("{}Controller", ident);
    let needs_auth = handlers.iter().any(|h| h.method.requires_auth);

    let mut code = String::new();
    code.push_str(PLUGIN_IMPORT);
    code.push('\n');

    if !handlers.is_empty() {
        code.push_str("import {\n");
        for handler in handlers {
            code.push_str(&format!("  {},\n", handler.schema_const()));
        }
        code.push_str(&format!(
            "}} from \"@{}/schemas/{}.schema.js\";\n",
            module, module
        ));
    }
    code.push_str(&format!(
        "import {} from \"@{}/controllers/{}.controller.js\";\n",
        controller, module, module
    ));
    if needs_auth {
        code.push_str(JWT_IMPORT);
        code.push('\n');
    }

    code.push_str(&format!(
        "\nconst {}Router: FastifyPluginAsyncZod = async (app) => {{\n",
        ident
    ));
    for handler in handlers {
        code.push_str("  ");
        code.push_str(&registration(handler, &controller));
        code.push('\n');
    }
    code.push_str("};\n");
    code.push_str(&format!("\nexport default {}Router;\n", ident));

    code
}

/// One registration statement.
///
/// Fastify has no `app.trace` shorthand, so `trace` goes through `app.route`.
fn registration(handler: &Handler<'_>, controller: &str) -> String {
    let schema = handler.schema_const();
    let target = format!("{}.{}", controller, handler.name);
    let auth = handler.method.requires_auth;

    match handler.method.verb {
        HttpMethod::Trace => {
            let hook = if auth {
                " onRequest: [jwtMiddleware],"
            } else {
                ""
            };
            format!(
                "app.route({{ method: \"TRACE\", url: \"{}\", ...{},{} handler: {} }});",
                handler.relative_route, schema, hook, target
            )
        }
        verb => {
            let options = if auth {
                format!("{{ ...{}, onRequest: [jwtMiddleware] }}", schema)
            } else {
                schema
            };
            format!(
                "app.{}(\"{}\", {}, {});",
                verb.as_str(),
                handler.relative_route,
                options,
                target
            )
        }
    }
}

/// Generates the aggregate router registering every module.
pub fn generate_main_router(modules: &[String]) -> String {
    let mut code = String::new();
    for module in modules {
        code.push_str(&format!(
            "import {}Router from \"@{}/index.routes.js\";\n",
            module_identifier(module),
            module
        ));
    }
    code.push_str(PLUGIN_IMPORT);
    code.push('\n');

    code.push_str("\nconst mainRouter: FastifyPluginAsyncZod = async (app) => {\n");
    for module in modules {
        code.push_str(&format!(
            "  await app.register({}Router, {{ prefix: \"/{}\" }});\n",
            module_identifier(module),
            module
        ));
    }
    code.push_str("};\n\nexport default mainRouter;\n");

    code
}
