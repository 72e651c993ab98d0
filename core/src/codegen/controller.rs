#![deny(missing_docs)]

//! # Controller Emitter
//!
//! Generates `<module>/controllers/<module>.controller`: one handler per
//! method, wrapping the service result in an `ApiResponse`.

use crate::codegen::naming::{module_identifier, Handler};
use crate::oas::document::HttpMethod;

/// Message carried by every generated response.
pub const SUCCESS_MESSAGE: &str = "Success";

/// Status answered by a handler: `201` for `post`, `200` otherwise.
pub fn status_code(verb: HttpMethod) -> u16 {
    match verb {
        HttpMethod::Post => 201,
        _ => 200,
    }
}

/// Request parts forwarded to the service, in `params`, `body`, `query` order.
///
/// A part is forwarded only when the method declares it.
pub fn forwarded_args(handler: &Handler<'_>) -> Vec<&'static str> {
    let method = handler.method;
    let mut args = Vec::new();
    if method.has_path_params() {
        args.push("req.params");
    }
    if method.request_body.is_some() {
        args.push("req.body");
    }
    if method.has_query_params() {
        args.push("req.query");
    }
    args
}

/// Generates the controller file for one module.
pub fn generate_module_controller(module: &str, handlers: &[Handler<'_>]) -> String {
    let service = format!("{}Service", module_identifier(module));

    let mut code = String::from("import type { FastifyRequest } from \"fastify\";\n");
    if !handlers.is_empty() {
        code.push_str("import type {\n");
        for handler in handlers {
            code.push_str(&format!("  {},\n", handler.schema_type()));
        }
        code.push_str(&format!(
            "}} from \"@{}/schemas/{}.schema.js\";\n",
            module, module
        ));
    }
    code.push_str("import { ApiResponse } from \"@/shared/api-response.js\";\n");
    code.push_str(&format!(
        "import {} from \"@{}/services/{}.service.js\";\n",
        service, module, module
    ));

    for handler in handlers {
        code.push('\n');
        code.push_str(&format!(
            "async function {}(req: FastifyRequest<{}>) {{\n",
            handler.name,
            handler.schema_type()
        ));
        code.push_str("  return new ApiResponse(\n");
        code.push_str(&format!(
            "    {},\n",
            status_code(handler.method.verb)
        ));
        code.push_str(&format!("    \"{}\",\n", SUCCESS_MESSAGE));
        code.push_str(&format!(
            "    await {}.{}({}),\n",
            service,
            handler.name,
            forwarded_args(handler).join(", ")
        ));
        code.push_str("  );\n}\n");
    }

    code.push_str(&default_export(handlers));
    code
}

/// `export default { a, b, };` block shared with the service file.
pub(crate) fn default_export(handlers: &[Handler<'_>]) -> String {
    let mut code = String::from("\nexport default {\n");
    for handler in handlers {
        code.push_str(&format!("  {},\n", handler.name));
    }
    code.push_str("};\n");
    code
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::naming::module_handlers;
    use crate::oas::document::OpenApiDocument;
    use crate::oas::loader::DocumentFormat;
    use crate::oas::routes::extract_module_routes;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_module_controller() {
        let doc = OpenApiDocument::from_str(
            r#"
openapi: 3.0.0
info: {title: T, version: "1"}
paths:
  /users:
    get:
      parameters:
        - {name: page, in: query, schema: {type: integer}}
    post:
      requestBody:
        content:
          application/json:
            schema: {type: object, properties: {name: {type: string}}}
  /users/{id}:
    put:
      parameters:
        - {name: id, in: path, required: true}
        - {name: notify, in: query, schema: {type: boolean}}
      requestBody:
        content:
          application/json:
            schema: {type: object}
    delete: {}
"#,
            DocumentFormat::Yaml,
        )
        .unwrap();
        let modules = extract_module_routes(&doc).unwrap();
        let handlers = module_handlers(&modules[0]).unwrap();

        let expected = r#"import type { FastifyRequest } from "fastify";
import type {
  GetUsersSchema,
  PostUsersSchema,
  PutUsersIdSchema,
  DeleteUsersIdSchema,
} from "@users/schemas/users.schema.js";
import { ApiResponse } from "@/shared/api-response.js";
import usersService from "@users/services/users.service.js";

async function getUsers(req: FastifyRequest<GetUsersSchema>) {
  return new ApiResponse(
    200,
    "Success",
    await usersService.getUsers(req.query),
  );
}

async function postUsers(req: FastifyRequest<PostUsersSchema>) {
  return new ApiResponse(
    201,
    "Success",
    await usersService.postUsers(req.body),
  );
}

async function putUsersId(req: FastifyRequest<PutUsersIdSchema>) {
  return new ApiResponse(
    200,
    "Success",
    await usersService.putUsersId(req.params, req.body, req.query),
  );
}

async function deleteUsersId(req: FastifyRequest<DeleteUsersIdSchema>) {
  return new ApiResponse(
    200,
    "Success",
    await usersService.deleteUsersId(),
  );
}

export default {
  getUsers,
  postUsers,
  putUsersId,
  deleteUsersId,
};
"#;
        assert_eq!(generate_module_controller("users", &handlers), expected);
    }

    #[test]
    fn test_status_code() {
        assert_eq!(status_code(HttpMethod::Post), 201);
        assert_eq!(status_code(HttpMethod::Delete), 200);
        assert_eq!(status_code(HttpMethod::Get), 200);
    }
}
