#![deny(missing_docs)]

//! # Document Model
//!
//! Typed, insertion-ordered view of a validated OpenAPI 3.x document.
//!
//! These structs map directly to OpenAPI YAML/JSON objects and only carry the
//! fields the synthesizer reads. Unknown keys are ignored. Instances are only
//! produced by the loader after structural validation and are never mutated.

use crate::error::{AppError, AppResult};
use indexmap::IndexMap;
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::fmt;

/// Root of an OpenAPI 3.x document.
#[derive(Debug, Clone, Deserialize)]
pub struct OpenApiDocument {
    /// Version string (always starts with `3.` once validated).
    pub openapi: String,
    /// Metadata about the API.
    pub info: Info,
    /// Path templates to their path items, in declaration order.
    #[serde(default)]
    pub paths: IndexMap<String, PathItem>,
    /// Reusable components.
    #[serde(default)]
    pub components: Components,
}

impl OpenApiDocument {
    /// Converts an already validated raw value into the typed model.
    ///
    /// Each root section is converted on its own so that a shape mismatch
    /// below the root contract is reported against the section it lives in.
    pub(crate) fn from_validated_value(raw: Value) -> AppResult<Self> {
        let Value::Object(mut root) = raw else {
            return Err(AppError::validation("document", "is not an object"));
        };

        let openapi = section::<String>(&mut root, "openapi")?;
        let info = section::<Info>(&mut root, "info")?;
        let paths = section::<Option<IndexMap<String, PathItem>>>(&mut root, "paths")?;
        let components = section::<Option<Components>>(&mut root, "components")?;

        Ok(Self {
            openapi,
            info,
            paths: paths.unwrap_or_default(),
            components: components.unwrap_or_default(),
        })
    }

    /// Looks up a schema in `components.schemas` by its exact name.
    pub fn schema(&self, name: &str) -> Option<&SchemaNode> {
        self.components.schemas.get(name)
    }
}

fn section<T: serde::de::DeserializeOwned>(
    root: &mut serde_json::Map<String, Value>,
    key: &str,
) -> AppResult<T> {
    let value = root.remove(key).unwrap_or(Value::Null);
    serde_json::from_value(value)
        .map_err(|e| AppError::validation(key, format!("has an unexpected shape: {}", e)))
}

/// The `info` object.
#[derive(Debug, Clone, Deserialize)]
pub struct Info {
    /// API title.
    pub title: String,
    /// API version.
    pub version: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
}

/// The `components` object. Only the sections the synthesizer resolves are kept.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Components {
    /// Named schemas.
    #[serde(default)]
    pub schemas: IndexMap<String, SchemaNode>,
    /// Reusable parameters.
    #[serde(default)]
    pub parameters: IndexMap<String, ParameterObject>,
    /// Reusable request bodies.
    #[serde(default, rename = "requestBodies")]
    pub request_bodies: IndexMap<String, RequestBodyObject>,
    /// Declared security schemes.
    #[serde(default, rename = "securitySchemes")]
    pub security_schemes: IndexMap<String, SecurityScheme>,
}

/// HTTP verbs that may appear as keys of a Path Item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// `get`
    Get,
    /// `put`
    Put,
    /// `post`
    Post,
    /// `delete`
    Delete,
    /// `options`
    Options,
    /// `head`
    Head,
    /// `patch`
    Patch,
    /// `trace`
    Trace,
}

impl HttpMethod {
    /// Parses a Path Item key. Non-verb keys (`parameters`, `summary`, `x-*`) return `None`.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "get" => Some(HttpMethod::Get),
            "put" => Some(HttpMethod::Put),
            "post" => Some(HttpMethod::Post),
            "delete" => Some(HttpMethod::Delete),
            "options" => Some(HttpMethod::Options),
            "head" => Some(HttpMethod::Head),
            "patch" => Some(HttpMethod::Patch),
            "trace" => Some(HttpMethod::Trace),
            _ => None,
        }
    }

    /// Lowercase verb as written in the document.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Put => "put",
            HttpMethod::Post => "post",
            HttpMethod::Delete => "delete",
            HttpMethod::Options => "options",
            HttpMethod::Head => "head",
            HttpMethod::Patch => "patch",
            HttpMethod::Trace => "trace",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A Path Item: the operations declared on one path template.
///
/// Only verb keys become operations; every other key is skipped.
#[derive(Debug, Clone, Default)]
pub struct PathItem {
    /// Operations in the order their verbs appear in the document.
    pub operations: IndexMap<HttpMethod, Operation>,
}

impl<'de> Deserialize<'de> for PathItem {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = IndexMap::<String, Value>::deserialize(deserializer)?;
        let mut operations = IndexMap::new();

        for (key, value) in raw {
            let Some(method) = HttpMethod::from_key(&key) else {
                continue;
            };
            let op = serde_json::from_value::<Operation>(value).map_err(|e| {
                DeError::custom(format!("Failed to parse path item operation '{}': {}", key, e))
            })?;
            operations.insert(method, op);
        }

        Ok(Self { operations })
    }
}

/// Either an inline object or a `$ref` to a component.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RefOr<T> {
    /// `{ $ref: '#/components/...' }`
    Ref {
        /// The reference string.
        #[serde(rename = "$ref")]
        reference: String,
    },
    /// Inline definition.
    Item(T),
}

/// An Operation object.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Operation {
    /// Optional operation id.
    #[serde(default, rename = "operationId")]
    pub operation_id: Option<String>,
    /// Optional summary.
    #[serde(default)]
    pub summary: Option<String>,
    /// Parameters bound to this operation.
    #[serde(default)]
    pub parameters: Option<Vec<RefOr<ParameterObject>>>,
    /// Request body, inline or referenced.
    #[serde(default, rename = "requestBody")]
    pub request_body: Option<RefOr<RequestBodyObject>>,
    /// Security requirements (scheme name to scopes).
    #[serde(default)]
    pub security: Option<Vec<IndexMap<String, Vec<String>>>>,
}

/// Parameter locations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamLocation {
    /// `in: query`
    Query,
    /// `in: header`
    Header,
    /// `in: path`
    Path,
    /// `in: cookie`
    Cookie,
}

/// A Parameter object.
#[derive(Debug, Clone, Deserialize)]
pub struct ParameterObject {
    /// Parameter name.
    pub name: String,
    /// Location.
    #[serde(rename = "in")]
    pub location: ParamLocation,
    /// Whether the parameter is mandatory.
    #[serde(default)]
    pub required: Option<bool>,
    /// Value schema.
    #[serde(default)]
    pub schema: Option<SchemaNode>,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
}

/// A Request Body object.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RequestBodyObject {
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
    /// Media types to their definitions.
    #[serde(default)]
    pub content: IndexMap<String, MediaType>,
    /// Whether the body is mandatory.
    #[serde(default)]
    pub required: Option<bool>,
}

/// A Media Type object.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MediaType {
    /// Body schema.
    #[serde(default)]
    pub schema: Option<SchemaNode>,
}

/// A Security Scheme object.
#[derive(Debug, Clone, Deserialize)]
pub struct SecurityScheme {
    /// `http`, `apiKey`, `oauth2`, `openIdConnect`, ...
    #[serde(rename = "type")]
    pub kind: String,
    /// HTTP auth scheme (e.g. `bearer`).
    #[serde(default)]
    pub scheme: Option<String>,
    /// Optional bearer token format hint.
    #[serde(default, rename = "bearerFormat")]
    pub bearer_format: Option<String>,
}

impl SecurityScheme {
    /// True for `type: http, scheme: bearer` (case-insensitive).
    pub fn is_bearer(&self) -> bool {
        self.kind.eq_ignore_ascii_case("http")
            && self
                .scheme
                .as_deref()
                .is_some_and(|s| s.eq_ignore_ascii_case("bearer"))
    }
}

/// Primitive kind of a schema node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaKind {
    /// `type: string`
    String,
    /// `type: number`
    Number,
    /// `type: integer`
    Integer,
    /// `type: boolean`
    Boolean,
    /// `type: array`
    Array,
    /// `type: object`, or no type with declared properties.
    Object,
    /// `$ref` node.
    Reference,
    /// Missing or unrecognized type.
    Unknown,
}

impl SchemaKind {
    fn from_type_name(name: &str) -> Self {
        match name {
            "string" => SchemaKind::String,
            "number" => SchemaKind::Number,
            "integer" => SchemaKind::Integer,
            "boolean" => SchemaKind::Boolean,
            "array" => SchemaKind::Array,
            "object" => SchemaKind::Object,
            _ => SchemaKind::Unknown,
        }
    }

    /// True for `number` and `integer`.
    pub fn is_numeric(&self) -> bool {
        matches!(self, SchemaKind::Number | SchemaKind::Integer)
    }
}

/// The `type` keyword: a single name (3.0) or a list of names (3.1).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SchemaType {
    /// `type: string`
    Single(String),
    /// `type: [string, "null"]`
    Multiple(Vec<String>),
}

/// Recursive schema descriptor.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SchemaNode {
    /// Raw `type` keyword.
    #[serde(default, rename = "type")]
    pub schema_type: Option<SchemaType>,
    /// Format hint (`date-time`, `email`, ...).
    #[serde(default)]
    pub format: Option<String>,
    /// OpenAPI 3.0 `nullable`.
    #[serde(default)]
    pub nullable: bool,
    /// Allowed literal values, in order.
    #[serde(default, rename = "enum")]
    pub enum_values: Option<Vec<Value>>,
    /// Default value.
    #[serde(default)]
    pub default: Option<Value>,
    /// Example value.
    #[serde(default)]
    pub example: Option<Value>,
    /// Description.
    #[serde(default)]
    pub description: Option<String>,
    /// Object properties in declaration order.
    #[serde(default)]
    pub properties: IndexMap<String, SchemaNode>,
    /// Array item schema.
    #[serde(default)]
    pub items: Option<Box<SchemaNode>>,
    /// Names of required properties.
    #[serde(default)]
    pub required: Vec<String>,
    /// Reference to another schema.
    #[serde(default, rename = "$ref")]
    pub reference: Option<String>,
}

impl SchemaNode {
    /// Resolves the primitive kind of this node.
    ///
    /// A reference always wins. For 3.1 type lists, `null` is ignored and a
    /// single remaining type is used.
    pub fn kind(&self) -> SchemaKind {
        if self.reference.is_some() {
            return SchemaKind::Reference;
        }
        match &self.schema_type {
            Some(SchemaType::Single(name)) => SchemaKind::from_type_name(name),
            Some(SchemaType::Multiple(names)) => {
                let mut concrete = names.iter().filter(|n| n.as_str() != "null");
                match (concrete.next(), concrete.next()) {
                    (Some(name), None) => SchemaKind::from_type_name(name),
                    _ => SchemaKind::Unknown,
                }
            }
            None if !self.properties.is_empty() => SchemaKind::Object,
            None => SchemaKind::Unknown,
        }
    }

    /// True when the node is `nullable: true` or lists `null` among its types.
    pub fn is_nullable(&self) -> bool {
        self.nullable
            || matches!(&self.schema_type, Some(SchemaType::Multiple(names)) if names.iter().any(|n| n == "null"))
    }

    /// Non-empty enum values, if declared.
    pub fn enum_values(&self) -> Option<&[Value]> {
        self.enum_values.as_deref().filter(|v| !v.is_empty())
    }

    /// True when `name` is listed in `required`.
    pub fn is_required(&self, name: &str) -> bool {
        self.required.iter().any(|r| r == name)
    }
}
