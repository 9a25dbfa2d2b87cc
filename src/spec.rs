//! Typed view over a resolved OpenAPI document.
//!
//! This module defines the subset of OpenAPI 3.x the generator consumes.
//! Maps whose declaration order matters downstream (paths, responses,
//! content, properties) are kept as `serde_json::Map`, which preserves
//! insertion order; their values are deserialized on demand.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::SpecError;

/// Root OpenAPI document.
#[derive(Debug, Deserialize)]
pub struct OpenApiSpec {
    #[serde(default)]
    pub paths: Map<String, Value>,
    pub components: Option<Components>,
}

/// Reusable components; only schemas are consumed.
#[derive(Debug, Deserialize)]
pub struct Components {
    pub schemas: Option<Map<String, Value>>,
}

/// Operations for one path template, plus path-level parameters.
#[derive(Debug, Default, Deserialize)]
pub struct PathItem {
    pub get: Option<Operation>,
    pub put: Option<Operation>,
    pub post: Option<Operation>,
    pub delete: Option<Operation>,
    pub options: Option<Operation>,
    pub head: Option<Operation>,
    pub patch: Option<Operation>,
    pub trace: Option<Operation>,
    /// Parameters shared by every operation under this path.
    pub parameters: Option<Vec<Parameter>>,
}

impl PathItem {
    /// Operations in canonical method order.
    pub fn operations(&self) -> impl Iterator<Item = (&'static str, &Operation)> {
        [
            ("get", self.get.as_ref()),
            ("put", self.put.as_ref()),
            ("post", self.post.as_ref()),
            ("delete", self.delete.as_ref()),
            ("options", self.options.as_ref()),
            ("head", self.head.as_ref()),
            ("patch", self.patch.as_ref()),
            ("trace", self.trace.as_ref()),
        ]
        .into_iter()
        .filter_map(|(method, op)| op.map(|op| (method, op)))
    }
}

/// A single endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    pub operation_id: Option<String>,
    pub summary: Option<String>,
    pub parameters: Option<Vec<Parameter>>,
    pub request_body: Option<RequestBody>,
    /// Status key ("200", "2XX", "default") -> Response, declaration order.
    #[serde(default)]
    pub responses: Map<String, Value>,
}

/// A query, path, header, or cookie parameter.
#[derive(Debug, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "in")]
    pub location: String,
    #[serde(default)]
    pub required: bool,
    pub schema: Option<Schema>,
    /// Content-encoded parameters carry their schema under a media type.
    pub content: Option<Map<String, Value>>,
    pub style: Option<String>,
    pub explode: Option<bool>,
    pub default: Option<Value>,
}

/// A request body keyed by content type.
#[derive(Debug, Deserialize)]
pub struct RequestBody {
    #[serde(default)]
    pub required: bool,
    pub content: Option<Map<String, Value>>,
}

/// One declared response.
#[derive(Debug, Deserialize)]
pub struct Response {
    pub description: Option<String>,
    pub content: Option<Map<String, Value>>,
}

/// Media type content (e.g. application/json).
#[derive(Debug, Deserialize)]
pub struct MediaType {
    pub schema: Option<Schema>,
}

/// JSON Schema as used by OpenAPI.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    /// Single type or type array (3.1 nullable form).
    #[serde(rename = "type")]
    pub schema_type: Option<SchemaType>,

    /// Reference marker left in place by the resolver.
    #[serde(rename = "$ref")]
    pub ref_path: Option<String>,

    /// Object properties, declaration order preserved.
    pub properties: Option<Map<String, Value>>,

    pub required: Option<Vec<String>>,

    pub items: Option<Box<Schema>>,

    /// Enum literal values (strings, numbers, bools, null).
    #[serde(rename = "enum")]
    pub enum_values: Option<Vec<Value>>,

    #[serde(rename = "anyOf")]
    pub any_of: Option<Vec<Schema>>,

    #[serde(rename = "oneOf")]
    pub one_of: Option<Vec<Schema>>,

    #[serde(rename = "allOf")]
    pub all_of: Option<Vec<Schema>>,

    pub additional_properties: Option<AdditionalProperties>,

    pub discriminator: Option<Discriminator>,

    pub format: Option<String>,

    #[serde(rename = "const")]
    pub const_value: Option<Value>,

    pub default: Option<Value>,

    /// OpenAPI 3.0 nullable flag (3.1 uses type arrays instead).
    pub nullable: Option<bool>,

    pub title: Option<String>,
}

/// Schema type can be a single name or an array of names.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SchemaType {
    Single(String),
    Multiple(Vec<String>),
}

/// `additionalProperties` is either a boolean or a schema.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AdditionalProperties {
    Bool(bool),
    Schema(Box<Schema>),
}

/// Discriminator for polymorphic oneOf/anyOf schemas.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Discriminator {
    pub property_name: String,
}

impl OpenApiSpec {
    /// Build the typed view from a resolved document tree.
    pub fn from_value(document: Value) -> Result<Self, SpecError> {
        serde_json::from_value(document).map_err(|err| SpecError::Parse(err.to_string()))
    }
}

/// Deserialize a map entry that was kept as a raw `Value` for ordering.
pub fn from_entry<T: serde::de::DeserializeOwned>(
    value: &Value,
    location: &str,
) -> Result<T, SpecError> {
    serde_json::from_value(value.clone())
        .map_err(|err| SpecError::Parse(format!("{location}: {err}")))
}

impl Schema {
    /// Whether this schema admits null via the 3.0 `nullable` flag or a
    /// 3.1 type array. (anyOf null arms collapse during union lowering.)
    pub fn is_nullable(&self) -> bool {
        if self.nullable == Some(true) {
            return true;
        }
        if let Some(SchemaType::Multiple(types)) = &self.schema_type {
            if types.iter().any(|t| t == "null") {
                return true;
            }
        }
        false
    }
}
