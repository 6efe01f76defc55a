//! Swagger 2.0 type definitions
//!
//! Covers the members the documentation model reads. Unknown members are
//! kept in `extensions` where vendor extensions may appear.

use crate::extensions::Extensions;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Swagger document root
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwaggerSpec {
    /// Swagger version (e.g., "2.0")
    pub swagger: String,

    pub info: Info,

    #[serde(default)]
    pub host: Option<String>,

    #[serde(rename = "basePath")]
    #[serde(default)]
    pub base_path: Option<String>,

    #[serde(default)]
    pub schemes: Vec<String>,

    #[serde(default)]
    pub consumes: Vec<String>,

    #[serde(default)]
    pub produces: Vec<String>,

    /// API paths in document order
    #[serde(default)]
    pub paths: IndexMap<String, PathItem>,

    #[serde(rename = "securityDefinitions")]
    #[serde(default)]
    pub security_definitions: IndexMap<String, SecurityDefinition>,

    /// Document-wide security requirement
    #[serde(default)]
    pub security: Vec<IndexMap<String, Vec<String>>>,

    #[serde(default)]
    pub tags: Vec<Tag>,

    #[serde(flatten)]
    pub extensions: Extensions,
}

/// API information
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Info {
    /// Missing titles are reported by the builder, not the decoder
    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub version: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub contact: Option<Contact>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Contact {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub url: Option<String>,

    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(rename = "externalDocs")]
    #[serde(default)]
    pub external_docs: Option<ExternalDocs>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExternalDocs {
    #[serde(default)]
    pub description: Option<String>,

    pub url: String,
}

/// Path item (operations for a path)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathItem {
    #[serde(default)]
    pub get: Option<Operation>,

    #[serde(default)]
    pub put: Option<Operation>,

    #[serde(default)]
    pub post: Option<Operation>,

    #[serde(default)]
    pub delete: Option<Operation>,

    #[serde(default)]
    pub options: Option<Operation>,

    #[serde(default)]
    pub head: Option<Operation>,

    #[serde(default)]
    pub patch: Option<Operation>,

    /// Parameters shared by every operation of the path
    #[serde(default)]
    pub parameters: Vec<Parameter>,

    /// x-version, x-pathName, ...
    #[serde(flatten)]
    pub extensions: Extensions,
}

impl PathItem {
    /// Operations paired with their lower-case verb
    pub fn operations(&self) -> impl Iterator<Item = (&'static str, &Operation)> {
        [
            ("get", &self.get),
            ("put", &self.put),
            ("post", &self.post),
            ("delete", &self.delete),
            ("options", &self.options),
            ("head", &self.head),
            ("patch", &self.patch),
        ]
        .into_iter()
        .filter_map(|(verb, op)| op.as_ref().map(|op| (verb, op)))
    }
}

/// HTTP operation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Operation {
    #[serde(rename = "operationId")]
    #[serde(default)]
    pub operation_id: Option<String>,

    #[serde(default)]
    pub summary: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub consumes: Vec<String>,

    #[serde(default)]
    pub produces: Vec<String>,

    #[serde(default)]
    pub parameters: Vec<Parameter>,

    /// Keyed by status code or `default`
    #[serde(default)]
    pub responses: Option<IndexMap<String, Response>>,

    #[serde(default)]
    pub security: Option<Vec<IndexMap<String, Vec<String>>>>,

    #[serde(default)]
    pub deprecated: bool,

    /// x-operationName, ...
    #[serde(flatten)]
    pub extensions: Extensions,
}

/// Parameter definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,

    /// Location: query, header, path, formData or body
    #[serde(rename = "in")]
    pub location: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub required: bool,

    #[serde(rename = "type")]
    #[serde(default)]
    pub param_type: Option<String>,

    #[serde(default)]
    pub format: Option<String>,

    #[serde(default)]
    pub items: Option<Items>,

    #[serde(rename = "collectionFormat")]
    #[serde(default)]
    pub collection_format: Option<String>,

    #[serde(rename = "enum")]
    #[serde(default)]
    pub enum_values: Vec<Value>,

    #[serde(default)]
    pub default: Option<Value>,

    /// Schema of an `in: body` parameter
    #[serde(default)]
    pub schema: Option<Schema>,
}

/// Element type of an array parameter or header
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Items {
    #[serde(rename = "type")]
    #[serde(default)]
    pub item_type: Option<String>,

    #[serde(default)]
    pub format: Option<String>,

    #[serde(default)]
    pub items: Option<Box<Items>>,

    #[serde(rename = "collectionFormat")]
    #[serde(default)]
    pub collection_format: Option<String>,

    #[serde(rename = "enum")]
    #[serde(default)]
    pub enum_values: Vec<Value>,

    #[serde(default)]
    pub default: Option<Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Response {
    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub schema: Option<Schema>,

    #[serde(default)]
    pub headers: IndexMap<String, Header>,
}

/// Response header, an [`Items`] with a description
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Header {
    #[serde(default)]
    pub description: Option<String>,

    #[serde(flatten)]
    pub items: Items,
}

/// A `type` member, either one name or a list of names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SchemaType {
    Single(String),
    Multiple(Vec<String>),
}

impl SchemaType {
    /// The first declared type
    pub fn first(&self) -> Option<&str> {
        match self {
            SchemaType::Single(t) => Some(t),
            SchemaType::Multiple(types) => types.first().map(String::as_str),
        }
    }
}

/// `items`, either one schema or a list where the first applies
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SchemaItems {
    Single(Box<Schema>),
    List(Vec<Schema>),
}

impl SchemaItems {
    pub fn first(&self) -> Option<&Schema> {
        match self {
            SchemaItems::Single(schema) => Some(schema),
            SchemaItems::List(schemas) => schemas.first(),
        }
    }
}

/// `additionalProperties`, a flag or a schema for the extra values
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AdditionalProperties {
    Allowed(bool),
    Schema(Box<Schema>),
}

impl AdditionalProperties {
    pub fn schema(&self) -> Option<&Schema> {
        match self {
            AdditionalProperties::Schema(schema) => Some(schema),
            AdditionalProperties::Allowed(_) => None,
        }
    }
}

/// Schema definition
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Schema {
    #[serde(rename = "type")]
    #[serde(default)]
    pub schema_type: Option<SchemaType>,

    #[serde(default)]
    pub format: Option<String>,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub items: Option<SchemaItems>,

    #[serde(default)]
    pub properties: IndexMap<String, Schema>,

    #[serde(default)]
    pub required: Vec<String>,

    #[serde(rename = "additionalProperties")]
    #[serde(default)]
    pub additional_properties: Option<AdditionalProperties>,

    #[serde(rename = "allOf")]
    #[serde(default)]
    pub all_of: Vec<Schema>,

    #[serde(rename = "enum")]
    #[serde(default)]
    pub enum_values: Vec<Value>,

    #[serde(default)]
    pub example: Option<Value>,

    #[serde(default)]
    pub default: Option<Value>,

    #[serde(rename = "readOnly")]
    #[serde(default)]
    pub read_only: bool,

    /// x-ref-name, x-excludeFromOperations, ...
    #[serde(flatten)]
    pub extensions: Extensions,
}

/// Security scheme definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityDefinition {
    /// basic, apiKey or oauth2
    #[serde(rename = "type")]
    pub scheme_type: String,

    #[serde(default)]
    pub description: Option<String>,

    /// Header or query parameter name of an API key
    #[serde(default)]
    pub name: Option<String>,

    #[serde(rename = "in")]
    #[serde(default)]
    pub location: Option<String>,

    /// implicit, password, application or accessCode
    #[serde(default)]
    pub flow: Option<String>,

    #[serde(rename = "authorizationUrl")]
    #[serde(default)]
    pub authorization_url: Option<String>,

    #[serde(rename = "tokenUrl")]
    #[serde(default)]
    pub token_url: Option<String>,

    #[serde(default)]
    pub scopes: IndexMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_schema_variants() {
        let schema: Schema = serde_json::from_str(
            r#"{
                "type": ["string", "null"],
                "items": [{"type": "integer"}, {"type": "string"}],
                "additionalProperties": false,
                "x-excludeFromOperations": ["create"]
            }"#,
        )
        .unwrap();

        assert_eq!(schema.schema_type.as_ref().and_then(SchemaType::first), Some("string"));
        let item_type = schema
            .items
            .as_ref()
            .and_then(SchemaItems::first)
            .and_then(|s| s.schema_type.as_ref())
            .and_then(SchemaType::first);
        assert_eq!(item_type, Some("integer"));
        assert!(schema
            .additional_properties
            .as_ref()
            .and_then(AdditionalProperties::schema)
            .is_none());
        assert!(schema.extensions.contains_key("x-excludeFromOperations"));
    }

    #[test]
    fn test_path_item_operations_and_extensions() {
        let item: PathItem = serde_json::from_str(
            r#"{
                "post": {"responses": {}},
                "get": {"responses": {}},
                "x-version": "v2"
            }"#,
        )
        .unwrap();

        let verbs: Vec<&str> = item.operations().map(|(verb, _)| verb).collect();
        assert_eq!(verbs, vec!["get", "post"]);
        assert_eq!(item.extensions["x-version"], "v2");
    }

    #[test]
    fn test_header_flattens_items() {
        let header: Header = serde_json::from_str(
            r#"{"description": "Calls per hour", "type": "integer", "format": "int32"}"#,
        )
        .unwrap();
        assert_eq!(header.items.item_type.as_deref(), Some("integer"));
        assert_eq!(header.items.format.as_deref(), Some("int32"));
    }
}
