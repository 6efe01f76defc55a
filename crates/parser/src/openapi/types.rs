//! OpenAPI 3.x type definitions
//!
//! Schema objects share their shape with Swagger 2.0 and reuse its types.

use crate::extensions::Extensions;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub use crate::swagger::{Contact, ExternalDocs, Info, Schema, Tag};

/// OpenAPI document root
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenApiSpec {
    /// OpenAPI version (e.g., "3.0.3")
    pub openapi: String,

    pub info: Info,

    #[serde(default)]
    pub servers: Vec<Server>,

    /// API paths in document order
    #[serde(default)]
    pub paths: IndexMap<String, PathItem>,

    #[serde(default)]
    pub components: Option<Components>,

    /// Document-wide security requirement
    #[serde(default)]
    pub security: Vec<IndexMap<String, Vec<String>>>,

    #[serde(default)]
    pub tags: Vec<Tag>,

    #[serde(flatten)]
    pub extensions: Extensions,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Server {
    pub url: String,

    #[serde(default)]
    pub description: Option<String>,
}

/// Reusable components
///
/// Schemas are reached through expanded references only, so just the
/// security schemes are decoded.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Components {
    #[serde(rename = "securitySchemes")]
    #[serde(default)]
    pub security_schemes: IndexMap<String, SecuritySchemeDef>,
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

    #[serde(default)]
    pub parameters: Vec<Parameter>,

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
    pub parameters: Vec<Parameter>,

    #[serde(rename = "requestBody")]
    #[serde(default)]
    pub request_body: Option<RequestBody>,

    /// Keyed by status code or `default`
    #[serde(default)]
    pub responses: Option<IndexMap<String, Response>>,

    #[serde(default)]
    pub security: Option<Vec<IndexMap<String, Vec<String>>>>,

    #[serde(default)]
    pub deprecated: bool,

    #[serde(flatten)]
    pub extensions: Extensions,
}

/// Parameter definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,

    /// Location: query, header, path or cookie
    #[serde(rename = "in")]
    pub location: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub required: bool,

    /// Serialization style (form, simple, spaceDelimited, ...)
    #[serde(default)]
    pub style: Option<String>,

    #[serde(default)]
    pub explode: Option<bool>,

    #[serde(default)]
    pub schema: Option<Schema>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequestBody {
    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub required: bool,

    /// Keyed by media type
    #[serde(default)]
    pub content: IndexMap<String, MediaType>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MediaType {
    #[serde(default)]
    pub schema: Option<Schema>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Response {
    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub headers: IndexMap<String, Header>,

    /// Keyed by media type
    #[serde(default)]
    pub content: IndexMap<String, MediaType>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Header {
    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub required: bool,

    #[serde(default)]
    pub style: Option<String>,

    #[serde(default)]
    pub explode: Option<bool>,

    #[serde(default)]
    pub schema: Option<Schema>,
}

/// Security scheme definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecuritySchemeDef {
    /// http, apiKey, oauth2 or openIdConnect
    #[serde(rename = "type")]
    pub scheme_type: String,

    #[serde(default)]
    pub description: Option<String>,

    /// Parameter name of an API key
    #[serde(default)]
    pub name: Option<String>,

    #[serde(rename = "in")]
    #[serde(default)]
    pub location: Option<String>,

    /// HTTP authorization scheme (basic, bearer, ...)
    #[serde(default)]
    pub scheme: Option<String>,

    #[serde(default)]
    pub flows: Option<OAuthFlows>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OAuthFlows {
    #[serde(default)]
    pub implicit: Option<OAuthFlow>,

    #[serde(default)]
    pub password: Option<OAuthFlow>,

    #[serde(rename = "clientCredentials")]
    #[serde(default)]
    pub client_credentials: Option<OAuthFlow>,

    #[serde(rename = "authorizationCode")]
    #[serde(default)]
    pub authorization_code: Option<OAuthFlow>,
}

impl OAuthFlows {
    /// First declared flow, named the way Swagger 2.0 names it
    pub fn first(&self) -> Option<(&'static str, &OAuthFlow)> {
        [
            ("implicit", &self.implicit),
            ("password", &self.password),
            ("application", &self.client_credentials),
            ("accessCode", &self.authorization_code),
        ]
        .into_iter()
        .find_map(|(name, flow)| flow.as_ref().map(|f| (name, f)))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OAuthFlow {
    #[serde(rename = "authorizationUrl")]
    #[serde(default)]
    pub authorization_url: Option<String>,

    #[serde(rename = "tokenUrl")]
    #[serde(default)]
    pub token_url: Option<String>,

    #[serde(default)]
    pub scopes: IndexMap<String, String>,
}
