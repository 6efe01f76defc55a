//! Resolved documentation model
//!
//! Everything here is produced once per load pass and is read-only
//! afterwards, apart from the controlled replacement performed by the
//! resource cache while a load is in progress.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Security grants keyed by scheme type (`basic`, `apiKey`, `oauth2`)
pub type SecurityMap = BTreeMap<String, Security>;

/// Root aggregate for one loaded API description
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Specification {
    /// Kebab-case identifier derived from `info.title`
    pub id: String,

    /// Location the document was loaded from
    pub url: String,

    /// API metadata
    pub info: Info,

    /// Groups of methods, in emission order
    pub groups: Vec<ApiGroup>,

    /// Security schemes keyed by their declared name
    pub security_definitions: BTreeMap<String, SecurityScheme>,

    /// Security applied to operations that declare none of their own
    pub default_security: Arc<SecurityMap>,

    /// Canonical resources, keyed by version then identifier
    pub resources: ResourceList,
}

impl Specification {
    /// Get an API group by name
    pub fn group_by_name(&self, name: &str) -> Option<&ApiGroup> {
        self.groups.iter().find(|g| g.name == name)
    }

    /// Get an API group by ID
    pub fn group_by_id(&self, id: &str) -> Option<&ApiGroup> {
        self.groups.iter().find(|g| g.id == id)
    }

    /// Look up the canonical resource a method or response links to
    pub fn resource(&self, key: &ResourceKey) -> Option<&Resource> {
        self.resources.get(&key.version, &key.id)
    }

    /// All canonical resources for one version
    pub fn resources_for_version(&self, version: &str) -> Option<&BTreeMap<String, Resource>> {
        self.resources.version(version)
    }

    /// Iterate over every method of every group
    pub fn methods(&self) -> impl Iterator<Item = &Method> {
        self.groups.iter().flat_map(|g| g.methods.iter())
    }
}

/// API information
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Info {
    pub title: String,
    pub description: String,
    pub version: String,
    pub contact_name: String,
    pub contact_url: String,
    pub contact_email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalDocs {
    pub description: String,
    pub url: String,
}

/// Field that may take part in a method sort key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    Path,
    Method,
    Operation,
    Navigation,
    Summary,
}

impl SortField {
    /// Order used when a document does not ask for one
    pub fn default_order() -> Vec<SortField> {
        vec![SortField::Path, SortField::Operation]
    }
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "path" => Ok(SortField::Path),
            "method" => Ok(SortField::Method),
            "operation" => Ok(SortField::Operation),
            "navigation" => Ok(SortField::Navigation),
            "summary" => Ok(SortField::Summary),
            other => Err(format!("Invalid sort-by value {}", other)),
        }
    }
}

/// A named collection of methods sharing a tag (or, when untagged, a path)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiGroup {
    pub id: String,
    pub name: String,
    pub description: String,
    pub url: Option<String>,
    pub external_docs: Option<ExternalDocs>,

    /// Present methods in navigation by summary rather than operation name
    pub method_navigation_by_name: bool,

    /// Fields concatenated into each method's sort key
    pub method_sort_by: Vec<SortField>,

    pub current_version: String,
    pub consumes: Vec<String>,
    pub produces: Vec<String>,
    pub methods: Vec<Method>,
}

impl ApiGroup {
    /// Build the sort key for a method of this group
    ///
    /// Requested fields are joined in order, each followed by `~`. With no
    /// fields requested the summary is used on its own.
    pub fn sort_key(
        &self,
        path: &str,
        method: &str,
        operation: &str,
        navigation: &str,
        summary: &str,
    ) -> String {
        let mut key = String::new();
        for field in &self.method_sort_by {
            key.push_str(match field {
                SortField::Path => path,
                SortField::Method => method,
                SortField::Operation => operation,
                SortField::Navigation => navigation,
                SortField::Summary => summary,
            });
            key.push('~');
        }
        if key.is_empty() {
            key = summary.to_string();
        }
        key
    }

    /// Stable-sort methods by their sort key
    pub fn sort_methods(&mut self) {
        self.methods.sort_by(|a, b| a.sort_key.cmp(&b.sort_key));
    }
}

/// One HTTP operation (path + verb)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Method {
    pub id: String,
    /// Operation summary
    pub name: String,
    pub description: String,
    /// Lower-case HTTP verb
    pub verb: String,
    pub operation_name: String,
    pub navigation_name: String,
    pub path: String,
    pub consumes: Vec<String>,
    pub produces: Vec<String>,
    pub path_params: Vec<Parameter>,
    pub query_params: Vec<Parameter>,
    pub header_params: Vec<Parameter>,
    pub form_params: Vec<Parameter>,
    pub body_param: Option<Parameter>,
    pub responses: BTreeMap<u16, Response>,
    pub default_response: Option<Response>,

    /// Canonical resources used by this method's responses
    pub resources: Vec<ResourceKey>,

    pub security: Arc<SecurityMap>,

    /// ID of the owning group
    pub group_id: String,

    pub sort_key: String,
    pub deprecated: bool,
}

impl Method {
    /// Non-owning reference recorded on the resources this method uses
    pub fn method_ref(&self) -> MethodRef {
        MethodRef {
            id: self.id.clone(),
            name: self.name.clone(),
            verb: self.verb.clone(),
            path: self.path.clone(),
        }
    }
}

/// Non-owning reference from a resource back to a method that uses it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodRef {
    pub id: String,
    pub name: String,
    pub verb: String,
    pub path: String,
}

/// Where a parameter is carried
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParameterLocation {
    Path,
    Query,
    Header,
    FormData,
    Body,
    Cookie,
}

impl FromStr for ParameterLocation {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "path" => Ok(ParameterLocation::Path),
            "query" => Ok(ParameterLocation::Query),
            "header" => Ok(ParameterLocation::Header),
            "formdata" => Ok(ParameterLocation::FormData),
            "body" => Ok(ParameterLocation::Body),
            "cookie" => Ok(ParameterLocation::Cookie),
            other => Err(format!("Unknown parameter location {}", other)),
        }
    }
}

impl fmt::Display for ParameterLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ParameterLocation::Path => "path",
            ParameterLocation::Query => "query",
            ParameterLocation::Header => "header",
            ParameterLocation::FormData => "formData",
            ParameterLocation::Body => "body",
            ParameterLocation::Cookie => "cookie",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub description: String,
    pub location: ParameterLocation,
    pub collection_format: Option<String>,
    pub collection_format_description: Option<String>,
    pub required: bool,
    pub type_label: TypeLabel,
    pub enum_values: Vec<String>,

    /// Request-filtered resource of an "in body" parameter
    pub resource: Option<Box<Resource>>,

    /// Canonical cache entry the body resource was linked to
    pub resource_key: Option<ResourceKey>,

    /// Body parameter is an array
    pub is_array: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Response {
    pub description: String,
    pub status_description: String,
    pub resource: Option<ResourceKey>,
    pub headers: Vec<Header>,
    pub is_array: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Header {
    pub name: String,
    pub description: String,
    pub type_label: TypeLabel,
    pub collection_format: Option<String>,
    pub collection_format_description: Option<String>,
    pub default: Option<String>,
    pub required: bool,
    pub enum_values: Vec<String>,
}

/// Human description of an array serialisation format
pub fn collection_format_description(format: &str) -> Option<&'static str> {
    match format {
        "csv" => Some("comma separated"),
        "ssv" => Some("space separated"),
        "tsv" => Some("tab separated"),
        "pipes" => Some("pipe separated"),
        "multi" => Some("multiple occurances"),
        _ => None,
    }
}

/// Outer kind of a type label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Primitive,
    Object,
    Array,
    Map,
}

/// Ordered type pair: the outer kind and, for arrays and maps of
/// primitives, the element type
///
/// Arrays of objects carry no element type; `inner` is only set when the
/// element is a primitive (or, for maps, when the value type is known).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeLabel {
    pub outer: String,
    pub inner: Option<String>,
}

impl TypeLabel {
    pub fn single(outer: impl Into<String>) -> Self {
        Self {
            outer: outer.into(),
            inner: None,
        }
    }

    pub fn pair(outer: impl Into<String>, inner: impl Into<String>) -> Self {
        Self {
            outer: outer.into(),
            inner: Some(inner.into()),
        }
    }

    pub fn kind(&self) -> TypeKind {
        match self.outer.to_ascii_lowercase().as_str() {
            "object" => TypeKind::Object,
            "array" => TypeKind::Array,
            "map" => TypeKind::Map,
            _ => TypeKind::Primitive,
        }
    }

    pub fn is_array(&self) -> bool {
        self.kind() == TypeKind::Array
    }

    /// True when either element of the pair is `name`
    pub fn contains(&self, name: &str) -> bool {
        self.outer == name || self.inner.as_deref() == Some(name)
    }

    /// The most specific element of the pair
    pub fn last(&self) -> &str {
        self.inner.as_deref().unwrap_or(&self.outer)
    }

    /// Replace the most specific element (used for `format` overrides)
    pub fn set_last(&mut self, value: impl Into<String>) {
        match self.inner.as_mut() {
            Some(inner) => *inner = value.into(),
            None => self.outer = value.into(),
        }
    }
}

impl fmt::Display for TypeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.kind(), self.inner.as_deref()) {
            (TypeKind::Array, Some(inner)) => write!(f, "array of {}", inner),
            (TypeKind::Array, None) => write!(f, "array of object"),
            (TypeKind::Map, Some(inner)) => write!(f, "map of {}", inner),
            (TypeKind::Map, None) => write!(f, "map of object"),
            _ => write!(f, "{}", self.outer),
        }
    }
}

/// Where a resource was first observed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResourceOrigin {
    #[default]
    RequestBody,
    MethodResponse,
}

/// Cache key of a canonical resource
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ResourceKey {
    pub version: String,
    pub id: String,
}

/// Normalized representation of one schema type
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Resource {
    /// Kebab-case identifier
    pub id: String,

    /// Ancestor identifiers locating this resource inside a nested structure
    pub fqns: Vec<String>,

    pub title: String,
    pub description: String,

    /// Declared example, serialized verbatim
    pub example: Option<String>,

    /// Synthesized example of the whole body or response this resource roots
    pub schema: Option<String>,

    pub type_label: TypeLabel,
    pub properties: BTreeMap<String, Resource>,
    pub required: bool,
    pub read_only: bool,

    /// Operation names this property is left out of in request bodies
    pub exclude_from_operations: Vec<String>,

    /// Methods using this resource, keyed by method ID
    pub methods: BTreeMap<String, MethodRef>,

    pub enum_values: Vec<String>,
    pub origin: ResourceOrigin,
}

impl Resource {
    pub fn key(&self, version: &str) -> ResourceKey {
        ResourceKey {
            version: version.to_string(),
            id: self.id.clone(),
        }
    }
}

/// Canonical resources of a specification, keyed by version then identifier
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourceList {
    versions: BTreeMap<String, BTreeMap<String, Resource>>,
}

impl ResourceList {
    pub fn get(&self, version: &str, id: &str) -> Option<&Resource> {
        self.versions.get(version).and_then(|v| v.get(id))
    }

    pub fn get_mut(&mut self, version: &str, id: &str) -> Option<&mut Resource> {
        self.versions.get_mut(version).and_then(|v| v.get_mut(id))
    }

    pub fn version(&self, version: &str) -> Option<&BTreeMap<String, Resource>> {
        self.versions.get(version)
    }

    /// Store `resource` under its identifier, returning what it replaced
    pub fn insert(&mut self, version: &str, resource: Resource) -> Option<Resource> {
        self.versions
            .entry(version.to_string())
            .or_default()
            .insert(resource.id.clone(), resource)
    }

    pub fn versions(&self) -> impl Iterator<Item = &str> {
        self.versions.keys().map(String::as_str)
    }

    /// Total number of cached resources across all versions
    pub fn len(&self) -> usize {
        self.versions.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Kind of authentication mechanism
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SecurityType {
    #[serde(rename = "basic")]
    Basic,
    #[serde(rename = "apiKey")]
    ApiKey,
    #[serde(rename = "oauth2")]
    OAuth2,
}

impl SecurityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SecurityType::Basic => "basic",
            SecurityType::ApiKey => "apiKey",
            SecurityType::OAuth2 => "oauth2",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuth2Scheme {
    /// implicit, password, application or accessCode
    pub flow: String,
    pub authorization_url: String,
    pub token_url: String,
    pub scopes: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityScheme {
    pub scheme_type: SecurityType,
    pub description: String,
    /// Name of the header or query parameter carrying an API key
    pub param_name: String,
    /// `query` or `header`
    pub param_location: String,
    pub oauth2: Option<OAuth2Scheme>,
}

impl SecurityScheme {
    pub fn is_api_key(&self) -> bool {
        self.scheme_type == SecurityType::ApiKey
    }

    pub fn is_basic(&self) -> bool {
        self.scheme_type == SecurityType::Basic
    }

    pub fn is_oauth2(&self) -> bool {
        self.scheme_type == SecurityType::OAuth2
    }
}

/// Scheme granted to an operation, with the scopes it requires
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Security {
    pub scheme: SecurityScheme,
    pub scopes: BTreeMap<String, String>,
}
