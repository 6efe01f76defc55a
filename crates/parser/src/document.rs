//! Dialect-neutral document representation
//!
//! The 2.x and 3.x adapters project their native trees into [`ApiDocument`];
//! the builder only ever reads this form.

use crate::schema::SchemaNode;
use apidox_common::{ExternalDocs, Info, ParameterLocation, SecurityScheme};
use indexmap::IndexMap;
use serde_json::Value;
use std::collections::BTreeMap;

/// Verbs in the order operations of a path are visited
pub const VERBS: [&str; 7] = ["get", "post", "put", "delete", "head", "options", "patch"];

/// Scheme name to required scopes, one alternative of a security list
pub type SecurityRequirement = BTreeMap<String, Vec<String>>;

/// One API description, in neutral form
#[derive(Debug, Clone, Default)]
pub struct ApiDocument {
    /// Location the document was loaded from
    pub url: String,

    pub info: Info,

    /// Base URL of the described API
    pub base_url: Option<String>,

    pub consumes: Vec<String>,
    pub produces: Vec<String>,
    pub tags: Vec<TagDef>,

    /// Paths in document order, already prefixed with any base path
    pub paths: IndexMap<String, PathDef>,

    pub security_definitions: BTreeMap<String, SecurityScheme>,

    /// Document-wide security requirement
    pub security: Vec<SecurityRequirement>,

    /// `x-navigateMethodsByName`
    pub navigate_methods_by_name: Option<bool>,

    /// `x-sortMethodsBy`, unvalidated
    pub sort_methods_by: Option<Vec<String>>,

    /// Properties are titled by their property name
    pub property_titles: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagDef {
    pub name: String,
    pub description: String,
    pub external_docs: Option<ExternalDocs>,
}

#[derive(Debug, Clone, Default)]
pub struct PathDef {
    /// `x-version`
    pub version: Option<String>,

    /// `x-pathName`
    pub path_name: Option<String>,

    /// Operations in [`VERBS`] order
    pub operations: Vec<OperationDef>,
}

impl PathDef {
    /// Add an operation, keeping [`VERBS`] order
    pub fn push_operation(&mut self, operation: OperationDef) {
        let rank = |verb: &str| VERBS.iter().position(|v| *v == verb).unwrap_or(VERBS.len());
        let at = self
            .operations
            .iter()
            .position(|op| rank(&op.verb) > rank(&operation.verb))
            .unwrap_or(self.operations.len());
        self.operations.insert(at, operation);
    }
}

#[derive(Debug, Clone, Default)]
pub struct OperationDef {
    /// Lower-case HTTP verb
    pub verb: String,
    pub operation_id: Option<String>,

    /// `x-operationName`
    pub operation_name: Option<String>,

    pub summary: Option<String>,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub consumes: Vec<String>,
    pub produces: Vec<String>,

    /// Operation parameters merged with the path item's
    pub parameters: Vec<ParameterDef>,

    /// `None` when the operation has no responses member
    pub responses: Option<ResponsesDef>,

    /// `None` when the operation does not override document security
    pub security: Option<Vec<SecurityRequirement>>,

    pub deprecated: bool,
}

/// Type of a non-body parameter or header
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimpleType {
    pub schema_type: Option<String>,
    pub format: Option<String>,
    pub items: Option<Box<SimpleType>>,
    pub collection_format: Option<String>,
    pub enum_values: Vec<Value>,
    pub default: Option<Value>,
}

#[derive(Debug, Clone)]
pub struct ParameterDef {
    pub name: String,
    pub location: ParameterLocation,
    pub description: Option<String>,
    pub required: bool,
    pub simple: SimpleType,

    /// Schema of an `in: body` parameter
    pub schema: Option<SchemaNode>,

    /// Definition name of the body schema
    pub schema_name: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ResponsesDef {
    pub default: Option<ResponseDef>,

    /// Keyed by status code as written in the document
    pub statuses: IndexMap<String, ResponseDef>,
}

#[derive(Debug, Clone, Default)]
pub struct ResponseDef {
    pub description: String,
    pub schema: Option<SchemaNode>,

    /// Definition name of the response schema
    pub schema_name: Option<String>,

    pub headers: IndexMap<String, HeaderDef>,
}

#[derive(Debug, Clone, Default)]
pub struct HeaderDef {
    pub description: String,
    pub required: bool,
    pub simple: SimpleType,
}

/// Merge path-level parameters into an operation's own list
///
/// An operation parameter overrides a path parameter with the same name and
/// location.
pub fn merge_parameters(path_level: &[ParameterDef], own: Vec<ParameterDef>) -> Vec<ParameterDef> {
    let mut merged: Vec<ParameterDef> = path_level
        .iter()
        .filter(|p| {
            !own.iter()
                .any(|o| o.name == p.name && o.location == p.location)
        })
        .cloned()
        .collect();
    merged.extend(own);
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn op(verb: &str) -> OperationDef {
        OperationDef {
            verb: verb.to_string(),
            ..Default::default()
        }
    }

    fn param(name: &str, location: ParameterLocation, description: &str) -> ParameterDef {
        ParameterDef {
            name: name.to_string(),
            location,
            description: Some(description.to_string()),
            required: false,
            simple: SimpleType::default(),
            schema: None,
            schema_name: None,
        }
    }

    #[test]
    fn test_push_operation_keeps_verb_order() {
        let mut path = PathDef::default();
        for verb in ["patch", "get", "delete", "post"] {
            path.push_operation(op(verb));
        }
        let verbs: Vec<&str> = path.operations.iter().map(|o| o.verb.as_str()).collect();
        assert_eq!(verbs, vec!["get", "post", "delete", "patch"]);
    }

    #[test]
    fn test_merge_parameters_operation_wins() {
        let path_level = vec![
            param("id", ParameterLocation::Path, "path level"),
            param("id", ParameterLocation::Query, "query level"),
        ];
        let own = vec![param("id", ParameterLocation::Path, "operation level")];

        let merged = merge_parameters(&path_level, own);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].location, ParameterLocation::Query);
        assert_eq!(merged[1].description.as_deref(), Some("operation level"));
    }
}
