//! Converter from OpenAPI 3.x to the neutral document form
//!
//! Request bodies become a `body` parameter and media-type content is
//! collapsed onto its first entry, so the builder sees the same shape a
//! Swagger 2.0 document produces.

use super::types::*;
use crate::document::{
    merge_parameters, ApiDocument, HeaderDef, OperationDef, ParameterDef, PathDef, ResponseDef,
    ResponsesDef, SimpleType,
};
use crate::extensions;
use crate::reference::REF_NAME;
use crate::schema::SchemaNode;
use crate::swagger::{convert_info, convert_requirement, convert_tag, project_schema};
use apidox_common::{
    OAuth2Scheme, ParameterLocation, Result, SecurityScheme, SecurityType, SpecError,
};
use indexmap::IndexMap;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Convert an OpenAPI document into neutral form
pub fn convert_openapi_to_document(spec: &OpenApiSpec, url: &str) -> Result<ApiDocument> {
    debug!(url, paths = spec.paths.len(), "Converting OpenAPI 3.x document");

    let mut paths = IndexMap::new();
    for (path, item) in &spec.paths {
        paths.insert(path.clone(), convert_path(path, item)?);
    }

    let security_definitions = spec
        .components
        .as_ref()
        .map(|c| convert_security_schemes(&c.security_schemes))
        .unwrap_or_default();

    Ok(ApiDocument {
        url: url.to_string(),
        info: convert_info(&spec.info),
        base_url: spec
            .servers
            .first()
            .map(|s| s.url.trim_end_matches('/').to_string()),
        consumes: Vec::new(),
        produces: Vec::new(),
        tags: spec.tags.iter().map(convert_tag).collect(),
        paths,
        security_definitions,
        security: spec.security.iter().map(convert_requirement).collect(),
        navigate_methods_by_name: extensions::boolean(
            &spec.extensions,
            extensions::NAVIGATE_METHODS_BY_NAME,
        ),
        sort_methods_by: extensions::string_list(&spec.extensions, extensions::SORT_METHODS_BY),
        property_titles: true,
    })
}

fn convert_security_schemes(
    schemes: &IndexMap<String, SecuritySchemeDef>,
) -> BTreeMap<String, SecurityScheme> {
    let mut converted = BTreeMap::new();

    for (name, def) in schemes {
        let (scheme_type, oauth2) = match def.scheme_type.as_str() {
            "http" if def.scheme.as_deref().is_some_and(|s| s.eq_ignore_ascii_case("basic")) => {
                (SecurityType::Basic, None)
            }
            "apiKey" => (SecurityType::ApiKey, None),
            "oauth2" => {
                let Some((flow, details)) = def.flows.as_ref().and_then(OAuthFlows::first) else {
                    warn!(scheme = %name, "Skipping oauth2 security scheme without flows");
                    continue;
                };
                let oauth2 = OAuth2Scheme {
                    flow: flow.to_string(),
                    authorization_url: details.authorization_url.clone().unwrap_or_default(),
                    token_url: details.token_url.clone().unwrap_or_default(),
                    scopes: details
                        .scopes
                        .iter()
                        .map(|(k, v)| (k.clone(), v.clone()))
                        .collect(),
                };
                (SecurityType::OAuth2, Some(oauth2))
            }
            other => {
                warn!(
                    scheme = %name,
                    scheme_type = other,
                    http_scheme = ?def.scheme,
                    "Skipping unsupported security scheme"
                );
                continue;
            }
        };

        converted.insert(
            name.clone(),
            SecurityScheme {
                scheme_type,
                description: def.description.clone().unwrap_or_default(),
                param_name: def.name.clone().unwrap_or_default(),
                param_location: def.location.clone().unwrap_or_default(),
                oauth2,
            },
        );
    }

    converted
}

fn convert_path(path: &str, item: &PathItem) -> Result<PathDef> {
    let shared = item
        .parameters
        .iter()
        .map(convert_parameter)
        .collect::<Result<Vec<_>>>()?;

    let mut converted = PathDef {
        version: extensions::string(&item.extensions, extensions::VERSION),
        path_name: extensions::string(&item.extensions, extensions::PATH_NAME),
        operations: Vec::new(),
    };

    for (verb, operation) in item.operations() {
        converted.push_operation(convert_operation(path, verb, operation, &shared)?);
    }

    Ok(converted)
}

fn convert_operation(
    path: &str,
    verb: &str,
    operation: &Operation,
    shared: &[ParameterDef],
) -> Result<OperationDef> {
    let mut own = operation
        .parameters
        .iter()
        .map(convert_parameter)
        .collect::<Result<Vec<_>>>()?;

    let mut consumes = Vec::new();
    if let Some(body) = &operation.request_body {
        consumes.extend(body.content.keys().cloned());
        match body_parameter(body) {
            Some(param) => own.push(param),
            None => warn!(verb, path, "Request body has no schema, not documenting it"),
        }
    }

    let mut produces: Vec<String> = Vec::new();
    for response in operation.responses.iter().flat_map(|r| r.values()) {
        for media_type in response.content.keys() {
            if !produces.contains(media_type) {
                produces.push(media_type.clone());
            }
        }
    }

    Ok(OperationDef {
        verb: verb.to_string(),
        operation_id: operation.operation_id.clone(),
        operation_name: extensions::string(&operation.extensions, extensions::OPERATION_NAME),
        summary: operation.summary.clone(),
        description: operation.description.clone(),
        tags: operation.tags.clone(),
        consumes,
        produces,
        parameters: merge_parameters(shared, own),
        responses: operation.responses.as_ref().map(convert_responses),
        security: operation
            .security
            .as_ref()
            .map(|reqs| reqs.iter().map(convert_requirement).collect()),
        deprecated: operation.deprecated,
    })
}

/// Schema of the first media type declared by `content`
fn first_schema(content: &IndexMap<String, MediaType>) -> Option<&Schema> {
    content.values().next().and_then(|m| m.schema.as_ref())
}

fn schema_node(schema: &Schema) -> SchemaNode {
    project_schema(schema, true)
}

fn ref_name(schema: &Schema) -> Option<String> {
    extensions::string(&schema.extensions, REF_NAME)
}

fn body_parameter(body: &RequestBody) -> Option<ParameterDef> {
    let schema = first_schema(&body.content)?;
    Some(ParameterDef {
        name: "body".to_string(),
        location: ParameterLocation::Body,
        description: body.description.clone(),
        required: body.required,
        simple: SimpleType::default(),
        schema: Some(schema_node(schema)),
        schema_name: ref_name(schema),
    })
}

fn convert_parameter(param: &Parameter) -> Result<ParameterDef> {
    let location: ParameterLocation = param.location.parse().map_err(|e: String| {
        SpecError::Parse(format!("Parameter '{}': {}", param.name, e))
    })?;

    let simple = param
        .schema
        .as_ref()
        .map(|s| simple_type(s, &location, param.style.as_deref(), param.explode))
        .unwrap_or_default();

    Ok(ParameterDef {
        name: param.name.clone(),
        location,
        description: param.description.clone(),
        required: param.required,
        simple,
        schema: None,
        schema_name: None,
    })
}

/// Flatten a parameter or header schema into a [`SimpleType`]
///
/// Arrays get the collection format their serialization style implies.
fn simple_type(
    schema: &Schema,
    location: &ParameterLocation,
    style: Option<&str>,
    explode: Option<bool>,
) -> SimpleType {
    let schema_type = schema.schema_type.as_ref().and_then(|t| t.first());
    let is_array = schema_type == Some("array");

    SimpleType {
        schema_type: schema_type.map(str::to_string),
        format: schema.format.clone(),
        items: schema
            .items
            .as_ref()
            .and_then(|i| i.first())
            .map(|i| Box::new(simple_type(i, location, None, None))),
        collection_format: is_array
            .then(|| collection_format(location, style, explode))
            .flatten(),
        enum_values: schema.enum_values.clone(),
        default: schema.default.clone(),
    }
}

/// Collection format equivalent of a serialization style
fn collection_format(
    location: &ParameterLocation,
    style: Option<&str>,
    explode: Option<bool>,
) -> Option<String> {
    let style = style.unwrap_or(match location {
        ParameterLocation::Query | ParameterLocation::Cookie => "form",
        _ => "simple",
    });
    let explode = explode.unwrap_or(style == "form");

    let format = match (style, explode) {
        ("form", true) => "multi",
        ("form", false) | ("simple", _) => "csv",
        ("spaceDelimited", _) => "ssv",
        ("pipeDelimited", _) => "pipes",
        (other, _) => {
            warn!(style = other, "No collection format for serialization style");
            return None;
        }
    };
    Some(format.to_string())
}

fn convert_responses(responses: &IndexMap<String, Response>) -> ResponsesDef {
    let mut converted = ResponsesDef::default();
    for (status, response) in responses {
        if status == "default" {
            converted.default = Some(convert_response(response));
        } else {
            converted
                .statuses
                .insert(status.clone(), convert_response(response));
        }
    }
    converted
}

fn convert_response(response: &Response) -> ResponseDef {
    let schema = first_schema(&response.content);
    ResponseDef {
        description: response.description.clone(),
        schema: schema.map(schema_node),
        schema_name: schema.and_then(ref_name),
        headers: response
            .headers
            .iter()
            .map(|(name, header)| {
                let simple = header
                    .schema
                    .as_ref()
                    .map(|s| {
                        let style = header.style.as_deref();
                        simple_type(s, &ParameterLocation::Header, style, header.explode)
                    })
                    .unwrap_or_default();
                (
                    name.clone(),
                    HeaderDef {
                        description: header.description.clone().unwrap_or_default(),
                        required: header.required,
                        simple,
                    },
                )
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn spec(json: &str) -> OpenApiSpec {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_servers_and_paths() {
        let s = spec(
            r#"{
                "openapi": "3.0.3",
                "info": {"title": "Pets", "version": "1.0"},
                "servers": [{"url": "https://api.example.com/v1/"}, {"url": "http://other"}],
                "paths": {"/pets": {"get": {"responses": {}}}}
            }"#,
        );
        let doc = convert_openapi_to_document(&s, "pets.json").unwrap();
        assert_eq!(doc.base_url.as_deref(), Some("https://api.example.com/v1"));
        assert_eq!(doc.paths.keys().collect::<Vec<_>>(), vec!["/pets"]);
    }

    #[test]
    fn test_request_body_becomes_body_parameter() {
        let s = spec(
            r#"{
                "openapi": "3.0.3",
                "info": {"title": "Pets", "version": "1.0"},
                "paths": {
                    "/pets": {
                        "post": {
                            "requestBody": {
                                "description": "Pet to add",
                                "required": true,
                                "content": {
                                    "application/json": {
                                        "schema": {"type": "object", "x-ref-name": "NewPet"}
                                    }
                                }
                            },
                            "responses": {
                                "201": {
                                    "description": "Created",
                                    "content": {"application/json": {"schema": {"type": "object", "x-ref-name": "Pet"}}}
                                }
                            }
                        }
                    }
                }
            }"#,
        );
        let doc = convert_openapi_to_document(&s, "pets.json").unwrap();
        let op = &doc.paths["/pets"].operations[0];

        assert_eq!(op.consumes, vec!["application/json"]);
        assert_eq!(op.produces, vec!["application/json"]);

        let body = &op.parameters[0];
        assert_eq!(body.location, ParameterLocation::Body);
        assert_eq!(body.name, "body");
        assert!(body.required);
        assert_eq!(body.schema_name.as_deref(), Some("NewPet"));
        assert_eq!(
            body.schema.as_ref().and_then(|s| s.title.as_deref()),
            Some("NewPet")
        );

        let created = &op.responses.as_ref().unwrap().statuses["201"];
        assert_eq!(created.schema_name.as_deref(), Some("Pet"));
    }

    #[test]
    fn test_body_without_schema_is_skipped() {
        let s = spec(
            r#"{
                "openapi": "3.0.3",
                "info": {"title": "Pets", "version": "1.0"},
                "paths": {
                    "/upload": {
                        "put": {
                            "requestBody": {"content": {"application/octet-stream": {}}},
                            "responses": {}
                        }
                    }
                }
            }"#,
        );
        let doc = convert_openapi_to_document(&s, "pets.json").unwrap();
        let op = &doc.paths["/upload"].operations[0];
        assert!(op.parameters.is_empty());
        assert_eq!(op.consumes, vec!["application/octet-stream"]);
    }

    #[test]
    fn test_collection_formats() {
        let q = ParameterLocation::Query;
        let h = ParameterLocation::Header;
        assert_eq!(collection_format(&q, None, None).as_deref(), Some("multi"));
        assert_eq!(collection_format(&q, None, Some(false)).as_deref(), Some("csv"));
        assert_eq!(collection_format(&h, None, None).as_deref(), Some("csv"));
        assert_eq!(collection_format(&q, Some("spaceDelimited"), None).as_deref(), Some("ssv"));
        assert_eq!(collection_format(&q, Some("pipeDelimited"), None).as_deref(), Some("pipes"));
        assert_eq!(collection_format(&q, Some("deepObject"), None), None);
    }

    #[test]
    fn test_parameter_schema_flattened() {
        let param: Parameter = serde_json::from_str(
            r#"{
                "name": "tags",
                "in": "query",
                "schema": {"type": "array", "items": {"type": "string", "enum": ["a", "b"]}}
            }"#,
        )
        .unwrap();

        let def = convert_parameter(&param).unwrap();
        assert_eq!(def.simple.schema_type.as_deref(), Some("array"));
        assert_eq!(def.simple.collection_format.as_deref(), Some("multi"));
        let items = def.simple.items.unwrap();
        assert_eq!(items.schema_type.as_deref(), Some("string"));
        assert_eq!(items.enum_values.len(), 2);
        assert_eq!(items.collection_format, None);
    }

    #[test]
    fn test_security_schemes() {
        let s = spec(
            r#"{
                "openapi": "3.0.3",
                "info": {"title": "Pets", "version": "1.0"},
                "paths": {},
                "components": {
                    "securitySchemes": {
                        "basic": {"type": "http", "scheme": "basic"},
                        "bearer": {"type": "http", "scheme": "bearer"},
                        "key": {"type": "apiKey", "name": "api_key", "in": "query"},
                        "oauth": {
                            "type": "oauth2",
                            "flows": {
                                "password": {"tokenUrl": "https://token", "scopes": {"read": "Read"}}
                            }
                        },
                        "oidc": {"type": "openIdConnect"}
                    }
                }
            }"#,
        );
        let doc = convert_openapi_to_document(&s, "pets.json").unwrap();
        let names: Vec<&String> = doc.security_definitions.keys().collect();
        assert_eq!(names, vec!["basic", "key", "oauth"]);

        assert!(doc.security_definitions["basic"].is_basic());
        assert_eq!(doc.security_definitions["key"].param_location, "query");
        let oauth = doc.security_definitions["oauth"].oauth2.as_ref().unwrap();
        assert_eq!(oauth.flow, "password");
        assert_eq!(oauth.token_url, "https://token");
    }
}
