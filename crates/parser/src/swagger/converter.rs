//! Converter from Swagger 2.0 to the neutral document form

use super::types::*;
use crate::document::{
    merge_parameters, ApiDocument, HeaderDef, OperationDef, ParameterDef, PathDef, ResponseDef,
    ResponsesDef, SecurityRequirement, SimpleType, TagDef,
};
use crate::extensions;
use crate::reference::REF_NAME;
use crate::schema::SchemaNode;
use apidox_common::{
    Info as SpecInfo, OAuth2Scheme, ParameterLocation, Result, SecurityScheme, SecurityType,
    SpecError,
};
use indexmap::IndexMap;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Convert a Swagger document into neutral form
pub fn convert_swagger_to_document(spec: &SwaggerSpec, url: &str) -> Result<ApiDocument> {
    debug!(url, paths = spec.paths.len(), "Converting Swagger 2.0 document");

    let mut paths = IndexMap::new();
    for (path, item) in &spec.paths {
        paths.insert(full_path(spec.base_path.as_deref(), path), convert_path(item)?);
    }

    Ok(ApiDocument {
        url: url.to_string(),
        info: convert_info(&spec.info),
        base_url: base_url(spec),
        consumes: spec.consumes.clone(),
        produces: spec.produces.clone(),
        tags: spec.tags.iter().map(convert_tag).collect(),
        paths,
        security_definitions: convert_security_definitions(&spec.security_definitions),
        security: spec.security.iter().map(convert_requirement).collect(),
        navigate_methods_by_name: extensions::boolean(
            &spec.extensions,
            extensions::NAVIGATE_METHODS_BY_NAME,
        ),
        sort_methods_by: extensions::string_list(&spec.extensions, extensions::SORT_METHODS_BY),
        property_titles: false,
    })
}

/// Prefix `path` with the document base path, unless that is the root
fn full_path(base_path: Option<&str>, path: &str) -> String {
    match base_path.map(|b| b.trim_end_matches('/')) {
        Some(base) if !base.is_empty() => format!("{}{}", base, path),
        _ => path.to_string(),
    }
}

fn base_url(spec: &SwaggerSpec) -> Option<String> {
    let host = spec.host.as_deref()?;
    let scheme = spec.schemes.first().map(String::as_str).unwrap_or("http");
    Some(format!("{}://{}", scheme, host))
}

pub(crate) fn convert_info(info: &Info) -> SpecInfo {
    let contact = info.contact.clone().unwrap_or_default();
    SpecInfo {
        title: info.title.clone(),
        description: info.description.clone().unwrap_or_default(),
        version: info.version.clone(),
        contact_name: contact.name.unwrap_or_default(),
        contact_url: contact.url.unwrap_or_default(),
        contact_email: contact.email.unwrap_or_default(),
    }
}

pub(crate) fn convert_tag(tag: &Tag) -> TagDef {
    TagDef {
        name: tag.name.clone(),
        description: tag.description.clone().unwrap_or_default(),
        external_docs: tag.external_docs.as_ref().map(|d| apidox_common::ExternalDocs {
            description: d.description.clone().unwrap_or_default(),
            url: d.url.clone(),
        }),
    }
}

pub(crate) fn convert_requirement(requirement: &IndexMap<String, Vec<String>>) -> SecurityRequirement {
    requirement
        .iter()
        .map(|(name, scopes)| (name.clone(), scopes.clone()))
        .collect()
}

fn convert_security_definitions(
    definitions: &IndexMap<String, SecurityDefinition>,
) -> BTreeMap<String, SecurityScheme> {
    let mut schemes = BTreeMap::new();

    for (name, def) in definitions {
        let scheme_type = match def.scheme_type.as_str() {
            "basic" => SecurityType::Basic,
            "apiKey" => SecurityType::ApiKey,
            "oauth2" => SecurityType::OAuth2,
            other => {
                warn!(scheme = %name, scheme_type = other, "Skipping unsupported security scheme");
                continue;
            }
        };

        let oauth2 = (scheme_type == SecurityType::OAuth2).then(|| OAuth2Scheme {
            flow: def.flow.clone().unwrap_or_default(),
            authorization_url: def.authorization_url.clone().unwrap_or_default(),
            token_url: def.token_url.clone().unwrap_or_default(),
            scopes: def
                .scopes
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        });

        schemes.insert(
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

    schemes
}

fn convert_path(item: &PathItem) -> Result<PathDef> {
    let shared = item
        .parameters
        .iter()
        .map(convert_parameter)
        .collect::<Result<Vec<_>>>()?;

    let mut path = PathDef {
        version: extensions::string(&item.extensions, extensions::VERSION),
        path_name: extensions::string(&item.extensions, extensions::PATH_NAME),
        operations: Vec::new(),
    };

    for (verb, operation) in item.operations() {
        path.push_operation(convert_operation(verb, operation, &shared)?);
    }

    Ok(path)
}

fn convert_operation(
    verb: &str,
    operation: &Operation,
    shared: &[ParameterDef],
) -> Result<OperationDef> {
    let own = operation
        .parameters
        .iter()
        .map(convert_parameter)
        .collect::<Result<Vec<_>>>()?;

    Ok(OperationDef {
        verb: verb.to_string(),
        operation_id: operation.operation_id.clone(),
        operation_name: extensions::string(&operation.extensions, extensions::OPERATION_NAME),
        summary: operation.summary.clone(),
        description: operation.description.clone(),
        tags: operation.tags.clone(),
        consumes: operation.consumes.clone(),
        produces: operation.produces.clone(),
        parameters: merge_parameters(shared, own),
        responses: operation.responses.as_ref().map(convert_responses),
        security: operation
            .security
            .as_ref()
            .map(|reqs| reqs.iter().map(convert_requirement).collect()),
        deprecated: operation.deprecated,
    })
}

fn convert_parameter(param: &Parameter) -> Result<ParameterDef> {
    let location: ParameterLocation = param.location.parse().map_err(|e: String| {
        SpecError::Parse(format!("Parameter '{}': {}", param.name, e))
    })?;

    Ok(ParameterDef {
        name: param.name.clone(),
        location,
        description: param.description.clone(),
        required: param.required,
        simple: SimpleType {
            schema_type: param.param_type.clone(),
            format: param.format.clone(),
            items: param.items.as_ref().map(|i| Box::new(convert_items(i))),
            collection_format: param.collection_format.clone(),
            enum_values: param.enum_values.clone(),
            default: param.default.clone(),
        },
        schema: param.schema.as_ref().map(convert_schema),
        schema_name: None,
    })
}

fn convert_items(items: &Items) -> SimpleType {
    SimpleType {
        schema_type: items.item_type.clone(),
        format: items.format.clone(),
        items: items.items.as_deref().map(|i| Box::new(convert_items(i))),
        collection_format: items.collection_format.clone(),
        enum_values: items.enum_values.clone(),
        default: items.default.clone(),
    }
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
    ResponseDef {
        description: response.description.clone(),
        schema: response.schema.as_ref().map(convert_schema),
        schema_name: None,
        headers: response
            .headers
            .iter()
            .map(|(name, header)| {
                (
                    name.clone(),
                    HeaderDef {
                        description: header.description.clone().unwrap_or_default(),
                        required: false,
                        simple: convert_items(&header.items),
                    },
                )
            })
            .collect(),
    }
}

/// Project a Swagger schema into a [`SchemaNode`]
pub fn convert_schema(schema: &Schema) -> SchemaNode {
    project_schema(schema, false)
}

/// Project a schema, optionally naming untitled nodes after the definition
/// they were expanded from
pub(crate) fn project_schema(schema: &Schema, ref_titles: bool) -> SchemaNode {
    let project = |s: &Schema| project_schema(s, ref_titles);

    let title = schema.title.clone().or_else(|| {
        ref_titles
            .then(|| extensions::string(&schema.extensions, REF_NAME))
            .flatten()
    });

    SchemaNode {
        schema_type: schema
            .schema_type
            .as_ref()
            .and_then(SchemaType::first)
            .map(str::to_string),
        format: schema.format.clone(),
        title,
        description: schema.description.clone(),
        items: schema
            .items
            .as_ref()
            .and_then(SchemaItems::first)
            .map(|s| Box::new(project(s))),
        properties: schema
            .properties
            .iter()
            .map(|(name, s)| (name.clone(), project(s)))
            .collect(),
        required: schema.required.clone(),
        additional_properties: schema
            .additional_properties
            .as_ref()
            .and_then(AdditionalProperties::schema)
            .map(|s| Box::new(project(s))),
        all_of: schema.all_of.iter().map(project).collect(),
        enum_values: schema.enum_values.clone(),
        example: schema.example.clone(),
        read_only: schema.read_only,
        exclude_from_operations: extensions::string_list(
            &schema.extensions,
            extensions::EXCLUDE_FROM_OPERATIONS,
        )
        .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn spec(json: &str) -> SwaggerSpec {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_base_path_and_url() {
        let s = spec(
            r#"{
                "swagger": "2.0",
                "info": {"title": "Pets", "version": "1.0"},
                "host": "api.example.com",
                "schemes": ["https"],
                "basePath": "/v1/",
                "paths": {"/pets": {"get": {"responses": {}}}}
            }"#,
        );
        let doc = convert_swagger_to_document(&s, "pets.json").unwrap();
        assert_eq!(doc.base_url.as_deref(), Some("https://api.example.com"));
        assert_eq!(doc.paths.keys().collect::<Vec<_>>(), vec!["/v1/pets"]);
    }

    #[test]
    fn test_root_base_path_is_not_prefixed() {
        assert_eq!(full_path(Some("/"), "/pets"), "/pets");
        assert_eq!(full_path(None, "/pets"), "/pets");
        assert_eq!(full_path(Some("/api"), "/pets"), "/api/pets");
    }

    #[test]
    fn test_extensions_are_read() {
        let s = spec(
            r#"{
                "swagger": "2.0",
                "info": {"title": "Pets", "version": "1.0"},
                "x-navigateMethodsByName": true,
                "x-sortMethodsBy": ["summary"],
                "paths": {
                    "/pets": {
                        "x-version": "v2",
                        "x-pathName": "Pet Collection",
                        "get": {"x-operationName": "list", "responses": {}}
                    }
                }
            }"#,
        );
        let doc = convert_swagger_to_document(&s, "pets.json").unwrap();
        assert_eq!(doc.navigate_methods_by_name, Some(true));
        assert_eq!(doc.sort_methods_by, Some(vec!["summary".to_string()]));

        let path = &doc.paths["/pets"];
        assert_eq!(path.version.as_deref(), Some("v2"));
        assert_eq!(path.path_name.as_deref(), Some("Pet Collection"));
        assert_eq!(path.operations[0].operation_name.as_deref(), Some("list"));
    }

    #[test]
    fn test_responses_split_default() {
        let s = spec(
            r#"{
                "swagger": "2.0",
                "info": {"title": "Pets", "version": "1.0"},
                "paths": {
                    "/pets": {
                        "get": {
                            "responses": {
                                "200": {"description": "OK"},
                                "default": {"description": "Error"}
                            }
                        },
                        "post": {}
                    }
                }
            }"#,
        );
        let doc = convert_swagger_to_document(&s, "pets.json").unwrap();
        let ops = &doc.paths["/pets"].operations;

        let responses = ops[0].responses.as_ref().unwrap();
        assert_eq!(responses.statuses.len(), 1);
        assert_eq!(responses.default.as_ref().unwrap().description, "Error");
        assert!(ops[1].responses.is_none());
    }

    #[test]
    fn test_unknown_parameter_location() {
        let s = spec(
            r#"{
                "swagger": "2.0",
                "info": {"title": "Pets", "version": "1.0"},
                "paths": {
                    "/pets": {
                        "get": {
                            "parameters": [{"name": "q", "in": "matrix"}],
                            "responses": {}
                        }
                    }
                }
            }"#,
        );
        assert!(matches!(
            convert_swagger_to_document(&s, "pets.json"),
            Err(SpecError::Parse(_))
        ));
    }

    #[test]
    fn test_security_definitions() {
        let s = spec(
            r#"{
                "swagger": "2.0",
                "info": {"title": "Pets", "version": "1.0"},
                "securityDefinitions": {
                    "key": {"type": "apiKey", "name": "X-Key", "in": "header"},
                    "oauth": {
                        "type": "oauth2",
                        "flow": "implicit",
                        "authorizationUrl": "https://auth.example.com",
                        "scopes": {"read": "Read access"}
                    },
                    "odd": {"type": "mutualTLS"}
                },
                "paths": {}
            }"#,
        );
        let doc = convert_swagger_to_document(&s, "pets.json").unwrap();
        assert_eq!(doc.security_definitions.len(), 2);

        let key = &doc.security_definitions["key"];
        assert!(key.is_api_key());
        assert_eq!(key.param_name, "X-Key");

        let oauth = doc.security_definitions["oauth"].oauth2.as_ref().unwrap();
        assert_eq!(oauth.flow, "implicit");
        assert_eq!(oauth.scopes["read"], "Read access");
    }

    #[test]
    fn test_convert_schema() {
        let schema: Schema = serde_json::from_str(
            r#"{
                "title": "Pet",
                "type": "object",
                "required": ["name"],
                "properties": {
                    "name": {"type": "string"},
                    "tags": {"type": "array", "items": {"type": "string"}}
                },
                "additionalProperties": {"type": "integer"},
                "x-excludeFromOperations": ["create"]
            }"#,
        )
        .unwrap();

        let node = convert_schema(&schema);
        assert_eq!(node.title.as_deref(), Some("Pet"));
        assert_eq!(node.properties.keys().collect::<Vec<_>>(), vec!["name", "tags"]);
        assert_eq!(
            node.properties["tags"].items.as_deref(),
            Some(&SchemaNode::typed("string"))
        );
        assert_eq!(
            node.additional_properties.as_deref(),
            Some(&SchemaNode::typed("integer"))
        );
        assert_eq!(node.exclude_from_operations, vec!["create"]);
    }
}
