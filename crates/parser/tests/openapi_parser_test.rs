//! Integration tests for the OpenAPI 3.x parser

use apidox_common::{ResourceOrigin, SecurityType, SpecError, TypeLabel};
use apidox_parser::OpenApiParser;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

const PET_STORE: &str = r##"{
    "openapi": "3.0.3",
    "info": {"title": "Pet Store", "version": "2.0.0"},
    "servers": [{"url": "https://petstore.example.com/v2"}],
    "tags": [{"name": "pets"}],
    "security": [{"petstore_auth": ["read:pets", "write:pets", "admin"]}],
    "paths": {
        "/pets": {
            "get": {
                "tags": ["pets"],
                "operationId": "listPets",
                "summary": "List pets",
                "parameters": [
                    {
                        "name": "tags",
                        "in": "query",
                        "schema": {"type": "array", "items": {"type": "string"}}
                    },
                    {"name": "session", "in": "cookie", "schema": {"type": "string"}}
                ],
                "responses": {
                    "200": {
                        "description": "A list of pets",
                        "headers": {
                            "X-Next": {"description": "Next page", "schema": {"type": "string", "format": "uri"}}
                        },
                        "content": {
                            "application/json": {
                                "schema": {"type": "array", "items": {"$ref": "#/components/schemas/Pet"}}
                            }
                        }
                    }
                }
            },
            "post": {
                "tags": ["pets"],
                "operationId": "createPet",
                "summary": "Create a pet",
                "requestBody": {
                    "required": true,
                    "content": {
                        "application/json": {"schema": {"$ref": "#/components/schemas/Pet"}}
                    }
                },
                "responses": {
                    "201": {
                        "description": "Created",
                        "content": {"application/json": {"schema": {"$ref": "#/components/schemas/Pet"}}}
                    }
                }
            }
        }
    },
    "components": {
        "schemas": {
            "Pet": {
                "type": "object",
                "required": ["name"],
                "properties": {
                    "id": {"type": "integer", "format": "int64", "readOnly": true},
                    "name": {"type": "string"},
                    "owner": {"$ref": "#/components/schemas/Owner"}
                }
            },
            "Owner": {
                "type": "object",
                "properties": {"email": {"type": "string"}}
            }
        },
        "securitySchemes": {
            "petstore_auth": {
                "type": "oauth2",
                "flows": {
                    "implicit": {
                        "authorizationUrl": "https://auth.example.com/authorize",
                        "scopes": {"read:pets": "Read pets", "write:pets": "Modify pets"}
                    }
                }
            }
        }
    }
}"##;

fn example(text: &str) -> Value {
    serde_json::from_str(text).unwrap()
}

#[test]
fn test_component_name_names_resource() {
    let spec = OpenApiParser::from_json(PET_STORE, "petstore.json")
        .unwrap()
        .parse()
        .unwrap();

    assert_eq!(spec.groups.len(), 1);
    let group = &spec.groups[0];
    assert_eq!(group.url.as_deref(), Some("https://petstore.example.com/v2"));

    let pet = spec.resources.get("latest", "pet").unwrap();
    assert_eq!(pet.title, "Pet");
    assert_eq!(pet.origin, ResourceOrigin::MethodResponse);
    assert!(pet.properties["name"].required);
    assert!(!pet.properties["id"].required);
    assert_eq!(pet.properties["id"].type_label, TypeLabel::single("int64"));

    let owner = &pet.properties["owner"];
    assert_eq!(owner.id, "owner");
    assert_eq!(owner.title, "owner");
    assert_eq!(pet.properties["name"].title, "name");
    assert_eq!(pet.properties["name"].description, "name");

    let method_ids: Vec<&String> = pet.methods.keys().collect();
    assert_eq!(method_ids, vec!["create-pet", "list-pets"]);
}

#[test]
fn test_request_body_filters_read_only() {
    let spec = OpenApiParser::from_json(PET_STORE, "petstore.json")
        .unwrap()
        .parse()
        .unwrap();
    let create = spec.methods().find(|m| m.id == "create-pet").unwrap();

    assert_eq!(create.consumes, vec!["application/json"]);
    let body = create.body_param.as_ref().unwrap();
    assert_eq!(body.name, "body");
    assert!(body.required);

    let request = body.resource.as_ref().unwrap();
    assert_eq!(
        example(request.schema.as_deref().unwrap()),
        json!({"name": "string", "owner": {"email": "string"}})
    );

    let created = &create.responses[&201];
    assert_eq!(created.status_description, "Created");
    let canonical = spec.resource(created.resource.as_ref().unwrap()).unwrap();
    assert_eq!(
        example(canonical.schema.as_deref().unwrap()),
        json!({"id": "int64", "name": "string", "owner": {"email": "string"}})
    );
}

#[test]
fn test_parameters_and_headers() {
    let spec = OpenApiParser::from_json(PET_STORE, "petstore.json")
        .unwrap()
        .parse()
        .unwrap();
    let list = spec.methods().find(|m| m.id == "list-pets").unwrap();

    assert_eq!(list.query_params.len(), 1);
    let tags = &list.query_params[0];
    assert_eq!(tags.type_label, TypeLabel::pair("array", "string"));
    assert_eq!(tags.collection_format.as_deref(), Some("multi"));
    assert!(list.header_params.is_empty());

    let ok = &list.responses[&200];
    assert!(ok.is_array);
    assert_eq!(ok.headers[0].name, "X-Next");
    assert_eq!(ok.headers[0].type_label, TypeLabel::single("uri"));
    assert_eq!(list.produces, vec!["application/json"]);
}

#[test]
fn test_oauth2_scopes_limited_to_declared() {
    let spec = OpenApiParser::from_json(PET_STORE, "petstore.json")
        .unwrap()
        .parse()
        .unwrap();

    let oauth = &spec.default_security["oauth2"];
    assert_eq!(oauth.scheme.scheme_type, SecurityType::OAuth2);
    assert_eq!(oauth.scheme.oauth2.as_ref().unwrap().flow, "implicit");

    let scopes: Vec<&String> = oauth.scopes.keys().collect();
    assert_eq!(scopes, vec!["read:pets", "write:pets"]);
}

#[test]
fn test_self_referential_schema_terminates() {
    let json = r##"{
        "openapi": "3.0.0",
        "info": {"title": "Tree", "version": "1"},
        "paths": {
            "/nodes": {
                "get": {
                    "summary": "Nodes",
                    "responses": {
                        "200": {
                            "description": "OK",
                            "content": {"application/json": {"schema": {"$ref": "#/components/schemas/Node"}}}
                        }
                    }
                }
            }
        },
        "components": {
            "schemas": {
                "Node": {
                    "type": "object",
                    "properties": {
                        "name": {"type": "string"},
                        "parent": {"$ref": "#/components/schemas/Node"}
                    }
                }
            }
        }
    }"##;

    let spec = OpenApiParser::from_json(json, "tree.json")
        .unwrap()
        .parse()
        .unwrap();
    let node = spec.resources.get("latest", "node").unwrap();

    let parent = &node.properties["parent"];
    assert!(parent.properties.is_empty());
    assert_eq!(
        example(node.schema.as_deref().unwrap()),
        json!({"name": "string", "parent": {}})
    );
}

#[test]
fn test_inline_untitled_response_is_fatal() {
    let json = r#"{
        "openapi": "3.0.0",
        "info": {"title": "Inline", "version": "1"},
        "paths": {
            "/things": {
                "get": {
                    "summary": "Things",
                    "responses": {
                        "200": {
                            "description": "OK",
                            "content": {"application/json": {"schema": {"type": "object"}}}
                        }
                    }
                }
            }
        }
    }"#;

    let result = OpenApiParser::from_json(json, "inline.json").unwrap().parse();
    assert!(matches!(result, Err(SpecError::MissingTitle { .. })));
}

#[test]
fn test_yaml_document() {
    let yaml = r##"
openapi: 3.0.0
info:
  title: Yaml Pets
  version: "1"
x-sortMethodsBy: [summary, bogus]
paths:
  /pets:
    get:
      summary: List pets
      responses:
        200:
          description: OK
          content:
            application/json:
              schema:
                $ref: "#/components/schemas/Pet"
components:
  schemas:
    Pet:
      properties:
        name:
          type: string
"##;

    let spec = OpenApiParser::from_yaml(yaml, "pets.yaml")
        .unwrap()
        .parse()
        .unwrap();

    let group = &spec.groups[0];
    assert_eq!(group.name, "List pets");
    assert_eq!(group.method_sort_by, vec![apidox_common::SortField::Summary]);
    assert_eq!(group.methods[0].sort_key, "List pets~");
    assert_eq!(
        group.methods[0].responses[&200].resource.as_ref().unwrap().id,
        "pet"
    );
}
