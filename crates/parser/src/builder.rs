//! Builds a [`Specification`] from a neutral [`ApiDocument`]
//!
//! ## Grouping
//!
//! Each declared tag becomes one [`ApiGroup`] holding every operation carrying
//! that tag. A document without tags is grouped by path instead, each group
//! named by `x-pathName` or the summary of its operations. Groups that end up
//! without methods are dropped.
//!
//! ## Resources
//!
//! Body parameters and responses are resolved into resources and linked into
//! the specification's resource list, which keeps one canonical resource per
//! version and identifier.

use crate::cache;
use crate::document::{
    ApiDocument, HeaderDef, OperationDef, ParameterDef, PathDef, ResponseDef, SecurityRequirement,
    SimpleType, TagDef,
};
use crate::json::{enum_value_to_string, example_to_string};
use crate::markdown;
use crate::naming::{camel_to_kebab, title_to_kebab};
use crate::schema::{resolve, ResolveContext, Resolved};
use apidox_common::{
    collection_format_description, ApiGroup, Header, Method, MethodRef, Parameter,
    ParameterLocation, Resource, ResourceOrigin, Response, Result, Security, SecurityMap,
    SecurityScheme, SortField, SpecError, Specification, TypeLabel,
};
use http::StatusCode;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, error, info, trace, warn};

/// Version assigned to paths without `x-version`
pub const DEFAULT_VERSION: &str = "latest";

/// Build a specification from a single document
pub fn build(doc: &ApiDocument) -> Result<Specification> {
    let mut spec = Specification::default();
    load_into(&mut spec, doc)?;
    Ok(spec)
}

/// Load a document into an existing specification
///
/// The first document loaded names the specification; later documents add
/// their groups, security schemes and resources to it.
pub fn load_into(spec: &mut Specification, doc: &ApiDocument) -> Result<()> {
    if doc.info.title.is_empty() {
        error!(url = %doc.url, "Specification does not have an info.title member");
        return Err(SpecError::MissingInfoTitle {
            url: doc.url.clone(),
        });
    }
    info!(title = %doc.info.title, url = %doc.url, "Building specification");

    if spec.id.is_empty() {
        spec.id = title_to_kebab(&doc.info.title);
        spec.url = doc.url.clone();
        spec.info = doc.info.clone();
        spec.info.description = markdown::to_html(&doc.info.description);
    }

    spec.security_definitions
        .extend(doc.security_definitions.iter().map(|(name, scheme)| {
            let mut scheme = scheme.clone();
            scheme.description = markdown::to_html(&scheme.description);
            (name.clone(), scheme)
        }));
    spec.default_security = Arc::new(process_security(
        &doc.security,
        &spec.security_definitions,
    ));

    let template = ApiGroup {
        url: doc.base_url.clone(),
        method_navigation_by_name: doc.navigate_methods_by_name.unwrap_or(true),
        method_sort_by: sort_fields(doc.sort_methods_by.as_deref()),
        consumes: doc.consumes.clone(),
        produces: doc.produces.clone(),
        ..Default::default()
    };

    let mut builder = Builder {
        spec,
        doc,
        template,
    };
    builder.build_groups()
}

struct Builder<'a> {
    spec: &'a mut Specification,
    doc: &'a ApiDocument,
    template: ApiGroup,
}

impl Builder<'_> {
    fn build_groups(&mut self) -> Result<()> {
        let doc = self.doc;
        let untagged = [TagDef::default()];
        let tags = if doc.tags.is_empty() {
            &untagged[..]
        } else {
            &doc.tags[..]
        };

        for tag in tags {
            if tag.name.is_empty() {
                for (path, path_def) in &doc.paths {
                    let mut group = self.new_group(tag);
                    self.collect_methods(&mut group, tag, path, path_def)?;
                    self.finish_group(group);
                }
            } else {
                let mut group = self.new_group(tag);
                for (path, path_def) in &doc.paths {
                    self.collect_methods(&mut group, tag, path, path_def)?;
                }
                self.finish_group(group);
            }
        }

        Ok(())
    }

    fn new_group(&self, tag: &TagDef) -> ApiGroup {
        ApiGroup {
            id: title_to_kebab(&tag.name),
            name: tag.name.clone(),
            description: tag.description.clone(),
            external_docs: tag.external_docs.clone(),
            ..self.template.clone()
        }
    }

    fn finish_group(&mut self, mut group: ApiGroup) {
        if group.methods.is_empty() {
            trace!(group = %group.name, "Dropping group without methods");
            return;
        }

        for method in &mut group.methods {
            method.group_id = group.id.clone();
        }
        group.sort_methods();

        debug!(group = %group.name, methods = group.methods.len(), "Adding group");
        self.spec.groups.push(group);
    }

    fn collect_methods(
        &mut self,
        group: &mut ApiGroup,
        tag: &TagDef,
        path: &str,
        path_def: &PathDef,
    ) -> Result<()> {
        let version = path_def
            .version
            .clone()
            .unwrap_or_else(|| DEFAULT_VERSION.to_string());
        group.current_version = version.clone();

        for operation in &path_def.operations {
            if !includes(tag, operation) {
                trace!(
                    verb = %operation.verb,
                    path,
                    tag = %tag.name,
                    "Skipping operation not matching tag"
                );
                continue;
            }
            let method = self.process_method(group, path, path_def, operation, &version)?;
            group.methods.push(method);
        }

        Ok(())
    }

    fn process_method(
        &mut self,
        group: &mut ApiGroup,
        path: &str,
        path_def: &PathDef,
        op: &OperationDef,
        version: &str,
    ) -> Result<Method> {
        let verb = op.verb.as_str();
        let explicit_name = op.operation_name.as_deref().filter(|n| !n.is_empty());
        let operation_name = explicit_name.unwrap_or(verb).to_string();
        let summary = op.summary.clone().unwrap_or_default();

        let id = match op.operation_id.as_deref().filter(|id| !id.is_empty()) {
            Some(id) => id.to_string(),
            None => match explicit_name {
                Some(name) => title_to_kebab(name),
                None => {
                    let from_summary = title_to_kebab(&summary);
                    if from_summary.is_empty() {
                        verb.to_string()
                    } else {
                        from_summary
                    }
                }
            },
        };

        let navigation_name = if group.method_navigation_by_name {
            summary.clone()
        } else {
            operation_name.clone()
        };
        let sort_key = group.sort_key(path, verb, &operation_name, &navigation_name, &summary);

        let mut method = Method {
            id: camel_to_kebab(&id),
            name: summary,
            description: markdown::to_html(op.description.as_deref().unwrap_or_default()),
            verb: verb.to_string(),
            operation_name,
            navigation_name,
            path: path.to_string(),
            consumes: if op.consumes.is_empty() {
                group.consumes.clone()
            } else {
                op.consumes.clone()
            },
            produces: if op.produces.is_empty() {
                group.produces.clone()
            } else {
                op.produces.clone()
            },
            sort_key,
            deprecated: op.deprecated,
            ..Default::default()
        };

        if let Some(name) = &path_def.path_name {
            group.name = name.clone();
            group.id = title_to_kebab(name);
        }
        if group.name.is_empty() {
            if method.name.is_empty() {
                error!(id = %id, "Operation does not have an operationId or summary member");
                return Err(SpecError::MissingOperationName { id });
            }
            group.name = method.name.clone();
            group.description = method.description.clone();
            group.id = title_to_kebab(&group.name);
        }

        let method_ref = method.method_ref();
        let operation_name = method.operation_name.clone();
        let request_ctx = ResolveContext {
            verb,
            path,
            operation_name: &operation_name,
            request: true,
            property_titles: self.doc.property_titles,
        };

        for param in &op.parameters {
            match param.location {
                ParameterLocation::Body => {
                    let body = self.body_parameter(param, &request_ctx, &method_ref, version)?;
                    method.body_param = Some(body);
                }
                ParameterLocation::Cookie => {
                    warn!(parameter = %param.name, verb, path, "Ignoring cookie parameter");
                }
                location => {
                    let parameter = simple_parameter(param)?;
                    match location {
                        ParameterLocation::Path => method.path_params.push(parameter),
                        ParameterLocation::Query => method.query_params.push(parameter),
                        ParameterLocation::Header => method.header_params.push(parameter),
                        _ => method.form_params.push(parameter),
                    }
                }
            }
        }

        let Some(responses) = &op.responses else {
            error!(verb, path, "Operation is missing a responses declaration");
            return Err(SpecError::MissingResponses {
                method: verb.to_string(),
                path: path.to_string(),
            });
        };

        let response_ctx = ResolveContext {
            request: false,
            ..request_ctx
        };
        for (status, def) in &responses.statuses {
            let Ok(code) = status.parse::<u16>() else {
                warn!(status = %status, verb, path, "Ignoring non-numeric response status");
                continue;
            };
            let mut response =
                self.build_response(def, &mut method, &method_ref, &response_ctx, version)?;
            response.status_description = StatusCode::from_u16(code)
                .ok()
                .and_then(|c| c.canonical_reason())
                .unwrap_or_default()
                .to_string();
            method.responses.insert(code, response);
        }
        if let Some(def) = &responses.default {
            let response =
                self.build_response(def, &mut method, &method_ref, &response_ctx, version)?;
            method.default_response = Some(response);
        }

        method.security = match &op.security {
            Some(requirements) => {
                let granted = process_security(requirements, &self.spec.security_definitions);
                if granted.is_empty() {
                    Arc::clone(&self.spec.default_security)
                } else {
                    Arc::new(granted)
                }
            }
            None => Arc::clone(&self.spec.default_security),
        };

        Ok(method)
    }

    fn body_parameter(
        &mut self,
        param: &ParameterDef,
        ctx: &ResolveContext<'_>,
        method_ref: &MethodRef,
        version: &str,
    ) -> Result<Parameter> {
        let missing_schema = || {
            error!(parameter = %param.name, "'in body' parameter is missing a schema declaration");
            SpecError::MissingBodySchema {
                name: param.name.clone(),
            }
        };

        let schema = param.schema.as_ref().ok_or_else(missing_schema)?;
        let Resolved {
            mut resource,
            example,
            is_array,
        } = resolve(Some(schema), param.schema_name.as_deref(), &[], ctx)?
            .ok_or_else(missing_schema)?;

        resource.schema = Some(example_to_string(&example, is_array)?);
        resource.origin = ResourceOrigin::RequestBody;

        let key = cache::link(
            &mut self.spec.resources,
            resource.clone(),
            method_ref,
            version,
        );

        Ok(Parameter {
            name: param.name.clone(),
            description: markdown::to_html(param.description.as_deref().unwrap_or_default()),
            location: ParameterLocation::Body,
            collection_format: None,
            collection_format_description: None,
            required: param.required,
            type_label: resource.type_label.clone(),
            enum_values: Vec::new(),
            resource: Some(Box::new(resource)),
            resource_key: Some(key),
            is_array,
        })
    }

    fn build_response(
        &mut self,
        def: &ResponseDef,
        method: &mut Method,
        method_ref: &MethodRef,
        ctx: &ResolveContext<'_>,
        version: &str,
    ) -> Result<Response> {
        let mut response = Response {
            description: markdown::to_html(&def.description),
            headers: compile_headers(def)?,
            ..Default::default()
        };

        if let Some(Resolved {
            mut resource,
            example,
            is_array,
        }) = resolve(def.schema.as_ref(), def.schema_name.as_deref(), &[], ctx)?
        {
            resource.schema = Some(example_to_string(&example, false)?);
            resource.origin = ResourceOrigin::MethodResponse;

            let key = cache::link(&mut self.spec.resources, resource, method_ref, version);
            method.resources.push(key.clone());
            response.resource = Some(key);
            response.is_array = is_array;
        }

        Ok(response)
    }
}

/// Whether an operation belongs in the group built for `tag`
///
/// Untagged operations only appear when grouping by path. Tagged operations
/// appear under each matching tag, and once when grouping by path.
fn includes(tag: &TagDef, operation: &OperationDef) -> bool {
    if tag.name.is_empty() {
        return true;
    }
    operation.tags.iter().any(|t| *t == tag.name)
}

/// Validate `x-sortMethodsBy`
///
/// Unknown keywords are logged and ignored. With nothing valid requested the
/// default order applies.
pub fn sort_fields(requested: Option<&[String]>) -> Vec<SortField> {
    let fields: Vec<SortField> = requested
        .unwrap_or_default()
        .iter()
        .filter_map(|keyword| match keyword.parse::<SortField>() {
            Ok(field) => Some(field),
            Err(e) => {
                warn!("{}", e);
                None
            }
        })
        .collect();

    if fields.is_empty() {
        SortField::default_order()
    } else {
        fields
    }
}

/// Resolve security requirements against the declared schemes
///
/// The result is keyed by scheme type. OAuth2 scopes are only granted when
/// the scheme declares them.
pub fn process_security(
    requirements: &[SecurityRequirement],
    definitions: &BTreeMap<String, SecurityScheme>,
) -> SecurityMap {
    let mut granted = SecurityMap::new();

    for requirement in requirements {
        for (name, scopes) in requirement {
            let Some(scheme) = definitions.get(name) else {
                warn!(scheme = %name, "Security requirement names an undeclared scheme");
                continue;
            };

            let scopes = match &scheme.oauth2 {
                Some(oauth2) => scopes
                    .iter()
                    .filter_map(|s| oauth2.scopes.get(s).map(|d| (s.clone(), d.clone())))
                    .collect(),
                None => BTreeMap::new(),
            };

            granted.insert(
                scheme.scheme_type.as_str().to_string(),
                Security {
                    scheme: scheme.clone(),
                    scopes,
                },
            );
        }
    }

    granted
}

/// Type label, collection format and enum of a parameter or header
fn simple_type(
    simple: &SimpleType,
    context: &'static str,
    name: &str,
) -> Result<(TypeLabel, Option<String>, Vec<String>)> {
    if simple.schema_type.as_deref() != Some("array") {
        let outer = non_empty(&simple.format)
            .or(non_empty(&simple.schema_type))
            .unwrap_or("string");
        let enum_values = simple.enum_values.iter().map(enum_value_to_string).collect();
        return Ok((TypeLabel::single(outer), None, enum_values));
    }

    let Some(collection_format) = non_empty(&simple.collection_format) else {
        error!(context, name, "Array declared without a collectionFormat");
        return Err(SpecError::MissingCollectionFormat {
            context,
            name: name.to_string(),
        });
    };

    let Some((items, item_type)) = simple
        .items
        .as_deref()
        .and_then(|items| non_empty(&items.schema_type).map(|t| (items, t)))
    else {
        error!(context, name, "Array declared without an item type");
        return Err(SpecError::MissingItemType {
            context,
            name: name.to_string(),
        });
    };

    let inner = non_empty(&items.format).unwrap_or(item_type);
    let enum_values = items.enum_values.iter().map(enum_value_to_string).collect();
    Ok((
        TypeLabel::pair("array", inner),
        Some(collection_format.to_string()),
        enum_values,
    ))
}

fn simple_parameter(param: &ParameterDef) -> Result<Parameter> {
    let (type_label, collection_format, enum_values) =
        simple_type(&param.simple, "Request parameter", &param.name)?;

    Ok(Parameter {
        name: param.name.clone(),
        description: markdown::to_html(param.description.as_deref().unwrap_or_default()),
        location: param.location,
        collection_format_description: collection_format
            .as_deref()
            .and_then(collection_format_description)
            .map(str::to_string),
        collection_format,
        required: param.required,
        type_label,
        enum_values,
        resource: None,
        resource_key: None,
        is_array: false,
    })
}

fn compile_headers(def: &ResponseDef) -> Result<Vec<Header>> {
    def.headers
        .iter()
        .map(|(name, header)| compile_header(name, header))
        .collect()
}

fn compile_header(name: &str, header: &HeaderDef) -> Result<Header> {
    let (type_label, collection_format, enum_values) =
        simple_type(&header.simple, "Response header", name)?;

    Ok(Header {
        name: name.to_string(),
        description: markdown::to_html(&header.description),
        type_label,
        collection_format_description: collection_format
            .as_deref()
            .and_then(collection_format_description)
            .map(str::to_string),
        collection_format,
        default: header.simple.default.as_ref().map(enum_value_to_string),
        required: header.required,
        enum_values,
    })
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Canonical resource a body parameter was linked to
pub fn body_resource<'a>(spec: &'a Specification, param: &Parameter) -> Option<&'a Resource> {
    param.resource_key.as_ref().and_then(|key| spec.resource(key))
}
