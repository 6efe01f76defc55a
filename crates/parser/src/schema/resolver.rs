//! Resource resolution

use super::classify::{classify, classify_map_entry, Classified};
use super::properties::{compile_properties, PropertyScope};
use super::{NodeRole, ResolveContext, SchemaNode};
use crate::json::{enum_value_to_string, to_string_indent};
use crate::markdown;
use crate::naming::title_to_kebab;
use apidox_common::{Resource, Result, SpecError};
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use tracing::{error, trace};

/// A resolved schema: the resource, its synthesized example and whether the
/// schema denotes an array
#[derive(Debug, Clone)]
pub struct Resolved {
    pub resource: Resource,
    pub example: Map<String, Value>,
    pub is_array: bool,
}

/// Resolve a schema into a resource and example fragment
///
/// An absent schema resolves to nothing. `external_name` (a referenced
/// definition name) takes precedence over the schema's own title. `fqns` is
/// the namespace path of the schema within its containing structure; it is
/// empty for the root of a body or response.
pub fn resolve(
    schema: Option<&SchemaNode>,
    external_name: Option<&str>,
    fqns: &[String],
    ctx: &ResolveContext<'_>,
) -> Result<Option<Resolved>> {
    match schema {
        Some(node) => resolve_node(node, external_name, fqns, ctx, NodeRole::Schema).map(Some),
        None => Ok(None),
    }
}

pub(crate) fn resolve_node(
    node: &SchemaNode,
    external_name: Option<&str>,
    fqns: &[String],
    ctx: &ResolveContext<'_>,
    role: NodeRole,
) -> Result<Resolved> {
    let Classified {
        node: target,
        type_label,
    } = match role {
        NodeRole::Schema => classify(node),
        NodeRole::MapEntry => classify_map_entry(node),
    };
    trace!(fqns = ?fqns, type_label = %type_label, "Resolving schema");

    let title = external_name
        .filter(|name| !name.is_empty())
        .or(target.title.as_deref())
        .unwrap_or_default()
        .to_string();
    let mut id = title_to_kebab(&title);

    if fqns.is_empty() && id.is_empty() {
        error!(
            verb = %ctx.verb.to_uppercase(),
            path = %ctx.path,
            "Model definition does not have a title member"
        );
        return Err(SpecError::MissingTitle {
            method: ctx.verb.to_uppercase(),
            path: ctx.path.to_string(),
        });
    }

    // A title only names child objects; other titled properties are named by
    // their namespace path
    if !fqns.is_empty() && !type_label.contains("object") {
        id.clear();
    }

    let is_array = type_label.is_array();
    let mut my_fqns = fqns.to_vec();
    if is_array {
        if let Some(last) = my_fqns.last_mut() {
            last.push_str("[]");
        }
    }

    let mut chopped = false;
    if id.is_empty() {
        if let Some(last) = my_fqns.pop() {
            trace!(id = %last, "Chopped identifier from namespace");
            id = last;
            chopped = true;
        }
    }

    let mut resource_fqns = my_fqns.clone();
    if !chopped && type_label.contains("object") {
        if let Some(last) = resource_fqns.pop() {
            id = last;
        }
    }

    // The title fallback is left unrendered
    let description = match node.description.as_deref().filter(|d| !d.is_empty()) {
        Some(text) => markdown::to_html(text),
        None => [node.title.as_deref(), Some(title.as_str())]
            .into_iter()
            .flatten()
            .find(|d| !d.is_empty())
            .unwrap_or_default()
            .to_string(),
    };

    let example = match &target.example {
        Some(value) => Some(to_string_indent(value)?),
        None => None,
    };

    let mut resource = Resource {
        id,
        fqns: resource_fqns,
        title,
        description,
        example,
        type_label,
        read_only: node.read_only,
        enum_values: target.enum_values.iter().map(enum_value_to_string).collect(),
        ..Default::default()
    };

    if ctx.request {
        resource.exclude_from_operations = node.exclude_from_operations.clone();
    }

    let required = collect_required(target);
    let id = resource.id.clone();
    let scope = PropertyScope {
        id: &id,
        fqns: &my_fqns,
        chopped,
        required: &required,
    };

    let mut example = Map::new();
    compile_properties(target, &mut resource, &mut example, &scope, ctx)?;
    for part in &target.all_of {
        compile_properties(part, &mut resource, &mut example, &scope, ctx)?;
    }

    Ok(Resolved {
        resource,
        example,
        is_array,
    })
}

/// Required property names of a node and every composed part
fn collect_required(node: &SchemaNode) -> BTreeSet<String> {
    node.required
        .iter()
        .chain(node.all_of.iter().flat_map(|part| part.required.iter()))
        .cloned()
        .collect()
}
