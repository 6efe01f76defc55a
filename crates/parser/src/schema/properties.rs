//! Property compilation

use super::resolver::{resolve_node, Resolved};
use super::{NodeRole, ResolveContext, SchemaNode, MAP_KEY};
use apidox_common::{Resource, Result, TypeKind};
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use tracing::trace;

/// Naming state of the resource whose properties are being compiled
pub(crate) struct PropertyScope<'a> {
    pub id: &'a str,
    pub fqns: &'a [String],
    pub chopped: bool,
    pub required: &'a BTreeSet<String>,
}

impl PropertyScope<'_> {
    /// Namespace path of a child property
    fn child_fqns(&self, name: &str) -> Vec<String> {
        let mut fqns = self.fqns.to_vec();
        if self.chopped && !self.id.is_empty() {
            fqns.push(self.id.to_string());
        }
        fqns.push(name.to_string());
        fqns
    }
}

/// Fold the declared properties of `node` into `parent` and `example`
pub(crate) fn compile_properties(
    node: &SchemaNode,
    parent: &mut Resource,
    example: &mut Map<String, Value>,
    scope: &PropertyScope<'_>,
    ctx: &ResolveContext<'_>,
) -> Result<()> {
    for (name, property) in &node.properties {
        process_property(property, name, NodeRole::Schema, parent, example, scope, ctx)?;
    }

    if let Some(value_schema) = node.additional_properties.as_deref() {
        process_property(
            value_schema,
            MAP_KEY,
            NodeRole::MapEntry,
            parent,
            example,
            scope,
            ctx,
        )?;
    }

    Ok(())
}

fn process_property(
    node: &SchemaNode,
    name: &str,
    role: NodeRole,
    parent: &mut Resource,
    example: &mut Map<String, Value>,
    scope: &PropertyScope<'_>,
    ctx: &ResolveContext<'_>,
) -> Result<()> {
    let fqns = scope.child_fqns(name);
    let title = ctx.property_titles.then_some(name);
    let Resolved {
        mut resource,
        example: fragment,
        ..
    } = resolve_node(node, title, &fqns, ctx, role)?;

    if ctx.request && resource.read_only {
        trace!(property = %name, "Read-only property left out of request body");
        return Ok(());
    }
    if resource
        .exclude_from_operations
        .iter()
        .any(|op| op == ctx.operation_name)
    {
        trace!(property = %name, operation = %ctx.operation_name, "Property excluded from operation");
        return Ok(());
    }

    resource.required = scope.required.contains(name);

    let label = &resource.type_label;
    let value = match label.kind() {
        TypeKind::Object => Value::Object(fragment),
        TypeKind::Array if node.items.is_some() => {
            if !fragment.is_empty() {
                Value::Array(vec![Value::Object(fragment)])
            } else if let Some(inner) = &label.inner {
                Value::Array(vec![Value::String(inner.clone())])
            } else {
                // array of objects whose members were all filtered out
                Value::Array(Vec::new())
            }
        }
        TypeKind::Array => Value::Array(vec![Value::Object(fragment)]),
        TypeKind::Map => match label.inner.as_deref() {
            Some(inner) if !inner.eq_ignore_ascii_case("object") => Value::String(inner.to_string()),
            _ => Value::Object(fragment),
        },
        TypeKind::Primitive => Value::String(label.outer.clone()),
    };

    example.insert(name.to_string(), value);
    parent.properties.insert(name.to_string(), resource);
    Ok(())
}
