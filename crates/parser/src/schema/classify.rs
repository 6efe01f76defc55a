//! Type classification

use super::SchemaNode;
use apidox_common::TypeLabel;

/// Result of classifying a schema node
#[derive(Debug, Clone, PartialEq)]
pub struct Classified<'a> {
    /// Node whose title, properties, example and enum describe the resource
    pub node: &'a SchemaNode,
    pub type_label: TypeLabel,
}

/// Classify a schema node
///
/// A node without a declared type is an object. When `items` are declared the
/// item schema becomes the described node and the outer declared type is kept,
/// except that an `array` whose item is a bare primitive without properties is
/// labelled `(array, <primitive>)`. A declared `format` on the described node
/// replaces the most specific element of the label.
pub fn classify(node: &SchemaNode) -> Classified<'_> {
    let outer = node.schema_type.as_deref().unwrap_or("object");

    let (target, mut type_label) = match node.items.as_deref() {
        Some(item) => {
            let label = match item.schema_type.as_deref() {
                None | Some("array") => TypeLabel::single(outer),
                Some(inner) if outer == "array" && item.properties.is_empty() => {
                    TypeLabel::pair("array", inner)
                }
                Some(_) => TypeLabel::single(outer),
            };
            (item, label)
        }
        None => (node, TypeLabel::single(outer)),
    };

    apply_format(target, &mut type_label);

    Classified {
        node: target,
        type_label,
    }
}

/// Classify the value schema of an `additionalProperties` declaration
///
/// Always `(map, <value type>)`; there is no item descent.
pub fn classify_map_entry(node: &SchemaNode) -> Classified<'_> {
    let inner = node.schema_type.as_deref().unwrap_or("object");
    let mut type_label = TypeLabel::pair("map", inner);
    apply_format(node, &mut type_label);

    Classified { node, type_label }
}

fn apply_format(node: &SchemaNode, type_label: &mut TypeLabel) {
    if let Some(format) = node.format.as_deref().filter(|f| !f.is_empty()) {
        type_label.set_last(format);
    }
}
