//! Local `$ref` expansion
//!
//! Documents are expanded in their untyped `serde_json::Value` form before
//! they are deserialized into dialect types, so the resolver only ever sees
//! self-contained schema trees.

use serde_json::Value;
use tracing::{trace, warn};

/// Member added to every expanded node, holding the referenced definition name
pub const REF_NAME: &str = "x-ref-name";

/// Recursively expand every local (`#/...`) `$ref` in `document`
///
/// The expanded node gains an `x-ref-name` member holding the last segment of
/// the pointer. A reference to a definition that is already being expanded
/// further up the same branch is left in place, tagged with `x-ref-name`, so
/// self-referential schemas terminate.
pub fn expand_refs(document: &mut Value) {
    let root = document.clone();
    let mut in_progress = Vec::new();
    expand(&root, document, &mut in_progress);
}

/// Name a reference points at (`#/definitions/Pet` -> `Pet`)
pub fn ref_name(ref_path: &str) -> &str {
    ref_path.rsplit('/').next().unwrap_or(ref_path)
}

fn expand(root: &Value, value: &mut Value, in_progress: &mut Vec<String>) {
    if let Some(expanded) = expansion_for(root, value, in_progress) {
        *value = expanded;
        return;
    }

    match value {
        Value::Object(obj) => {
            for v in obj.values_mut() {
                expand(root, v, in_progress);
            }
        }
        Value::Array(arr) => {
            for v in arr.iter_mut() {
                expand(root, v, in_progress);
            }
        }
        _ => {}
    }
}

fn expansion_for(root: &Value, value: &mut Value, in_progress: &mut Vec<String>) -> Option<Value> {
    let obj = value.as_object_mut()?;
    let ref_path = obj.get("$ref")?.as_str()?.to_string();
    let name = ref_name(&ref_path).to_string();

    let Some(pointer) = ref_path.strip_prefix('#') else {
        warn!(reference = %ref_path, "External references are not supported, leaving in place");
        return None;
    };

    if in_progress.contains(&ref_path) {
        trace!(reference = %ref_path, "Self-referential schema, leaving reference in place");
        obj.insert(REF_NAME.to_string(), Value::String(name));
        return None;
    }

    let Some(target) = root.pointer(pointer) else {
        warn!(reference = %ref_path, "Unresolvable reference, leaving in place");
        return None;
    };

    let mut expanded = target.clone();
    in_progress.push(ref_path);
    expand(root, &mut expanded, in_progress);
    in_progress.pop();

    if let Value::Object(o) = &mut expanded {
        o.insert(REF_NAME.to_string(), Value::String(name));
    }
    Some(expanded)
}
