//! Example payload serialization
//!
//! Examples are embedded verbatim in HTML example blocks, so they are written
//! with a four-space indent and without escaping `<`, `>` or `&`.

use apidox_common::Result;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};

/// Serialize any value with a four-space indent
pub fn to_string_indent<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;

    // serde_json only ever emits valid UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Serialize a synthesized example, wrapping it in a one-element array when
/// the body it describes is an array
pub fn example_to_string(example: &Map<String, Value>, is_array: bool) -> Result<String> {
    if is_array {
        to_string_indent(&[example])
    } else {
        to_string_indent(example)
    }
}

/// Render a declared enum value the way it is displayed: strings raw, other
/// values as JSON text
pub fn enum_value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
