//! Vendor extension (`x-...`) readers shared by both dialect adapters

use serde_json::Value;
use std::collections::BTreeMap;
use tracing::warn;

pub type Extensions = BTreeMap<String, Value>;

pub const NAVIGATE_METHODS_BY_NAME: &str = "x-navigateMethodsByName";
pub const SORT_METHODS_BY: &str = "x-sortMethodsBy";
pub const PATH_NAME: &str = "x-pathName";
pub const VERSION: &str = "x-version";
pub const OPERATION_NAME: &str = "x-operationName";
pub const EXCLUDE_FROM_OPERATIONS: &str = "x-excludeFromOperations";

pub fn string(extensions: &Extensions, key: &str) -> Option<String> {
    extensions.get(key).and_then(Value::as_str).map(str::to_string)
}

pub fn boolean(extensions: &Extensions, key: &str) -> Option<bool> {
    extensions.get(key).and_then(Value::as_bool)
}

/// A list of strings; non-string entries are logged and skipped
pub fn string_list(extensions: &Extensions, key: &str) -> Option<Vec<String>> {
    let values = extensions.get(key)?.as_array()?;
    Some(
        values
            .iter()
            .filter_map(|v| match v.as_str() {
                Some(s) => Some(s.to_string()),
                None => {
                    warn!(extension = key, value = %v, "Ignoring non-string entry");
                    None
                }
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_readers() {
        let mut ext = Extensions::new();
        ext.insert(PATH_NAME.to_string(), json!("Pets"));
        ext.insert(NAVIGATE_METHODS_BY_NAME.to_string(), json!(false));
        ext.insert(SORT_METHODS_BY.to_string(), json!(["path", 3, "summary"]));

        assert_eq!(string(&ext, PATH_NAME).as_deref(), Some("Pets"));
        assert_eq!(boolean(&ext, NAVIGATE_METHODS_BY_NAME), Some(false));
        assert_eq!(
            string_list(&ext, SORT_METHODS_BY),
            Some(vec!["path".to_string(), "summary".to_string()])
        );
        assert_eq!(string(&ext, VERSION), None);
        assert_eq!(string_list(&ext, PATH_NAME), None);
    }
}
