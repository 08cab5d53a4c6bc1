//! Lookups into nested JSON objects returned by the graph service.

use serde_json::Value;

use crate::error::CoreError;
use crate::types::JsObject;

/// Ancestor identifiers injected into every shaped record: (column, path).
pub const ANCESTOR_ID_PATHS: [(&str, [&str; 4]); 3] = [
    ("account_id", ["ancestors", "account", "reported", "id"]),
    ("region_id", ["ancestors", "region", "reported", "id"]),
    ("cloud_id", ["ancestors", "cloud", "reported", "id"]),
];

/// Get a string value in a nested object.
///
/// Descends one level per key. Returns `None` if the path is empty, an
/// intermediate value is not an object, or the final value is not a string.
pub fn js_find<'a>(node: &'a JsObject, path: &[&str]) -> Option<&'a str> {
    let (head, rest) = path.split_first()?;
    let value = node.get(*head)?;
    if rest.is_empty() {
        return value.as_str();
    }
    match value {
        Value::Object(child) => js_find(child, rest),
        _ => None,
    }
}

/// Like [`js_find`], but an unresolved path is an error.
///
/// Used for fields the service always sends (node id, name, kind).
pub fn js_get<'a>(node: &'a JsObject, path: &[&str]) -> Result<&'a str, CoreError> {
    js_find(node, path).ok_or_else(|| CoreError::PathNotFound {
        path: format!("{path:?}"),
        node: Value::Object(node.clone()).to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj(v: Value) -> JsObject {
        match v {
            Value::Object(m) => m,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_find_nested_string() {
        let node = obj(json!({
            "ancestors": {"account": {"reported": {"id": "acct-9"}}}
        }));
        assert_eq!(
            js_find(&node, &["ancestors", "account", "reported", "id"]),
            Some("acct-9")
        );
    }

    #[test]
    fn test_find_missing_segment() {
        let node = obj(json!({"ancestors": {"account": {"reported": {"id": "acct-9"}}}}));
        assert_eq!(js_find(&node, &["ancestors", "region", "reported", "id"]), None);
    }

    #[test]
    fn test_find_aborts_on_non_object_segment() {
        let node = obj(json!({"ancestors": {"account": ["not", "a", "map"]}}));
        assert_eq!(js_find(&node, &["ancestors", "account", "reported", "id"]), None);

        let node = obj(json!({"ancestors": "flat"}));
        assert_eq!(js_find(&node, &["ancestors", "account"]), None);
    }

    #[test]
    fn test_find_requires_string_leaf() {
        let node = obj(json!({"reported": {"id": 42, "tags": {"a": "b"}}}));
        assert_eq!(js_find(&node, &["reported", "id"]), None);
        assert_eq!(js_find(&node, &["reported", "tags"]), None);
    }

    #[test]
    fn test_find_empty_path() {
        let node = obj(json!({"id": "x"}));
        assert_eq!(js_find(&node, &[]), None);
    }

    #[test]
    fn test_get_missing_is_error() {
        let node = obj(json!({"id": "n1", "reported": {}}));
        assert_eq!(js_get(&node, &["id"]).unwrap(), "n1");

        let err = js_get(&node, &["reported", "kind"]).unwrap_err();
        match err {
            CoreError::PathNotFound { path, node } => {
                assert!(path.contains("kind"));
                assert!(node.contains("n1"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
