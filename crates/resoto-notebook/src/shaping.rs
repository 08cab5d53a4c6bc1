//! Turning raw search results into table records.
//!
//! Shaping is two-pass. The first pass classifies every element without
//! touching it; the second picks one encoding for the whole collection:
//! - every object has a `reported` object: one record per node, made of its
//!   `reported` properties plus the ancestor ids
//! - any object lacks one: the raw collection, deep-flattened

use serde_json::Value;

use resoto_notebook_core::path::ANCESTOR_ID_PATHS;
use resoto_notebook_core::{js_find, JsObject};

use crate::table::Table;

/// How a single result element can be shaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeShape {
    /// An object with a `reported` object.
    Resource,
    /// An object without a usable `reported` section.
    Unshaped,
    /// Not an object at all, e.g. a line of CLI output.
    Scalar,
}

/// Classify one element.
pub fn classify(value: &Value) -> NodeShape {
    match value {
        Value::Object(node) => match node.get("reported") {
            Some(Value::Object(_)) => NodeShape::Resource,
            _ => NodeShape::Unshaped,
        },
        _ => NodeShape::Scalar,
    }
}

/// Whether a collection has to be deep-flattened instead of shaped.
pub fn needs_normalize(shapes: &[NodeShape]) -> bool {
    shapes.contains(&NodeShape::Unshaped)
}

/// The node's `reported` object with `account_id`, `region_id`, and
/// `cloud_id` added from its ancestors (`null` when unresolved).
///
/// A node without a `reported` object is handed back unchanged as `Err`.
pub fn extract_node(mut node: JsObject) -> Result<JsObject, JsObject> {
    let ancestor_ids: Vec<(&str, Value)> = ANCESTOR_ID_PATHS
        .iter()
        .map(|(column, path)| {
            let id = js_find(&node, path).map_or(Value::Null, |id| Value::String(id.to_string()));
            (*column, id)
        })
        .collect();

    let mut reported = match node.get_mut("reported") {
        Some(Value::Object(reported)) => std::mem::take(reported),
        _ => return Err(node),
    };
    for (column, id) in ancestor_ids {
        reported.insert(column.to_string(), id);
    }
    Ok(reported)
}

/// Result of shaping a collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Shaped {
    pub table: Table,
    /// True when the collection fell back to deep-flattening.
    pub normalized: bool,
}

/// Shape a collection of search or CLI results into a table.
pub fn shape(values: Vec<Value>) -> Shaped {
    let shapes: Vec<NodeShape> = values.iter().map(classify).collect();

    if needs_normalize(&shapes) {
        let unshaped = shapes.iter().filter(|s| **s == NodeShape::Unshaped).count();
        tracing::debug!(unshaped, total = values.len(), "Deep-flattening results");
        return Shaped {
            table: Table::normalized(values),
            normalized: true,
        };
    }

    let records = values.into_iter().map(|value| match value {
        Value::Object(node) => Value::Object(extract_node(node).unwrap_or_else(|raw| raw)),
        scalar => scalar,
    });
    Shaped {
        table: Table::from_records(records),
        normalized: false,
    }
}

/// [`shape`] for search results, which are always objects.
pub fn shape_nodes(nodes: Vec<JsObject>) -> Shaped {
    shape(nodes.into_iter().map(Value::Object).collect())
}
