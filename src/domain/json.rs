//! Conversion between JSON documents and document trees.

use generational_arena::Index;
use serde_json::{Map, Number};
use tracing::{debug, instrument};

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::{DocumentTree, Value};

/// Builds a document tree from raw JSON bytes.
///
/// The top level must be an object. Object key order is preserved; `null`
/// anywhere in the document aborts the import.
#[instrument(level = "debug", skip(bytes), fields(len = bytes.len()))]
pub fn import_json(bytes: &[u8]) -> DomainResult<DocumentTree> {
    let document: serde_json::Value = serde_json::from_slice(bytes)?;
    import_value(&document)
}

/// Builds a document tree from an already parsed JSON value.
pub fn import_value(document: &serde_json::Value) -> DomainResult<DocumentTree> {
    let serde_json::Value::Object(object) = document else {
        return Err(DomainError::NotAnObject(json_kind(document).to_string()));
    };

    let mut tree = DocumentTree::new();
    let root = tree.insert_root(Value::Map);
    for (key, value) in object {
        insert_json(&mut tree, root, key, value)?;
    }
    debug!("imported {} nodes", tree.len());
    Ok(tree)
}

fn insert_json(
    tree: &mut DocumentTree,
    parent: Index,
    key: &str,
    value: &serde_json::Value,
) -> DomainResult<()> {
    match value {
        serde_json::Value::Object(object) => {
            let idx = tree.add_child(parent, key, Value::Map)?;
            for (k, v) in object {
                insert_json(tree, idx, k, v)?;
            }
        }
        serde_json::Value::Array(items) => {
            let idx = tree.add_child(parent, key, Value::Array)?;
            for (i, v) in items.iter().enumerate() {
                insert_json(tree, idx, &i.to_string(), v)?;
            }
        }
        scalar => {
            tree.add_child(parent, key, scalar_value(scalar)?)?;
        }
    }
    Ok(())
}

fn scalar_value(value: &serde_json::Value) -> DomainResult<Value> {
    match value {
        serde_json::Value::String(s) => Ok(Value::String(s.clone())),
        serde_json::Value::Bool(b) => Ok(Value::Bool(*b)),
        serde_json::Value::Number(n) => number_value(n),
        other => Err(DomainError::InvalidPrimitive(other.to_string())),
    }
}

/// Classifies by source text: no fraction or exponent means `Int`, which
/// must fit in an `i64`; everything else is a finite `Float`.
fn number_value(n: &Number) -> DomainResult<Value> {
    let text = n.to_string();
    if !text.contains(['.', 'e', 'E']) {
        return text
            .parse()
            .map(Value::Int)
            .map_err(|_| DomainError::IntegerOutOfRange(text));
    }
    match n.as_f64() {
        Some(f) if f.is_finite() => Ok(Value::Float(f)),
        Some(f) => Err(DomainError::NonFiniteFloat(f)),
        None => Err(DomainError::InvalidPrimitive(text)),
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

/// Serializes a Map- or Array-rooted tree as pretty-printed JSON.
#[instrument(level = "debug", skip(tree))]
pub fn export_json(tree: &DocumentTree) -> DomainResult<Vec<u8>> {
    let value = export_value(tree)?;
    Ok(serde_json::to_vec_pretty(&value)?)
}

/// Converts a Map- or Array-rooted tree into a JSON value.
pub fn export_value(tree: &DocumentTree) -> DomainResult<serde_json::Value> {
    let root = tree.root().ok_or(DomainError::EmptyTree)?;
    let node = tree.get_node(root).ok_or(DomainError::NodeNotFound)?;
    match node.data.value {
        Value::Map | Value::Array => node_to_json(tree, root),
        ref scalar => Err(DomainError::InvalidNodeType(scalar.kind())),
    }
}

fn node_to_json(tree: &DocumentTree, idx: Index) -> DomainResult<serde_json::Value> {
    let node = tree.get_node(idx).ok_or(DomainError::NodeNotFound)?;
    let json = match &node.data.value {
        Value::Map => {
            let mut object = Map::new();
            for &child in &node.children {
                let key = tree
                    .get_node(child)
                    .ok_or(DomainError::NodeNotFound)?
                    .data
                    .key
                    .clone();
                object.insert(key, node_to_json(tree, child)?);
            }
            serde_json::Value::Object(object)
        }
        Value::Array => serde_json::Value::Array(
            node.children
                .iter()
                .map(|&child| node_to_json(tree, child))
                .collect::<DomainResult<_>>()?,
        ),
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::Int(i) => serde_json::Value::from(*i),
        Value::Float(f) => Number::from_f64(*f)
            .map(serde_json::Value::Number)
            .ok_or(DomainError::NonFiniteFloat(*f))?,
        Value::Bool(b) => serde_json::Value::Bool(*b),
    };
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn given_numbers_when_importing_then_distinguishes_int_from_float() {
        let tree = import_json(br#"{"i": 42, "f": 42.0, "e": 1e3, "n": -7}"#).unwrap();
        assert_eq!(tree.lookup(&["i"]), Some(&Value::Int(42)));
        assert_eq!(tree.lookup(&["f"]), Some(&Value::Float(42.0)));
        assert_eq!(tree.lookup(&["e"]), Some(&Value::Float(1000.0)));
        assert_eq!(tree.lookup(&["n"]), Some(&Value::Int(-7)));
    }

    #[test]
    fn given_huge_unsigned_when_importing_then_fails() {
        let err = import_json(br#"{"big": 18446744073709551615}"#).unwrap_err();
        assert!(matches!(err, DomainError::IntegerOutOfRange(_)));
    }

    #[test]
    fn given_scalar_root_when_exporting_then_fails_with_invalid_node_type() {
        let mut tree = DocumentTree::new();
        tree.insert_root(Value::Int(1));
        let err = export_json(&tree).unwrap_err();
        assert!(err.to_string().contains("invalid node type"));
    }

    #[test]
    fn given_array_root_when_exporting_then_emits_json_array() {
        let mut tree = DocumentTree::new();
        let root = tree.insert_root(Value::Array);
        tree.add_child(root, "0", Value::Bool(true)).unwrap();
        tree.add_child(root, "1", "x".into()).unwrap();
        assert_eq!(export_value(&tree).unwrap(), json!([true, "x"]));
    }

    #[test]
    fn given_empty_tree_when_exporting_then_fails() {
        assert!(matches!(
            export_json(&DocumentTree::new()),
            Err(DomainError::EmptyTree)
        ));
    }
}
