//! Emits the TXT records that publish a document tree under a base domain.

use std::collections::HashMap;

use generational_arena::Index;
use tracing::{debug, instrument, warn};

use crate::domain::did::ROOT_LABEL;
use crate::domain::record::{encode_label, RecordValue, ResourceRecord, DEFAULT_TTL};
use crate::domain::{DocumentTree, TreeNode, Value};

const MAX_LABEL_LEN: usize = 63;

/// Encodes `tree` under `base` with the default TTL.
///
/// See [`encode_with_ttl`].
pub fn encode(tree: &DocumentTree, base: &str) -> Vec<ResourceRecord> {
    encode_with_ttl(tree, base, DEFAULT_TTL)
}

/// Encodes `tree` as TXT records published under `base`, which must be a
/// dot-terminated name.
///
/// Records are emitted in post-order: every subtree before its parent and
/// the root record (`_did.<base>`) last. Children of a map are addressed by
/// their base64 key, children of an array by their raw index.
#[instrument(level = "debug", skip(tree), fields(nodes = tree.len()))]
pub fn encode_with_ttl(tree: &DocumentTree, base: &str, ttl: u32) -> Vec<ResourceRecord> {
    let mut names: HashMap<Index, String> = HashMap::with_capacity(tree.len());
    // Pre-order guarantees a parent's name exists before its children ask for it.
    for (idx, node) in tree.iter() {
        let name = match node.parent {
            None => format!("{ROOT_LABEL}.{base}"),
            Some(parent) => {
                let label = child_label(tree, idx, node);
                check_label(&label, &node.data.key);
                format!("{label}.{}", names[&parent])
            }
        };
        names.insert(idx, name);
    }

    let records: Vec<ResourceRecord> = tree
        .iter_postorder()
        .map(|(idx, node)| ResourceRecord::txt(names[&idx].clone(), ttl, &record_value(tree, node)))
        .collect();
    debug!("encoded {} records under {}", records.len(), base);
    records
}

fn child_label(tree: &DocumentTree, idx: Index, node: &TreeNode) -> String {
    if tree.is_array_element(idx) {
        node.data.key.clone()
    } else {
        encode_label(&node.data.key)
    }
}

fn record_value(tree: &DocumentTree, node: &TreeNode) -> RecordValue {
    let value = &node.data.value;
    RecordValue::scalar(value).unwrap_or_else(|| match value {
        Value::Array => RecordValue::array(node.children.len()),
        _ => {
            if node.children.is_empty() {
                warn!(key = %node.data.key, "empty map pointer has no data and cannot be resolved");
            }
            RecordValue::map(
                node.children
                    .iter()
                    .filter_map(|&c| tree.get_node(c))
                    .map(|c| c.data.key.as_str()),
            )
        }
    })
}

fn check_label(label: &str, key: &str) {
    if label.is_empty() {
        warn!(%key, "empty key produces an empty DNS label");
    } else if label.len() > MAX_LABEL_LEN {
        warn!(%key, len = label.len(), "encoded key exceeds the 63 byte DNS label limit");
    }
}
