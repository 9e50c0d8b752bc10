//! Arena-based document tree shared by the import and resolve paths.

use std::fmt;

use generational_arena::{Arena, Index};
use tracing::instrument;

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::Value;

/// Data payload for document tree nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeData {
    /// Map key, decimal position for array elements, empty for the root
    pub key: String,
    pub value: Value,
}

impl NodeData {
    pub fn new(key: impl Into<String>, value: Value) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

impl fmt::Display for NodeData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.value.is_container() {
            write!(f, "{}: ({})", self.key, self.value.kind())
        } else {
            write!(f, "{}: {} ({})", self.key, self.value, self.value.kind())
        }
    }
}

/// Tree node in the arena.
#[derive(Debug)]
pub struct TreeNode {
    pub data: NodeData,
    /// Index of the parent node, None for the root. Lookup only, never owning.
    pub parent: Option<Index>,
    /// Indices of child nodes in insertion order
    pub children: Vec<Index>,
}

/// Arena-based document tree.
///
/// Nodes are owned by the arena; parents reference children by index and
/// children point back at their parent by index. A tree is built once by
/// the importer or the resolver and only read afterwards.
#[derive(Debug)]
pub struct DocumentTree {
    arena: Arena<TreeNode>,
    root: Option<Index>,
}

impl Default for DocumentTree {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentTree {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
        }
    }

    /// Creates the root node, replacing any previous root.
    ///
    /// The root key is always empty.
    #[instrument(level = "trace", skip(self))]
    pub fn insert_root(&mut self, value: Value) -> Index {
        let node = TreeNode {
            data: NodeData::new("", value),
            parent: None,
            children: Vec::new(),
        };
        let idx = self.arena.insert(node);
        self.root = Some(idx);
        idx
    }

    /// Appends a child to a container node.
    ///
    /// Fails if the parent is missing, is a scalar, or is a map that already
    /// holds `key`.
    #[instrument(level = "trace", skip(self))]
    pub fn add_child(&mut self, parent: Index, key: &str, value: Value) -> DomainResult<Index> {
        let parent_node = self.arena.get(parent).ok_or(DomainError::NodeNotFound)?;
        let parent_kind = parent_node.data.value.kind();
        if !parent_kind.is_container() {
            return Err(DomainError::ScalarParent {
                key: key.to_string(),
                kind: parent_kind,
            });
        }
        if parent_node.data.value == Value::Map && self.child(parent, key).is_some() {
            return Err(DomainError::DuplicateKey(key.to_string()));
        }

        let idx = self.arena.insert(TreeNode {
            data: NodeData::new(key, value),
            parent: Some(parent),
            children: Vec::new(),
        });
        if let Some(parent_node) = self.arena.get_mut(parent) {
            parent_node.children.push(idx);
        }
        Ok(idx)
    }

    pub fn get_node(&self, idx: Index) -> Option<&TreeNode> {
        self.arena.get(idx)
    }

    pub fn root(&self) -> Option<Index> {
        self.root
    }

    pub fn root_node(&self) -> Option<&TreeNode> {
        self.root.and_then(|idx| self.get_node(idx))
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Looks up a direct child by key.
    pub fn child(&self, parent: Index, key: &str) -> Option<Index> {
        self.get_node(parent)?
            .children
            .iter()
            .copied()
            .find(|&c| self.get_node(c).is_some_and(|n| n.data.key == key))
    }

    /// Value of a direct child, looked up by key.
    pub fn child_value(&self, parent: Index, key: &str) -> Option<&Value> {
        self.child(parent, key)
            .and_then(|c| self.get_node(c))
            .map(|n| &n.data.value)
    }

    /// Follows a path of keys from the root.
    pub fn lookup(&self, path: &[&str]) -> Option<&Value> {
        let mut current = self.root?;
        for key in path {
            current = self.child(current, key)?;
        }
        self.get_node(current).map(|n| &n.data.value)
    }

    /// Whether the node's parent is an array, i.e. its key is a position.
    pub fn is_array_element(&self, idx: Index) -> bool {
        self.get_node(idx)
            .and_then(|n| n.parent)
            .and_then(|p| self.get_node(p))
            .is_some_and(|p| p.data.value == Value::Array)
    }

    /// Pre-order traversal, children left to right.
    pub fn iter(&self) -> TreeIterator<'_> {
        TreeIterator::new(self)
    }

    /// Post-order traversal: every subtree before its parent, root last.
    pub fn iter_postorder(&self) -> PostOrderIterator<'_> {
        PostOrderIterator::new(self)
    }

    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        if let Some(root) = self.root {
            self.calculate_depth(root)
        } else {
            0
        }
    }

    fn calculate_depth(&self, node_idx: Index) -> usize {
        if let Some(node) = self.get_node(node_idx) {
            1 + node
                .children
                .iter()
                .map(|&child| self.calculate_depth(child))
                .max()
                .unwrap_or(0)
        } else {
            0
        }
    }

    /// Structural equality: same keys, values and child order.
    pub fn same_structure(&self, other: &DocumentTree) -> bool {
        match (self.root, other.root) {
            (None, None) => true,
            (Some(a), Some(b)) => self.same_subtree(a, other, b),
            _ => false,
        }
    }

    fn same_subtree(&self, a: Index, other: &DocumentTree, b: Index) -> bool {
        let (Some(na), Some(nb)) = (self.get_node(a), other.get_node(b)) else {
            return false;
        };
        na.data == nb.data
            && na.children.len() == nb.children.len()
            && na
                .children
                .iter()
                .zip(&nb.children)
                .all(|(&ca, &cb)| self.same_subtree(ca, other, cb))
    }
}

pub struct TreeIterator<'a> {
    tree: &'a DocumentTree,
    stack: Vec<Index>,
}

impl<'a> TreeIterator<'a> {
    fn new(tree: &'a DocumentTree) -> Self {
        let mut stack = Vec::new();
        if let Some(root) = tree.root() {
            stack.push(root);
        }
        Self { tree, stack }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        let current_idx = self.stack.pop()?;
        let node = self.tree.get_node(current_idx)?;
        // Push children in reverse order for left-to-right traversal
        for &child in node.children.iter().rev() {
            self.stack.push(child);
        }
        Some((current_idx, node))
    }
}

pub struct PostOrderIterator<'a> {
    tree: &'a DocumentTree,
    stack: Vec<(Index, bool)>,
}

impl<'a> PostOrderIterator<'a> {
    fn new(tree: &'a DocumentTree) -> Self {
        let mut stack = Vec::new();
        if let Some(root) = tree.root() {
            stack.push((root, false));
        }
        Self { tree, stack }
    }
}

impl<'a> Iterator for PostOrderIterator<'a> {
    type Item = (Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current_idx, visited)) = self.stack.pop() {
            if let Some(node) = self.tree.get_node(current_idx) {
                if !visited {
                    self.stack.push((current_idx, true));
                    for &child in node.children.iter().rev() {
                        self.stack.push((child, false));
                    }
                } else {
                    return Some((current_idx, node));
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DocumentTree {
        // {"id": "x", "list": [true, 2], "nested": {"k": 1.5}}
        let mut tree = DocumentTree::new();
        let root = tree.insert_root(Value::Map);
        tree.add_child(root, "id", "x".into()).unwrap();
        let list = tree.add_child(root, "list", Value::Array).unwrap();
        tree.add_child(list, "0", true.into()).unwrap();
        tree.add_child(list, "1", 2i64.into()).unwrap();
        let nested = tree.add_child(root, "nested", Value::Map).unwrap();
        tree.add_child(nested, "k", 1.5.into()).unwrap();
        tree
    }

    #[test]
    fn given_tree_when_iterating_postorder_then_children_precede_parents() {
        let tree = sample();
        let keys: Vec<_> = tree
            .iter_postorder()
            .map(|(_, n)| n.data.key.as_str())
            .collect();
        assert_eq!(keys, vec!["id", "0", "1", "list", "k", "nested", ""]);
    }

    #[test]
    fn given_tree_when_iterating_preorder_then_root_comes_first() {
        let tree = sample();
        let keys: Vec<_> = tree.iter().map(|(_, n)| n.data.key.as_str()).collect();
        assert_eq!(keys, vec!["", "id", "list", "0", "1", "nested", "k"]);
    }

    #[test]
    fn given_scalar_node_when_adding_child_then_fails() {
        let mut tree = DocumentTree::new();
        let root = tree.insert_root(Value::Map);
        let leaf = tree.add_child(root, "id", "x".into()).unwrap();

        let err = tree.add_child(leaf, "nope", Value::Int(1)).unwrap_err();
        assert!(matches!(err, DomainError::ScalarParent { .. }));
    }

    #[test]
    fn given_existing_key_when_adding_to_map_then_fails() {
        let mut tree = DocumentTree::new();
        let root = tree.insert_root(Value::Map);
        tree.add_child(root, "id", "x".into()).unwrap();

        let err = tree.add_child(root, "id", "y".into()).unwrap_err();
        assert!(matches!(err, DomainError::DuplicateKey(k) if k == "id"));
    }

    #[test]
    fn given_tree_when_looking_up_children_then_finds_values() {
        let tree = sample();
        let root = tree.root().unwrap();
        assert_eq!(tree.child_value(root, "id"), Some(&Value::from("x")));
        assert_eq!(tree.lookup(&["nested", "k"]), Some(&Value::Float(1.5)));
        assert_eq!(tree.lookup(&["list", "1"]), Some(&Value::Int(2)));
        assert!(tree.lookup(&["missing"]).is_none());

        let list = tree.child(root, "list").unwrap();
        let first = tree.child(list, "0").unwrap();
        assert!(tree.is_array_element(first));
        assert!(!tree.is_array_element(list));
        assert_eq!(tree.get_node(first).unwrap().parent, Some(list));
    }

    #[test]
    fn given_tree_when_measuring_then_reports_depth_and_size() {
        let tree = sample();
        assert_eq!(tree.depth(), 3);
        assert_eq!(tree.len(), 7);
        assert!(DocumentTree::new().is_empty());
    }

    #[test]
    fn given_two_trees_when_comparing_then_order_matters() {
        let a = sample();
        let b = sample();
        assert!(a.same_structure(&b));

        let mut c = DocumentTree::new();
        let root = c.insert_root(Value::Map);
        c.add_child(root, "id", "x".into()).unwrap();
        assert!(!a.same_structure(&c));
    }
}
