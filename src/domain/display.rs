//! Tree rendering for the `--tree` output of resolve.

use generational_arena::Index;
use termtree::Tree;

use crate::domain::did::ROOT_LABEL;
use crate::domain::DocumentTree;

pub trait TreeDisplay {
    fn to_tree_string(&self) -> Tree<String>;
}

impl TreeDisplay for DocumentTree {
    /// Renders every node as `key: value (kind)`, containers as `key: (kind)`.
    fn to_tree_string(&self) -> Tree<String> {
        let Some(root) = self.root_node() else {
            return Tree::new("Empty tree".to_string());
        };
        let mut tree = Tree::new(format!("{ROOT_LABEL}: ({})", root.data.value.kind()));

        fn build_tree(doc: &DocumentTree, node_idx: Index, parent_tree: &mut Tree<String>) {
            if let Some(node) = doc.get_node(node_idx) {
                for &child_idx in &node.children {
                    if let Some(child) = doc.get_node(child_idx) {
                        let mut child_tree = Tree::new(child.data.to_string());
                        build_tree(doc, child_idx, &mut child_tree);
                        parent_tree.push(child_tree);
                    }
                }
            }
        }

        if let Some(root_idx) = self.root() {
            build_tree(self, root_idx, &mut tree);
        }
        tree
    }
}
