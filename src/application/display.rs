/*
Text rendering of a generated tree via termtree.
Children are prefixed with their side so single-child nodes stay unambiguous.
 */
use std::collections::HashMap;

use generational_arena::Index;
use termtree::Tree;

use crate::domain::{Side, TreeArena, TreeNode};

pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> Tree<String>;

    /// Formatted text tree.
    fn to_tree_text(&self) -> String {
        let tree = self.to_tree_string();
        let text = tree.to_string();
        release(tree);
        text
    }
}

fn node_label(node: &TreeNode, side: Option<Side>) -> String {
    let prefix = match side {
        Some(Side::Left) => "L: ",
        Some(Side::Right) => "R: ",
        None => "",
    };
    format!("{}{} (#{})", prefix, node.value, node.id)
}

fn side_of(arena: &TreeArena, idx: Index, node: &TreeNode) -> Option<Side> {
    let parent = arena.get_node(node.parent?)?;
    if parent.left == Some(idx) {
        Some(Side::Left)
    } else {
        Some(Side::Right)
    }
}

/// Takes a nested tree apart level by level; the derived drop recurses.
fn release(tree: Tree<String>) {
    let mut pending = vec![tree];
    while let Some(mut tree) = pending.pop() {
        pending.append(&mut tree.leaves);
    }
}

impl TreeNodeConvert for TreeArena {
    fn to_tree_string(&self) -> Tree<String> {
        // children are finished before their parent in post-order
        let mut built: HashMap<Index, Tree<String>> = HashMap::new();
        for (idx, node) in self.iter_postorder() {
            let mut tree = Tree::new(node_label(node, side_of(self, idx, node)));
            for child in node.children() {
                if let Some(child_tree) = built.remove(&child) {
                    tree.push(child_tree);
                }
            }
            built.insert(idx, tree);
        }

        self.root()
            .and_then(|root| built.remove(&root))
            .unwrap_or_else(|| Tree::new("Empty tree".to_string()))
    }
}
