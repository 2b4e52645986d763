use generational_arena::{Arena, Index};
use tracing::instrument;

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::node::{NodeId, Side, TreeNode};

/// Arena-based binary tree.
///
/// Uses generational arena for memory-safe node references and O(1) lookups.
/// Every node is owned by the arena; parents refer to children by index.
#[derive(Debug)]
pub struct TreeArena {
    /// Arena storage for all tree nodes
    arena: Arena<TreeNode>,
    /// Index of the root node, None for empty trees
    root: Option<Index>,
}

impl Default for TreeArena {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeArena {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
        }
    }

    /// Inserts the root node. Fails if the tree already has one.
    #[instrument(level = "trace", skip(self))]
    pub fn insert_root(&mut self, node: TreeNode) -> DomainResult<Index> {
        if self.root.is_some() {
            return Err(DomainError::InvalidTree("root already set".to_string()));
        }
        let idx = self.arena.insert(TreeNode {
            parent: None,
            ..node
        });
        self.root = Some(idx);
        Ok(idx)
    }

    /// Attaches `node` as the `side` child of `parent`.
    #[instrument(level = "trace", skip(self))]
    pub fn insert_child(&mut self, parent: Index, side: Side, node: TreeNode) -> DomainResult<Index> {
        match self.arena.get(parent) {
            None => {
                return Err(DomainError::InvalidTree(format!(
                    "parent {parent:?} not in tree"
                )))
            }
            Some(p) if p.child(side).is_some() => {
                return Err(DomainError::InvalidTree(format!(
                    "node {} already has a {side:?} child",
                    p.id
                )))
            }
            Some(_) => {}
        }

        let idx = self.arena.insert(TreeNode {
            parent: Some(parent),
            ..node
        });
        if let Some(p) = self.arena.get_mut(parent) {
            match side {
                Side::Left => p.left = Some(idx),
                Side::Right => p.right = Some(idx),
            }
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
        self.root.and_then(|r| self.get_node(r))
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Looks up a node by its identifier.
    pub fn find(&self, id: NodeId) -> Option<Index> {
        self.arena
            .iter()
            .find(|(_, node)| node.id == id)
            .map(|(idx, _)| idx)
    }

    /// Pre-order traversal, left subtree before right.
    pub fn iter(&self) -> TreeIterator {
        TreeIterator::new(self)
    }

    /// Post-order traversal, children before their parent.
    pub fn iter_postorder(&self) -> PostOrderIterator {
        PostOrderIterator::new(self)
    }

    /// Number of nodes on the longest root-to-leaf path.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        self.iter()
            .map(|(_, node)| node.depth as usize)
            .max()
            .unwrap_or(0)
    }
}

pub struct TreeIterator<'a> {
    arena: &'a TreeArena,
    stack: Vec<Index>,
}

impl<'a> TreeIterator<'a> {
    fn new(arena: &'a TreeArena) -> Self {
        Self {
            arena,
            stack: arena.root().into_iter().collect(),
        }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        let current_idx = self.stack.pop()?;
        let node = self.arena.get_node(current_idx)?;
        // Right first so that left is popped first
        self.stack.extend(node.right);
        self.stack.extend(node.left);
        Some((current_idx, node))
    }
}

pub struct PostOrderIterator<'a> {
    arena: &'a TreeArena,
    stack: Vec<(Index, bool)>,
}

impl<'a> PostOrderIterator<'a> {
    fn new(arena: &'a TreeArena) -> Self {
        Self {
            arena,
            stack: arena.root().map(|r| (r, false)).into_iter().collect(),
        }
    }
}

impl<'a> Iterator for PostOrderIterator<'a> {
    type Item = (Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current_idx, visited)) = self.stack.pop() {
            if let Some(node) = self.arena.get_node(current_idx) {
                if visited {
                    return Some((current_idx, node));
                }
                self.stack.push((current_idx, true));
                if let Some(right) = node.right {
                    self.stack.push((right, false));
                }
                if let Some(left) = node.left {
                    self.stack.push((left, false));
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    //      1
    //     / \
    //    2   3
    //   /
    //  4
    fn sample() -> TreeArena {
        let mut tree = TreeArena::new();
        let root = tree.insert_root(TreeNode::new(50, NodeId(1), 1)).unwrap();
        let left = tree
            .insert_child(root, Side::Left, TreeNode::new(20, NodeId(2), 2))
            .unwrap();
        tree.insert_child(root, Side::Right, TreeNode::new(80, NodeId(3), 2))
            .unwrap();
        tree.insert_child(left, Side::Left, TreeNode::new(10, NodeId(4), 3))
            .unwrap();
        tree
    }

    #[test]
    fn test_preorder_visits_left_before_right() {
        let tree = sample();
        let ids: Vec<u64> = tree.iter().map(|(_, n)| n.id.0).collect();
        assert_eq!(ids, vec![1, 2, 4, 3]);
    }

    #[test]
    fn test_postorder_visits_children_first() {
        let tree = sample();
        let ids: Vec<u64> = tree.iter_postorder().map(|(_, n)| n.id.0).collect();
        assert_eq!(ids, vec![4, 2, 3, 1]);
    }

    #[test]
    fn test_depth_and_len() {
        let tree = sample();
        assert_eq!(tree.depth(), 3);
        assert_eq!(tree.len(), 4);
    }

    #[test]
    fn test_insert_child_twice_on_same_side_fails() {
        let mut tree = sample();
        let root = tree.root().unwrap();
        let result = tree.insert_child(root, Side::Left, TreeNode::new(1, NodeId(9), 2));
        assert!(matches!(result, Err(DomainError::InvalidTree(_))));
    }

    #[test]
    fn test_second_root_rejected() {
        let mut tree = sample();
        assert!(tree.insert_root(TreeNode::new(1, NodeId(9), 1)).is_err());
    }

    #[test]
    fn test_find_and_parent_links() {
        let tree = sample();
        let idx = tree.find(NodeId(4)).unwrap();
        let node = tree.get_node(idx).unwrap();
        let parent = tree.get_node(node.parent.unwrap()).unwrap();
        assert_eq!(parent.id, NodeId(2));
        assert!(tree.find(NodeId(99)).is_none());
    }

    #[test]
    fn test_empty_tree() {
        let tree = TreeArena::new();
        assert!(tree.is_empty());
        assert_eq!(tree.depth(), 0);
        assert!(tree.iter().next().is_none());
        assert!(tree.root_node().is_none());
    }
}
