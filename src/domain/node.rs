//! Tree node entity

use std::fmt;

use generational_arena::Index;
use serde::{Deserialize, Serialize};

/// Identifier assigned to a node at creation time, starting at 1 for the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which child slot of a parent a node occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// Binary tree node stored in a [`TreeArena`](crate::domain::TreeArena).
#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    pub value: i64,
    pub id: NodeId,
    /// Depth of the node, the root is at depth 1
    pub depth: u32,
    /// Inherited lower bound, only set in balanced mode
    pub minimum: Option<i64>,
    /// Inherited upper bound, only set in balanced mode
    pub maximum: Option<i64>,
    pub parent: Option<Index>,
    pub left: Option<Index>,
    pub right: Option<Index>,
}

impl TreeNode {
    pub fn new(value: i64, id: NodeId, depth: u32) -> Self {
        Self {
            value,
            id,
            depth,
            minimum: None,
            maximum: None,
            parent: None,
            left: None,
            right: None,
        }
    }

    pub fn with_bounds(mut self, minimum: i64, maximum: i64) -> Self {
        self.minimum = Some(minimum);
        self.maximum = Some(maximum);
        self
    }

    pub fn child(&self, side: Side) -> Option<Index> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    /// Children in left-to-right order.
    pub fn children(&self) -> impl Iterator<Item = Index> {
        self.left.into_iter().chain(self.right)
    }
}

impl fmt::Display for TreeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TreeNode(val={}, id={})", self.value, self.id)
    }
}
