//! Lowest common ancestor lookup by node id.
//!
//! Both ids are located first, then the parent links of one node are walked
//! up to the root. The first ancestor of the other node found on that path
//! (a node counts as its own ancestor) is the LCA.

use std::collections::HashSet;

use generational_arena::Index;
use tracing::{debug, instrument};

use crate::domain::{DomainError, DomainResult, NodeId, TreeArena, TreeNode};

/// `idx` followed by its ancestors up to the root.
fn ancestors(tree: &TreeArena, idx: Index) -> impl Iterator<Item = Index> + '_ {
    std::iter::successors(Some(idx), move |&i| tree.get_node(i).and_then(|n| n.parent))
}

/// True if `target` is `idx` itself or anywhere below it.
pub fn contains(tree: &TreeArena, idx: Option<Index>, target: NodeId) -> bool {
    match (idx, tree.find(target)) {
        (Some(idx), Some(found)) => ancestors(tree, found).any(|i| i == idx),
        _ => false,
    }
}

/// Lowest common ancestor of `a` and `b`.
#[instrument(level = "debug", skip(tree))]
pub fn lca(tree: &TreeArena, a: NodeId, b: NodeId) -> DomainResult<&TreeNode> {
    if tree.root().is_none() {
        return Err(DomainError::InvalidTree("tree has no root".to_string()));
    }
    let a_idx = tree.find(a).ok_or(DomainError::NodeNotFound(a))?;
    let b_idx = tree.find(b).ok_or(DomainError::NodeNotFound(b))?;

    let a_path: HashSet<Index> = ancestors(tree, a_idx).collect();
    let common = ancestors(tree, b_idx)
        .find(|i| a_path.contains(i))
        .ok_or_else(|| DomainError::InvalidTree(format!("{a} and {b} share no root")))?;
    let node = tree
        .get_node(common)
        .ok_or_else(|| DomainError::InvalidTree(format!("dangling index {common:?}")))?;
    debug!(id = %node.id, "common ancestor");
    Ok(node)
}
