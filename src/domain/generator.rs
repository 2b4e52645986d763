//! Random binary tree generator.
//!
//! Nodes are expanded depth-first from an explicit stack. A node that ends up
//! childless above the minimum depth is pushed back and re-rolled until some
//! root-to-leaf path reaches `min_depth`; from then on no node is forced.

use generational_arena::Index;
use tracing::{debug, info, instrument, trace};

use crate::domain::arena::TreeArena;
use crate::domain::entities::GeneratorConfig;
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::node::{NodeId, Side, TreeNode};
use crate::domain::random::RandomSource;

/// Builds random trees for one [`GeneratorConfig`].
pub struct TreeGenerator<R> {
    config: GeneratorConfig,
    rng: R,
}

/// Mutable bookkeeping of a single `generate` call.
#[derive(Debug, Default)]
struct GenerationState {
    tree: TreeArena,
    last_id: u64,
    min_depth_reached: bool,
    retries: u32,
}

impl GenerationState {
    fn next_id(&mut self) -> NodeId {
        self.last_id += 1;
        NodeId(self.last_id)
    }
}

/// Copy of the parent fields a child derives from.
#[derive(Debug, Clone, Copy)]
struct ParentView {
    idx: Index,
    value: i64,
    depth: u32,
    minimum: Option<i64>,
    maximum: Option<i64>,
}

impl<R: RandomSource> TreeGenerator<R> {
    /// Validates `config` and clamps `min_depth` to `max_depth`.
    pub fn new(config: GeneratorConfig, rng: R) -> DomainResult<Self> {
        config.validate()?;
        let normalized = config.normalized();
        if normalized.min_depth != config.min_depth {
            debug!(
                requested = config.min_depth,
                clamped = normalized.min_depth,
                "min_depth above max_depth, clamped"
            );
        }
        Ok(Self {
            config: normalized,
            rng,
        })
    }

    /// Effective configuration after normalization.
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    #[instrument(level = "debug", name = "generate", skip(self), fields(
        sparsity = self.config.sparsity,
        min_depth = self.config.min_depth,
        max_depth = self.config.max_depth,
        balanced = self.config.balanced,
    ))]
    pub fn generate(&mut self) -> DomainResult<TreeArena> {
        if self.config.sparsity >= 1.0 && self.config.min_depth > 1 {
            return Err(DomainError::UnsatisfiableDepth {
                min_depth: self.config.min_depth,
                reason: "sparsity 1 never creates a child".to_string(),
            });
        }

        let mut state = GenerationState::default();
        let value = self.draw_value(self.config.tree_minimum_value, self.config.tree_maximum_value);
        let id = state.next_id();
        let root = state.tree.insert_root(TreeNode::new(value, id, 1))?;

        let mut stack = vec![root];
        while let Some(idx) = stack.pop() {
            let (left, right, depth) = self.expand(&mut state, idx)?;
            stack.extend(left);
            stack.extend(right);

            if left.is_none()
                && right.is_none()
                && depth < self.config.min_depth
                && !state.min_depth_reached
            {
                state.retries += 1;
                if state.retries > self.config.max_retries {
                    return Err(DomainError::UnsatisfiableDepth {
                        min_depth: self.config.min_depth,
                        reason: format!("gave up after {} retries", self.config.max_retries),
                    });
                }
                trace!(depth, retry = state.retries, "childless node above min_depth, retrying");
                stack.push(idx);
            }
        }

        info!(
            nodes = state.tree.len(),
            depth = state.tree.depth(),
            retries = state.retries,
            "tree generated"
        );
        Ok(state.tree)
    }

    /// Tries to attach a right and a left child to `idx`.
    ///
    /// Returns the created children as `(left, right)` plus the node depth.
    fn expand(
        &mut self,
        state: &mut GenerationState,
        idx: Index,
    ) -> DomainResult<(Option<Index>, Option<Index>, u32)> {
        let node = state
            .tree
            .get_node(idx)
            .ok_or_else(|| DomainError::InvalidTree(format!("node {idx:?} vanished")))?;
        let parent = ParentView {
            idx,
            value: node.value,
            depth: node.depth,
            minimum: node.minimum,
            maximum: node.maximum,
        };

        if !state.min_depth_reached && parent.depth >= self.config.min_depth {
            debug!(id = %node.id, depth = parent.depth, "min_depth reached");
            state.min_depth_reached = true;
        }

        if parent.depth >= self.config.max_depth {
            return Ok((None, None, parent.depth));
        }

        let right = if self.keep_child() {
            Some(self.spawn(state, &parent, Side::Right)?)
        } else {
            None
        };
        let left = if self.keep_child() {
            Some(self.spawn(state, &parent, Side::Left)?)
        } else {
            None
        };

        Ok((left, right, parent.depth))
    }

    fn spawn(
        &mut self,
        state: &mut GenerationState,
        parent: &ParentView,
        side: Side,
    ) -> DomainResult<Index> {
        let (low, high) = match side {
            Side::Right => (
                parent.value,
                parent.maximum.unwrap_or(self.config.tree_maximum_value),
            ),
            Side::Left => (
                parent.minimum.unwrap_or(self.config.tree_minimum_value),
                parent.value,
            ),
        };

        let node = if self.config.balanced {
            let value = self.draw_value(low, high);
            TreeNode::new(value, state.next_id(), parent.depth + 1).with_bounds(low, high)
        } else {
            let value = self.draw_value(self.config.tree_minimum_value, self.config.tree_maximum_value);
            TreeNode::new(value, state.next_id(), parent.depth + 1)
        };

        state.tree.insert_child(parent.idx, side, node)
    }

    /// A potential child survives when the unit draw is not below `sparsity`.
    fn keep_child(&mut self) -> bool {
        self.rng.unit() >= self.config.sparsity
    }

    /// Integer drawn uniformly from `[low, high)`, or `low` for an empty range.
    fn draw_value(&mut self, low: i64, high: i64) -> i64 {
        if high <= low {
            return low;
        }
        let raw = self.rng.uniform(low as f64, high as f64).floor() as i64;
        raw.clamp(low, high - 1)
    }
}

/// Validates `config` and generates one tree from `rng`.
pub fn generate<R: RandomSource>(config: &GeneratorConfig, rng: R) -> DomainResult<TreeArena> {
    TreeGenerator::new(config.clone(), rng)?.generate()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::random::{SequenceRandom, StdRandom};

    fn config(sparsity: f64, min_depth: u32, max_depth: u32) -> GeneratorConfig {
        GeneratorConfig {
            sparsity,
            min_depth,
            max_depth,
            ..Default::default()
        }
    }

    #[test]
    fn test_childless_root_is_retried_until_min_depth() {
        // root value, [right omitted, left omitted], retry: [right kept + value, left omitted]
        let rng = SequenceRandom::new([0.5, 0.1, 0.2, 0.7, 0.25, 0.1]);
        let tree = generate(&config(0.5, 2, 2), rng).unwrap();

        assert_eq!(tree.len(), 2);
        let root = tree.root_node().unwrap();
        assert_eq!(root.value, 500);
        assert_eq!(root.id, NodeId(1));
        assert!(root.left.is_none());

        let right = tree.get_node(root.right.unwrap()).unwrap();
        assert_eq!(right.value, 250);
        assert_eq!(right.id, NodeId(2));
        assert_eq!(right.depth, 2);
    }

    #[test]
    fn test_right_child_gets_lower_id_than_left() {
        let tree = generate(&config(0.0, 2, 2), StdRandom::seeded(3)).unwrap();
        let root = tree.root_node().unwrap();
        let right = tree.get_node(root.right.unwrap()).unwrap();
        let left = tree.get_node(root.left.unwrap()).unwrap();
        assert_eq!(right.id, NodeId(2));
        assert_eq!(left.id, NodeId(3));
    }

    #[test]
    fn test_retry_cap_stops_generation() {
        let cfg = GeneratorConfig {
            max_retries: 5,
            ..config(0.99, 3, 3)
        };
        let result = generate(&cfg, SequenceRandom::constant(0.0));
        assert!(matches!(
            result,
            Err(DomainError::UnsatisfiableDepth { min_depth: 3, .. })
        ));
    }

    #[test]
    fn test_full_sparsity_with_min_depth_fails_fast() {
        let result = generate(&config(1.0, 2, 4), StdRandom::seeded(0));
        assert!(matches!(result, Err(DomainError::UnsatisfiableDepth { .. })));
    }

    #[test]
    fn test_balanced_children_carry_bounds() {
        let cfg = GeneratorConfig {
            balanced: true,
            ..config(0.0, 2, 2)
        };
        let tree = generate(&cfg, StdRandom::seeded(11)).unwrap();
        let root = tree.root_node().unwrap();
        assert_eq!(root.minimum, None);
        let left = tree.get_node(root.left.unwrap()).unwrap();
        let right = tree.get_node(root.right.unwrap()).unwrap();
        assert_eq!((left.minimum, left.maximum), (Some(0), Some(root.value)));
        assert_eq!((right.minimum, right.maximum), (Some(root.value), Some(1000)));
    }

    #[test]
    fn test_unbalanced_children_have_no_bounds() {
        let tree = generate(&config(0.0, 3, 3), StdRandom::seeded(5)).unwrap();
        assert!(tree
            .iter()
            .all(|(_, n)| n.minimum.is_none() && n.maximum.is_none()));
    }

    #[test]
    fn test_draw_value_never_reaches_upper_bound() {
        let mut generator =
            TreeGenerator::new(GeneratorConfig::default(), SequenceRandom::constant(0.999_999_999_999))
                .unwrap();
        assert_eq!(generator.draw_value(0, 10), 9);
        assert_eq!(generator.draw_value(-10, -3), -4);
        assert_eq!(generator.draw_value(4, 4), 4);
    }
}
