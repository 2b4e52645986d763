//! Property tests for the random tree generator

use std::collections::HashSet;

use rstest::rstest;

use treegen::domain::{
    generate, DomainError, GeneratorConfig, NodeId, SequenceRandom, StdRandom, TreeArena,
    TreeGenerator,
};
use treegen::util::testing;

#[ctor::ctor]
fn init() {
    testing::init_test_setup();
}

fn config(sparsity: f64, min_depth: u32, max_depth: u32) -> GeneratorConfig {
    GeneratorConfig {
        sparsity,
        min_depth,
        max_depth,
        ..Default::default()
    }
}

/// Values of every node below `idx`, `idx` included.
fn subtree_values(tree: &TreeArena, idx: Option<generational_arena::Index>) -> Vec<i64> {
    let mut values = Vec::new();
    let mut stack: Vec<_> = idx.into_iter().collect();
    while let Some(i) = stack.pop() {
        if let Some(node) = tree.get_node(i) {
            values.push(node.value);
            stack.extend(node.children());
        }
    }
    values
}

// ============================================================
// Depth bounds
// ============================================================

#[rstest]
#[case(0.0, 5, 5)]
#[case(0.3, 3, 6)]
#[case(0.5, 4, 8)]
#[case(0.8, 6, 6)]
#[case(0.9, 5, 10)]
#[case(0.5, 1, 4)]
fn given_config_when_generating_then_depth_within_bounds(
    #[case] sparsity: f64,
    #[case] min_depth: u32,
    #[case] max_depth: u32,
    #[values(1, 2, 3, 17, 99)] seed: u64,
) {
    let tree = generate(&config(sparsity, min_depth, max_depth), StdRandom::seeded(seed)).unwrap();

    assert!(tree.depth() >= min_depth as usize, "depth {} < {}", tree.depth(), min_depth);
    assert!(tree.depth() <= max_depth as usize, "depth {} > {}", tree.depth(), max_depth);
    for (_, node) in tree.iter() {
        assert!(node.depth <= max_depth);
    }
}

#[test]
fn given_min_depth_above_max_depth_when_generating_then_min_clamped_to_max() {
    let generator = TreeGenerator::new(config(0.5, 10, 3), StdRandom::seeded(8)).unwrap();
    assert_eq!(generator.config().min_depth, 3);

    let tree = generate(&config(0.5, 10, 3), StdRandom::seeded(8)).unwrap();
    assert_eq!(tree.depth(), 3);
}

#[rstest]
fn given_any_tree_when_walking_edges_then_child_depth_is_parent_plus_one(
    #[values(0.0, 0.4, 0.7)] sparsity: f64,
    #[values(4, 21)] seed: u64,
) {
    let tree = generate(&config(sparsity, 4, 7), StdRandom::seeded(seed)).unwrap();

    for (idx, node) in tree.iter() {
        match node.parent {
            None => {
                assert_eq!(Some(idx), tree.root());
                assert_eq!(node.depth, 1);
            }
            Some(p) => {
                let parent = tree.get_node(p).unwrap();
                assert_eq!(node.depth, parent.depth + 1);
                assert!(parent.left == Some(idx) || parent.right == Some(idx));
            }
        }
    }
}

// ============================================================
// Identifiers
// ============================================================

#[rstest]
fn given_any_tree_when_collecting_ids_then_unique_and_contiguous(
    #[values(0.0, 0.5)] sparsity: f64,
    #[values(5, 6, 7)] seed: u64,
) {
    let tree = generate(&config(sparsity, 3, 6), StdRandom::seeded(seed)).unwrap();

    let ids: HashSet<NodeId> = tree.iter().map(|(_, n)| n.id).collect();
    assert_eq!(ids.len(), tree.len());
    let expected: HashSet<NodeId> = (1..=tree.len() as u64).map(NodeId).collect();
    assert_eq!(ids, expected);
    assert_eq!(tree.root_node().unwrap().id, NodeId(1));

    // Children are always created after their parent
    for (_, node) in tree.iter() {
        if let Some(p) = node.parent {
            assert!(node.id > tree.get_node(p).unwrap().id);
        }
    }
}

#[test]
fn given_same_seed_when_generating_twice_then_trees_match() {
    let cfg = GeneratorConfig {
        balanced: true,
        ..config(0.4, 3, 7)
    };
    let a = generate(&cfg, StdRandom::seeded(1234)).unwrap();
    let b = generate(&cfg, StdRandom::seeded(1234)).unwrap();

    let flatten = |t: &TreeArena| -> Vec<(NodeId, i64, u32)> {
        t.iter().map(|(_, n)| (n.id, n.value, n.depth)).collect()
    };
    assert_eq!(flatten(&a), flatten(&b));
}

// ============================================================
// Values
// ============================================================

#[rstest]
fn given_unbalanced_config_when_generating_then_values_in_global_range(
    #[values(3, 4)] seed: u64,
) {
    let cfg = GeneratorConfig {
        tree_minimum_value: -20,
        tree_maximum_value: 20,
        ..config(0.2, 4, 6)
    };
    let tree = generate(&cfg, StdRandom::seeded(seed)).unwrap();
    for (_, node) in tree.iter() {
        assert!((-20..20).contains(&node.value), "value {} out of range", node.value);
    }
}

#[rstest]
fn given_balanced_config_when_generating_then_bst_ordering_holds(
    #[values(0.0, 0.3, 0.6)] sparsity: f64,
    #[values(1, 2, 3, 4)] seed: u64,
) {
    let cfg = GeneratorConfig {
        balanced: true,
        ..config(sparsity, 4, 6)
    };
    let tree = generate(&cfg, StdRandom::seeded(seed)).unwrap();

    for (_, node) in tree.iter() {
        let low = node.minimum.unwrap_or(cfg.tree_minimum_value);
        let high = node.maximum.unwrap_or(cfg.tree_maximum_value);
        assert!(node.value >= low && node.value <= high);
        if low < high {
            assert!(node.value < high);
        }

        for v in subtree_values(&tree, node.left) {
            assert!(v <= node.value, "left value {} > {}", v, node.value);
        }
        for v in subtree_values(&tree, node.right) {
            assert!(v >= node.value, "right value {} < {}", v, node.value);
        }
    }
}

#[test]
fn given_narrow_value_range_when_balanced_then_degenerate_ranges_collapse() {
    let cfg = GeneratorConfig {
        balanced: true,
        tree_minimum_value: 0,
        tree_maximum_value: 2,
        ..config(0.0, 5, 5)
    };
    let tree = generate(&cfg, StdRandom::seeded(77)).unwrap();
    assert_eq!(tree.len(), 31);
    for (_, node) in tree.iter() {
        assert!((0..2).contains(&node.value));
    }
}

// ============================================================
// Shape edge cases
// ============================================================

#[rstest]
#[case(1)]
#[case(2)]
#[case(4)]
#[case(6)]
fn given_zero_sparsity_when_min_equals_max_then_tree_is_full(#[case] depth: u32) {
    let tree = generate(&config(0.0, depth, depth), StdRandom::seeded(0)).unwrap();

    assert_eq!(tree.len(), (1usize << depth) - 1);
    for (_, node) in tree.iter() {
        if node.depth < depth {
            assert!(node.left.is_some() && node.right.is_some());
        } else {
            assert!(node.is_leaf());
        }
    }
}

#[test]
fn given_full_sparsity_and_min_depth_one_when_generating_then_single_node() {
    let tree = generate(&config(1.0, 1, 5), StdRandom::seeded(2)).unwrap();
    assert_eq!(tree.len(), 1);
    assert!(tree.root_node().unwrap().is_leaf());
}

#[test]
fn given_full_sparsity_and_min_depth_two_when_generating_then_unsatisfiable() {
    let result = generate(&config(1.0, 2, 5), StdRandom::seeded(2));
    assert!(matches!(
        result,
        Err(DomainError::UnsatisfiableDepth { min_depth: 2, .. })
    ));
}

#[test]
fn given_max_depth_one_when_generating_then_root_only() {
    let tree = generate(&config(0.0, 5, 1), StdRandom::seeded(2)).unwrap();
    assert_eq!(tree.len(), 1);
}

#[test]
fn given_never_kept_children_when_retry_cap_hit_then_unsatisfiable() {
    let cfg = GeneratorConfig {
        max_retries: 50,
        ..config(0.5, 3, 4)
    };
    // every sparsity draw lands below 0.5
    let result = generate(&cfg, SequenceRandom::constant(0.1));
    assert!(matches!(result, Err(DomainError::UnsatisfiableDepth { .. })));
}

// ============================================================
// Configuration errors
// ============================================================

#[rstest]
#[case::zero_max_depth(GeneratorConfig { max_depth: 0, ..Default::default() })]
#[case::zero_min_depth(GeneratorConfig { min_depth: 0, ..Default::default() })]
#[case::empty_value_range(GeneratorConfig { tree_minimum_value: 10, tree_maximum_value: 10, ..Default::default() })]
#[case::inverted_value_range(GeneratorConfig { tree_minimum_value: 10, tree_maximum_value: 0, ..Default::default() })]
#[case::negative_sparsity(GeneratorConfig { sparsity: -0.1, ..Default::default() })]
#[case::sparsity_above_one(GeneratorConfig { sparsity: 1.5, ..Default::default() })]
fn given_invalid_config_when_generating_then_configuration_error(#[case] cfg: GeneratorConfig) {
    let result = generate(&cfg, StdRandom::seeded(0));
    assert!(
        matches!(result, Err(DomainError::Configuration { .. })),
        "unexpected: {:?}",
        result
    );
}
