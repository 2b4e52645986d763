//! Random binary tree generation with depth, sparsity and BST-ordering constraints.
//!
//! ```
//! use treegen::domain::{generate, GeneratorConfig, StdRandom};
//! use treegen::application::{lca, render};
//!
//! let config = GeneratorConfig { max_depth: 3, min_depth: 3, ..Default::default() };
//! let tree = generate(&config, StdRandom::seeded(42)).unwrap();
//! assert_eq!(tree.len(), 7);
//!
//! let diagram = render(&tree).unwrap();
//! assert_eq!(diagram.edges.len(), 6);
//!
//! let root = tree.root_node().unwrap();
//! assert_eq!(lca(&tree, root.id, root.id).unwrap().id, root.id);
//! ```

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod util;
