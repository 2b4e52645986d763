//! Domain layer: tree entities and the generator
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod entities;
pub mod error;
pub mod generator;
pub mod node;
pub mod random;

pub use arena::{PostOrderIterator, TreeArena, TreeIterator};
pub use entities::*;
pub use error::{DomainError, DomainResult};
pub use generator::{generate, TreeGenerator};
pub use node::{NodeId, Side, TreeNode};
pub use random::{RandomSource, SequenceRandom, StdRandom};
