//! Application layer: consumers of generated trees
//!
//! Rendering and queries only read the tree; none of them mutate it.

pub mod display;
pub mod error;
pub mod lca;
pub mod render;

pub use display::TreeNodeConvert;
pub use error::{ApplicationError, ApplicationResult};
pub use lca::{contains, lca};
pub use render::{render, render_with_attrs, Diagram, DiagramEdge, DiagramNode};
