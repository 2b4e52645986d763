//! Graph diagram construction for generated trees.
//!
//! The diagram is a plain node/edge list. Layout and drawing are left to
//! whatever consumes it; [`Diagram::to_dot`] hands it to Graphviz.

use std::collections::BTreeMap;
use std::fmt::{self, Write};

use tracing::instrument;

use crate::domain::{DomainError, DomainResult, TreeArena, TreeNode};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramNode {
    /// Stable key, the node id
    pub name: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramEdge {
    pub from: String,
    pub to: String,
}

/// Directed graph in construction order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagram {
    pub nodes: Vec<DiagramNode>,
    pub edges: Vec<DiagramEdge>,
    pub graph_attrs: BTreeMap<String, String>,
}

impl Diagram {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(&mut self, name: impl Into<String>, label: impl Into<String>) {
        self.nodes.push(DiagramNode {
            name: name.into(),
            label: label.into(),
        });
    }

    pub fn edge(&mut self, from: impl Into<String>, to: impl Into<String>) {
        self.edges.push(DiagramEdge {
            from: from.into(),
            to: to.into(),
        });
    }

    pub fn attr(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.graph_attrs.insert(key.into(), value.into());
    }

    /// Graphviz DOT source for the diagram.
    pub fn to_dot(&self) -> Result<String, fmt::Error> {
        let mut out = String::from("digraph {\n");
        if !self.graph_attrs.is_empty() {
            let attrs: Vec<String> = self
                .graph_attrs
                .iter()
                .map(|(k, v)| format!("{}=\"{}\"", k, escape(v)))
                .collect();
            writeln!(out, "\tgraph [{}]", attrs.join(" "))?;
        }
        for node in &self.nodes {
            writeln!(out, "\t{} [label=\"{}\"]", node.name, escape(&node.label))?;
        }
        for edge in &self.edges {
            writeln!(out, "\t{} -> {}", edge.from, edge.to)?;
        }
        out.push_str("}\n");
        Ok(out)
    }
}

fn escape(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

fn label(node: &TreeNode) -> String {
    format!("val: {}\nnode_id: {}", node.value, node.id)
}

/// Builds the diagram of `tree`: one node per tree node, one edge per link.
#[instrument(level = "debug", skip(tree), fields(nodes = tree.len()))]
pub fn render(tree: &TreeArena) -> DomainResult<Diagram> {
    render_with_attrs(tree, &BTreeMap::new())
}

/// Like [`render`], applying `graph_attrs` to the whole graph.
pub fn render_with_attrs(
    tree: &TreeArena,
    graph_attrs: &BTreeMap<String, String>,
) -> DomainResult<Diagram> {
    if tree.root().is_none() {
        return Err(DomainError::InvalidTree("tree has no root".to_string()));
    }

    let mut diagram = Diagram::new();
    for (_, node) in tree.iter() {
        diagram.node(node.id.to_string(), label(node));
        if let Some(parent_idx) = node.parent {
            let parent = tree.get_node(parent_idx).ok_or_else(|| {
                DomainError::InvalidTree(format!("node {} has a dangling parent", node.id))
            })?;
            diagram.edge(parent.id.to_string(), node.id.to_string());
        }
    }
    for (k, v) in graph_attrs {
        diagram.attr(k.clone(), v.clone());
    }
    Ok(diagram)
}
