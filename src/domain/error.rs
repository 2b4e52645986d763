//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::node::NodeId;

/// Domain errors represent violated generation constraints or bad traversal input.
/// These are independent of configuration loading and CLI concerns.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("invalid configuration: {message}")]
    Configuration { message: String },

    #[error("minimum depth {min_depth} cannot be reached: {reason}")]
    UnsatisfiableDepth { min_depth: u32, reason: String },

    #[error("invalid tree: {0}")]
    InvalidTree(String),

    #[error("node not found: {0}")]
    NodeNotFound(NodeId),
}

impl DomainError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
