//! Domain entities: generation parameters

use serde::{Deserialize, Serialize};

use crate::domain::error::{DomainError, DomainResult};

/// Default cap on forced min-depth re-expansions per run.
pub const DEFAULT_MAX_RETRIES: u32 = 10_000;

/// Shape and value constraints for one generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Probability that a potential child is omitted, in `[0, 1]`
    pub sparsity: f64,
    pub max_depth: u32,
    pub min_depth: u32,
    /// Inclusive lower bound for node values
    pub tree_minimum_value: i64,
    /// Exclusive upper bound for node values
    pub tree_maximum_value: i64,
    /// Keep values in binary-search-tree order
    pub balanced: bool,
    /// Cap on forced re-expansions while the minimum depth is unmet
    pub max_retries: u32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            sparsity: 0.0,
            max_depth: 5,
            min_depth: 5,
            tree_minimum_value: 0,
            tree_maximum_value: 1000,
            balanced: false,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

impl GeneratorConfig {
    /// Check bounds that make generation impossible before any draw happens.
    pub fn validate(&self) -> DomainResult<()> {
        if self.max_depth < 1 {
            return Err(DomainError::configuration("max_depth must be at least 1"));
        }
        if self.min_depth < 1 {
            return Err(DomainError::configuration("min_depth must be at least 1"));
        }
        if self.tree_minimum_value >= self.tree_maximum_value {
            return Err(DomainError::configuration(format!(
                "tree_minimum_value ({}) must be below tree_maximum_value ({})",
                self.tree_minimum_value, self.tree_maximum_value
            )));
        }
        if !(0.0..=1.0).contains(&self.sparsity) {
            return Err(DomainError::configuration(format!(
                "sparsity must be within [0, 1], got {}",
                self.sparsity
            )));
        }
        Ok(())
    }

    /// Copy with `min_depth` clamped down to `max_depth`.
    pub fn normalized(&self) -> Self {
        Self {
            min_depth: self.min_depth.min(self.max_depth),
            ..self.clone()
        }
    }
}
