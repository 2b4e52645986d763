//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/treegen/treegen.toml`
//! 3. Explicit config file (`--config <file>`)
//! 4. Environment variables: `TREEGEN_*` prefix, `__` between sections
//! 5. Command line flags (applied by the CLI layer)

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ApplicationError;
use crate::domain::GeneratorConfig;

/// Diagram output settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct RenderSettings {
    /// Graph-level attributes written into the DOT output (e.g. `rankdir = "LR"`)
    pub graph_attrs: BTreeMap<String, String>,
}

/// Unified configuration for treegen.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Settings {
    /// Seed for reproducible trees, random when unset
    pub seed: Option<u64>,
    pub generator: GeneratorConfig,
    pub render: RenderSettings,
}

/// Raw generator settings for intermediate parsing (Option to detect "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawGeneratorSettings {
    pub sparsity: Option<f64>,
    pub max_depth: Option<u32>,
    pub min_depth: Option<u32>,
    pub tree_minimum_value: Option<i64>,
    pub tree_maximum_value: Option<i64>,
    pub balanced: Option<bool>,
    pub max_retries: Option<u32>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawRenderSettings {
    pub graph_attrs: Option<BTreeMap<String, String>>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub seed: Option<u64>,
    pub generator: RawGeneratorSettings,
    pub render: RawRenderSettings,
}

/// Get the XDG config directory for treegen.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "treegen").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("treegen.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Merge overlay config onto self (base).
    ///
    /// - Scalar options: overlay wins if Some, otherwise keep base
    /// - `graph_attrs`: merged key by key, overlay wins on conflicts
    pub fn merge_with(&self, overlay: &RawSettings) -> Self {
        let base = &self.generator;
        let raw = &overlay.generator;
        let mut graph_attrs = self.render.graph_attrs.clone();
        if let Some(attrs) = &overlay.render.graph_attrs {
            graph_attrs.extend(attrs.clone());
        }

        Self {
            seed: overlay.seed.or(self.seed),
            generator: GeneratorConfig {
                sparsity: raw.sparsity.unwrap_or(base.sparsity),
                max_depth: raw.max_depth.unwrap_or(base.max_depth),
                min_depth: raw.min_depth.unwrap_or(base.min_depth),
                tree_minimum_value: raw.tree_minimum_value.unwrap_or(base.tree_minimum_value),
                tree_maximum_value: raw.tree_maximum_value.unwrap_or(base.tree_maximum_value),
                balanced: raw.balanced.unwrap_or(base.balanced),
                max_retries: raw.max_retries.unwrap_or(base.max_retries),
            },
            render: RenderSettings { graph_attrs },
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `config_file` - Optional explicit config file, must exist when given
    pub fn load(config_file: Option<&Path>) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                debug!(path = %global_path.display(), "loading global config");
                current = current.merge_with(&load_raw_settings(&global_path)?);
            }
        }

        // 3. Explicit config file
        if let Some(path) = config_file {
            if !path.exists() {
                return Err(ApplicationError::Config {
                    message: format!("config file not found: {}", path.display()),
                });
            }
            debug!(path = %path.display(), "loading config file");
            current = current.merge_with(&load_raw_settings(path)?);
        }

        // 4. Environment variables
        Self::apply_env_overrides(current)
    }

    /// Apply TREEGEN_* environment variables as explicit overrides.
    ///
    /// e.g. `TREEGEN_SEED=7`, `TREEGEN_GENERATOR__MAX_DEPTH=8`
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("TREEGEN")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get::<u64>("seed") {
            settings.seed = Some(val);
        }
        let generator = &mut settings.generator;
        if let Ok(val) = config.get::<f64>("generator.sparsity") {
            generator.sparsity = val;
        }
        if let Ok(val) = config.get::<u32>("generator.max_depth") {
            generator.max_depth = val;
        }
        if let Ok(val) = config.get::<u32>("generator.min_depth") {
            generator.min_depth = val;
        }
        if let Ok(val) = config.get::<i64>("generator.tree_minimum_value") {
            generator.tree_minimum_value = val;
        }
        if let Ok(val) = config.get::<i64>("generator.tree_maximum_value") {
            generator.tree_maximum_value = val;
        }
        if let Ok(val) = config.get::<bool>("generator.balanced") {
            generator.balanced = val;
        }
        if let Ok(val) = config.get::<u32>("generator.max_retries") {
            generator.max_retries = val;
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# treegen configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/treegen/treegen.toml
#   File:   --config <file>
#   Env:    TREEGEN_* environment variables, e.g. TREEGEN_GENERATOR__MAX_DEPTH=8
#   Flags:  command line options

# Seed for reproducible trees (random when unset)
# seed = 42

[generator]
# Probability that a potential child is omitted, 0 = always try both
# sparsity = 0.0
# max_depth = 5
# min_depth = 5
# tree_minimum_value = 0
# tree_maximum_value = 1000
# Keep values in binary-search-tree order
# balanced = false
# Give up after this many forced re-expansions
# max_retries = 10000

[render.graph_attrs]
# rankdir = "TB"
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_no_overlay_values_when_merging_then_keeps_base() {
        let base = Settings::default();
        let merged = base.merge_with(&RawSettings::default());
        assert_eq!(merged, base);
    }

    #[test]
    fn given_partial_overlay_when_merging_then_overrides_only_given_fields() {
        let raw: RawSettings = toml::from_str(
            r#"
seed = 9
[generator]
max_depth = 8
balanced = true
"#,
        )
        .unwrap();
        let merged = Settings::default().merge_with(&raw);

        assert_eq!(merged.seed, Some(9));
        assert_eq!(merged.generator.max_depth, 8);
        assert!(merged.generator.balanced);
        assert_eq!(merged.generator.min_depth, 5);
        assert_eq!(merged.generator.tree_maximum_value, 1000);
    }

    #[test]
    fn given_graph_attrs_in_two_layers_when_merging_then_unions_keys() {
        let first: RawSettings = toml::from_str("[render.graph_attrs]\nrankdir = \"LR\"\n").unwrap();
        let second: RawSettings =
            toml::from_str("[render.graph_attrs]\nbgcolor = \"white\"\nrankdir = \"TB\"\n").unwrap();
        let merged = Settings::default().merge_with(&first).merge_with(&second);

        assert_eq!(merged.render.graph_attrs.len(), 2);
        assert_eq!(merged.render.graph_attrs["rankdir"], "TB");
    }

    #[test]
    fn given_template_when_parsing_then_is_valid_toml() {
        let raw: RawSettings = toml::from_str(&Settings::template()).expect("template parses");
        assert!(raw.seed.is_none());
    }

    #[test]
    fn given_defaults_when_serializing_then_round_trips_through_raw() {
        let settings = Settings {
            seed: Some(3),
            ..Default::default()
        };
        let text = settings.to_toml().unwrap();
        let raw: RawSettings = toml::from_str(&text).unwrap();
        assert_eq!(Settings::default().merge_with(&raw), settings);
    }
}
