//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum, ValueHint};

use crate::config::Settings;

/// Random binary tree generator with depth, sparsity and BST-ordering constraints
#[derive(Parser, Debug)]
#[command(name = "treegen")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Config file layered over the global config
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a tree and print it
    Generate {
        #[command(flatten)]
        generator: GeneratorArgs,
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
        /// Write to file instead of stdout
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
    },

    /// Generate a tree and print its Graphviz diagram
    Render {
        #[command(flatten)]
        generator: GeneratorArgs,
        /// Graph attribute, repeatable (e.g. --attr rankdir=LR)
        #[arg(long = "attr", value_name = "KEY=VALUE", value_parser = parse_key_val)]
        attrs: Vec<(String, String)>,
        /// Write to file instead of stdout
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
    },

    /// Lowest common ancestor of two node ids in a generated tree
    Lca {
        #[command(flatten)]
        generator: GeneratorArgs,
        /// First node id
        a: u64,
        /// Second node id
        b: u64,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective settings
    Show,
    /// Show global config file path
    Path,
    /// Print a commented config template
    Template,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Indented text tree
    Text,
    /// Graphviz DOT
    Dot,
}

/// Generator overrides, highest precedence layer.
#[derive(Args, Debug, Default, Clone)]
pub struct GeneratorArgs {
    /// Seed for a reproducible tree
    #[arg(long)]
    pub seed: Option<u64>,
    /// Probability that a potential child is omitted [0, 1]
    #[arg(long)]
    pub sparsity: Option<f64>,
    #[arg(long)]
    pub max_depth: Option<u32>,
    #[arg(long)]
    pub min_depth: Option<u32>,
    /// Inclusive lower value bound
    #[arg(long, allow_negative_numbers = true)]
    pub min_value: Option<i64>,
    /// Exclusive upper value bound
    #[arg(long, allow_negative_numbers = true)]
    pub max_value: Option<i64>,
    /// Keep values in binary-search-tree order, `--balanced=false` turns it off
    #[arg(long, num_args = 0..=1, default_missing_value = "true", require_equals = true)]
    pub balanced: Option<bool>,
    /// Cap on forced re-expansions while min depth is unmet
    #[arg(long)]
    pub max_retries: Option<u32>,
}

impl GeneratorArgs {
    /// Layer the given flags over `settings`.
    pub fn apply(&self, settings: &mut Settings) {
        let generator = &mut settings.generator;
        if let Some(seed) = self.seed {
            settings.seed = Some(seed);
        }
        if let Some(v) = self.sparsity {
            generator.sparsity = v;
        }
        if let Some(v) = self.max_depth {
            generator.max_depth = v;
        }
        if let Some(v) = self.min_depth {
            generator.min_depth = v;
        }
        if let Some(v) = self.min_value {
            generator.tree_minimum_value = v;
        }
        if let Some(v) = self.max_value {
            generator.tree_maximum_value = v;
        }
        if let Some(v) = self.balanced {
            generator.balanced = v;
        }
        if let Some(v) = self.max_retries {
            generator.max_retries = v;
        }
    }
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{s}'"))?;
    if key.is_empty() {
        return Err(format!("empty key in '{s}'"));
    }
    Ok((key.to_string(), value.to_string()))
}
