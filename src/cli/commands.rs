//! Command dispatch

use std::io;
use std::path::Path;

use clap::CommandFactory;
use clap_complete::generate as generate_completion;
use tracing::{debug, info, instrument};

use crate::application::{lca, render_with_attrs, TreeNodeConvert};
use crate::cli::args::{Cli, Commands, ConfigCommands, GeneratorArgs, OutputFormat};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, Settings};
use crate::domain::{NodeId, StdRandom, TreeArena, TreeGenerator};

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Generate {
            generator,
            format,
            output,
        }) => cmd_generate(cli, generator, *format, output.as_deref()),
        Some(Commands::Render {
            generator,
            attrs,
            output,
        }) => cmd_render(cli, generator, attrs, output.as_deref()),
        Some(Commands::Lca { generator, a, b }) => cmd_lca(cli, generator, *a, *b),
        Some(Commands::Config { command }) => cmd_config(cli, command),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate_completion(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        None => Err(CliError::InvalidArgs(
            "no command given, see --help".to_string(),
        )),
    }
}

/// Settings from all layers, with the command's flags on top.
fn load_settings(cli: &Cli, generator: &GeneratorArgs) -> CliResult<Settings> {
    let mut settings = Settings::load(cli.config.as_deref())?;
    generator.apply(&mut settings);
    debug!(?settings, "effective settings");
    Ok(settings)
}

/// Generates the tree for `settings`, picking and logging a seed when none is set.
#[instrument(level = "debug", skip(settings))]
fn build_tree(settings: &Settings) -> CliResult<TreeArena> {
    let seed = settings.seed.unwrap_or_else(rand::random);
    info!(seed, "generating tree");
    let mut generator = TreeGenerator::new(settings.generator.clone(), StdRandom::seeded(seed))?;
    Ok(generator.generate()?)
}

fn write_output(content: &str, path: Option<&Path>) -> CliResult<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .map_err(|e| CliError::io(format!("write {}", path.display()), e))?;
            output::action("Written", &path.display());
            Ok(())
        }
        None => {
            output::info(content.trim_end());
            Ok(())
        }
    }
}

fn cmd_generate(
    cli: &Cli,
    generator: &GeneratorArgs,
    format: OutputFormat,
    path: Option<&Path>,
) -> CliResult<()> {
    let settings = load_settings(cli, generator)?;
    let tree = build_tree(&settings)?;
    let content = match format {
        OutputFormat::Text => tree.to_tree_text(),
        OutputFormat::Dot => render_with_attrs(&tree, &settings.render.graph_attrs)?.to_dot()?,
    };
    write_output(&content, path)
}

fn cmd_render(
    cli: &Cli,
    generator: &GeneratorArgs,
    attrs: &[(String, String)],
    path: Option<&Path>,
) -> CliResult<()> {
    let mut settings = load_settings(cli, generator)?;
    settings.render.graph_attrs.extend(attrs.iter().cloned());
    let tree = build_tree(&settings)?;
    let diagram = render_with_attrs(&tree, &settings.render.graph_attrs)?;
    write_output(&diagram.to_dot()?, path)
}

fn cmd_lca(cli: &Cli, generator: &GeneratorArgs, a: u64, b: u64) -> CliResult<()> {
    let settings = load_settings(cli, generator)?;
    let tree = build_tree(&settings)?;
    if cli.verbose > 0 {
        output::header("Tree");
        output::detail(&tree.to_tree_text());
    }
    let ancestor = lca(&tree, NodeId(a), NodeId(b))?;
    output::action("LCA", ancestor);
    Ok(())
}

fn cmd_config(cli: &Cli, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = Settings::load(cli.config.as_deref())?;
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Path => match global_config_path() {
            Some(path) => output::info(&path.display()),
            None => output::warning("no home directory, global config unavailable"),
        },
        ConfigCommands::Template => output::info(&Settings::template()),
    }
    Ok(())
}
