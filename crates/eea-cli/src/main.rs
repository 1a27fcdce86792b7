//! eea - Build, validate and export steer/brake-by-wire E/E architectures
//!
//! Every command reads an architecture definition (TOML, YAML or JSON). Without
//! one, the built-in UltimateSteerBrakeByWire platform is used.

mod commands;
mod config;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::commands::ExportArgs;
use crate::config::Config;
use crate::output::{OutputContext, OutputFormat};

#[derive(Parser)]
#[command(name = "eea")]
#[command(author, version, about = "E/E architecture builder and validator")]
#[command(propagate_version = true)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "EEA_CONFIG")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Minimal output (for scripting)
    #[arg(short, long)]
    quiet: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build and validate an architecture
    Validate {
        /// Definition file (TOML, YAML or JSON)
        definition: Option<PathBuf>,
    },

    /// Build an architecture and list its components, ECUs and tasks
    Show {
        /// Definition file (TOML, YAML or JSON)
        definition: Option<PathBuf>,
    },

    /// Build, validate and export an architecture
    Export {
        /// Definition file (TOML, YAML or JSON)
        definition: Option<PathBuf>,

        #[command(flatten)]
        args: ExportArgs,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();

    // Load config file
    let config = if let Some(config_path) = &cli.config {
        Config::load_from(config_path)?
    } else {
        Config::load().unwrap_or_default()
    };

    let definition = match &cli.command {
        Commands::Validate { definition }
        | Commands::Show { definition }
        | Commands::Export { definition, .. } => definition.as_deref(),
    };
    let merged = config.merge_with_args(definition, cli.format, cli.no_color);
    tracing::debug!(?merged, "Resolved configuration");

    let ctx = OutputContext::new(merged.format, merged.no_color, cli.quiet);

    match &cli.command {
        Commands::Validate { .. } => {
            commands::validate(merged.definition.as_deref(), &ctx)?;
        }

        Commands::Show { .. } => {
            commands::show(merged.definition.as_deref(), &ctx)?;
        }

        Commands::Export { args, .. } => {
            commands::export(merged.definition.as_deref(), &merged.export, args, &ctx).await?;
        }
    }

    Ok(())
}
