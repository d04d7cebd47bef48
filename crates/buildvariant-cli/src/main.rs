use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod output;

use commands::signing::{SigningCommands, handle_signing_command};
use commands::variants;
use config::{ProjectArgs, resolve_project_config};

#[derive(Parser)]
#[command(name = "buildvariant")]
#[command(about = "Resolve Android build variants and release signing", long_about = None)]
#[command(version = buildvariant_core::VERSION)]
struct Cli {
    #[command(flatten)]
    project: ProjectArgs,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a single flavor × build type variant
    Resolve {
        /// Flavor (dev, staging, prod)
        flavor: String,

        /// Build type (debug, release)
        build_type: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Resolve every variant
    Matrix {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List flavors
    Flavors,

    /// Release signing management
    #[command(subcommand)]
    Signing(SigningCommands),
}

fn main() -> Result<()> {
    // Load .env file if present (doesn't override existing env vars)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = resolve_project_config(&cli.project)?;

    match cli.command {
        Commands::Resolve {
            flavor,
            build_type,
            json,
        } => variants::resolve(config, &flavor, &build_type, json)?,
        Commands::Matrix { json } => variants::matrix(config, json)?,
        Commands::Flavors => variants::flavors(&config)?,
        Commands::Signing(cmd) => handle_signing_command(config, cmd)?,
    }

    Ok(())
}
