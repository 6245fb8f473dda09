//! Polaron CLI - Command-line interface for transport simulations.

mod commands;
mod config;
mod sink;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "polaron")]
#[command(author, version, about = "Polaron - Charge transport through disordered lattices", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default configuration file
    Init {
        /// Destination path (default: polaron.toml)
        #[arg(short, long)]
        path: Option<String>,
    },

    /// Run a simulation from a configuration file
    Run {
        /// Configuration file (default: polaron.toml in this or a parent directory)
        #[arg(short, long)]
        config: Option<String>,

        /// Override the configured tick count
        #[arg(short, long)]
        ticks: Option<u64>,

        /// Override the configured random seed
        #[arg(short, long)]
        seed: Option<u64>,

        /// Override the configured output directory
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Validate a configuration file without running it
    Check {
        /// Configuration file (default: polaron.toml in this or a parent directory)
        #[arg(short, long)]
        config: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "polaron=debug" } else { "polaron=info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Init { path } => commands::init::run(path),
        Commands::Run {
            config,
            ticks,
            seed,
            output,
        } => commands::run::run(config, ticks, seed, output, cli.verbose),
        Commands::Check { config } => commands::check::run(config),
    }
}
