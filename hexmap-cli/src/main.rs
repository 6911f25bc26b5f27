//! HEXMAP CLI - Command-line interface
//!
//! Commands:
//! - generate: Build a hex tile map from a classification grid and water geometries
//! - inspect: Summarize a previously exported map

use clap::{Parser, Subcommand};

mod generate;
mod input;
mod inspect;

#[derive(Parser)]
#[command(name = "hexmap")]
#[command(about = "Land-cover hex tile map generator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a hex tile map and export it as JSON
    Generate(generate::GenerateArgs),
    /// Summarize an exported map file
    Inspect(inspect::InspectArgs),
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate(args) => generate::run(args),
        Commands::Inspect(args) => inspect::run(args),
    }
}
