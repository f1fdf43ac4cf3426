//! Platepick CLI - Command-line interface
//!
//! Commands:
//! - play: Narrow the catalog down to one dish interactively
//! - inspect: Show the question axes the miner finds on a catalog
//! - simulate: Play many random sessions to check termination and balance

mod inspect;
mod play;
mod simulate;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use platepick_core::CatalogSource;
use platepick_engine::EngineConfig;

#[derive(Parser)]
#[command(name = "platepick")]
#[command(about = "Pick a dish by answering questions and judging head-to-head matches")]
struct Cli {
    /// Random seed for reproducible sessions
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play one interactive session
    Play(play::PlayArgs),
    /// Show candidate question axes for a catalog
    Inspect(inspect::InspectArgs),
    /// Play random sessions and report statistics
    Simulate(simulate::SimulateArgs),
}

/// Catalog and engine options shared by every command
#[derive(Args, Clone, Debug)]
pub struct CatalogArgs {
    /// Enriched dish catalog (JSON array)
    #[arg(long, value_name = "FILE")]
    pub catalog: PathBuf,

    /// Pools at or below this size go straight to the tournament
    #[arg(long, default_value = "8")]
    pub narrowing_threshold: usize,

    /// Maximum number of dishes entering the tournament
    #[arg(long, default_value = "34")]
    pub entry_cap: usize,
}

impl CatalogArgs {
    /// Load the catalog, seeding its shuffle when a seed is given
    pub fn load(&self, seed: Option<u64>) -> Result<CatalogSource> {
        let catalog = CatalogSource::load(&self.catalog)
            .with_context(|| format!("Failed to load catalog: {}", self.catalog.display()))?;

        tracing::info!("Catalog {} holds {} dishes", self.catalog.display(), catalog.len());

        Ok(match seed {
            Some(s) => catalog.with_seed(s),
            None => catalog,
        })
    }

    pub fn engine_config(&self, seed: Option<u64>) -> EngineConfig {
        let config = EngineConfig::default()
            .with_narrowing_threshold(self.narrowing_threshold)
            .with_entry_cap(self.entry_cap);
        match seed {
            Some(s) => config.with_seed(s),
            None => config,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Play(args) => play::run(args, cli.seed),
        Commands::Inspect(args) => inspect::run(args, cli.seed),
        Commands::Simulate(args) => simulate::run(args, cli.seed),
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
