//! Antics CLI - Command-line interface
//!
//! Commands:
//! - play: Pit two search agents against each other
//! - train: Train the evaluation network by self-play

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod play;
mod train;

#[derive(Parser)]
#[command(name = "antics")]
#[command(about = "Alpha-beta agents for the Antics ant colony game")]
struct Cli {
    /// Random seed for reproducible runs
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a match between two agents
    Play(play::PlayArgs),
    /// Train the evaluation network against the heuristic
    Train(train::TrainArgs),
}

fn main() -> anyhow::Result<()> {
    // Initialize logging (RUST_LOG overrides the default level)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Play(args) => play::run(args, cli.seed),
        Commands::Train(args) => train::run(args, cli.seed),
    }
}
