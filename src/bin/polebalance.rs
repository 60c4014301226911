//! polebalance CLI - Tabular Q-learning on a discretized cart-pole
//!
//! This CLI provides a unified interface for:
//! - Training and evaluating a Q-learning agent
//! - Decoding discrete state indices back into observation bins

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "polebalance")]
#[command(version, about = "Tabular Q-learning for the cart-pole task", long_about = None)]
struct Cli {
    /// Increase log verbosity (overridden by RUST_LOG)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train a Q-learning agent, then evaluate it greedily
    Train(Box<polebalance::cli::commands::train::TrainArgs>),

    /// Decode a state index into per-dimension bins
    Decode(polebalance::cli::commands::decode::DecodeArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = match cli.verbose {
        0 => "polebalance=info",
        1 => "polebalance=debug",
        _ => "polebalance=trace",
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Train(args) => polebalance::cli::commands::train::execute(*args),
        Commands::Decode(args) => polebalance::cli::commands::decode::execute(args),
    }
}
