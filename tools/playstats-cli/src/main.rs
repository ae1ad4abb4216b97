//! Playstats CLI: replay recorded input, inspect exports, play the demo.
//!
//! Usage:
//!   playstats replay <EVENTS>   Feed a JSONL input log through a recorder and export it
//!   playstats inspect <CSV>     Summarize an exported statistics CSV
//!   playstats rps               Play Rock-Paper-Scissors against the statistics bot

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use playstats_common::config::AppConfig;

mod commands;

#[derive(Parser)]
#[command(
    name = "playstats",
    about = "Record player input statistics and heatmaps",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a recorded input event log and export its statistics
    Replay {
        /// Path to the JSONL event log
        path: PathBuf,

        /// Input backend: discrete|action (defaults to config)
        #[arg(long)]
        backend: Option<String>,

        /// Output directory (defaults to config export_dir)
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Heatmap resolution in cells per side (defaults to config)
        #[arg(long)]
        resolution: Option<u32>,

        /// Display size for pointer heatmaps, e.g. 1920x1080 (defaults to config)
        #[arg(long)]
        display: Option<String>,
    },

    /// Summarize a statistics CSV export
    Inspect {
        /// Path to the CSV file
        path: PathBuf,
    },

    /// Play Rock-Paper-Scissors against a bot that reads your statistics
    Rps {
        /// Number of rounds to play
        #[arg(long, default_value = "5")]
        rounds: u32,

        /// Write the session's statistics CSV here when done
        #[arg(long)]
        csv: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load();

    playstats_common::logging::init_cli_logging(&config.logging, cli.verbose);

    match cli.command {
        Commands::Replay {
            path,
            backend,
            out,
            resolution,
            display,
        } => commands::replay::run(
            &config,
            commands::replay::ReplayArgs {
                path,
                backend,
                out,
                resolution,
                display,
            },
        ),
        Commands::Inspect { path } => commands::inspect::run(path),
        Commands::Rps { rounds, csv } => commands::rps::run(rounds, csv),
    }
}
