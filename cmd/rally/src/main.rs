//! Rally CLI - seeded tennis match simulator.
//!
//! Commands:
//! - `rally play` - Simulate a match and print the transcript
//! - `rally trace` - Simulate a match and print events as JSON lines
//! - `rally probe` - Summarise set scores across seeds for momentum settings
//! - `rally verify` - Run the deterministic simulation scenarios

use clap::{Parser, Subcommand};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod commands;
mod options;

use options::{Abort, MatchArgs};

#[derive(Parser)]
#[command(name = "rally")]
#[command(about = "Seeded tennis match simulator")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate a match and print the transcript
    Play(MatchArgs),

    /// Simulate a match and print every event as a JSON line
    Trace(MatchArgs),

    /// Compare momentum settings across many seeded matches
    Probe {
        /// Matches per setting
        #[arg(short, long, default_value_t = 200)]
        matches: usize,

        /// Write the reports as CSV
        #[arg(long)]
        csv: bool,
    },

    /// Run the deterministic simulation scenarios
    Verify {
        /// Master seed
        #[arg(short, long, default_value_t = 42)]
        seed: u64,

        /// Matches per scenario
        #[arg(short, long, default_value_t = 100)]
        iterations: usize,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries transcripts, JSON and CSV.
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Play(args) => commands::play::run(&args),
        Commands::Trace(args) => commands::trace::run(&args),
        Commands::Probe { matches, csv } => commands::probe::run(matches, csv),
        Commands::Verify { seed, iterations } => commands::verify::run(seed, iterations),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if let Some(abort) = err.downcast_ref::<Abort>() {
                println!("{abort}");
                ExitCode::from(abort.exit_code())
            } else {
                eprintln!("Error: {err:#}");
                ExitCode::FAILURE
            }
        }
    }
}
