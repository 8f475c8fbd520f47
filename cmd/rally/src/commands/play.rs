//! Play command implementation.

use crate::options::{MatchArgs, Prompter};
use anyhow::{Context, Result};
use rally_engine::MatchEngine;
use rally_feed::Transcript;
use std::io::{self, Write};
use tracing::debug;

/// Runs the play command.
pub fn run(args: &MatchArgs) -> Result<()> {
    let config = args.resolve(&mut Prompter::stdin(io::stdout()))?;
    debug!(seed = ?config.seed, "resolved match config");

    let mut transcript = Transcript::new();
    let mut out = io::stdout().lock();
    for event in MatchEngine::checked(config)? {
        for line in transcript.lines(&event) {
            writeln!(out, "{line}").with_context(|| "Failed to write transcript")?;
        }
    }
    Ok(())
}
