//! Trace command implementation.

use crate::options::{MatchArgs, Prompter};
use anyhow::{Context, Result};
use rally_engine::MatchEngine;
use std::io::{self, Write};
use tracing::info;

/// Runs the trace command.
pub fn run(args: &MatchArgs) -> Result<()> {
    // Prompts go to stderr so stdout holds only JSON lines.
    let config = args.resolve(&mut Prompter::stdin(io::stderr()))?;

    let mut out = io::stdout().lock();
    let mut count = 0usize;
    for event in MatchEngine::checked(config)? {
        let line = serde_json::to_string(&event).with_context(|| "Failed to encode event")?;
        writeln!(out, "{line}").with_context(|| "Failed to write event")?;
        count += 1;
    }

    info!("Wrote {} events", count);
    Ok(())
}
