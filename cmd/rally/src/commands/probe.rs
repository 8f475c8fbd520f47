//! Probe command implementation.

use anyhow::{Context, Result};
use rally_vopr::probe::write_csv;
use rally_vopr::{run_probe, ProbeSettings};
use std::io;
use tracing::info;

/// Runs the probe command.
pub fn run(matches: usize, csv: bool) -> Result<()> {
    info!("Probing {} matches per setting", matches);

    let reports: Vec<_> = ProbeSettings::standard()
        .iter()
        .map(|settings| run_probe(settings, matches))
        .collect();

    if csv {
        write_csv(&reports, io::stdout().lock()).with_context(|| "Failed to write CSV")?;
    } else {
        for report in &reports {
            println!("\n{report}");
        }
    }
    Ok(())
}
