//! Verify command implementation.

use anyhow::Result;
use rally_engine::MatchConfig;
use rally_vopr::{Scenario, SimConfig, SimSummary, Simulation};
use tracing::info;

/// Runs the verify command.
pub fn run(seed: u64, iterations: usize) -> Result<()> {
    info!("Running simulation with seed {} ({} matches per scenario)", seed, iterations);

    let mut sim = Simulation::new(
        SimConfig::default()
            .with_seed(seed)
            .with_iterations(iterations),
    );

    let configs = [
        MatchConfig::new("Ann", "Bo", 3, 50),
        MatchConfig::new("Ann", "Bo", 5, 80).with_deltas(2, 4, 10),
    ];

    let mut results = Vec::new();
    for config in &configs {
        if !sim.verify_determinism(config) {
            anyhow::bail!("Replaying seed {seed} gave a different trace");
        }
        results.extend(sim.run_all(&Scenario::all(config)));
    }

    let summary = SimSummary::from_results(results);
    println!("{summary}");

    if !summary.all_invariants_held() {
        anyhow::bail!("{} scenario(s) failed", summary.failed);
    }

    info!("All invariants held");
    Ok(())
}
