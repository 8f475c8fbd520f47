//! Deterministic simulation harness.
//!
//! Plays many seeded matches per scenario and checks one invariant family
//! over each recorded event stream.

use crate::invariants::{
    check_bias_bounds, check_event_ordering, check_scoring, check_serve_alternation,
    check_termination, CheckResult,
};
use crate::simulation::{Scenario, SimResult};
use rally_engine::{EngineTuning, MatchConfig, MatchEngine, MatchEvent};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{info, warn};
use xxhash_rust::xxh64::xxh64;

/// Seed for trace digests.
const HASH_SEED: u64 = 0;

/// Configuration for the simulation.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Master seed for all randomness.
    pub seed: u64,
    /// Number of matches played per scenario.
    pub iterations: usize,
    /// Points after which a match counts as non-terminating.
    pub max_points: u64,
    /// Whether to verify determinism.
    pub verify_determinism: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            iterations: 100,
            max_points: 100_000,
            verify_determinism: true,
        }
    }
}

impl SimConfig {
    /// Creates a new config with the given seed.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the number of iterations.
    #[must_use]
    pub const fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Sets the point limit for a single match.
    #[must_use]
    pub const fn with_max_points(mut self, max_points: u64) -> Self {
        self.max_points = max_points;
        self
    }

    /// Disables determinism verification.
    #[must_use]
    pub const fn without_determinism_check(mut self) -> Self {
        self.verify_determinism = false;
        self
    }
}

/// Simulation harness for deterministic testing.
#[derive(Debug)]
pub struct Simulation {
    config: SimConfig,
    tuning: EngineTuning,
    rng: ChaCha8Rng,
}

impl Simulation {
    /// Creates a new simulation with the given configuration.
    #[must_use]
    pub fn new(config: SimConfig) -> Self {
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        Self {
            config,
            tuning: EngineTuning::default(),
            rng,
        }
    }

    /// Replaces the engine constants used for every match.
    #[must_use]
    pub const fn with_tuning(mut self, tuning: EngineTuning) -> Self {
        self.tuning = tuning;
        self
    }

    /// Runs a scenario and returns the result.
    pub fn run_scenario(&mut self, scenario: &Scenario) -> SimResult {
        let result = match scenario {
            Scenario::Determinism { config } => self.test_determinism(config),
            Scenario::Termination { config } => {
                let base = config.clone();
                self.check_each("termination", config, |events| {
                    check_termination(&base, events)
                })
            }
            Scenario::BiasBounds { config } => {
                let (floor, ceiling) = (self.tuning.bias_floor, self.tuning.bias_ceiling);
                self.check_each("bias_bounds", config, |events| {
                    check_bias_bounds(events, floor, ceiling)
                })
            }
            Scenario::ScoringRules { config } => {
                let base = config.clone();
                self.check_each("scoring_rules", config, |events| check_scoring(&base, events))
            }
            Scenario::ServeAlternation { config } => {
                self.check_each("serve_alternation", config, check_serve_alternation)
            }
            Scenario::EventOrdering { config } => {
                self.check_each("event_ordering", config, check_event_ordering)
            }
        };

        if result.passed {
            info!(scenario = scenario.name(), "{}", result.message);
        } else {
            warn!(scenario = scenario.name(), "{}", result.message);
        }
        result
    }

    /// Runs all scenarios and returns aggregated results.
    pub fn run_all(&mut self, scenarios: &[Scenario]) -> Vec<SimResult> {
        scenarios.iter().map(|s| self.run_scenario(s)).collect()
    }

    /// Verifies that replaying the master seed gives identical traces.
    pub fn verify_determinism(&self, config: &MatchConfig) -> bool {
        if !self.config.verify_determinism {
            return true;
        }

        let config = config.clone().with_seed(self.config.seed);
        let first = self.play(&config);
        let second = self.play(&config);
        matches!((first, second), (Ok(a), Ok(b)) if same_trace(&a, &b))
    }

    fn next_seed(&mut self) -> u64 {
        self.rng.gen()
    }

    /// Plays one match, failing if it runs past the point limit.
    fn play(&self, config: &MatchConfig) -> Result<Vec<MatchEvent>, String> {
        let mut engine = MatchEngine::with_tuning(config.clone(), self.tuning);
        let mut events = Vec::new();
        while let Some(event) = engine.next() {
            events.push(event);
            if engine.points_played() > self.config.max_points {
                return Err(format!("no result after {} points", self.config.max_points));
            }
        }
        Ok(events)
    }

    fn check_each(
        &mut self,
        name: &str,
        config: &MatchConfig,
        check: impl Fn(&[MatchEvent]) -> CheckResult,
    ) -> SimResult {
        let mut longest = 0;
        for _ in 0..self.config.iterations {
            let seed = self.next_seed();
            let outcome = self
                .play(&config.clone().with_seed(seed))
                .and_then(|events| {
                    longest = longest.max(events.len());
                    check(&events)
                });
            if let Err(message) = outcome {
                return SimResult::fail(name, format!("seed {seed}: {message}"));
            }
        }

        SimResult::pass(name, format!("{} matches held", self.config.iterations))
            .with_diagnostic(format!("longest match: {longest} events"))
    }

    fn test_determinism(&mut self, config: &MatchConfig) -> SimResult {
        if !self.config.verify_determinism {
            return SimResult::skip("determinism", "Determinism check disabled");
        }

        for _ in 0..self.config.iterations {
            let seeded = config.clone().with_seed(self.next_seed());
            let first = self.play(&seeded);
            let second = self.play(&seeded);
            let same = matches!(
                (&first, &second),
                (Ok(a), Ok(b)) if a == b && same_trace(a, b)
            );
            if !same {
                return SimResult::fail(
                    "determinism",
                    format!("seed {:?}: replay diverged", seeded.seed),
                );
            }
        }

        SimResult::pass(
            "determinism",
            format!("{} seeds replayed identically", self.config.iterations),
        )
    }
}

/// Digest of an event sequence, for comparing runs.
///
/// Hashes the JSON lines `rally trace` prints for the same events.
///
/// # Errors
///
/// Returns an error if an event cannot be serialized.
pub fn trace_digest(events: &[MatchEvent]) -> serde_json::Result<u64> {
    let mut input = Vec::new();
    for event in events {
        serde_json::to_writer(&mut input, event)?;
        input.push(b'\n');
    }
    Ok(xxh64(&input, HASH_SEED))
}

/// Two traces match only if both digests were computed and agree.
fn same_trace(a: &[MatchEvent], b: &[MatchEvent]) -> bool {
    matches!((trace_digest(a), trace_digest(b)), (Ok(x), Ok(y)) if x == y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::SimSummary;

    fn config() -> MatchConfig {
        MatchConfig::new("Ann", "Bo", 3, 50)
    }

    #[test]
    fn simulation_is_deterministic() {
        let sim = Simulation::new(SimConfig::default().with_seed(12345));
        assert!(sim.verify_determinism(&config()));
    }

    #[test]
    fn all_scenarios_pass_for_default_model() {
        let mut sim = Simulation::new(SimConfig::default().with_iterations(20));
        let results = sim.run_all(&Scenario::all(&config()));
        let summary = SimSummary::from_results(results);
        assert!(summary.all_invariants_held(), "{summary}");
        assert_eq!(summary.total, 6);
    }

    #[test]
    fn scenarios_pass_for_best_of_five_with_heavy_momentum() {
        let config = MatchConfig::new("Ann Lee", "Bo", 5, 90).with_deltas(4, 6, 10);
        let mut sim = Simulation::new(SimConfig::default().with_seed(7).with_iterations(10));
        let summary = SimSummary::from_results(sim.run_all(&Scenario::all(&config)));
        assert!(summary.all_invariants_held(), "{summary}");
    }

    #[test]
    fn point_limit_fails_termination() {
        let mut sim = Simulation::new(SimConfig::default().with_iterations(1).with_max_points(10));
        let result = sim.run_scenario(&Scenario::Termination { config: config() });
        assert!(!result.passed);
        assert!(result.message.contains("no result after 10 points"), "{result}");
    }

    #[test]
    fn invariants_hold_when_every_serve_faults() {
        let tuning = EngineTuning {
            first_serve_in: 0.0,
            second_serve_in: 0.0,
            ..EngineTuning::default()
        };
        let mut sim =
            Simulation::new(SimConfig::default().with_iterations(5)).with_tuning(tuning);
        let summary = SimSummary::from_results(sim.run_all(&Scenario::all(&config())));
        assert!(summary.all_invariants_held(), "{summary}");
    }

    #[test]
    fn disabled_determinism_is_skipped() {
        let mut sim = Simulation::new(SimConfig::default().without_determinism_check());
        let result = sim.run_scenario(&Scenario::Determinism { config: config() });
        assert!(result.skipped);
    }

    #[test]
    fn digest_tracks_seed() {
        let a: Vec<_> = MatchEngine::new(config().with_seed(42)).collect();
        let b: Vec<_> = MatchEngine::new(config().with_seed(42)).collect();
        let c: Vec<_> = MatchEngine::new(config().with_seed(43)).collect();
        assert_eq!(trace_digest(&a).unwrap(), trace_digest(&b).unwrap());
        assert_ne!(trace_digest(&a).unwrap(), trace_digest(&c).unwrap());
    }

    #[test]
    fn golden_trace_digests() {
        let golden: Vec<_> = MatchEngine::new(config().with_seed(42)).collect();
        assert_eq!(trace_digest(&golden).unwrap(), 0x2977_ba54_76a6_6a9a);

        let tuning = EngineTuning {
            first_serve_in: 0.0,
            second_serve_in: 0.0,
            ..EngineTuning::default()
        };
        let faults: Vec<_> = MatchEngine::with_tuning(config().with_seed(1), tuning).collect();
        assert_eq!(trace_digest(&faults).unwrap(), 0xaa0c_0582_4e37_443c);
    }

    #[test]
    fn digest_covers_json_lines() {
        let events: Vec<_> = MatchEngine::new(config().with_seed(42)).take(1).collect();
        let line = serde_json::to_string(&events[0]).unwrap();
        assert_eq!(line, r#"{"kind":"start","player_a":"Ann","player_b":"Bo","max_sets":3}"#);
        let expected = xxh64(format!("{line}\n").as_bytes(), HASH_SEED);
        assert_eq!(trace_digest(&events).unwrap(), expected);
    }
}
