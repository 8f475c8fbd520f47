//! VOPR-style deterministic simulation testing for Rally.
//!
//! This crate provides:
//! - Invariant checks over recorded match event streams
//! - Deterministic simulation harness for reproducible testing
//! - Property-based generators for match configurations
//! - A momentum probe summarising set scores across seeds
//!
//! # VOPR Testing Philosophy
//!
//! VOPR (Vaguely Ordered Parallel Replayability) testing ensures:
//! 1. **Determinism**: Same seed produces identical event streams
//! 2. **Termination**: Every match reaches a result
//! 3. **Scoring**: Every game and set closes exactly when tennis says it does
//!
//! # Example
//!
//! ```rust,ignore
//! use rally_engine::MatchConfig;
//! use rally_vopr::{Scenario, SimConfig, SimSummary, Simulation};
//!
//! let mut sim = Simulation::new(SimConfig::default().with_seed(42));
//! let config = MatchConfig::new("Ann", "Bo", 3, 50);
//! let summary = SimSummary::from_results(sim.run_all(&Scenario::all(&config)));
//! assert!(summary.all_invariants_held());
//! ```

#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod generators;
pub mod harness;
pub mod invariants;
pub mod probe;
pub mod simulation;

pub use harness::{trace_digest, SimConfig, Simulation};
pub use probe::{run_probe, ProbeReport, ProbeSettings};
pub use simulation::{Scenario, SimResult, SimSummary};
