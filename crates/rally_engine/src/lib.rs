//! Point-by-point tennis match simulation for Rally.
//!
//! This crate provides:
//! - A validated match configuration and the model tuning constants
//! - Score bookkeeping with real tennis game/set/match rules (no tiebreak)
//! - A momentum feedback loop that shifts point-win probability over time
//! - A first/second serve model with net and out faults
//! - [`MatchEngine`], a seeded iterator producing the match as events
//!
//! # Example
//!
//! ```rust,ignore
//! use rally_engine::{MatchConfig, MatchEngine, MatchEvent};
//!
//! let config = MatchConfig::new("Ann", "Bo", 3, 50).with_seed(42);
//! for event in MatchEngine::new(config) {
//!     if let MatchEvent::Match(result) = event {
//!         println!("{} wins", result.winner);
//!     }
//! }
//! ```

#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod momentum;
pub mod score;
pub mod serve;

pub use config::{EngineTuning, MatchConfig};
pub use engine::MatchEngine;
pub use error::{Error, Result};
pub use event::{GameEvent, MatchEvent, MatchResult, PointEvent, SetEvent, StartEvent};
pub use score::{Player, ScoreState};
pub use serve::{FaultKind, ServeSide};
