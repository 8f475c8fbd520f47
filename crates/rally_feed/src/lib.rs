//! Consumer-side views over the Rally event stream.
//!
//! This crate provides:
//! - [`PointStream`]: one structured record per point for renderers, with a
//!   live scoreboard and cosmetic terminal reasons
//! - [`transcript`]: the console lines of the text front-end
//!
//! Neither view decides anything about the match. Winners, scores and bias
//! all come from the engine's events.
//!
//! # Example
//!
//! ```rust,ignore
//! use rally_engine::MatchConfig;
//! use rally_feed::PointStream;
//!
//! let config = MatchConfig::new("Ann", "Bo", 3, 50).with_seed(42);
//! for outcome in PointStream::new(config) {
//!     println!("{} {:?} {}", outcome.game_text, outcome.games, outcome.bias);
//! }
//! ```

#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod points;
pub mod transcript;

pub use points::{PointOutcome, PointStream, Reason};
pub use transcript::{render_event, Transcript};
